use axum::{
    Router,
    extract::{Json, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    CalcSettings, CapAllocation, CapPerson, CapPolicy, ContributionSplit, FutureInflow, Household,
    JurisdictionRules, Objective, OptimizeResult, PlanResult, Pool, SearchResolution, SpendBand,
    SpendingBands, SplitMode, allocate_concessional, build_plan, optimize_split,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliSpendProfile {
    Flat,
    GoGoSlowGo,
}

impl From<CliSpendProfile> for SpendingBands {
    fn from(value: CliSpendProfile) -> Self {
        match value {
            CliSpendProfile::Flat => SpendingBands::flat(),
            CliSpendProfile::GoGoSlowGo => SpendingBands::go_go_slow_go(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliSplitMode {
    GrossDeferral,
    NetFixed,
}

impl From<CliSplitMode> for SplitMode {
    fn from(value: CliSplitMode) -> Self {
        match value {
            CliSplitMode::GrossDeferral => SplitMode::GrossDeferral,
            CliSplitMode::NetFixed => SplitMode::NetFixed,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiSpendProfile {
    Flat,
    #[serde(alias = "goGoSlowGo", alias = "go_go_slow_go", alias = "go-go")]
    GoGoSlowGo,
}

impl From<ApiSpendProfile> for CliSpendProfile {
    fn from(value: ApiSpendProfile) -> Self {
        match value {
            ApiSpendProfile::Flat => CliSpendProfile::Flat,
            ApiSpendProfile::GoGoSlowGo => CliSpendProfile::GoGoSlowGo,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiSplitMode {
    #[serde(alias = "grossDeferral", alias = "gross_deferral", alias = "gross")]
    GrossDeferral,
    #[serde(alias = "netFixed", alias = "net_fixed", alias = "net")]
    NetFixed,
}

impl From<ApiSplitMode> for CliSplitMode {
    fn from(value: ApiSplitMode) -> Self {
        match value {
            ApiSplitMode::GrossDeferral => CliSplitMode::GrossDeferral,
            ApiSplitMode::NetFixed => CliSplitMode::NetFixed,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct HouseholdArgs {
    #[arg(long, default_value_t = 40)]
    pub current_age: u32,
    #[arg(long, help = "Preservation age; defaults to the jurisdiction rules")]
    pub preservation_age: Option<u32>,
    #[arg(long, default_value_t = 90)]
    pub life_expectancy: u32,
    #[arg(long, default_value_t = 100_000.0)]
    pub outside_balance: f64,
    #[arg(long, default_value_t = 200_000.0)]
    pub super_balance: f64,
    #[arg(long, default_value_t = 4.0, help = "Expected real return in percent")]
    pub real_return: f64,
    #[arg(long, default_value_t = 40_000.0)]
    pub annual_savings: f64,
    #[arg(long, default_value_t = 0.0, help = "Wealth left at life expectancy")]
    pub bequest: f64,
    #[arg(long, help = "Pin the retirement age instead of searching for it")]
    pub retirement_age: Option<u32>,
    #[arg(long, help = "Base annual spend the plan must sustain")]
    pub target_spend: Option<f64>,
    #[arg(long, value_enum, default_value_t = CliSpendProfile::Flat)]
    pub spend_profile: CliSpendProfile,
    #[arg(
        long = "band",
        value_parser = parse_band,
        help = "Spending band END_AGE:MULTIPLIER; repeat for more bands, overrides --spend-profile"
    )]
    pub bands: Vec<SpendBand>,
    #[arg(
        long = "inflow",
        value_parser = parse_inflow,
        help = "One-off inflow AGE:AMOUNT[:outside|super]; repeat for more"
    )]
    pub inflows: Vec<FutureInflow>,
    #[arg(long, help = "Salary used to derive the employer guarantee contribution")]
    pub salary: Option<f64>,
    #[arg(long, help = "Gross employer contribution per year; overrides --salary")]
    pub employer_contribution: Option<f64>,
    #[arg(
        long,
        help = "Percent of savings directed to super; enables the contribution split"
    )]
    pub contribution_fraction: Option<f64>,
    #[arg(long, help = "Per-person concessional cap; defaults to the jurisdiction rules")]
    pub concessional_cap: Option<f64>,
    #[arg(long, default_value_t = 1)]
    pub eligible_people: u32,
    #[arg(long, help = "Contribution tax in percent; defaults to the jurisdiction rules")]
    pub contribution_tax: Option<f64>,
    #[arg(long, default_value_t = 32.0, help = "Tax on the outside leg in percent")]
    pub outside_tax: f64,
    #[arg(long, value_enum, default_value_t = CliSplitMode::GrossDeferral)]
    pub split_mode: CliSplitMode,
    #[arg(
        long = "member-salary",
        value_delimiter = ',',
        help = "Salaries of the members sharing the cap, for marginal-rate allocation"
    )]
    pub member_salaries: Vec<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub household: HouseholdArgs,
    #[arg(long, default_value_t = 11)]
    pub grid_points: usize,
    #[arg(long, default_value_t = 4)]
    pub refine_iterations: u32,
    #[arg(long, help = "Largest super fraction searched, in percent")]
    pub max_fraction: Option<f64>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("lifeExpectancy ({life_expectancy}) must be > currentAge ({current_age})")]
    Horizon {
        current_age: u32,
        life_expectancy: u32,
    },
    #[error("retirementAge ({age}) must be >= currentAge and < lifeExpectancy")]
    RetirementAge { age: u32 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be >= 0")]
    Negative { field: &'static str },
    #[error("realReturn must be > -100")]
    RealReturn,
    #[error("spending bands must not be empty")]
    EmptyBands,
    #[error("spending band end ages must be strictly increasing")]
    UnorderedBands,
    #[error("gridPoints must be >= 2")]
    GridPoints,
    #[error("invalid {what} {value:?}: {reason}")]
    Parse {
        what: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HouseholdPayload {
    current_age: Option<u32>,
    preservation_age: Option<u32>,
    life_expectancy: Option<u32>,
    outside_balance: Option<f64>,
    super_balance: Option<f64>,
    real_return: Option<f64>,
    annual_savings: Option<f64>,
    bequest: Option<f64>,
    retirement_age: Option<u32>,
    target_spend: Option<f64>,
    spend_profile: Option<ApiSpendProfile>,
    bands: Option<Vec<SpendBand>>,
    inflows: Option<Vec<FutureInflow>>,
    salary: Option<f64>,
    employer_contribution: Option<f64>,
    contribution_fraction: Option<f64>,
    concessional_cap: Option<f64>,
    eligible_people: Option<u32>,
    contribution_tax: Option<f64>,
    outside_tax: Option<f64>,
    split_mode: Option<ApiSplitMode>,
    member_salaries: Option<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OptimizePayload {
    #[serde(flatten)]
    household: HouseholdPayload,
    grid_points: Option<usize>,
    refine_iterations: Option<u32>,
    max_fraction: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllocatePerson {
    headroom: f64,
    marginal_rate: Option<f64>,
    salary: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllocatePayload {
    total: f64,
    people: Vec<AllocatePerson>,
}

#[derive(Debug)]
struct PlanRequest {
    household: Household,
    target_spend: Option<f64>,
}

#[derive(Debug)]
struct OptimizeRequest {
    household: Household,
    policy: CapPolicy,
    objective: Objective,
    resolution: SearchResolution,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    current_age: u32,
    preservation_age: u32,
    life_expectancy: u32,
    #[serde(flatten)]
    plan: PlanResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    annual_savings: f64,
    per_person_cap: f64,
    eligible_people: u32,
    #[serde(flatten)]
    result: OptimizeResult,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
struct AppState {
    rules: Arc<JurisdictionRules>,
}

fn parse_band(raw: &str) -> Result<SpendBand, InputError> {
    let parse_error = |reason: &str| InputError::Parse {
        what: "band",
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let (end, multiplier) = raw
        .split_once(':')
        .ok_or_else(|| parse_error("expected END_AGE:MULTIPLIER"))?;
    Ok(SpendBand {
        end_age: end.trim().parse().map_err(|_| parse_error("bad end age"))?,
        multiplier: multiplier
            .trim()
            .parse()
            .map_err(|_| parse_error("bad multiplier"))?,
    })
}

fn parse_inflow(raw: &str) -> Result<FutureInflow, InputError> {
    let parse_error = |reason: &str| InputError::Parse {
        what: "inflow",
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let mut parts = raw.split(':').map(str::trim);
    let age = parts
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| parse_error("bad age"))?;
    let amount = parts
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| parse_error("bad amount"))?;
    let pool = match parts.next() {
        None | Some("outside") | Some("unrestricted") => Pool::Outside,
        Some("super") | Some("restricted") => Pool::Super,
        Some(_) => return Err(parse_error("pool must be outside or super")),
    };
    if parts.next().is_some() {
        return Err(parse_error("expected AGE:AMOUNT[:POOL]"));
    }
    Ok(FutureInflow { age, amount, pool })
}

fn require_finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NotFinite { field })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<f64, InputError> {
    if require_finite(field, value)? < 0.0 {
        return Err(InputError::Negative { field });
    }
    Ok(value)
}

fn build_bands(args: &HouseholdArgs) -> Result<SpendingBands, InputError> {
    if args.bands.is_empty() {
        return Ok(args.spend_profile.into());
    }
    for band in &args.bands {
        require_non_negative("band multiplier", band.multiplier)?;
    }
    if args.bands.windows(2).any(|w| w[1].end_age <= w[0].end_age) {
        return Err(InputError::UnorderedBands);
    }
    Ok(SpendingBands::new(args.bands.clone()))
}

fn build_household(
    args: &HouseholdArgs,
    rules: &JurisdictionRules,
) -> Result<PlanRequest, InputError> {
    if args.life_expectancy <= args.current_age {
        return Err(InputError::Horizon {
            current_age: args.current_age,
            life_expectancy: args.life_expectancy,
        });
    }
    if let Some(age) = args.retirement_age {
        if age < args.current_age || age >= args.life_expectancy {
            return Err(InputError::RetirementAge { age });
        }
    }

    let real_return = require_finite("realReturn", args.real_return)?;
    if real_return <= -100.0 {
        return Err(InputError::RealReturn);
    }
    if let Some(target) = args.target_spend {
        require_non_negative("targetSpend", target)?;
    }
    for inflow in &args.inflows {
        require_finite("inflow age", inflow.age)?;
        require_finite("inflow amount", inflow.amount)?;
    }

    let employer_contribution = match (args.employer_contribution, args.salary) {
        (Some(amount), _) => require_finite("employerContribution", amount)?,
        (None, Some(salary)) => {
            rules.employer_contribution(require_non_negative("salary", salary)?)
        }
        (None, None) => 0.0,
    };

    let split = match args.contribution_fraction {
        Some(pct) => Some(build_split(args, pct / 100.0, rules)?),
        None => None,
    };

    let household = Household {
        current_age: args.current_age,
        preservation_age: args.preservation_age.unwrap_or(rules.preservation_age()),
        life_expectancy: args.life_expectancy,
        outside_balance: require_finite("outsideBalance", args.outside_balance)?,
        super_balance: require_finite("superBalance", args.super_balance)?,
        real_return: real_return / 100.0,
        annual_savings: require_finite("annualSavings", args.annual_savings)?,
        bequest: require_finite("bequest", args.bequest)?,
        retirement_age: args.retirement_age,
        bands: build_bands(args)?,
        split,
        employer_contribution,
        inflows: args.inflows.clone(),
    };

    Ok(PlanRequest {
        household,
        target_spend: args.target_spend,
    })
}

fn build_split(
    args: &HouseholdArgs,
    fraction: f64,
    rules: &JurisdictionRules,
) -> Result<ContributionSplit, InputError> {
    let member_rates = args
        .member_salaries
        .iter()
        .map(|&salary| require_non_negative("memberSalary", salary).map(|s| rules.marginal_rate(s)))
        .collect::<Result<Vec<f64>, InputError>>()?;

    Ok(ContributionSplit {
        desired_fraction: require_finite("contributionFraction", fraction)?,
        per_person_cap: require_finite(
            "concessionalCap",
            args.concessional_cap.unwrap_or(rules.concessional_cap()),
        )?,
        eligible_people: args.eligible_people,
        contribution_tax: require_finite(
            "contributionTax",
            args.contribution_tax
                .map(|pct| pct / 100.0)
                .unwrap_or(rules.contribution_tax()),
        )?,
        outside_tax: require_finite("outsideTax", args.outside_tax / 100.0)?,
        mode: args.split_mode.into(),
        member_rates,
    })
}

fn build_optimize_request(
    args: &OptimizeArgs,
    rules: &JurisdictionRules,
) -> Result<OptimizeRequest, InputError> {
    if args.grid_points < 2 {
        return Err(InputError::GridPoints);
    }
    let PlanRequest {
        household,
        target_spend,
    } = build_household(&args.household, rules)?;

    // The optimizer supplies its own fraction; the rest of the split carries over.
    let template = build_split(&args.household, 0.0, rules)?;
    let max_fraction = match args.max_fraction {
        Some(pct) => Some(require_finite("maxFraction", pct)? / 100.0),
        None => None,
    };
    let policy = CapPolicy {
        per_person_cap: template.per_person_cap,
        eligible_people: template.eligible_people,
        contribution_tax: template.contribution_tax,
        outside_tax: template.outside_tax,
        max_fraction,
        mode: template.mode,
        member_rates: template.member_rates,
    };

    Ok(OptimizeRequest {
        objective: Objective::for_household(&household, target_spend),
        household,
        policy,
        resolution: SearchResolution {
            grid_points: args.grid_points,
            refine_iterations: args.refine_iterations,
            ..SearchResolution::default()
        },
    })
}

pub fn plan_command(
    args: &HouseholdArgs,
    rules: &JurisdictionRules,
) -> Result<PlanResponse, InputError> {
    let request = build_household(args, rules)?;
    Ok(plan_response(&request))
}

pub fn optimize_command(
    args: &OptimizeArgs,
    rules: &JurisdictionRules,
) -> Result<OptimizeResponse, InputError> {
    let request = build_optimize_request(args, rules)?;
    Ok(optimize_response(&request))
}

fn plan_response(request: &PlanRequest) -> PlanResponse {
    let household = &request.household;
    PlanResponse {
        current_age: household.current_age,
        preservation_age: household.preservation_age,
        life_expectancy: household.life_expectancy,
        plan: build_plan(household, request.target_spend, &CalcSettings::default()),
    }
}

fn optimize_response(request: &OptimizeRequest) -> OptimizeResponse {
    OptimizeResponse {
        annual_savings: request.household.annual_savings,
        per_person_cap: request.policy.per_person_cap,
        eligible_people: request.policy.eligible_people,
        result: optimize_split(
            &request.household,
            &request.policy,
            request.objective,
            &request.resolution,
            &CalcSettings::default(),
        ),
    }
}

fn allocation_from_payload(
    payload: &AllocatePayload,
    rules: &JurisdictionRules,
) -> Result<CapAllocation, InputError> {
    let total = require_finite("total", payload.total)?;
    let people = payload
        .people
        .iter()
        .map(|person| {
            let marginal_rate = match (person.marginal_rate, person.salary) {
                (Some(pct), _) => require_finite("marginalRate", pct)? / 100.0,
                (None, Some(salary)) => {
                    rules.marginal_rate(require_non_negative("salary", salary)?)
                }
                (None, None) => 0.0,
            };
            Ok(CapPerson {
                headroom: require_finite("headroom", person.headroom)?,
                marginal_rate,
            })
        })
        .collect::<Result<Vec<CapPerson>, InputError>>()?;
    Ok(allocate_concessional(total, &people))
}

pub async fn run_http_server(port: u16, rules: JurisdictionRules) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "DWZ HTTP API listening");
    axum::serve(listener, router(rules)).await
}

fn router(rules: JurisdictionRules) -> Router {
    let state = AppState {
        rules: Arc::new(rules),
    };
    Router::new()
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route("/api/optimize", post(optimize_handler))
        .route("/api/allocate", post(allocate_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

// Query strings only carry scalar fields. `bands`, `inflows` and
// `memberSalaries` are POST-only.
async fn plan_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<HouseholdPayload>,
) -> Response {
    plan_handler_impl(state, payload).await
}

async fn plan_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<HouseholdPayload>,
) -> Response {
    plan_handler_impl(state, payload).await
}

async fn plan_handler_impl(state: AppState, payload: HouseholdPayload) -> Response {
    let request = match plan_request_from_payload(payload, &state.rules) {
        Ok(request) => request,
        Err(err) => return rejected(err),
    };
    respond_blocking("plan", move || plan_response(&request)).await
}

async fn optimize_handler(
    State(state): State<AppState>,
    Json(payload): Json<OptimizePayload>,
) -> Response {
    let request = match optimize_request_from_payload(payload, &state.rules) {
        Ok(request) => request,
        Err(err) => return rejected(err),
    };
    respond_blocking("optimizer", move || optimize_response(&request)).await
}

async fn respond_blocking<T, F>(task: &'static str, work: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => {
            warn!(error = %err, task, "blocking task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &format!("{task} failed"))
        }
    }
}

async fn allocate_handler(
    State(state): State<AppState>,
    Json(payload): Json<AllocatePayload>,
) -> Response {
    match allocation_from_payload(&payload, &state.rules) {
        Ok(allocation) => json_response(StatusCode::OK, allocation),
        Err(err) => rejected(err),
    }
}

fn rejected(err: InputError) -> Response {
    warn!(error = %err, "rejected request");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn apply_household_payload(args: &mut HouseholdArgs, payload: HouseholdPayload) {
    if let Some(v) = payload.current_age {
        args.current_age = v;
    }
    if let Some(v) = payload.preservation_age {
        args.preservation_age = Some(v);
    }
    if let Some(v) = payload.life_expectancy {
        args.life_expectancy = v;
    }
    if let Some(v) = payload.outside_balance {
        args.outside_balance = v;
    }
    if let Some(v) = payload.super_balance {
        args.super_balance = v;
    }
    if let Some(v) = payload.real_return {
        args.real_return = v;
    }
    if let Some(v) = payload.annual_savings {
        args.annual_savings = v;
    }
    if let Some(v) = payload.bequest {
        args.bequest = v;
    }
    if let Some(v) = payload.retirement_age {
        args.retirement_age = Some(v);
    }
    if let Some(v) = payload.target_spend {
        args.target_spend = Some(v);
    }
    if let Some(v) = payload.spend_profile {
        args.spend_profile = v.into();
    }
    if let Some(v) = payload.inflows {
        args.inflows = v;
    }
    if let Some(v) = payload.salary {
        args.salary = Some(v);
    }
    if let Some(v) = payload.employer_contribution {
        args.employer_contribution = Some(v);
    }
    if let Some(v) = payload.contribution_fraction {
        args.contribution_fraction = Some(v);
    }
    if let Some(v) = payload.concessional_cap {
        args.concessional_cap = Some(v);
    }
    if let Some(v) = payload.eligible_people {
        args.eligible_people = v;
    }
    if let Some(v) = payload.contribution_tax {
        args.contribution_tax = Some(v);
    }
    if let Some(v) = payload.outside_tax {
        args.outside_tax = v;
    }
    if let Some(v) = payload.split_mode {
        args.split_mode = v.into();
    }
    if let Some(v) = payload.member_salaries {
        args.member_salaries = v;
    }
}

fn household_args_from_payload(payload: HouseholdPayload) -> Result<HouseholdArgs, InputError> {
    let mut args = default_household_args();
    let bands = payload.bands.clone();
    apply_household_payload(&mut args, payload);
    if let Some(bands) = bands {
        if bands.is_empty() {
            return Err(InputError::EmptyBands);
        }
        args.bands = bands;
    }
    Ok(args)
}

fn plan_request_from_payload(
    payload: HouseholdPayload,
    rules: &JurisdictionRules,
) -> Result<PlanRequest, InputError> {
    let args = household_args_from_payload(payload)?;
    build_household(&args, rules)
}

fn optimize_request_from_payload(
    payload: OptimizePayload,
    rules: &JurisdictionRules,
) -> Result<OptimizeRequest, InputError> {
    let mut args = OptimizeArgs {
        household: household_args_from_payload(payload.household)?,
        grid_points: 11,
        refine_iterations: 4,
        max_fraction: None,
    };
    if let Some(v) = payload.grid_points {
        args.grid_points = v;
    }
    if let Some(v) = payload.refine_iterations {
        args.refine_iterations = v;
    }
    if let Some(v) = payload.max_fraction {
        args.max_fraction = Some(v);
    }
    build_optimize_request(&args, rules)
}

#[cfg(test)]
fn plan_request_from_json(json: &str) -> Result<PlanRequest, String> {
    let payload = serde_json::from_str::<HouseholdPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    plan_request_from_payload(payload, &JurisdictionRules::default()).map_err(|e| e.to_string())
}

fn default_household_args() -> HouseholdArgs {
    HouseholdArgs {
        current_age: 40,
        preservation_age: None,
        life_expectancy: 90,
        outside_balance: 100_000.0,
        super_balance: 200_000.0,
        real_return: 4.0,
        annual_savings: 40_000.0,
        bequest: 0.0,
        retirement_age: None,
        target_spend: None,
        spend_profile: CliSpendProfile::Flat,
        bands: Vec::new(),
        inflows: Vec::new(),
        salary: None,
        employer_contribution: None,
        contribution_fraction: None,
        concessional_cap: None,
        eligible_people: 1,
        contribution_tax: None,
        outside_tax: 32.0,
        split_mode: CliSplitMode::GrossDeferral,
        member_salaries: Vec::new(),
    }
}
