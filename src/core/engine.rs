use serde::Serialize;

use super::allocator::{CapPerson, allocate_concessional};
use super::bands::SpendingBands;
use super::money::MoneyRounding;
use super::types::{
    Balances, ContributionSplit, EMPLOYER_CONTRIBUTION_TAX, FutureInflow, Household, PathPoint,
    Phase, Pool, SplitMode,
};

const INFLOW_AGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionFlow {
    pub employer_net: f64,
    pub super_gross: f64,
    pub super_net: f64,
    pub outside_gross: f64,
    pub outside_net: f64,
    pub inflow_outside: f64,
    pub inflow_super: f64,
    pub per_member: Vec<f64>,
}

impl ContributionFlow {
    fn outside_total(&self) -> f64 {
        self.outside_net + self.inflow_outside
    }

    fn super_total(&self) -> f64 {
        self.employer_net + self.super_net + self.inflow_super
    }
}

#[derive(Debug, Clone)]
pub struct Accumulation {
    pub balances: Balances,
    pub path: Vec<PathPoint>,
    pub flows: Vec<ContributionFlow>,
}

#[derive(Debug, Clone, Copy)]
pub struct Decumulation<'a> {
    pub retirement_age: u32,
    pub preservation_age: u32,
    pub life_expectancy: u32,
    pub real_return: f64,
    pub bands: &'a SpendingBands,
}

impl<'a> Decumulation<'a> {
    pub fn for_household(household: &'a Household, retirement_age: u32) -> Self {
        Self {
            retirement_age,
            preservation_age: household.preservation_age,
            life_expectancy: household.life_expectancy,
            real_return: household.real_return,
            bands: &household.bands,
        }
    }

    pub fn phase_at(&self, age: u32) -> Phase {
        if age < self.preservation_age {
            Phase::Bridge
        } else {
            Phase::Retirement
        }
    }
}

pub fn project_accumulation(
    household: &Household,
    target_age: u32,
    rounding: MoneyRounding,
) -> Accumulation {
    let mut balances = Balances {
        outside: household.outside_balance,
        super_balance: household.super_balance,
    };
    let years = target_age.saturating_sub(household.current_age) as usize;
    let mut path = Vec::with_capacity(years);
    let mut flows = Vec::with_capacity(years);
    let employer_gross = non_negative(household.employer_contribution);

    for age in household.current_age..target_age {
        path.push(PathPoint::new(age, balances, Phase::Accumulation));

        let mut flow = split_savings(
            household.split.as_ref(),
            household.annual_savings,
            employer_gross,
            rounding,
        );
        apply_inflows(&household.inflows, age, &mut flow);

        balances.outside += flow.outside_total();
        balances.super_balance += flow.super_total();
        apply_growth(&mut balances, household.real_return);
        flows.push(flow);
    }

    Accumulation {
        balances,
        path,
        flows,
    }
}

pub fn split_savings(
    split: Option<&ContributionSplit>,
    annual_savings: f64,
    employer_gross: f64,
    rounding: MoneyRounding,
) -> ContributionFlow {
    let savings = non_negative(annual_savings);
    let employer_gross = non_negative(employer_gross);
    let employer_net = if employer_gross > 0.0 {
        rounding.apply(employer_gross * (1.0 - EMPLOYER_CONTRIBUTION_TAX))
    } else {
        0.0
    };

    let Some(split) = split else {
        return ContributionFlow {
            employer_net,
            outside_gross: savings,
            outside_net: savings,
            ..ContributionFlow::default()
        };
    };

    if savings <= 0.0 {
        return ContributionFlow {
            employer_net,
            per_member: vec![0.0; split.members().len()],
            ..ContributionFlow::default()
        };
    }

    let desired = savings * split.fraction();
    let super_gross = rounding.apply(desired.min(split.headroom(employer_gross)));
    let outside_gross = rounding.apply(savings - super_gross);
    let super_net = rounding.apply(super_gross * (1.0 - split.contribution_tax_rate()));
    let outside_net = match split.mode {
        SplitMode::GrossDeferral => {
            rounding.apply(outside_gross * (1.0 - split.outside_tax_rate()))
        }
        SplitMode::NetFixed => outside_gross,
    };

    ContributionFlow {
        employer_net,
        super_gross,
        super_net,
        outside_gross,
        outside_net,
        per_member: member_breakdown(split, super_gross, employer_gross),
        ..ContributionFlow::default()
    }
}

fn member_breakdown(split: &ContributionSplit, super_gross: f64, employer_gross: f64) -> Vec<f64> {
    let members = split.members();
    if members.is_empty() {
        return Vec::new();
    }

    let employer_share = employer_gross / members.len() as f64;
    let people: Vec<CapPerson> = members
        .iter()
        .map(|&marginal_rate| CapPerson {
            headroom: split.per_person_cap - employer_share,
            marginal_rate,
        })
        .collect();
    allocate_concessional(super_gross, &people).amounts
}

fn apply_inflows(inflows: &[FutureInflow], age: u32, flow: &mut ContributionFlow) {
    for inflow in inflows {
        if inflow.amount <= 0.0 || (inflow.age - age as f64).abs() > INFLOW_AGE_EPSILON {
            continue;
        }
        match inflow.pool {
            Pool::Outside => flow.inflow_outside += inflow.amount,
            Pool::Super => flow.inflow_super += inflow.amount,
        }
    }
}

fn apply_growth(balances: &mut Balances, real_return: f64) {
    balances.outside *= 1.0 + real_return;
    balances.super_balance *= 1.0 + real_return;
}

// Before preservation age every dollar comes from the outside pool, which
// may go negative; the bridge assessment reports that.
pub fn simulate_decumulation(
    start: Balances,
    base_spend: f64,
    params: &Decumulation<'_>,
    mut trace: Option<&mut Vec<PathPoint>>,
) -> Balances {
    let mut balances = start;

    for age in params.retirement_age..params.life_expectancy {
        let phase = params.phase_at(age);
        if let Some(points) = trace.as_deref_mut() {
            points.push(PathPoint::new(age, balances, phase));
        }

        // Bands are keyed by the age the year ends at.
        let spend = base_spend * params.bands.multiplier_at(age + 1);
        withdraw(&mut balances, spend, phase);
        apply_growth(&mut balances, params.real_return);
    }

    if let Some(points) = trace {
        let end_age = params.life_expectancy.max(params.retirement_age);
        points.push(PathPoint::new(end_age, balances, params.phase_at(end_age)));
    }

    balances
}

fn withdraw(balances: &mut Balances, spend: f64, phase: Phase) {
    match phase {
        Phase::Bridge | Phase::Accumulation => balances.outside -= spend,
        Phase::Retirement => {
            let from_outside = spend.min(balances.outside.max(0.0)).max(0.0);
            balances.outside -= from_outside;
            balances.super_balance -= spend - from_outside;
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}
