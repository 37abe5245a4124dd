use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::allocator::CapAllocation;
use super::bridge::Constraint;
use super::engine::{ContributionFlow, split_savings};
use super::search::{earliest_age_for_spend, earliest_viable_age, evaluate_age};
use super::types::{CalcSettings, ContributionSplit, Household, SplitMode, clamp_unit};

// Spend differences within this many dollars count as ties.
const SPEND_TIE: f64 = 0.5;
const CAP_BINDING_SLACK: f64 = 0.01;
const MAX_SENSITIVITY_POINTS: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct CapPolicy {
    pub per_person_cap: f64,
    pub eligible_people: u32,
    pub contribution_tax: f64,
    pub outside_tax: f64,
    pub max_fraction: Option<f64>,
    pub mode: SplitMode,
    pub member_rates: Vec<f64>,
}

impl CapPolicy {
    pub fn split(&self, fraction: f64) -> ContributionSplit {
        ContributionSplit {
            desired_fraction: fraction,
            per_person_cap: self.per_person_cap,
            eligible_people: self.eligible_people,
            contribution_tax: self.contribution_tax,
            outside_tax: self.outside_tax,
            mode: self.mode,
            member_rates: self.member_rates.clone(),
        }
    }

    fn max_fraction(&self) -> f64 {
        clamp_unit(self.max_fraction.unwrap_or(1.0))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchResolution {
    pub grid_points: usize,
    pub refine_iterations: u32,
    pub shrink: f64,
}

impl Default for SearchResolution {
    fn default() -> Self {
        Self {
            grid_points: 11,
            refine_iterations: 4,
            shrink: 0.5,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Objective {
    EarliestAge,
    EarliestAgeForSpend(f64),
    SpendAtAge(u32),
}

impl Objective {
    pub fn for_household(household: &Household, target_spend: Option<f64>) -> Self {
        match (household.retirement_age, target_spend) {
            (Some(age), _) => Self::SpendAtAge(age),
            (None, Some(target)) => Self::EarliestAgeForSpend(target),
            (None, None) => Self::EarliestAge,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub fraction: f64,
    pub earliest_age: Option<u32>,
    pub spend: f64,
    pub constraint: Constraint,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResult {
    pub objective: Objective,
    pub recommended_fraction: f64,
    pub earliest_age: Option<u32>,
    pub spend: f64,
    pub constraint: Constraint,
    pub cap_binding: bool,
    pub contribution: ContributionFlow,
    pub allocation: Option<CapAllocation>,
    pub sensitivity: Vec<Candidate>,
    pub evaluations: u32,
}

pub fn optimize_split(
    household: &Household,
    policy: &CapPolicy,
    objective: Objective,
    resolution: &SearchResolution,
    settings: &CalcSettings,
) -> OptimizeResult {
    let evaluate =
        |fraction: f64| evaluate_fraction(household, policy, objective, fraction, settings);

    if household.annual_savings <= 0.0 || household.annual_savings.is_nan() {
        let best = evaluate(0.0);
        return finish(household, policy, objective, best, vec![best], 1, settings);
    }

    let max_fraction = policy.max_fraction();
    let grid_points = resolution.grid_points.max(2);
    let grid = linspace(0.0, max_fraction, grid_points);
    let grid_results: Vec<Candidate> = grid.par_iter().map(|&f| evaluate(f)).collect();
    let mut evaluations = grid_results.len() as u32;

    let mut best = grid_results[0];
    for candidate in &grid_results[1..] {
        if better(candidate, &best, objective) {
            best = *candidate;
        }
    }

    let shrink = if resolution.shrink > 0.0 && resolution.shrink < 1.0 {
        resolution.shrink
    } else {
        0.5
    };
    let refine_points = (grid_points / 2).max(3);
    let mut window = max_fraction / (grid_points - 1) as f64;

    for pass in 0..resolution.refine_iterations {
        if window <= 1e-9 {
            break;
        }
        let low = (best.fraction - window).max(0.0);
        let high = (best.fraction + window).min(max_fraction);
        let local: Vec<Candidate> = linspace(low, high, refine_points)
            .par_iter()
            .map(|&f| evaluate(f))
            .collect();
        evaluations += local.len() as u32;

        for candidate in &local {
            if better(candidate, &best, objective) {
                best = *candidate;
            }
        }
        debug!(pass, fraction = best.fraction, window, "refined savings split");
        window *= shrink;
    }

    let sensitivity = sample_evenly(&grid_results, MAX_SENSITIVITY_POINTS);
    finish(household, policy, objective, best, sensitivity, evaluations, settings)
}

fn evaluate_fraction(
    household: &Household,
    policy: &CapPolicy,
    objective: Objective,
    fraction: f64,
    settings: &CalcSettings,
) -> Candidate {
    let trial = household.with_split(Some(policy.split(fraction)));
    match objective {
        Objective::SpendAtAge(age) => {
            let evaluation = evaluate_age(&trial, age, settings);
            Candidate {
                fraction,
                earliest_age: Some(age),
                spend: evaluation.affordable_spend(),
                constraint: evaluation.bridge.constraint,
            }
        }
        Objective::EarliestAge | Objective::EarliestAgeForSpend(_) => {
            let search = match objective {
                Objective::EarliestAgeForSpend(target) => {
                    earliest_age_for_spend(&trial, target, settings)
                }
                _ => earliest_viable_age(&trial, settings),
            };
            Candidate {
                fraction,
                earliest_age: search.age,
                spend: search
                    .evaluation
                    .filter(|_| search.age.is_some())
                    .map(|e| e.affordable_spend())
                    .unwrap_or(0.0),
                constraint: search.constraint,
            }
        }
    }
}

fn better(candidate: &Candidate, incumbent: &Candidate, objective: Objective) -> bool {
    match objective {
        Objective::SpendAtAge(_) => {
            let gap = candidate.spend - incumbent.spend;
            if gap.abs() <= SPEND_TIE {
                candidate.fraction > incumbent.fraction
            } else {
                gap > 0.0
            }
        }
        Objective::EarliestAge | Objective::EarliestAgeForSpend(_) => {
            let a = candidate.earliest_age.unwrap_or(u32::MAX);
            let b = incumbent.earliest_age.unwrap_or(u32::MAX);
            match a.cmp(&b) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => candidate.fraction > incumbent.fraction,
            }
        }
    }
}

fn finish(
    household: &Household,
    policy: &CapPolicy,
    objective: Objective,
    best: Candidate,
    sensitivity: Vec<Candidate>,
    evaluations: u32,
    settings: &CalcSettings,
) -> OptimizeResult {
    let split = policy.split(best.fraction);
    let employer = household.employer_contribution.max(0.0);
    let savings = household.annual_savings.max(0.0);
    let cap_binding = savings * split.fraction() + CAP_BINDING_SLACK >= split.headroom(employer);
    let contribution = split_savings(Some(&split), savings, employer, settings.rounding);
    let allocation = (!policy.member_rates.is_empty()).then(|| CapAllocation {
        total: contribution.per_member.iter().sum(),
        amounts: contribution.per_member.clone(),
    });

    debug!(
        fraction = best.fraction,
        age = ?best.earliest_age,
        spend = best.spend,
        evaluations,
        "savings split optimised"
    );

    OptimizeResult {
        objective,
        recommended_fraction: best.fraction,
        earliest_age: best.earliest_age,
        spend: best.spend,
        constraint: best.constraint,
        cap_binding,
        contribution,
        allocation,
        sensitivity,
        evaluations,
    }
}

fn linspace(low: f64, high: f64, points: usize) -> Vec<f64> {
    if points < 2 || high <= low {
        return vec![low];
    }
    let step = (high - low) / (points - 1) as f64;
    (0..points)
        .map(|i| if i + 1 == points { high } else { low + step * i as f64 })
        .collect()
}

fn sample_evenly(points: &[Candidate], limit: usize) -> Vec<Candidate> {
    if points.len() <= limit || limit < 2 {
        return points.iter().take(limit.max(1)).copied().collect();
    }
    let last = points.len() - 1;
    (0..limit)
        .map(|i| points[(i * last + (limit - 1) / 2) / (limit - 1)])
        .collect()
}
