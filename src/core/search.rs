use serde::Serialize;
use tracing::debug;

use super::bridge::{BridgeAssessment, Constraint, assess_bridge};
use super::engine::{Decumulation, project_accumulation};
use super::solver::sustainable_spend_from;
use super::types::{Balances, CalcSettings, Household};

const TARGET_SPEND_SLACK: f64 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeEvaluation {
    pub retirement_age: u32,
    pub sustainable_spend: f64,
    pub balances: Balances,
    pub bridge: BridgeAssessment,
}

impl AgeEvaluation {
    pub fn viable(&self) -> bool {
        self.sustainable_spend > 0.0 && self.bridge.covered
    }

    pub fn affordable_spend(&self) -> f64 {
        match self.bridge.max_bridge_spend {
            Some(cap) => self.sustainable_spend.min(cap),
            None => self.sustainable_spend,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarliestAge {
    pub age: Option<u32>,
    pub evaluation: Option<AgeEvaluation>,
    pub constraint: Constraint,
    pub delayed_by_bridge: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepPoint {
    pub age: u32,
    pub sustainable_spend: f64,
    pub affordable_spend: f64,
    pub bridge_covered: bool,
}

pub fn evaluate_age(
    household: &Household,
    retirement_age: u32,
    settings: &CalcSettings,
) -> AgeEvaluation {
    let balances = project_accumulation(household, retirement_age, settings.rounding).balances;
    let params = Decumulation::for_household(household, retirement_age);
    let sustainable_spend =
        sustainable_spend_from(balances, household.bequest, &params, &settings.solver);
    let bridge = assess_bridge(balances, sustainable_spend, &params, &settings.bridge);

    AgeEvaluation {
        retirement_age,
        sustainable_spend,
        balances,
        bridge,
    }
}

// Bridge coverage is not monotone in age under arbitrary bands.
pub fn earliest_viable_age(household: &Household, settings: &CalcSettings) -> EarliestAge {
    if let Some(forced) = household.retirement_age {
        let evaluation = evaluate_age(household, forced, settings);
        return EarliestAge {
            age: evaluation.viable().then_some(forced),
            evaluation: Some(evaluation),
            constraint: evaluation.bridge.constraint,
            delayed_by_bridge: false,
        };
    }

    let mut previous: Option<AgeEvaluation> = None;
    for age in household.candidate_ages() {
        let evaluation = evaluate_age(household, age, settings);
        if evaluation.viable() {
            let constraint = evaluation.bridge.constraint;
            let delayed_by_bridge = previous.is_some_and(|rejected| {
                rejected.sustainable_spend > 0.0 && !rejected.bridge.covered
            });
            debug!(
                age,
                spend = evaluation.sustainable_spend,
                ?constraint,
                delayed_by_bridge,
                "earliest viable age"
            );
            return EarliestAge {
                age: Some(age),
                evaluation: Some(evaluation),
                constraint,
                delayed_by_bridge,
            };
        }
        previous = Some(evaluation);
    }

    debug!("no viable retirement age before life expectancy");
    EarliestAge {
        age: None,
        evaluation: None,
        constraint: previous
            .map(|last| last.bridge.constraint)
            .unwrap_or(Constraint::HorizonLimited),
        delayed_by_bridge: false,
    }
}

pub fn earliest_age_for_spend(
    household: &Household,
    target_spend: f64,
    settings: &CalcSettings,
) -> EarliestAge {
    let meets = |evaluation: &AgeEvaluation| {
        evaluation.sustainable_spend + TARGET_SPEND_SLACK >= target_spend
    };

    if let Some(forced) = household.retirement_age {
        let evaluation = evaluate_age(household, forced, settings);
        return EarliestAge {
            age: meets(&evaluation).then_some(forced),
            evaluation: Some(evaluation),
            constraint: target_constraint(household, &evaluation, target_spend, settings),
            delayed_by_bridge: false,
        };
    }

    let candidates = household.candidate_ages();
    let (mut low, mut high) = (*candidates.start(), *candidates.end());
    if low > high {
        return EarliestAge {
            age: None,
            evaluation: None,
            constraint: Constraint::HorizonLimited,
            delayed_by_bridge: false,
        };
    }

    let mut found = evaluate_age(household, high, settings);
    if !meets(&found) {
        debug!(target_spend, "target spend unreachable before life expectancy");
        return EarliestAge {
            age: None,
            evaluation: None,
            constraint: Constraint::HorizonLimited,
            delayed_by_bridge: false,
        };
    }

    while low < high {
        let mid = low + (high - low) / 2;
        let evaluation = evaluate_age(household, mid, settings);
        if meets(&evaluation) {
            high = mid;
            found = evaluation;
        } else {
            low = mid + 1;
        }
    }

    let constraint = target_constraint(household, &found, target_spend, settings);
    debug!(age = high, target_spend, ?constraint, "earliest age for target spend");
    EarliestAge {
        age: Some(high),
        evaluation: Some(found),
        constraint,
        delayed_by_bridge: false,
    }
}

fn target_constraint(
    household: &Household,
    evaluation: &AgeEvaluation,
    target_spend: f64,
    settings: &CalcSettings,
) -> Constraint {
    let params = Decumulation::for_household(household, evaluation.retirement_age);
    assess_bridge(evaluation.balances, target_spend, &params, &settings.bridge).constraint
}

pub fn age_sweep(household: &Household, settings: &CalcSettings) -> Vec<SweepPoint> {
    household
        .candidate_ages()
        .map(|age| {
            let evaluation = evaluate_age(household, age, settings);
            SweepPoint {
                age,
                sustainable_spend: evaluation.sustainable_spend,
                affordable_spend: evaluation.affordable_spend(),
                bridge_covered: evaluation.bridge.covered,
            }
        })
        .collect()
}
