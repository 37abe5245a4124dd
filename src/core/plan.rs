use serde::Serialize;
use tracing::debug;

use super::bridge::{BridgeAssessment, Constraint, assess_bridge};
use super::engine::{Decumulation, project_accumulation};
use super::search::{
    EarliestAge, SweepPoint, age_sweep, earliest_age_for_spend, earliest_viable_age,
};
use super::solver::solve_sustainable_spend;
use super::types::{CalcSettings, Household, PathPoint, Phase};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub retirement_age: Option<u32>,
    pub viable: bool,
    pub target_spend: Option<f64>,
    pub sustainable_spend: f64,
    pub affordable_spend: f64,
    pub bridge: Option<BridgeAssessment>,
    pub constraint: Constraint,
    pub delayed_by_bridge: bool,
    pub path: Vec<PathPoint>,
    pub sweep: Vec<SweepPoint>,
    pub bands_cover_horizon: bool,
}

pub fn build_plan(
    household: &Household,
    target_spend: Option<f64>,
    settings: &CalcSettings,
) -> PlanResult {
    let search: EarliestAge = match target_spend {
        Some(target) => earliest_age_for_spend(household, target, settings),
        None => earliest_viable_age(household, settings),
    };
    let sweep = age_sweep(household, settings);
    let bands_cover_horizon = household.bands.covers(household.life_expectancy);

    let Some(retirement_age) = search.age.or(household.retirement_age) else {
        debug!("plan has no retirement age");
        return PlanResult {
            retirement_age: None,
            viable: false,
            target_spend,
            sustainable_spend: 0.0,
            affordable_spend: 0.0,
            bridge: None,
            constraint: search.constraint,
            delayed_by_bridge: false,
            path: working_life_path(household, settings),
            sweep,
            bands_cover_horizon,
        };
    };

    let solution = solve_sustainable_spend(household, retirement_age, settings);
    let params = Decumulation::for_household(household, retirement_age);
    let assessed_spend = target_spend.unwrap_or(solution.sustainable_spend);
    let bridge = assess_bridge(
        solution.retirement_balances,
        assessed_spend,
        &params,
        &settings.bridge,
    );
    let affordable_spend = match bridge.max_bridge_spend {
        Some(cap) => solution.sustainable_spend.min(cap),
        None => solution.sustainable_spend,
    };

    PlanResult {
        retirement_age: Some(retirement_age),
        viable: search.age.is_some(),
        target_spend,
        sustainable_spend: solution.sustainable_spend,
        affordable_spend,
        bridge: Some(bridge),
        constraint: bridge.constraint,
        delayed_by_bridge: search.delayed_by_bridge,
        path: solution.path,
        sweep,
        bands_cover_horizon,
    }
}

fn working_life_path(household: &Household, settings: &CalcSettings) -> Vec<PathPoint> {
    let accumulation =
        project_accumulation(household, household.life_expectancy, settings.rounding);
    let mut path = accumulation.path;
    path.push(PathPoint::new(
        household.life_expectancy,
        accumulation.balances,
        Phase::Accumulation,
    ));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bands::{SpendBand, SpendingBands};

    fn household() -> Household {
        Household {
            current_age: 50,
            preservation_age: 60,
            life_expectancy: 90,
            outside_balance: 300_000.0,
            super_balance: 700_000.0,
            real_return: 0.03,
            annual_savings: 40_000.0,
            bequest: 0.0,
            retirement_age: None,
            bands: SpendingBands::go_go_slow_go(),
            split: None,
            employer_contribution: 0.0,
            inflows: Vec::new(),
        }
    }

    #[test]
    fn plan_path_runs_from_today_to_life_expectancy() {
        let plan = build_plan(&household(), None, &CalcSettings::default());
        let age = plan.retirement_age.expect("viable plan");
        assert!(plan.viable);

        let ages: Vec<u32> = plan.path.iter().map(|p| p.age).collect();
        assert_eq!(ages, (50..=90).collect::<Vec<u32>>());
        for point in &plan.path {
            let expected = if point.age < age {
                Phase::Accumulation
            } else if point.age < 60 {
                Phase::Bridge
            } else {
                Phase::Retirement
            };
            assert_eq!(point.phase, expected, "age {}", point.age);
        }
        assert!(plan.path.last().is_some_and(|p| p.total.abs() < 1e-3));
        assert_eq!(plan.sweep.len(), 39);
        assert!(plan.bands_cover_horizon);
    }

    #[test]
    fn target_spend_plan_assesses_bridge_at_target() {
        let plan = build_plan(&household(), Some(60_000.0), &CalcSettings::default());
        assert!(plan.viable);
        assert_eq!(plan.target_spend, Some(60_000.0));
        assert!(plan.sustainable_spend >= 60_000.0 - 1e-6);
        let bridge = plan.bridge.expect("bridge assessed");
        if bridge.years > 0 {
            assert!(bridge.need > 0.0);
        }
    }

    #[test]
    fn failed_forced_age_still_reports_a_path() {
        let mut h = household();
        h.outside_balance = 0.0;
        h.annual_savings = 0.0;
        h.retirement_age = Some(52);
        let plan = build_plan(&h, None, &CalcSettings::default());
        assert_eq!(plan.retirement_age, Some(52));
        assert!(!plan.viable);
        assert_eq!(plan.constraint, Constraint::BridgeLimited);
        assert!(plan.affordable_spend < plan.sustainable_spend);
        assert_eq!(plan.path.first().map(|p| p.age), Some(50));
    }

    #[test]
    fn locked_wealth_plan_is_horizon_limited_at_preservation_age() {
        let mut h = household();
        h.outside_balance = 0.0;
        h.super_balance = 1_000_000.0;
        h.annual_savings = 0.0;
        h.real_return = 0.0;
        let plan = build_plan(&h, None, &CalcSettings::default());
        assert_eq!(plan.retirement_age, Some(60));
        let bridge = plan.bridge.expect("bridge assessed");
        assert_eq!(bridge.years, 0);
        assert_eq!(plan.constraint, Constraint::HorizonLimited);
        assert_eq!(plan.constraint, bridge.constraint);
        assert!(plan.delayed_by_bridge);
    }

    #[test]
    fn hopeless_plan_projects_working_life() {
        let mut h = household();
        h.outside_balance = 0.0;
        h.super_balance = 0.0;
        h.annual_savings = 0.0;
        let plan = build_plan(&h, None, &CalcSettings::default());
        assert_eq!(plan.retirement_age, None);
        assert!(!plan.viable);
        assert!(plan.bridge.is_none());
        assert_eq!(plan.path.len(), 41);
        assert!(plan.path.iter().all(|p| p.phase == Phase::Accumulation));
    }

    #[test]
    fn short_band_schedule_is_flagged() {
        let mut h = household();
        h.bands = SpendingBands::new(vec![SpendBand {
            end_age: 80,
            multiplier: 1.0,
        }]);
        let plan = build_plan(&h, None, &CalcSettings::default());
        assert!(!plan.bands_cover_horizon);
    }
}
