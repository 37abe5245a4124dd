use serde::Serialize;

use super::engine::{Decumulation, project_accumulation, simulate_decumulation};
use super::types::{Balances, CalcSettings, Household, PathPoint};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverLimits {
    pub initial_spend: f64,
    pub max_doublings: u32,
    pub spend_ceiling: f64,
    pub bisection_iterations: u32,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            initial_spend: 10_000.0,
            max_doublings: 64,
            spend_ceiling: 1e9,
            bisection_iterations: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendSolution {
    pub retirement_age: u32,
    pub sustainable_spend: f64,
    pub retirement_balances: Balances,
    pub terminal_balances: Balances,
    pub path: Vec<PathPoint>,
}

#[derive(Debug, Clone, Copy)]
struct Bracket {
    low: f64,
    high: f64,
    iterations: u32,
}

pub fn solve_sustainable_spend(
    household: &Household,
    retirement_age: u32,
    settings: &CalcSettings,
) -> SpendSolution {
    let accumulation = project_accumulation(household, retirement_age, settings.rounding);
    let params = Decumulation::for_household(household, retirement_age);
    let sustainable_spend = sustainable_spend_from(
        accumulation.balances,
        household.bequest,
        &params,
        &settings.solver,
    );

    let mut path = accumulation.path;
    let terminal_balances = simulate_decumulation(
        accumulation.balances,
        sustainable_spend,
        &params,
        Some(&mut path),
    );

    SpendSolution {
        retirement_age,
        sustainable_spend,
        retirement_balances: accumulation.balances,
        terminal_balances,
        path,
    }
}

// Terminal wealth falls strictly as spend rises.
pub fn sustainable_spend_from(
    start: Balances,
    bequest: f64,
    params: &Decumulation<'_>,
    limits: &SolverLimits,
) -> f64 {
    if params.retirement_age >= params.life_expectancy {
        return 0.0;
    }

    let terminal_at = |spend: f64| simulate_decumulation(start, spend, params, None).total();
    if terminal_at(0.0) <= bequest {
        return 0.0;
    }

    let mut bracket = Bracket {
        low: 0.0,
        high: limits.initial_spend.max(1.0).min(limits.spend_ceiling),
        iterations: 0,
    };
    while bracket.iterations < limits.max_doublings
        && bracket.high < limits.spend_ceiling
        && terminal_at(bracket.high) > bequest
    {
        bracket.high = (bracket.high * 2.0).min(limits.spend_ceiling);
        bracket.iterations += 1;
    }

    for _ in 0..limits.bisection_iterations {
        let mid = 0.5 * (bracket.low + bracket.high);
        if terminal_at(mid) >= bequest {
            bracket.low = mid;
        } else {
            bracket.high = mid;
        }
    }

    0.5 * (bracket.low + bracket.high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bands::SpendingBands;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn retiree(outside: f64, super_balance: f64) -> Household {
        Household {
            current_age: 59,
            preservation_age: 60,
            life_expectancy: 70,
            outside_balance: outside,
            super_balance,
            real_return: 0.0,
            annual_savings: 0.0,
            bequest: 0.0,
            retirement_age: None,
            bands: SpendingBands::flat(),
            split: None,
            employer_contribution: 0.0,
            inflows: Vec::new(),
        }
    }

    #[test]
    fn zero_return_flat_horizon_is_simple_division() {
        let household = retiree(100_000.0, 0.0);
        let solution = solve_sustainable_spend(&household, 60, &CalcSettings::default());
        assert_close(solution.sustainable_spend, 10_000.0, 1e-4);
        assert_close(solution.terminal_balances.total(), 0.0, 1e-3);
    }

    #[test]
    fn bequest_is_left_at_life_expectancy() {
        let mut household = retiree(100_000.0, 50_000.0);
        household.bequest = 30_000.0;
        let solution = solve_sustainable_spend(&household, 60, &CalcSettings::default());
        assert_close(solution.sustainable_spend, 12_000.0, 1e-4);
        assert_close(solution.terminal_balances.total(), 30_000.0, 1e-3);
    }

    #[test]
    fn positive_return_matches_annuity_formula() {
        let mut household = retiree(500_000.0, 0.0);
        household.real_return = 0.04;
        let solution = solve_sustainable_spend(&household, 60, &CalcSettings::default());
        // One working year at 4% precedes retirement.
        assert_close(solution.retirement_balances.outside, 520_000.0, 1e-6);
        let annuity_due = (1.0 - 1.04_f64.powi(-10)) / 0.04 * 1.04;
        assert_close(solution.sustainable_spend, 520_000.0 / annuity_due, 1e-4);
    }

    #[test]
    fn unreachable_bequest_gives_zero_spend() {
        let mut household = retiree(10_000.0, 0.0);
        household.bequest = 1_000_000.0;
        let solution = solve_sustainable_spend(&household, 60, &CalcSettings::default());
        assert_close(solution.sustainable_spend, 0.0, 1e-6);
    }

    #[test]
    fn huge_balances_hit_the_ceiling_without_runaway() {
        let household = retiree(1e13, 0.0);
        let settings = CalcSettings::default();
        let solution = solve_sustainable_spend(&household, 60, &settings);
        assert!(solution.sustainable_spend <= settings.solver.spend_ceiling);
        assert!(solution.sustainable_spend.is_finite());
    }

    #[test]
    fn no_retirement_years_means_no_spend() {
        let household = retiree(100_000.0, 0.0);
        let solution = solve_sustainable_spend(&household, 70, &CalcSettings::default());
        assert_close(solution.sustainable_spend, 0.0, 1e-12);
    }

    #[test]
    fn path_concatenates_accumulation_and_decumulation() {
        let mut household = retiree(100_000.0, 0.0);
        household.current_age = 50;
        household.annual_savings = 10_000.0;
        let solution = solve_sustainable_spend(&household, 55, &CalcSettings::default());

        let ages: Vec<u32> = solution.path.iter().map(|p| p.age).collect();
        let expected: Vec<u32> = (50..=70).collect();
        assert_eq!(ages, expected);
        assert_close(solution.retirement_balances.outside, 150_000.0, 1e-9);
        assert_close(solution.path[5].outside, 150_000.0, 1e-9);
    }

    #[test]
    fn solving_is_deterministic() {
        let mut household = retiree(321_000.0, 456_000.0);
        household.current_age = 45;
        household.real_return = 0.035;
        household.annual_savings = 25_000.0;
        household.bands = SpendingBands::go_go_slow_go();
        let settings = CalcSettings::default();
        let a = solve_sustainable_spend(&household, 52, &settings);
        let b = solve_sustainable_spend(&household, 52, &settings);
        assert_eq!(a.sustainable_spend.to_bits(), b.sustainable_spend.to_bits());
        assert_eq!(a.path, b.path);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_terminal_wealth_hits_bequest(
            outside in 10_000u32..2_000_000,
            super_balance in 0u32..2_000_000,
            bequest_pct in 0u32..50,
            return_bp in 0i32..700,
            years in 1u32..50
        ) {
            let mut household = retiree(outside as f64, super_balance as f64);
            household.real_return = return_bp as f64 / 10_000.0;
            household.life_expectancy = 60 + years;
            household.bequest = (outside + super_balance) as f64 * bequest_pct as f64 / 100.0;
            household.bands = SpendingBands::go_go_slow_go();

            let solution = solve_sustainable_spend(&household, 60, &CalcSettings::default());
            prop_assert!(solution.sustainable_spend > 0.0);
            let gap = solution.terminal_balances.total() - household.bequest;
            prop_assert!(gap.abs() < 0.01, "terminal gap {}", gap);
        }
    }
}
