use serde::Serialize;

use super::engine::Decumulation;
use super::types::Balances;

// A bridge is short only when the gap exceeds the larger of `absolute`
// dollars and `relative` times the sustainable spend.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BridgeTolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl BridgeTolerance {
    pub fn epsilon(&self, sustainable_spend: f64) -> f64 {
        self.absolute
            .max(0.0)
            .max(self.relative.max(0.0) * sustainable_spend.abs())
    }
}

impl Default for BridgeTolerance {
    fn default() -> Self {
        Self {
            absolute: 1.0,
            relative: 0.002,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Constraint {
    BridgeLimited,
    HorizonLimited,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeAssessment {
    pub need: f64,
    pub have: f64,
    pub years: u32,
    pub covered: bool,
    pub max_bridge_spend: Option<f64>,
    pub constraint: Constraint,
}

impl BridgeAssessment {
    pub fn shortfall(&self) -> f64 {
        (self.need - self.have).max(0.0)
    }
}

pub fn bridge_factor(params: &Decumulation<'_>) -> f64 {
    let end = params.preservation_age.min(params.life_expectancy);
    let growth = (1.0 + params.real_return).max(1e-9);
    let mut discount = 1.0;
    let mut factor = 0.0;
    for age in params.retirement_age..end {
        factor += params.bands.multiplier_at(age + 1) / discount;
        discount *= growth;
    }
    factor
}

pub fn bridge_years(params: &Decumulation<'_>) -> u32 {
    params
        .preservation_age
        .min(params.life_expectancy)
        .saturating_sub(params.retirement_age)
}

pub fn assess_bridge(
    balances: Balances,
    base_spend: f64,
    params: &Decumulation<'_>,
    tolerance: &BridgeTolerance,
) -> BridgeAssessment {
    let years = bridge_years(params);
    let factor = bridge_factor(params);
    let need = base_spend.max(0.0) * factor;
    let have = balances.outside;
    let covered = have + tolerance.epsilon(base_spend) >= need;

    let max_bridge_spend = if years == 0 || factor <= 0.0 {
        None
    } else {
        Some(have.max(0.0) / factor)
    };

    BridgeAssessment {
        need,
        have,
        years,
        covered,
        max_bridge_spend,
        constraint: classify(years, covered),
    }
}

pub fn classify(bridge_years: u32, covered: bool) -> Constraint {
    if bridge_years > 0 && !covered {
        Constraint::BridgeLimited
    } else {
        Constraint::HorizonLimited
    }
}
