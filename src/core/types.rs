use serde::{Deserialize, Serialize};

use super::bands::SpendingBands;
use super::bridge::BridgeTolerance;
use super::money::MoneyRounding;
use super::solver::SolverLimits;

pub const EMPLOYER_CONTRIBUTION_TAX: f64 = 0.15;

pub const MAX_ELIGIBLE_PEOPLE: u32 = 2;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pool {
    #[default]
    #[serde(alias = "unrestricted")]
    Outside,
    #[serde(alias = "restricted")]
    Super,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    GrossDeferral,
    NetFixed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContributionSplit {
    pub desired_fraction: f64,
    pub per_person_cap: f64,
    pub eligible_people: u32,
    pub contribution_tax: f64,
    pub outside_tax: f64,
    pub mode: SplitMode,
    pub member_rates: Vec<f64>,
}

impl ContributionSplit {
    pub fn fraction(&self) -> f64 {
        clamp_unit(self.desired_fraction)
    }

    pub fn people(&self) -> u32 {
        self.eligible_people.min(MAX_ELIGIBLE_PEOPLE)
    }

    pub fn members(&self) -> &[f64] {
        let count = self.member_rates.len().min(self.people() as usize);
        &self.member_rates[..count]
    }

    pub fn contribution_tax_rate(&self) -> f64 {
        clamp_unit(self.contribution_tax)
    }

    pub fn outside_tax_rate(&self) -> f64 {
        clamp_unit(self.outside_tax)
    }

    pub fn headroom(&self, employer_gross: f64) -> f64 {
        (self.per_person_cap.max(0.0) * self.people() as f64 - employer_gross.max(0.0)).max(0.0)
    }

    pub fn with_fraction(&self, fraction: f64) -> Self {
        Self {
            desired_fraction: fraction,
            ..self.clone()
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureInflow {
    pub age: f64,
    pub amount: f64,
    #[serde(default)]
    pub pool: Pool,
}

// Callers must supply `life_expectancy > current_age`.
#[derive(Clone, Debug, PartialEq)]
pub struct Household {
    pub current_age: u32,
    pub preservation_age: u32,
    pub life_expectancy: u32,
    pub outside_balance: f64,
    pub super_balance: f64,
    pub real_return: f64,
    pub annual_savings: f64,
    pub bequest: f64,
    pub retirement_age: Option<u32>,
    pub bands: SpendingBands,
    pub split: Option<ContributionSplit>,
    pub employer_contribution: f64,
    pub inflows: Vec<FutureInflow>,
}

impl Household {
    pub fn with_split(&self, split: Option<ContributionSplit>) -> Self {
        Self {
            split,
            ..self.clone()
        }
    }

    pub fn candidate_ages(&self) -> std::ops::RangeInclusive<u32> {
        (self.current_age + 1)..=self.life_expectancy.saturating_sub(1)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub outside: f64,
    #[serde(rename = "super")]
    pub super_balance: f64,
}

impl Balances {
    pub fn total(self) -> f64 {
        self.outside + self.super_balance
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Accumulation,
    Bridge,
    Retirement,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    pub age: u32,
    pub outside: f64,
    #[serde(rename = "super")]
    pub super_balance: f64,
    pub total: f64,
    pub phase: Phase,
}

impl PathPoint {
    pub fn new(age: u32, balances: Balances, phase: Phase) -> Self {
        Self {
            age,
            outside: balances.outside,
            super_balance: balances.super_balance,
            total: balances.total(),
            phase,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CalcSettings {
    pub rounding: MoneyRounding,
    pub bridge: BridgeTolerance,
    pub solver: SolverLimits,
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
