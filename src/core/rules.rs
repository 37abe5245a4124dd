use serde::{Deserialize, Serialize};

pub const DEFAULT_PRESERVATION_AGE: u32 = 60;
pub const DEFAULT_GUARANTEE_RATE: f64 = 0.12;
pub const DEFAULT_CONCESSIONAL_CAP: f64 = 30_000.0;
pub const DEFAULT_CONTRIBUTION_TAX: f64 = 0.15;
pub const DEFAULT_LEVY_RATE: f64 = 0.02;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JurisdictionRules {
    pub preservation_age: Option<u32>,
    pub guarantee_rate: Option<f64>,
    pub concessional_cap: Option<f64>,
    pub contribution_tax: Option<f64>,
    pub levy_rate: Option<f64>,
    pub income_tax_brackets: Option<Vec<TaxBracket>>,
}

impl JurisdictionRules {
    pub fn preservation_age(&self) -> u32 {
        self.preservation_age.unwrap_or(DEFAULT_PRESERVATION_AGE)
    }

    pub fn guarantee_rate(&self) -> f64 {
        self.guarantee_rate
            .unwrap_or(DEFAULT_GUARANTEE_RATE)
            .clamp(0.0, 1.0)
    }

    pub fn concessional_cap(&self) -> f64 {
        self.concessional_cap
            .unwrap_or(DEFAULT_CONCESSIONAL_CAP)
            .max(0.0)
    }

    pub fn contribution_tax(&self) -> f64 {
        self.contribution_tax
            .unwrap_or(DEFAULT_CONTRIBUTION_TAX)
            .clamp(0.0, 1.0)
    }

    pub fn levy_rate(&self) -> f64 {
        self.levy_rate.unwrap_or(DEFAULT_LEVY_RATE).clamp(0.0, 1.0)
    }

    pub fn default_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket {
                threshold: 0.0,
                rate: 0.0,
            },
            TaxBracket {
                threshold: 18_200.0,
                rate: 0.16,
            },
            TaxBracket {
                threshold: 45_000.0,
                rate: 0.30,
            },
            TaxBracket {
                threshold: 135_000.0,
                rate: 0.37,
            },
            TaxBracket {
                threshold: 190_000.0,
                rate: 0.45,
            },
        ]
    }

    pub fn marginal_rate(&self, income: f64) -> f64 {
        let income = income.max(0.0);
        let default_brackets;
        let brackets = match &self.income_tax_brackets {
            Some(b) if !b.is_empty() => b.as_slice(),
            _ => {
                default_brackets = Self::default_brackets();
                default_brackets.as_slice()
            }
        };

        let bracket_rate = brackets
            .iter()
            .filter(|b| income > b.threshold)
            .max_by(|a, b| a.threshold.total_cmp(&b.threshold))
            .map(|b| b.rate.clamp(0.0, 1.0))
            .unwrap_or(0.0);

        if bracket_rate <= 0.0 {
            return 0.0;
        }
        (bracket_rate + self.levy_rate()).min(1.0)
    }

    pub fn employer_contribution(&self, salary: f64) -> f64 {
        salary.max(0.0) * self.guarantee_rate()
    }
}
