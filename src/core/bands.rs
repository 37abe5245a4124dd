use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendBand {
    pub end_age: u32,
    pub multiplier: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpendingBands {
    bands: Vec<SpendBand>,
}

impl SpendingBands {
    pub fn new(mut bands: Vec<SpendBand>) -> Self {
        for band in &mut bands {
            if !band.multiplier.is_finite() || band.multiplier < 0.0 {
                band.multiplier = 0.0;
            }
        }
        bands.sort_by_key(|b| b.end_age);
        bands.dedup_by_key(|b| b.end_age);
        Self { bands }
    }

    pub fn flat() -> Self {
        Self {
            bands: vec![SpendBand {
                end_age: u32::MAX,
                multiplier: 1.0,
            }],
        }
    }

    pub fn go_go_slow_go() -> Self {
        Self::new(vec![
            SpendBand {
                end_age: 60,
                multiplier: 1.10,
            },
            SpendBand {
                end_age: 75,
                multiplier: 1.00,
            },
            SpendBand {
                end_age: u32::MAX,
                multiplier: 0.85,
            },
        ])
    }

    pub fn bands(&self) -> &[SpendBand] {
        &self.bands
    }

    pub fn multiplier_at(&self, age: u32) -> f64 {
        match self.bands.iter().find(|b| age <= b.end_age) {
            Some(band) => band.multiplier,
            None => self.bands.last().map(|b| b.multiplier).unwrap_or(1.0),
        }
    }

    pub fn covers(&self, life_expectancy: u32) -> bool {
        self.bands
            .last()
            .is_some_and(|b| b.end_age >= life_expectancy)
    }
}

impl Default for SpendingBands {
    fn default() -> Self {
        Self::flat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_schedule_is_one_everywhere() {
        let bands = SpendingBands::flat();
        for age in [0, 30, 60, 99, u32::MAX] {
            assert_eq!(bands.multiplier_at(age), 1.0);
        }
        assert!(bands.covers(120));
    }

    #[test]
    fn band_end_ages_are_inclusive() {
        let bands = SpendingBands::go_go_slow_go();
        assert_eq!(bands.multiplier_at(60), 1.10);
        assert_eq!(bands.multiplier_at(61), 1.00);
        assert_eq!(bands.multiplier_at(75), 1.00);
        assert_eq!(bands.multiplier_at(76), 0.85);
    }

    #[test]
    fn lookups_past_the_end_use_the_last_multiplier() {
        let bands = SpendingBands::new(vec![
            SpendBand {
                end_age: 70,
                multiplier: 1.2,
            },
            SpendBand {
                end_age: 80,
                multiplier: 0.9,
            },
        ]);
        assert!(!bands.covers(90));
        assert_eq!(bands.multiplier_at(85), 0.9);
    }

    #[test]
    fn unordered_input_is_sorted_and_bad_multipliers_clamped() {
        let bands = SpendingBands::new(vec![
            SpendBand {
                end_age: 80,
                multiplier: f64::NAN,
            },
            SpendBand {
                end_age: 65,
                multiplier: -1.0,
            },
        ]);
        assert_eq!(bands.bands()[0].end_age, 65);
        assert_eq!(bands.multiplier_at(50), 0.0);
        assert_eq!(bands.multiplier_at(70), 0.0);
    }

    #[test]
    fn empty_schedule_defaults_to_one() {
        let bands = SpendingBands::new(Vec::new());
        assert_eq!(bands.multiplier_at(40), 1.0);
        assert!(!bands.covers(40));
    }

    #[test]
    fn deserializes_from_plain_array() {
        let json = r#"[{"endAge":70,"multiplier":1.1},{"endAge":95,"multiplier":0.9}]"#;
        let bands: SpendingBands = serde_json::from_str(json).expect("bands should parse");
        assert_eq!(bands.multiplier_at(70), 1.1);
        assert_eq!(bands.multiplier_at(71), 0.9);
    }
}
