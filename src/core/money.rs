// Values are scaled before the half check, so `0.125` at two places is
// treated as a tie even though its binary form is slightly off.
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let scale = 10_f64.powi(decimals as i32);
    let scaled = value * scale;
    let floor = scaled.floor();
    let diff = scaled - floor;

    let rounded = if (diff - 0.5).abs() <= 1e-7 {
        if floor.rem_euclid(2.0) == 0.0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        scaled.round()
    };

    let out = rounded / scale;
    if out == 0.0 { 0.0 } else { out }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoneyRounding {
    pub decimals: u32,
}

impl MoneyRounding {
    pub const fn cents() -> Self {
        Self { decimals: 2 }
    }

    pub const fn whole_units() -> Self {
        Self { decimals: 0 }
    }

    pub fn apply(self, value: f64) -> f64 {
        round_half_even(value, self.decimals)
    }

    pub fn truncate(self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let scale = 10_f64.powi(self.decimals as i32);
        let scaled = value * scale;
        let nearest = scaled.round();
        let stepped = if (scaled - nearest).abs() <= 1e-7 {
            nearest
        } else {
            scaled.floor()
        };
        let out = stepped / scale;
        if out == 0.0 { 0.0 } else { out }
    }
}

impl Default for MoneyRounding {
    fn default() -> Self {
        Self::cents()
    }
}
