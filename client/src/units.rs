use serde::{Deserialize, Serialize};
use std::fmt;

pub const CM_PER_INCH: f64 = 2.54;

/// Display unit selected on the dashboard. Centimeters is the canonical unit
/// everything is stored and transported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "in")]
    Inches,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Centimeters => "cm",
            Unit::Inches => "in",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Unit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cm" => Ok(Unit::Centimeters),
            "in" => Ok(Unit::Inches),
            _ => Err(()),
        }
    }
}

/// Convert a canonical centimeter magnitude into `unit` for display. Pure
/// floating-point division, no rounding.
pub fn to_display(magnitude_cm: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Centimeters => magnitude_cm,
        Unit::Inches => magnitude_cm / CM_PER_INCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centimeters_pass_through() {
        assert_eq!(to_display(98.4, Unit::Centimeters), 98.4);
    }

    #[test]
    fn inches_divide_by_2_54() {
        assert_eq!(to_display(2.54, Unit::Inches), 1.0);
        assert!((to_display(32.0, Unit::Inches) - 12.598425196850394).abs() < 1e-12);
    }

    #[test]
    fn round_trip_stays_within_tolerance() {
        for &x in &[0.1, 1.0, 2.54, 31.0, 97.3, 1.0e6, 3.3e-4] {
            let back = to_display(to_display(x, Unit::Inches) * CM_PER_INCH, Unit::Centimeters);
            assert!((back - x).abs() / x < 1e-9, "round trip drifted for {x}");
        }
    }
}
