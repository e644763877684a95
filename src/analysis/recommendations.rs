//! Advisory messages derived from level, voltage spread and trend

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean level below which charging is urgent
pub const CRITICAL_LEVEL: f64 = 20.0;

/// Mean level below which charging is advised
pub const LOW_LEVEL: f64 = 50.0;

/// Voltage std-dev (mV) above which the link is suspect
pub const UNSTABLE_VOLTAGE_STD_DEV: f64 = 50.0;

/// Slope (mV per sample) below which the battery drains quickly
pub const RAPID_DRAIN_SLOPE: f64 = -1.0;

/// Advisory raised by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    ChargeImmediately,
    ChargeSoon,
    CheckConnection,
    DrainingQuickly,
}

impl Recommendation {
    /// Message shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::ChargeImmediately => "Charge battery immediately",
            Recommendation::ChargeSoon => "Consider charging soon",
            Recommendation::CheckConnection => "Check BLE connection stability",
            Recommendation::DrainingQuickly => "Battery draining quickly",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Evaluate every rule and collect the advisories in priority order
///
/// Order is charge urgency, then connection stability, then drain rate. An
/// empty result means nothing needs attention.
pub fn recommend(level_mean: f64, voltage_std_dev: f64, trend_slope: f64) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if level_mean < CRITICAL_LEVEL {
        recommendations.push(Recommendation::ChargeImmediately);
    } else if level_mean < LOW_LEVEL {
        recommendations.push(Recommendation::ChargeSoon);
    }

    if voltage_std_dev > UNSTABLE_VOLTAGE_STD_DEV {
        recommendations.push(Recommendation::CheckConnection);
    }

    if trend_slope < RAPID_DRAIN_SLOPE {
        recommendations.push(Recommendation::DrainingQuickly);
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_battery_has_no_recommendations() {
        assert!(recommend(85.0, 10.0, 0.2).is_empty());
        assert!(recommend(50.0, 50.0, -1.0).is_empty());
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        assert_eq!(
            recommend(10.0, 60.0, -2.0),
            vec![
                Recommendation::ChargeImmediately,
                Recommendation::CheckConnection,
                Recommendation::DrainingQuickly,
            ]
        );
    }

    #[test]
    fn test_charge_rules_are_exclusive() {
        assert_eq!(recommend(19.9, 0.0, 0.0), vec![Recommendation::ChargeImmediately]);
        assert_eq!(recommend(15.0, 10.0, 0.2), vec![Recommendation::ChargeImmediately]);
        assert_eq!(recommend(20.0, 0.0, 0.0), vec![Recommendation::ChargeSoon]);
        assert_eq!(recommend(49.9, 0.0, 0.0), vec![Recommendation::ChargeSoon]);
    }

    #[test]
    fn test_independent_rules() {
        assert_eq!(recommend(90.0, 50.1, 0.0), vec![Recommendation::CheckConnection]);
        assert_eq!(recommend(90.0, 0.0, -1.01), vec![Recommendation::DrainingQuickly]);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Recommendation::ChargeImmediately.to_string(),
            "Charge battery immediately"
        );
        assert_eq!(Recommendation::DrainingQuickly.message(), "Battery draining quickly");
    }
}
