use crate::alarm::AlarmMode;
use crate::units::Unit;
use serde::{Deserialize, Serialize};

/// User-configurable display parameters. Owned by the session; mutated only by
/// user intents, never by the stream. The threshold is in the display unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub unit: Unit,
    pub alarm_mode: AlarmMode,
    pub alarm_threshold: Option<f64>,
}

impl DisplayConfig {
    /// Threshold entry arrives as free-form form input. Anything that does not
    /// parse as a finite number clears the threshold instead of erroring, so a
    /// cleared or garbled field simply means "no alarm configured".
    pub fn set_threshold_input(&mut self, raw: &str) {
        self.alarm_threshold = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_input_sets_threshold() {
        let mut config = DisplayConfig::default();
        config.set_threshold_input("31.5");
        assert_eq!(config.alarm_threshold, Some(31.5));
        config.set_threshold_input(" 12 ");
        assert_eq!(config.alarm_threshold, Some(12.0));
    }

    #[test]
    fn invalid_input_clears_threshold() {
        let mut config = DisplayConfig {
            alarm_threshold: Some(31.0),
            ..DisplayConfig::default()
        };
        config.set_threshold_input("");
        assert_eq!(config.alarm_threshold, None);

        config.alarm_threshold = Some(31.0);
        config.set_threshold_input("12cm");
        assert_eq!(config.alarm_threshold, None);

        config.alarm_threshold = Some(31.0);
        config.set_threshold_input("NaN");
        assert_eq!(config.alarm_threshold, None);
    }
}
