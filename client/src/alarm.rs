use crate::buffer::SampleBuffer;
use crate::config::DisplayConfig;
use crate::units::to_display;
use serde::{Deserialize, Serialize};

/// Which side of the threshold raises the alarm. Wire names match the
/// dashboard form values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMode {
    #[default]
    #[serde(rename = "greater")]
    AboveThreshold,
    #[serde(rename = "less")]
    BelowThreshold,
}

/// `true` only when a threshold is configured, the buffer holds at least one
/// reading, and the latest reading (in the display unit) is strictly past the
/// threshold. Equality never triggers. Pure; recomputed on every change rather
/// than cached.
pub fn evaluate(buffer: &SampleBuffer, config: &DisplayConfig) -> bool {
    let Some(threshold) = config.alarm_threshold else {
        return false;
    };
    let Some(latest) = buffer.latest() else {
        return false;
    };

    let display = to_display(latest.magnitude_cm, config.unit);
    match config.alarm_mode {
        AlarmMode::AboveThreshold => display > threshold,
        AlarmMode::BelowThreshold => display < threshold,
    }
}
