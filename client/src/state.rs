use crate::alarm::{self, AlarmMode};
use crate::buffer::SampleBuffer;
use crate::chart::{self, ChartSeries};
use crate::config::DisplayConfig;
use crate::units::{Unit, to_display};
use rangestation_shared::SensorMessage;

/// Read-only snapshot handed to the renderer. Recomputed wholesale from the
/// buffer and configuration on every change — there is no second source of
/// truth to fall out of sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedView {
    /// Latest reading converted to the display unit, `None` while no data has
    /// arrived yet.
    pub latest_display_value: Option<f64>,
    pub alarm_triggered: bool,
    pub chart: ChartSeries,
}

/// Single owner of the sample buffer and display configuration for one
/// session. All mutation goes through here: the stream ingestor applies wire
/// messages, the view layer applies configuration intents, and each accepted
/// mutation re-derives the view synchronously before the next one is looked
/// at.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    buffer: SampleBuffer,
    config: DisplayConfig,
    derived: DerivedView,
}

impl SessionState {
    pub fn new() -> Self {
        let mut state = Self {
            buffer: SampleBuffer::new(),
            config: DisplayConfig::default(),
            derived: DerivedView::default(),
        };
        state.recompute();
        state
    }

    /// Apply one raw stream message. The stream is best-effort telemetry:
    /// anything that fails to parse — malformed syntax, missing or mistyped
    /// fields, unknown event kinds — is dropped without touching state.
    /// Returns whether the message was accepted.
    pub fn ingest(&mut self, text: &str, now_ms: i64) -> bool {
        let Ok(msg) = serde_json::from_str::<SensorMessage>(text) else {
            log::debug!("dropping unrecognized stream message: {text:?}");
            return false;
        };

        match msg {
            SensorMessage::Snapshot(values) => self.buffer.replace_all(&values, now_ms),
            SensorMessage::Reading(magnitude_cm) => self.buffer.append(magnitude_cm, now_ms),
        }
        self.recompute();
        true
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.config.unit = unit;
        self.recompute();
    }

    pub fn set_alarm_mode(&mut self, mode: AlarmMode) {
        self.config.alarm_mode = mode;
        self.recompute();
    }

    /// Set or clear the alarm threshold (display unit). Non-finite values are
    /// treated as "no threshold".
    pub fn set_alarm_threshold(&mut self, threshold: Option<f64>) {
        self.config.alarm_threshold = threshold.filter(|v| v.is_finite());
        self.recompute();
    }

    /// Threshold entry straight from a form field; see
    /// [`DisplayConfig::set_threshold_input`].
    pub fn set_alarm_threshold_input(&mut self, raw: &str) {
        self.config.set_threshold_input(raw);
        self.recompute();
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn derived(&self) -> &DerivedView {
        &self.derived
    }

    fn recompute(&mut self) {
        self.derived = DerivedView {
            latest_display_value: self
                .buffer
                .latest()
                .map(|s| to_display(s.magnitude_cm, self.config.unit)),
            alarm_triggered: alarm::evaluate(&self.buffer, &self.config),
            chart: chart::derive(&self.buffer, self.config.unit),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: i64 = 1_000_000;

    #[test]
    fn snapshot_message_replaces_the_buffer() {
        let mut state = SessionState::new();
        assert!(state.ingest(r#"{"event":"data","data":[30,31,32]}"#, NOW_MS));

        assert_eq!(state.buffer().len(), 3);
        let values: Vec<f64> = state.buffer().iter().map(|s| s.magnitude_cm).collect();
        assert_eq!(values, vec![30.0, 31.0, 32.0]);
        assert_eq!(state.derived().latest_display_value, Some(32.0));
    }

    #[test]
    fn latest_display_value_follows_the_unit() {
        let mut state = SessionState::new();
        state.ingest(r#"{"event":"data","data":[30,31,32]}"#, NOW_MS);
        state.set_unit(Unit::Inches);

        let latest = state.derived().latest_display_value.unwrap();
        assert!((latest - 32.0 / 2.54).abs() < 1e-9);
        assert!((latest - 12.6).abs() < 0.01);
    }

    #[test]
    fn increment_message_appends() {
        let mut state = SessionState::new();
        state.ingest(r#"{"event":"data","data":[30,31,32]}"#, NOW_MS);
        assert!(state.ingest(r#"{"event":"update","data":33}"#, NOW_MS + 100));

        let values: Vec<f64> = state.buffer().iter().map(|s| s.magnitude_cm).collect();
        assert_eq!(values, vec![30.0, 31.0, 32.0, 33.0]);
        assert_eq!(state.derived().chart.values, vec![30.0, 31.0, 32.0, 33.0]);
    }

    #[test]
    fn malformed_messages_leave_state_untouched() {
        let mut state = SessionState::new();
        state.ingest(r#"{"event":"data","data":[30,31,32]}"#, NOW_MS);
        let before = state.derived().clone();

        assert!(!state.ingest(r#"{"event":"data"}"#, NOW_MS + 100));
        assert!(!state.ingest("not json at all", NOW_MS + 100));
        assert!(!state.ingest(r#"{"event":"update","data":"33"}"#, NOW_MS + 100));

        assert_eq!(state.derived(), &before);
        assert_eq!(state.buffer().len(), 3);
    }

    #[test]
    fn unknown_event_kinds_are_ignored() {
        let mut state = SessionState::new();
        state.ingest(r#"{"event":"data","data":[30]}"#, NOW_MS);
        assert!(!state.ingest(r#"{"event":"calibrate","data":7}"#, NOW_MS + 100));
        assert_eq!(state.buffer().len(), 1);
    }

    #[test]
    fn alarm_follows_threshold_and_mode() {
        let mut state = SessionState::new();
        state.ingest(r#"{"event":"data","data":[30,31,32]}"#, NOW_MS);

        state.set_alarm_threshold(Some(31.0));
        assert!(state.derived().alarm_triggered); // 32 > 31

        state.ingest(r#"{"event":"data","data":[30,31]}"#, NOW_MS);
        assert!(!state.derived().alarm_triggered); // 31 == 31, strict

        state.set_alarm_mode(AlarmMode::BelowThreshold);
        state.ingest(r#"{"event":"update","data":29}"#, NOW_MS);
        assert!(state.derived().alarm_triggered); // 29 < 31
    }

    #[test]
    fn alarm_is_false_without_threshold_regardless_of_data() {
        let mut state = SessionState::new();
        state.ingest(r#"{"event":"data","data":[1000]}"#, NOW_MS);
        assert!(!state.derived().alarm_triggered);

        state.set_alarm_threshold_input("garbage");
        assert!(!state.derived().alarm_triggered);
    }

    #[test]
    fn rederivation_is_idempotent() {
        let mut state = SessionState::new();
        state.ingest(r#"{"event":"data","data":[30,31,32]}"#, NOW_MS);
        state.set_unit(Unit::Inches);
        let first = state.derived().clone();

        // re-applying the same configuration must not change anything
        state.set_unit(Unit::Inches);
        assert_eq!(state.derived(), &first);
    }
}
