use crate::buffer::SampleBuffer;
use crate::units::{Unit, to_display};
use rangestation_shared::SAMPLE_RATE_HZ;

/// Plot series for the scrolling chart: one (time offset, display value) pair
/// per buffered reading, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    /// Seconds relative to the newest reading: the newest sits at 0, earlier
    /// readings carry negative offsets. A rolling "seconds ago" axis is stable
    /// for a fixed-width chart regardless of wall-clock skew.
    pub offsets_s: Vec<f64>,
    /// Magnitudes converted to the display unit.
    pub values: Vec<f64>,
}

/// Build the chart series from the current buffer and display unit.
pub fn derive(buffer: &SampleBuffer, unit: Unit) -> ChartSeries {
    let len = buffer.len();
    let mut offsets_s = Vec::with_capacity(len);
    let mut values = Vec::with_capacity(len);

    for (i, sample) in buffer.iter().enumerate() {
        offsets_s.push((i as f64 - (len as f64 - 1.0)) / SAMPLE_RATE_HZ as f64);
        values.push(to_display(sample.magnitude_cm, unit));
    }

    ChartSeries { offsets_s, values }
}

/// Axis tick policy used by the original renderer: label the newest point
/// "0s", every full second before it, and suppress the rest. Formatting is a
/// rendering concern; this helper exists so renderers do not have to restate
/// the policy.
pub fn tick_label(offsets_s: &[f64], index: usize) -> Option<String> {
    if index + 1 == offsets_s.len() {
        return Some("0s".to_string());
    }
    if index % SAMPLE_RATE_HZ as usize == 0 {
        return Some(format!("{}s", offsets_s.get(index)?.round() as i64));
    }
    None
}
