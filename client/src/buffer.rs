use rangestation_shared::{BUFFER_CAPACITY, SAMPLE_INTERVAL_MS};
use std::collections::VecDeque;

/// One distance reading. Magnitude is always canonical centimeters; display
/// conversion happens at derivation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub captured_at_ms: i64,
    pub magnitude_cm: f64,
}

/// Bounded, time-ordered store of the most recent readings, oldest first.
///
/// Only the stream ingestor mutates this. Capture times are non-decreasing by
/// construction: appends use the ingestor's clock and full replaces lay out
/// synthetic times on the fixed sample interval.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    buf: VecDeque<Sample>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            buf: VecDeque::with_capacity(BUFFER_CAPACITY),
        }
    }

    /// Swap the whole history for `values` (oldest first), keeping at most the
    /// last `BUFFER_CAPACITY` of them. Capture times are reconstructed from
    /// the fixed sample interval, counting backward from `now_ms` for the
    /// newest value. An empty input yields an empty buffer.
    pub fn replace_all(&mut self, values: &[f64], now_ms: i64) {
        let skip = values.len().saturating_sub(BUFFER_CAPACITY);
        let kept = &values[skip..];
        let len = kept.len() as i64;

        self.buf.clear();
        for (i, &magnitude_cm) in kept.iter().enumerate() {
            let captured_at_ms = now_ms - (len - 1 - i as i64) * SAMPLE_INTERVAL_MS;
            self.buf.push_back(Sample {
                captured_at_ms,
                magnitude_cm,
            });
        }
    }

    /// Append one reading at the tail, evicting the oldest reading first when
    /// the buffer is full. Length never exceeds `BUFFER_CAPACITY`.
    pub fn append(&mut self, magnitude_cm: f64, captured_at_ms: i64) {
        if self.buf.len() == BUFFER_CAPACITY {
            self.buf.pop_front();
        }
        self.buf.push_back(Sample {
            captured_at_ms,
            magnitude_cm,
        });
    }

    /// The most recent reading, or `None` while the buffer is empty.
    pub fn latest(&self) -> Option<&Sample> {
        self.buf.back()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Readings oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.buf.iter()
    }
}
