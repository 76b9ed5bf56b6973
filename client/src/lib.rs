// Telemetry client core for the distance sensor dashboard.
//
// The pipeline is: stream ingestor -> sample buffer -> {unit converter,
// alarm evaluator, chart deriver} -> read-only snapshots for the renderer.

pub mod alarm;
pub mod buffer;
pub mod chart;
pub mod config;
pub mod ingest;
pub mod state;
pub mod units;

pub use alarm::AlarmMode;
pub use buffer::{Sample, SampleBuffer};
pub use chart::ChartSeries;
pub use config::DisplayConfig;
pub use ingest::{
    Clock, ConnectionState, SensorSession, SessionError, SessionSnapshot, SystemClock, stream_url,
};
pub use state::{DerivedView, SessionState};
pub use units::{Unit, to_display};

pub use rangestation_shared::{
    BUFFER_CAPACITY, SAMPLE_INTERVAL_MS, SAMPLE_RATE_HZ, STREAM_PATH, SensorMessage,
};
