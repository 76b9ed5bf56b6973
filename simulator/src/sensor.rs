use crate::state::AppState;
use rand::RngExt;
use rangestation_shared::SAMPLE_INTERVAL_MS;
use std::sync::Arc;
use std::time::Duration;

/// Stand-in for the ultrasonic rangefinder: a reading somewhere between 90
/// and 110 cm, matching the firmware's placeholder.
pub fn read_distance_cm() -> f64 {
    let mut rng = rand::rng();
    rng.random_range(90.0..110.0)
}

/// Read, store, and fan out one reading every sample interval (10 Hz).
pub async fn sensor_task(state: Arc<AppState>) {
    let mut tick = tokio::time::interval(Duration::from_millis(SAMPLE_INTERVAL_MS as u64));

    loop {
        tick.tick().await;
        state.publish(read_distance_cm());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_stay_in_the_sensor_band() {
        for _ in 0..1000 {
            let d = read_distance_cm();
            assert!((90.0..110.0).contains(&d));
        }
    }
}
