// Sensor simulator: serves the distance-sensor wire protocol the dashboard
// client consumes, with a fake rangefinder ticking at 10 Hz.

mod ring_buffer;
mod sensor;
mod state;
mod web;

use crate::ring_buffer::RingBuffer;
use crate::state::AppState;
use rangestation_shared::BUFFER_CAPACITY;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (readings_tx, _) = broadcast::channel(512);
    let state = Arc::new(AppState {
        history: Arc::new(Mutex::new(RingBuffer::new(BUFFER_CAPACITY))),
        readings_tx,
    });

    tokio::spawn(sensor::sensor_task(state.clone()));

    let app = web::router(state);
    let addr =
        std::env::var("RANGESTATION_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("sensor simulator running at http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
