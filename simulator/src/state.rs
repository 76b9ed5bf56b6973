use crate::ring_buffer::RingBuffer;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    /// Rolling history of readings (cm), shared by the sensor task and every
    /// websocket client's connect-time snapshot.
    pub history: Arc<Mutex<RingBuffer<f64>>>,

    /// New readings → all connected dashboards.
    pub readings_tx: broadcast::Sender<f64>,
}

impl AppState {
    /// Record one reading and fan it out, as a single step. Broadcasting
    /// inside the history lock pairs with [`AppState::subscribe_with_snapshot`]:
    /// a reading lands either in a client's connect-time snapshot or on its
    /// live feed, never both.
    pub fn publish(&self, reading: f64) {
        if let Ok(mut history) = self.history.lock() {
            history.push(reading);
            // No receivers just means no dashboard is watching right now.
            let _ = self.readings_tx.send(reading);
        }
    }

    /// Subscription plus history copy, taken under one lock so readings
    /// published concurrently cannot be duplicated across the two.
    pub fn subscribe_with_snapshot(&self) -> (broadcast::Receiver<f64>, Vec<f64>) {
        match self.history.lock() {
            Ok(history) => (self.readings_tx.subscribe(), history.snapshot()),
            Err(_) => (self.readings_tx.subscribe(), Vec::new()),
        }
    }

    /// Copy of the current history, oldest first.
    pub fn history_snapshot(&self) -> Vec<f64> {
        self.history
            .lock()
            .map(|h| h.snapshot())
            .unwrap_or_default()
    }
}
