use crate::alarm::AlarmMode;
use crate::state::{DerivedView, SessionState};
use crate::units::Unit;
use futures_util::StreamExt;
use rangestation_shared::STREAM_PATH;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Lifecycle of the live connection. `Connecting` covers the handshake window
/// inside [`SensorSession::connect`]; a session is already `Connected` by the
/// time the caller can subscribe, so receivers only ever observe the
/// `Connected -> Disconnected` edge. The core never reconnects on its own; a
/// surrounding policy may open a fresh session, and the server re-sends a full
/// snapshot on every connect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// What the renderer sees: connection lifecycle plus the current derived view,
/// as one copy-out value. Published on every accepted mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub connection: ConnectionState,
    pub view: DerivedView,
}

/// Time source for capture timestamps. Sessions under test inject a fixed
/// clock so buffers come out deterministic and independent sessions never
/// share ambient state.
pub trait Clock: Send + Sync + 'static {
    fn now_ms(&self) -> i64;
}

/// Wall clock, milliseconds since the Unix epoch.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("stream connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Resolve the stream endpoint from the serving origin. The socket scheme
/// follows the page's transport security: https origins get wss, everything
/// else ws. Already-socket-schemed origins pass through.
pub fn stream_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    let ws_base = if base.starts_with("https://") {
        base.replacen("https://", "wss://", 1)
    } else if base.starts_with("http://") {
        base.replacen("http://", "ws://", 1)
    } else if base.starts_with("wss://") || base.starts_with("ws://") {
        base.to_string()
    } else {
        format!("ws://{base}")
    };
    format!("{ws_base}{STREAM_PATH}")
}

/// One live telemetry session: owns the connection, the session state, and the
/// read loop feeding it. Created connected; dropped or closed, the read loop
/// is aborted so no late callback can mutate a torn-down session.
pub struct SensorSession {
    state: Arc<Mutex<SessionState>>,
    watch_tx: watch::Sender<SessionSnapshot>,
    reader: JoinHandle<()>,
    /// Teardown flag shared with the read loop. `abort()` alone only lands at
    /// the next await point, so a frame already read could still mutate the
    /// session; the reader re-checks this under the state lock instead.
    closed: Arc<AtomicBool>,
}

impl SensorSession {
    /// Connect to the sensor stream at `base` (an http(s) or ws(s) origin)
    /// using the system clock.
    pub async fn connect(base: &str) -> Result<Self, SessionError> {
        Self::connect_with_clock(base, Arc::new(SystemClock)).await
    }

    pub async fn connect_with_clock(
        base: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SessionError> {
        let url = stream_url(base);
        log::info!("connecting to {url}");

        let state = Arc::new(Mutex::new(SessionState::new()));
        let (watch_tx, _) = watch::channel(SessionSnapshot {
            connection: ConnectionState::Connecting,
            view: DerivedView::default(),
        });

        let (ws_stream, _) = connect_async(url.as_str()).await?;
        log::info!("stream open");
        watch_tx.send_replace(SessionSnapshot {
            connection: ConnectionState::Connected,
            view: DerivedView::default(),
        });

        let closed = Arc::new(AtomicBool::new(false));
        let reader = {
            let state = state.clone();
            let watch_tx = watch_tx.clone();
            let closed = closed.clone();
            tokio::spawn(async move {
                // The client never sends; only the read half is driven.
                let (_write, mut read) = ws_stream.split();

                while let Some(item) = read.next().await {
                    let msg = match item {
                        Ok(m) => m,
                        Err(e) => {
                            log::warn!("stream read error: {e}");
                            break;
                        }
                    };

                    if let Message::Text(text) = msg {
                        let now_ms = clock.now_ms();
                        let Ok(mut st) = state.lock() else { break };
                        // Teardown wins: a frame in flight when close() flags
                        // the session must not land.
                        if closed.load(Ordering::Acquire) {
                            break;
                        }
                        if st.ingest(&text, now_ms) {
                            watch_tx.send_replace(SessionSnapshot {
                                connection: ConnectionState::Connected,
                                view: st.derived().clone(),
                            });
                        }
                    }
                }

                // Connection gone. Keep the last-known data visible rather
                // than blanking the view. After close() the final snapshot
                // has already been published; do not overwrite it.
                log::info!("stream closed");
                if let Ok(st) = state.lock() {
                    if !closed.load(Ordering::Acquire) {
                        watch_tx.send_replace(SessionSnapshot {
                            connection: ConnectionState::Disconnected,
                            view: st.derived().clone(),
                        });
                    }
                }
            })
        };

        Ok(Self {
            state,
            watch_tx,
            reader,
            closed,
        })
    }

    /// Subscribe to snapshot updates. Receivers observe every state change in
    /// order of application (the renderer may still coalesce redraws on its
    /// side).
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.watch_tx.subscribe()
    }

    /// The current snapshot, copied out.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.watch_tx.borrow().clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.watch_tx.borrow().connection
    }

    /// Current display configuration, copied out.
    pub fn config(&self) -> crate::config::DisplayConfig {
        self.state.lock().map(|st| *st.config()).unwrap_or_default()
    }

    pub fn set_unit(&self, unit: Unit) {
        self.update(|st| st.set_unit(unit));
    }

    pub fn set_alarm_mode(&self, mode: AlarmMode) {
        self.update(|st| st.set_alarm_mode(mode));
    }

    pub fn set_alarm_threshold(&self, threshold: Option<f64>) {
        self.update(|st| st.set_alarm_threshold(threshold));
    }

    pub fn set_alarm_threshold_input(&self, raw: &str) {
        self.update(|st| st.set_alarm_threshold_input(raw));
    }

    fn update(&self, apply: impl FnOnce(&mut SessionState)) {
        let Ok(mut st) = self.state.lock() else {
            return;
        };
        apply(&mut st);
        let view = st.derived().clone();
        drop(st);

        let connection = self.watch_tx.borrow().connection;
        self.watch_tx.send_replace(SessionSnapshot { connection, view });
    }

    /// Tear the session down. No further buffer mutation can land afterwards:
    /// the teardown flag is set while holding the state lock, so a frame
    /// mid-ingestion either completed before the final snapshot below or gets
    /// dropped by the reader's own flag check. The last-known view stays
    /// available through [`SensorSession::snapshot`].
    pub fn close(&mut self) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }

        let view = match self.state.lock() {
            Ok(st) => {
                self.closed.store(true, Ordering::Release);
                st.derived().clone()
            }
            Err(_) => {
                self.closed.store(true, Ordering::Release);
                DerivedView::default()
            }
        };
        self.watch_tx.send_replace(SessionSnapshot {
            connection: ConnectionState::Disconnected,
            view,
        });
        self.reader.abort();
    }
}

impl Drop for SensorSession {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Release);
        self.reader.abort();
    }
}
