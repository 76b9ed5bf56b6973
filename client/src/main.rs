// Headless monitor: connects to a sensor stream and prints each derived
// snapshot. Stands in for the dashboard view layer.
//
// Usage: rangestation_client [BASE_URL] [cm|in] [THRESHOLD] [greater|less]

use anyhow::Result;
use rangestation_client::{AlarmMode, ConnectionState, SensorSession, Unit};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let base = args
        .next()
        .unwrap_or_else(|| "http://localhost:3000".to_string());

    let mut session = SensorSession::connect(&base).await?;

    if let Some(unit) = args.next() {
        match unit.parse::<Unit>() {
            Ok(unit) => session.set_unit(unit),
            Err(()) => eprintln!("unknown unit {unit:?}, expected cm or in"),
        }
    }
    if let Some(threshold) = args.next() {
        session.set_alarm_threshold_input(&threshold);
    }
    if let Some(mode) = args.next() {
        let mode = match mode.as_str() {
            "less" => AlarmMode::BelowThreshold,
            _ => AlarmMode::AboveThreshold,
        };
        session.set_alarm_mode(mode);
    }

    let unit = session.config().unit;
    let mut rx = session.subscribe();
    loop {
        if rx.changed().await.is_err() {
            break;
        }
        let snap = rx.borrow_and_update().clone();

        match snap.view.latest_display_value {
            Some(v) => {
                let alarm = if snap.view.alarm_triggered {
                    "  ⚠ threshold triggered"
                } else {
                    ""
                };
                println!("{v:.1} {unit}{alarm}");
            }
            None => println!("waiting for data..."),
        }

        if snap.connection == ConnectionState::Disconnected {
            println!("stream ended; last-known values retained");
            break;
        }
    }

    session.close();
    Ok(())
}
