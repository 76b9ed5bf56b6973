use serde::{Deserialize, Serialize};

/// Number of readings kept, on both the sensor side and in the client buffer.
pub const BUFFER_CAPACITY: usize = 100;

/// Fixed sample rate the sensor emits at. The client assumes this rate when
/// reconstructing capture times from a snapshot.
pub const SAMPLE_RATE_HZ: u32 = 10;

/// Interval between consecutive readings, in milliseconds.
pub const SAMPLE_INTERVAL_MS: i64 = 1000 / SAMPLE_RATE_HZ as i64;

/// Well-known path of the live stream endpoint, on the serving origin.
pub const STREAM_PATH: &str = "/ws";

/// Messages carried over the live stream, JSON-encoded. Magnitudes are always
/// centimeters. This is what both ends serialize/deserialize:
///   { "event": "data",   "data": [98.2, 97.9, ...] }
///   { "event": "update", "data": 98.4 }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum SensorMessage {
    /// Full history resync, oldest reading first. Sent on every connect so a
    /// client never has to ask for backlog.
    #[serde(rename = "data")]
    Snapshot(Vec<f64>),
    /// One new reading appended to the history.
    #[serde(rename = "update")]
    Reading(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_wire_shape() {
        let msg = SensorMessage::Snapshot(vec![30.0, 31.0, 32.0]);
        let text = serde_json::to_string(&msg).expect("serialize");
        assert_eq!(text, r#"{"event":"data","data":[30.0,31.0,32.0]}"#);
        assert_eq!(serde_json::from_str::<SensorMessage>(&text).unwrap(), msg);
    }

    #[test]
    fn reading_wire_shape() {
        let msg = SensorMessage::Reading(98.4);
        let text = serde_json::to_string(&msg).expect("serialize");
        assert_eq!(text, r#"{"event":"update","data":98.4}"#);
        assert_eq!(serde_json::from_str::<SensorMessage>(&text).unwrap(), msg);
    }

    #[test]
    fn reading_accepts_integer_payload() {
        let msg: SensorMessage = serde_json::from_str(r#"{"event":"update","data":33}"#).unwrap();
        assert_eq!(msg, SensorMessage::Reading(33.0));
    }

    #[test]
    fn malformed_shapes_do_not_parse() {
        // missing payload
        assert!(serde_json::from_str::<SensorMessage>(r#"{"event":"data"}"#).is_err());
        // unknown event kind
        assert!(serde_json::from_str::<SensorMessage>(r#"{"event":"ping","data":1}"#).is_err());
        // payload of the wrong type
        assert!(serde_json::from_str::<SensorMessage>(r#"{"event":"update","data":"33"}"#).is_err());
        // not JSON at all
        assert!(serde_json::from_str::<SensorMessage>("distance=33").is_err());
    }
}
