//! Classification of raw SignalR text frames.
//!
//! Two wrapper shapes are recognized. A change wrapper carries a change-set
//! id `C` and an array `M` of hub invocations; each invocation targeting
//! hub `Streaming`, method `feed`, with exactly three arguments is a topic
//! update (`A[0]` topic name, `A[1]` payload, `A[2]` timestamp). A
//! reference wrapper carries the invocation id `I` and an object `R` whose
//! properties are topic-named payloads. Everything else is noise the server
//! is allowed to send (keep-alives, group acks) and is dropped.

use serde::Deserialize;
use serde_json::Value;

/// One topic update extracted from a frame: the topic name and its payload.
#[derive(Debug)]
pub(crate) struct TopicUpdate {
    pub topic: String,
    pub payload: Value,
}

/// A classified inbound frame.
#[derive(Debug)]
pub(crate) enum Frame {
    /// Incremental delta carrying one or more topic updates.
    Change(Vec<TopicUpdate>),
    /// The once-per-connection snapshot of all subscribed topics.
    Reference(Vec<TopicUpdate>),
    /// Anything else; logged at debug level and dropped.
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ChangeWrapper {
    #[serde(rename = "C", default)]
    change_set_id: String,
    #[serde(rename = "M", default)]
    messages: Vec<HubInvocation>,
}

#[derive(Debug, Deserialize)]
struct HubInvocation {
    #[serde(rename = "H", default)]
    hub: String,
    #[serde(rename = "M", default)]
    method: String,
    #[serde(rename = "A", default)]
    arguments: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ReferenceWrapper {
    #[serde(rename = "R")]
    reference: Value,
    #[serde(rename = "I")]
    invocation_id: String,
}

/// Classifies a raw text frame. Change wrappers are tried first: there is
/// one reference message per connection but tens of thousands of change
/// messages over a session.
pub(crate) fn classify(raw: &str) -> Frame {
    if let Ok(change) = serde_json::from_str::<ChangeWrapper>(raw) {
        if !change.change_set_id.is_empty() && !change.messages.is_empty() {
            let updates = change
                .messages
                .into_iter()
                .filter(|m| m.hub == "Streaming" && m.method == "feed" && m.arguments.len() == 3)
                .filter_map(|mut m| {
                    let payload = m.arguments.swap_remove(1);
                    match m.arguments.into_iter().next() {
                        Some(Value::String(topic)) => Some(TopicUpdate { topic, payload }),
                        _ => None,
                    }
                })
                .collect();
            return Frame::Change(updates);
        }
    }

    if let Ok(reference) = serde_json::from_str::<ReferenceWrapper>(raw) {
        if !reference.invocation_id.is_empty() {
            if let Value::Object(topics) = reference.reference {
                let updates = topics
                    .into_iter()
                    .map(|(topic, payload)| TopicUpdate { topic, payload })
                    .collect();
                return Frame::Reference(updates);
            }
        }
    }

    Frame::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_change_frames() {
        let raw = r#"{"C":"d-4A,0|B,1","M":[{"H":"Streaming","M":"feed","A":["LapCount",{"CurrentLap":12},"2024-12-08T13:10:00Z"]}]}"#;
        match classify(raw) {
            Frame::Change(updates) => {
                assert_eq!(updates.len(), 1);
                assert_eq!(updates[0].topic, "LapCount");
                assert_eq!(updates[0].payload["CurrentLap"], 12);
            }
            other => panic!("expected change frame, got {other:?}"),
        }
    }

    #[test]
    fn skips_foreign_hub_entries() {
        let raw = r#"{"C":"d-4A,0","M":[
            {"H":"Other","M":"feed","A":["LapCount",{},"t"]},
            {"H":"Streaming","M":"ping","A":["LapCount",{},"t"]},
            {"H":"Streaming","M":"feed","A":["LapCount",{}]}
        ]}"#;
        match classify(raw) {
            Frame::Change(updates) => assert!(updates.is_empty()),
            other => panic!("expected change frame, got {other:?}"),
        }
    }

    #[test]
    fn classifies_reference_frames() {
        let raw = r#"{"R":{"LapCount":{"CurrentLap":1,"TotalLaps":58},"Heartbeat":{"Utc":"2024-12-08T13:00:00Z"}},"I":"1"}"#;
        match classify(raw) {
            Frame::Reference(updates) => {
                assert_eq!(updates.len(), 2);
                assert!(updates.iter().any(|u| u.topic == "LapCount"));
            }
            other => panic!("expected reference frame, got {other:?}"),
        }
    }

    #[test]
    fn unknown_frames_are_tolerated() {
        assert!(matches!(classify("{}"), Frame::Unknown));
        assert!(matches!(classify(r#"{"S":1,"M":[]}"#), Frame::Unknown));
        assert!(matches!(classify("not json"), Frame::Unknown));
        // keep-alive frames carry C but no messages
        assert!(matches!(classify(r#"{"C":"d-4A,0","M":[]}"#), Frame::Unknown));
    }
}
