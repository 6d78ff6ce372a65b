//! Typed decode records for the subscribed topics.
//!
//! Every scalar in a change payload is optional: absence means "leave the
//! previous state alone", so each record models its fields as `Option<T>`
//! and the merge layer only overwrites on `Some`.
//!
//! Two feed quirks are normalized here so downstream code sees one shape:
//!
//! - Ordered collections arrive as a JSON **list** in the reference message
//!   but as a **map keyed by stringified indices** in change messages
//!   (`Sectors`, `Segments`, `Stints`, `Stats`, `BestLapTimes`, `Series`,
//!   `StatusSeries`). [`indexed_map`] accepts both and always yields the
//!   map form.
//! - Maps keyed by driver number occasionally carry auxiliary keys such as
//!   `_kf`; [`driver_map`] keeps only keys that parse as integers.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) mod driver_list;
pub(crate) mod lap_count;
pub(crate) mod race_ctrl;
pub(crate) mod session_data;
pub(crate) mod session_info;
pub(crate) mod timing_app_data;
pub(crate) mod timing_data;

/// Decodes a value, falling back to the type's default when the field
/// arrives with an unexpected shape. The feed evolves ahead of its clients;
/// a malformed field must read as absent, never fail the frame.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(T::deserialize(deserializer).unwrap_or_default())
}

/// Normalizes an indexed collection (list in reference messages, map with
/// stringified-integer keys in change messages) into the map form. Entries
/// that fail to decode are skipped, which also disposes of auxiliary
/// properties like `_kf`.
pub(crate) fn indexed_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_indexed(value))
}

pub(crate) fn normalize_indexed<T: DeserializeOwned>(value: Value) -> BTreeMap<String, T> {
    let mut map = BTreeMap::new();
    match value {
        Value::Object(entries) => {
            for (key, entry) in entries {
                if let Ok(decoded) = serde_json::from_value(entry) {
                    map.insert(key, decoded);
                }
            }
        }
        Value::Array(entries) => {
            for (index, entry) in entries.into_iter().enumerate() {
                if let Ok(decoded) = serde_json::from_value(entry) {
                    map.insert(index.to_string(), decoded);
                }
            }
        }
        _ => {}
    }
    map
}

/// Decodes a map keyed by driver number, dropping keys that do not parse as
/// integers (the feed injects `_kf` and similar bookkeeping keys next to
/// driver entries) and entries that fail to decode.
pub(crate) fn driver_map<'de, D, T>(deserializer: D) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_drivers(value))
}

pub(crate) fn normalize_drivers<T: DeserializeOwned>(value: Value) -> HashMap<String, T> {
    let mut map = HashMap::new();
    if let Value::Object(entries) = value {
        for (key, entry) in entries {
            if key.parse::<u32>().is_err() {
                continue;
            }
            if let Ok(decoded) = serde_json::from_value(entry) {
                map.insert(key, decoded);
            }
        }
    }
    map
}

/// The server heartbeat. Carries only the emission timestamp; its arrival
/// is itself the signal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Heartbeat {
    #[serde(rename = "Utc", deserialize_with = "lenient")]
    pub utc: Option<String>,
}
