//! `RaceControlMessages` topic: stewarding notices, flags and safety-car
//! deployments. The reference message carries the full history as a list;
//! change messages append under index keys.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{indexed_map, lenient};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RaceCtrlMsgs {
    #[serde(rename = "Messages", deserialize_with = "indexed_map")]
    pub messages: BTreeMap<String, RaceCtrlEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RaceCtrlEntry {
    #[serde(rename = "Category", deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(rename = "Flag", deserialize_with = "lenient")]
    pub flag: Option<String>,
    #[serde(rename = "Mode", deserialize_with = "lenient")]
    pub mode: Option<String>,
    #[serde(rename = "Message", deserialize_with = "lenient")]
    pub message: Option<String>,
}
