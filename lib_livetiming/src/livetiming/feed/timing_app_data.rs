//! `TimingAppData` topic: per-driver stint information (tire compound,
//! stint length) and occasionally a position update.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::{driver_map, indexed_map, lenient};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TimingAppData {
    #[serde(rename = "Lines", deserialize_with = "driver_map")]
    pub lines: HashMap<String, DriverStints>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DriverStints {
    #[serde(rename = "Line", deserialize_with = "lenient")]
    pub line: Option<i64>,
    /// Stints keyed by stint number; list-shaped in the reference message.
    #[serde(rename = "Stints", deserialize_with = "indexed_map")]
    pub stints: BTreeMap<String, Stint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Stint {
    #[serde(rename = "Compound", deserialize_with = "lenient")]
    pub compound: Option<String>,
    /// Laps run on this set of tires, including laps from prior sessions.
    #[serde(rename = "TotalLaps", deserialize_with = "lenient")]
    pub total_laps: Option<i64>,
}
