//! `SessionData` topic: session and track status transitions, plus the
//! qualifying part counter. Both series arrive as a list in the reference
//! message and as an index-keyed map in change messages.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{indexed_map, lenient};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SessionData {
    #[serde(rename = "Series", deserialize_with = "indexed_map")]
    pub series: BTreeMap<String, SeriesEntry>,
    #[serde(rename = "StatusSeries", deserialize_with = "indexed_map")]
    pub status_series: BTreeMap<String, StatusSeriesEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SeriesEntry {
    #[serde(rename = "QualifyingPart", deserialize_with = "lenient")]
    pub qualifying_part: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct StatusSeriesEntry {
    #[serde(rename = "SessionStatus", deserialize_with = "lenient")]
    pub session_status: Option<String>,
    #[serde(rename = "TrackStatus", deserialize_with = "lenient")]
    pub track_status: Option<String>,
}
