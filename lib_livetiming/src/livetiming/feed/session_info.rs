//! `SessionInfo` topic: intrinsic data about the weekend event and the
//! active session. Arrives with the reference message and rarely changes.

use serde::Deserialize;

use super::lenient;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SessionInfo {
    #[serde(rename = "Meeting", deserialize_with = "lenient")]
    pub meeting: MeetingInfo,
    #[serde(rename = "Type", deserialize_with = "lenient")]
    pub session_type: Option<String>,
    #[serde(rename = "Name", deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "StartDate", deserialize_with = "lenient")]
    pub start_date: Option<String>,
    #[serde(rename = "EndDate", deserialize_with = "lenient")]
    pub end_date: Option<String>,
    /// Track-local offset from GMT, e.g. `04:00:00` or `-05:00:00`.
    #[serde(rename = "GmtOffset", alias = "GMTOffset", deserialize_with = "lenient")]
    pub gmt_offset: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MeetingInfo {
    #[serde(rename = "Name", deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "OfficialName", deserialize_with = "lenient")]
    pub official_name: Option<String>,
    #[serde(rename = "Location", deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(rename = "Number", deserialize_with = "lenient")]
    pub number: Option<i64>,
    #[serde(rename = "Country", deserialize_with = "lenient")]
    pub country: CountryInfo,
    #[serde(rename = "Circuit", deserialize_with = "lenient")]
    pub circuit: CircuitInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CountryInfo {
    #[serde(rename = "Code", deserialize_with = "lenient")]
    pub code: Option<String>,
    #[serde(rename = "Name", deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CircuitInfo {
    #[serde(rename = "ShortName", deserialize_with = "lenient")]
    pub short_name: Option<String>,
}
