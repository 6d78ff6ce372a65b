//! `DriverList` topic: intrinsic data per driver, keyed by racing number.

use serde::Deserialize;

use super::lenient;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DriverEntry {
    /// Three-letter broadcast abbreviation.
    #[serde(rename = "Tla", deserialize_with = "lenient")]
    pub tla: Option<String>,
    #[serde(rename = "FirstName", deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(rename = "LastName", deserialize_with = "lenient")]
    pub last_name: Option<String>,
    /// `LastNameIsPrimary` flips the composed name to "Last First".
    #[serde(rename = "NameFormat", deserialize_with = "lenient")]
    pub name_format: Option<String>,
    #[serde(rename = "TeamName", deserialize_with = "lenient")]
    pub team_name: Option<String>,
    /// Hex color without the leading `#`.
    #[serde(rename = "TeamColour", deserialize_with = "lenient")]
    pub team_colour: Option<String>,
    #[serde(rename = "Line", deserialize_with = "lenient")]
    pub line: Option<i64>,
}
