//! `LapCount` topic: lead lap and planned total (races only).

use serde::Deserialize;

use super::lenient;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LapCount {
    #[serde(rename = "CurrentLap", deserialize_with = "lenient")]
    pub current_lap: Option<i64>,
    #[serde(rename = "TotalLaps", deserialize_with = "lenient")]
    pub total_laps: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_updates_leave_fields_absent() {
        let lc: LapCount = serde_json::from_str(r#"{"CurrentLap": 12}"#).unwrap();
        assert_eq!(lc.current_lap, Some(12));
        assert_eq!(lc.total_laps, None);
    }
}
