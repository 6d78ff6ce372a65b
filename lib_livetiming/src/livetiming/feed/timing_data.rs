//! `TimingData` topic: the dense per-driver stream of lap times, gaps,
//! sector/segment states and session flags. This is by far the busiest
//! topic on the wire.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::{driver_map, indexed_map, lenient};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TimingData {
    #[serde(rename = "Lines", deserialize_with = "driver_map")]
    pub lines: HashMap<String, DriverTiming>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DriverTiming {
    #[serde(rename = "Line", deserialize_with = "lenient")]
    pub line: Option<i64>,
    #[serde(rename = "ShowPosition", deserialize_with = "lenient")]
    pub show_position: Option<bool>,
    #[serde(rename = "GapToLeader", deserialize_with = "lenient")]
    pub gap_to_leader: Option<String>,
    #[serde(rename = "IntervalToPositionAhead", deserialize_with = "lenient")]
    pub interval_to_position_ahead: Interval,
    #[serde(rename = "LastLapTime", deserialize_with = "lenient")]
    pub last_lap_time: LapTime,
    #[serde(rename = "BestLapTime", deserialize_with = "lenient")]
    pub best_lap_time: LapTime,
    #[serde(rename = "NumberOfLaps", deserialize_with = "lenient")]
    pub number_of_laps: Option<i64>,
    #[serde(rename = "InPit", deserialize_with = "lenient")]
    pub in_pit: Option<bool>,
    #[serde(rename = "PitOut", deserialize_with = "lenient")]
    pub pit_out: Option<bool>,
    #[serde(rename = "Retired", deserialize_with = "lenient")]
    pub retired: Option<bool>,
    #[serde(rename = "KnockedOut", deserialize_with = "lenient")]
    pub knocked_out: Option<bool>,
    /// Bit-packed driver status; specific values mark retirements.
    #[serde(rename = "Status", deserialize_with = "lenient")]
    pub status: Option<i64>,
    #[serde(rename = "Sectors", deserialize_with = "indexed_map")]
    pub sectors: BTreeMap<String, SectorTiming>,
    /// Per-qualifying-part gap statistics.
    #[serde(rename = "Stats", deserialize_with = "indexed_map")]
    pub stats: BTreeMap<String, QualifyingStat>,
    /// Per-qualifying-part best laps.
    #[serde(rename = "BestLapTimes", deserialize_with = "indexed_map")]
    pub best_lap_times: BTreeMap<String, LapTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Interval {
    #[serde(rename = "Value", deserialize_with = "lenient")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LapTime {
    #[serde(rename = "Value", deserialize_with = "lenient")]
    pub value: Option<String>,
    #[serde(rename = "PersonalFastest", deserialize_with = "lenient")]
    pub personal_fastest: Option<bool>,
    #[serde(rename = "OverallFastest", deserialize_with = "lenient")]
    pub overall_fastest: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SectorTiming {
    #[serde(rename = "Value", deserialize_with = "lenient")]
    pub value: Option<String>,
    #[serde(rename = "PersonalFastest", deserialize_with = "lenient")]
    pub personal_fastest: Option<bool>,
    #[serde(rename = "OverallFastest", deserialize_with = "lenient")]
    pub overall_fastest: Option<bool>,
    #[serde(rename = "Segments", deserialize_with = "indexed_map")]
    pub segments: BTreeMap<String, SegmentTiming>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SegmentTiming {
    #[serde(rename = "Status", deserialize_with = "lenient")]
    pub status: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct QualifyingStat {
    #[serde(rename = "TimeDiffToFastest", deserialize_with = "lenient")]
    pub time_diff_to_fastest: Option<String>,
    #[serde(rename = "TimeDiffToPositionAhead", deserialize_with = "lenient")]
    pub time_diff_to_position_ahead: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_sectors_and_segments_are_list_shaped() {
        let raw = r#"{"Lines": {"81": {
            "Line": 9,
            "Sectors": [
                {"Value": "26.259", "PersonalFastest": true, "Segments": [{"Status": 2049}, {"Status": 2048}]},
                {"Value": "31.110", "Segments": [{"Status": 2048}]},
                {"Value": "23.146", "Segments": []}
            ]
        }}}"#;
        let td: TimingData = serde_json::from_str(raw).unwrap();
        let line = &td.lines["81"];
        assert_eq!(line.line, Some(9));
        assert_eq!(line.sectors.len(), 3);
        assert_eq!(line.sectors["0"].value.as_deref(), Some("26.259"));
        assert_eq!(line.sectors["0"].segments["0"].status, Some(2049));
        assert_eq!(line.sectors["0"].segments["1"].status, Some(2048));
    }

    #[test]
    fn change_sectors_are_map_shaped() {
        let raw = r#"{"Lines": {"44": {
            "Sectors": {"1": {"Segments": {"3": {"Status": 2051}}}}
        }}}"#;
        let td: TimingData = serde_json::from_str(raw).unwrap();
        let line = &td.lines["44"];
        assert_eq!(line.sectors["1"].segments["3"].status, Some(2051));
        assert!(line.line.is_none());
    }

    #[test]
    fn qualifying_stats_and_best_laps_decode_both_shapes() {
        let reference = r#"{"Lines": {"27": {
            "Stats": [{"TimeDiffToFastest": "+0.354", "TimeDiffToPositionAhead": "+0.041"}],
            "BestLapTimes": [{"Value": "1:23.640", "Lap": 5}]
        }}}"#;
        let change = r#"{"Lines": {"27": {
            "Stats": {"1": {"TimeDiffToFastest": "+0.420", "TimeDiffToPositionAhead": "+0.040"}}
        }}}"#;

        let r: TimingData = serde_json::from_str(reference).unwrap();
        assert_eq!(r.lines["27"].stats["0"].time_diff_to_fastest.as_deref(), Some("+0.354"));
        assert_eq!(r.lines["27"].best_lap_times["0"].value.as_deref(), Some("1:23.640"));

        let c: TimingData = serde_json::from_str(change).unwrap();
        assert_eq!(c.lines["27"].stats["1"].time_diff_to_position_ahead.as_deref(), Some("+0.040"));
    }

    #[test]
    fn malformed_interval_reads_as_absent() {
        // the feed occasionally sends an empty string where an object is expected
        let raw = r#"{"Lines": {"10": {"IntervalToPositionAhead": "", "Line": 7}}}"#;
        let td: TimingData = serde_json::from_str(raw).unwrap();
        assert_eq!(td.lines["10"].line, Some(7));
        assert!(td.lines["10"].interval_to_position_ahead.value.is_none());
    }
}
