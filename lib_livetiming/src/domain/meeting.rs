//! The race weekend event and its currently active session.

use chrono::{DateTime, Utc};

/// The kind of session being run within a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionType {
    Test,
    Practice,
    Qualifying,
    Race,
    #[default]
    Unknown,
}

impl SessionType {
    pub fn from_feed(s: &str) -> Self {
        match s {
            "Test" => SessionType::Test,
            "Practice" => SessionType::Practice,
            "Qualifying" => SessionType::Qualifying,
            "Race" => SessionType::Race,
            _ => SessionType::Unknown,
        }
    }
}

/// Lifecycle of the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Pending,
    Started,
    Ended,
}

/// A specific session within a meeting, e.g. Practice 1, Qualifying, Race.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_type: SessionType,
    /// Display name of the session, e.g. "Practice 1", "Race".
    pub name: String,
    pub status: SessionStatus,
    /// Session start in UTC; `None` until a parseable date has arrived.
    pub start_date: Option<DateTime<Utc>>,
    /// Session end in UTC; stays `None` until announced by the feed.
    pub end_date: Option<DateTime<Utc>>,
    /// Track-timezone delta with UTC, normalized to `±HHMM`.
    pub gmt_offset: String,
    /// Racing number of the driver holding the fastest lap of the session.
    pub fastest_lap_owner: String,
    pub fastest_lap_time: String,
    /// Racing number of the fastest driver in each of the three sectors.
    pub fastest_sector_owners: [String; 3],
    /// Current lead lap (races only).
    pub current_lap: u32,
    /// Planned total laps (races only).
    pub total_laps: u32,
    /// Index of the current part of a multi-part session (qualifying only).
    pub part: u32,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            session_type: SessionType::Unknown,
            name: String::new(),
            status: SessionStatus::Pending,
            start_date: None,
            end_date: None,
            gmt_offset: "+0000".to_string(),
            fastest_lap_owner: String::new(),
            fastest_lap_time: String::new(),
            fastest_sector_owners: Default::default(),
            current_lap: 0,
            total_laps: 0,
            part: 0,
        }
    }
}

/// The race weekend event. Only the currently active session is represented;
/// prior sessions of the same weekend are not retained.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Meeting {
    /// Informal event name, e.g. "Abu Dhabi Grand Prix".
    pub name: String,
    /// Official name including the title sponsor.
    pub full_name: String,
    pub location: String,
    /// Sequence number of the event within the season.
    pub round_number: u32,
    /// 2-3 letter country code.
    pub country_code: String,
    pub country_name: String,
    pub circuit_short_name: String,
    pub session: Session,
}
