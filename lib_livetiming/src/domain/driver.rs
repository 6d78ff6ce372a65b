//! Per-driver state: intrinsic data (name, team) plus live timing data
//! (position, gaps, laps, sectors, tires).

use std::collections::BTreeMap;

/// One of the official tire compounds used across a race weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TireCompound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    /// Unmarked test tires; the feed labels these `TEST` or `PROTOTYPE`.
    Test,
    #[default]
    Unknown,
}

impl TireCompound {
    /// Maps the feed's compound string to its canonical variant. Anything
    /// unrecognized collapses to `Unknown`.
    pub fn from_feed(s: &str) -> Self {
        match s {
            "SOFT" => TireCompound::Soft,
            "MEDIUM" => TireCompound::Medium,
            "HARD" => TireCompound::Hard,
            "INTERMEDIATE" => TireCompound::Intermediate,
            "WET" => TireCompound::Wet,
            "TEST" | "PROTOTYPE" => TireCompound::Test,
            _ => TireCompound::Unknown,
        }
    }
}

/// Display status of one mini-sector on the timing board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentStatus {
    #[default]
    Inactive,
    /// Completed, slower than the driver's personal best (yellow).
    NotPersonalBest,
    /// Personal best (green).
    PersonalBest,
    /// Overall best across the field (purple).
    OverallBest,
}

impl SegmentStatus {
    /// Decodes the feed's numeric segment status. Codes outside the known
    /// set return `None` and leave the previous status in place.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            2048 => Some(SegmentStatus::NotPersonalBest),
            2049 => Some(SegmentStatus::PersonalBest),
            2051 => Some(SegmentStatus::OverallBest),
            2064 => Some(SegmentStatus::Inactive), // pit lane
            _ => None,
        }
    }
}

/// Timing for one of the three track sectors on the current lap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sector {
    pub time: String,
    pub is_personal_best: bool,
    pub is_overall_best: bool,
    /// True once a time has been posted for this sector on the current lap.
    pub is_active: bool,
    /// Mini-sector statuses keyed by segment index.
    pub segments: BTreeMap<u32, SegmentStatus>,
}

/// The most recently completed lap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LastLap {
    pub time: String,
    pub is_personal_best: bool,
}

/// A driver entry on the timing board, keyed by racing number. Created on
/// first observation and mutated in place for the rest of the session; a
/// session boundary never deletes drivers.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    /// The unique racing number on the car; the primary key for the driver.
    pub number: String,
    /// The three-letter abbreviation used on the broadcast (e.g. `VER`).
    pub short_name: String,
    /// Full name, ordered per the feed's `NameFormat` rule.
    pub name: String,
    pub team_name: String,
    /// Primary team color as a `#`-prefixed hex string.
    pub team_color: String,

    /// Position on the timing board; 0 until known.
    pub position: u32,
    /// Gap to the car ahead, as formatted by the feed (e.g. `+0.420`).
    pub interval_gap: String,
    /// Gap to the leader (or to the fastest lap in qualifying).
    pub leader_gap: String,
    pub last_lap: LastLap,
    pub best_lap_time: String,
    /// Best lap per qualifying part (Q1/Q2/Q3).
    pub best_lap_times: [String; 3],

    pub tire_compound: TireCompound,
    /// Laps run on the current set of tires.
    pub tire_lap_count: u32,
    pub is_in_pit: bool,
    /// True while the current lap is an out-lap.
    pub is_pit_out: bool,

    pub sectors: [Sector; 3],

    pub number_of_laps: u32,
    /// Out of the session due to crash, mechanical failure, etc. Once set,
    /// the flag stays set for the rest of the session.
    pub is_retired: bool,
    /// Eliminated in an earlier qualifying part.
    pub is_knocked_out: bool,
    pub show_position: bool,
}

impl Driver {
    /// Returns a driver with safe defaults: fixed-capacity sector and
    /// qualifying-best slots so merge code can index them without bounds
    /// churn, and an `Unknown` compound until a stint is observed.
    pub fn new(number: impl Into<String>) -> Self {
        Driver {
            number: number.into(),
            short_name: String::new(),
            name: String::new(),
            team_name: String::new(),
            team_color: String::new(),
            position: 0,
            interval_gap: String::new(),
            leader_gap: String::new(),
            last_lap: LastLap::default(),
            best_lap_time: String::new(),
            best_lap_times: Default::default(),
            tire_compound: TireCompound::Unknown,
            tire_lap_count: 0,
            is_in_pit: false,
            is_pit_out: false,
            sectors: Default::default(),
            number_of_laps: 0,
            is_retired: false,
            is_knocked_out: false,
            show_position: true,
        }
    }
}
