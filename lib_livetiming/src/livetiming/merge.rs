//! Applies decoded topic records to the session store.
//!
//! Every rule here is an overwrite-on-present: change payloads omit
//! anything that did not change, so absent fields leave prior state alone.
//! Each apply function reports which slices of state it touched so the
//! publisher can fan out exactly once per inbound frame.

use std::ops::BitOrAssign;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{
    Driver, RaceCtrlMsg, Sector, SegmentStatus, Session, SessionStatus, SessionType, TireCompound,
};
use crate::livetiming::feed::driver_list::DriverEntry;
use crate::livetiming::feed::lap_count::LapCount;
use crate::livetiming::feed::race_ctrl::RaceCtrlMsgs;
use crate::livetiming::feed::session_data::SessionData;
use crate::livetiming::feed::session_info::SessionInfo;
use crate::livetiming::feed::timing_app_data::TimingAppData;
use crate::livetiming::feed::timing_data::{DriverTiming, TimingData};
use crate::livetiming::feed::{normalize_drivers, Heartbeat};
use crate::livetiming::store::SessionStore;

/// Which consumer channels a merge invalidated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Dirty {
    pub meeting: bool,
    pub drivers: bool,
    pub race_ctrl: bool,
}

impl Dirty {
    pub const ALL: Dirty = Dirty { meeting: true, drivers: true, race_ctrl: true };

    const MEETING: Dirty = Dirty { meeting: true, drivers: false, race_ctrl: false };
    const DRIVERS: Dirty = Dirty { meeting: false, drivers: true, race_ctrl: false };
    const RACE_CTRL: Dirty = Dirty { meeting: false, drivers: false, race_ctrl: true };
    const NONE: Dirty = Dirty { meeting: false, drivers: false, race_ctrl: false };
}

impl BitOrAssign for Dirty {
    fn bitor_assign(&mut self, rhs: Dirty) {
        self.meeting |= rhs.meeting;
        self.drivers |= rhs.drivers;
        self.race_ctrl |= rhs.race_ctrl;
    }
}

/// Decodes and applies one topic payload. A payload that fails to decode is
/// logged and dropped; the connection must survive feed evolution.
pub(crate) fn apply_topic(store: &mut SessionStore, topic: &str, payload: Value) -> Dirty {
    match topic {
        "SessionInfo" => decode(payload).map_or(Dirty::NONE, |rec| apply_session_info(store, rec)),
        "SessionData" => decode(payload).map_or(Dirty::NONE, |rec| apply_session_data(store, rec)),
        "DriverList" => apply_driver_list(store, normalize_drivers(payload)),
        "TimingData" => decode(payload).map_or(Dirty::NONE, |rec| apply_timing_data(store, rec)),
        "TimingAppData" => {
            decode(payload).map_or(Dirty::NONE, |rec| apply_timing_app_data(store, rec))
        }
        "LapCount" => decode(payload).map_or(Dirty::NONE, |rec| apply_lap_count(store, rec)),
        "RaceControlMessages" => {
            decode(payload).map_or(Dirty::NONE, |rec| apply_race_ctrl(store, rec))
        }
        "Heartbeat" => {
            if let Some(hb) = decode::<Heartbeat>(payload) {
                log::debug!("heartbeat at {}", hb.utc.unwrap_or_default());
            }
            Dirty::NONE
        }
        // Subscribed for completeness of the stream; nothing in the model
        // consumes them.
        "TrackStatus" | "TimingStats" => Dirty::NONE,
        other => {
            log::debug!("ignoring update for unknown topic {other}");
            Dirty::NONE
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Option<T> {
    match serde_json::from_value(payload) {
        Ok(rec) => Some(rec),
        Err(err) => {
            log::debug!("dropping undecodable topic payload: {err}");
            None
        }
    }
}

fn apply_session_info(store: &mut SessionStore, info: SessionInfo) -> Dirty {
    let meeting = &mut store.meeting;
    if let Some(v) = info.meeting.name {
        meeting.name = v;
    }
    if let Some(v) = info.meeting.official_name {
        meeting.full_name = v;
    }
    if let Some(v) = info.meeting.location {
        meeting.location = v;
    }
    if let Some(v) = info.meeting.number {
        meeting.round_number = v.max(0) as u32;
    }
    if let Some(v) = info.meeting.country.code {
        meeting.country_code = v;
    }
    if let Some(v) = info.meeting.country.name {
        meeting.country_name = v;
    }
    if let Some(v) = info.meeting.circuit.short_name {
        meeting.circuit_short_name = v;
    }

    let session = &mut meeting.session;
    if let Some(v) = info.name {
        session.name = v;
    }
    // The offset must be normalized before the dates: the feed sends date
    // strings without an offset suffix, so parsing appends it.
    if let Some(v) = info.gmt_offset {
        session.gmt_offset = normalize_gmt_offset(&v);
    }
    if let Some(v) = info.start_date {
        if let Some(dt) = parse_feed_date(&v, &session.gmt_offset) {
            session.start_date = Some(dt);
        }
    }
    if let Some(v) = info.end_date {
        if let Some(dt) = parse_feed_date(&v, &session.gmt_offset) {
            session.end_date = Some(dt);
        }
    }
    if let Some(v) = info.session_type {
        session.session_type = SessionType::from_feed(&v);
    }

    Dirty::MEETING
}

fn apply_session_data(store: &mut SessionStore, data: SessionData) -> Dirty {
    let session = &mut store.meeting.session;
    // Ascending key order, so the newest entry wins.
    for entry in data.status_series.values() {
        if let Some(ts) = &entry.track_status {
            log::debug!("track status now {ts}");
        }
        if let Some(status) = &entry.session_status {
            match status.as_str() {
                "Started" => session.status = SessionStatus::Started,
                "Ended" | "Finished" => session.status = SessionStatus::Ended,
                other => log::debug!("unrecognized session status {other}"),
            }
        }
    }
    for entry in data.series.values() {
        if let Some(part) = entry.qualifying_part {
            session.part = part.max(0) as u32;
        }
    }
    Dirty::MEETING
}

fn apply_driver_list(
    store: &mut SessionStore,
    entries: std::collections::HashMap<String, DriverEntry>,
) -> Dirty {
    for (number, entry) in entries {
        let driver = store
            .drivers
            .entry(number)
            .or_insert_with_key(|n| Driver::new(n.clone()));
        if let Some(v) = entry.tla {
            driver.short_name = v;
        }
        if let (Some(first), Some(last)) = (&entry.first_name, &entry.last_name) {
            driver.name = if entry.name_format.as_deref() == Some("LastNameIsPrimary") {
                format!("{last} {first}")
            } else {
                format!("{first} {last}")
            };
        }
        if let Some(v) = entry.team_name {
            driver.team_name = v;
        }
        if let Some(v) = entry.team_colour {
            driver.team_color = format!("#{v}");
        }
        if let Some(v) = entry.line {
            driver.position = v.max(0) as u32;
        }
    }
    Dirty::DRIVERS
}

fn apply_timing_data(store: &mut SessionStore, data: TimingData) -> Dirty {
    let mut dirty = Dirty::DRIVERS;
    let session = &mut store.meeting.session;

    for (number, line) in data.lines {
        let driver = store
            .drivers
            .entry(number)
            .or_insert_with_key(|n| Driver::new(n.clone()));

        if let Some(v) = line.line {
            driver.position = v.max(0) as u32;
        }
        if let Some(v) = line.show_position {
            driver.show_position = v;
        }
        apply_gaps(driver, session.session_type, &line);

        if let Some(v) = &line.last_lap_time.value {
            if !v.is_empty() {
                driver.last_lap.time = v.clone();
            }
        }
        if let Some(v) = line.last_lap_time.personal_fastest {
            driver.last_lap.is_personal_best = v;
        }
        if line.last_lap_time.overall_fastest == Some(true) {
            session.fastest_lap_owner = driver.number.clone();
            if let Some(v) = &line.last_lap_time.value {
                if !v.is_empty() {
                    session.fastest_lap_time = v.clone();
                }
            }
            dirty.meeting = true;
        }
        if let Some(v) = &line.best_lap_time.value {
            if !v.is_empty() {
                driver.best_lap_time = v.clone();
            }
        }
        if let Some(v) = line.knocked_out {
            driver.is_knocked_out = v;
        }
        // Retirement is monotonic: once out, a driver stays out no matter
        // what later frames claim.
        if line.retired == Some(true) {
            driver.is_retired = true;
        }
        if matches!(line.status, Some(STATUS_RETIRED_ON_TRACK) | Some(STATUS_RETIRED_IN_PIT)) {
            driver.is_retired = true;
        }
        if let Some(v) = line.number_of_laps {
            driver.number_of_laps = v.max(0) as u32;
        }

        if apply_sectors(driver, session, &line) {
            dirty.meeting = true;
        }
        // Pit state is applied after sectors so an in-pit driver does not
        // surface a misleading sector update from the same frame.
        if let Some(v) = line.in_pit {
            driver.is_in_pit = v;
        }
        if let Some(v) = line.pit_out {
            driver.is_pit_out = v;
        }

        for (key, lap) in &line.best_lap_times {
            if let (Ok(part), Some(v)) = (key.parse::<usize>(), &lap.value) {
                if part < driver.best_lap_times.len() {
                    driver.best_lap_times[part] = v.clone();
                }
            }
        }
    }

    dirty
}

const STATUS_RETIRED_ON_TRACK: i64 = 68;
const STATUS_RETIRED_IN_PIT: i64 = 92;

fn apply_gaps(driver: &mut Driver, session_type: SessionType, line: &DriverTiming) {
    if driver.position == 1 {
        // The leader has no one ahead.
        driver.interval_gap.clear();
        driver.leader_gap.clear();
    } else if session_type == SessionType::Qualifying {
        // Gaps are tracked per qualifying part; ascending key order ends on
        // the most recent part.
        for stat in line.stats.values() {
            if let Some(v) = &stat.time_diff_to_fastest {
                if !v.is_empty() {
                    driver.leader_gap = v.clone();
                }
            }
            if let Some(v) = &stat.time_diff_to_position_ahead {
                if !v.is_empty() {
                    driver.interval_gap = v.clone();
                }
            }
        }
    } else {
        if let Some(v) = &line.interval_to_position_ahead.value {
            if !v.is_empty() {
                driver.interval_gap = v.clone();
            }
        }
        if let Some(v) = &line.gap_to_leader {
            if !v.is_empty() {
                driver.leader_gap = v.clone();
            }
        }
    }
}

/// Applies sector and segment updates. Returns true when a fastest-sector
/// owner changed and the meeting snapshot must go out too.
fn apply_sectors(driver: &mut Driver, session: &mut Session, line: &DriverTiming) -> bool {
    let mut session_updated = false;

    let mut indices: Vec<usize> = line.sectors.keys().filter_map(|k| k.parse().ok()).collect();
    indices.sort_unstable();

    for i in indices {
        if i >= driver.sectors.len() {
            continue;
        }
        let rec = &line.sectors[&i.to_string()];
        let sector = &mut driver.sectors[i];

        for (segment_key, segment) in &rec.segments {
            let Ok(j) = segment_key.parse::<u32>() else { continue };
            if session.status != SessionStatus::Started {
                // Between sessions the boards show stale mini-sectors;
                // blank them until the session is live.
                sector.segments.insert(j, SegmentStatus::Inactive);
            } else if let Some(code) = segment.status {
                if let Some(status) = SegmentStatus::from_code(code) {
                    sector.segments.insert(j, status);
                }
            }
        }

        if let Some(v) = &rec.value {
            sector.is_active = true;
            sector.time = v.clone();
        }
        if let Some(v) = rec.personal_fastest {
            sector.is_personal_best = v;
        }
        if let Some(v) = rec.overall_fastest {
            sector.is_overall_best = v;
        }
        if rec.overall_fastest == Some(true) {
            session.fastest_sector_owners[i] = driver.number.clone();
            session_updated = true;
        }

        // A later sector cannot be ahead of the one just posted: posting
        // sector i invalidates whatever sectors 1 and 2 still showed from
        // the previous lap.
        if i < 1 {
            driver.sectors[1] = Sector::default();
        }
        if i < 2 {
            driver.sectors[2] = Sector::default();
        }
    }

    session_updated
}

fn apply_timing_app_data(store: &mut SessionStore, data: TimingAppData) -> Dirty {
    for (number, line) in data.lines {
        let driver = store
            .drivers
            .entry(number)
            .or_insert_with_key(|n| Driver::new(n.clone()));
        // The largest stint key is the stint currently being run. String
        // comparison holds up to 9 stints, far beyond any real session.
        if let Some((_, stint)) = line.stints.last_key_value() {
            if let Some(compound) = &stint.compound {
                driver.tire_compound = TireCompound::from_feed(compound);
            }
            if let Some(laps) = stint.total_laps {
                driver.tire_lap_count = laps.max(0) as u32;
            }
        }
        if let Some(v) = line.line {
            driver.position = v.max(0) as u32;
        }
    }
    Dirty::DRIVERS
}

fn apply_lap_count(store: &mut SessionStore, lc: LapCount) -> Dirty {
    let session = &mut store.meeting.session;
    if let Some(v) = lc.current_lap {
        session.current_lap = v.max(0) as u32;
    }
    if let Some(v) = lc.total_laps {
        session.total_laps = v.max(0) as u32;
    }
    Dirty::MEETING
}

fn apply_race_ctrl(store: &mut SessionStore, msgs: RaceCtrlMsgs) -> Dirty {
    // Only the newest message is retained; the reference message replays
    // the whole history but the largest key is still the latest.
    if let Some((_, entry)) = msgs.messages.last_key_value() {
        store.race_ctrl = RaceCtrlMsg::from_feed(
            entry.category.as_deref().unwrap_or_default(),
            entry.flag.as_deref(),
            entry.mode.as_deref(),
            entry.message.clone().unwrap_or_default(),
        );
    }
    Dirty::RACE_CTRL
}

/// Keeps `±HHMM` from the feed's `±HH:MM:SS` offset form.
fn normalize_gmt_offset(raw: &str) -> String {
    raw.split(':').take(2).collect::<Vec<_>>().concat()
}

/// Parses a feed date, which arrives without an offset suffix, against the
/// session's normalized GMT offset. Offsets without an explicit sign are
/// east of Greenwich.
fn parse_feed_date(date: &str, gmt_offset: &str) -> Option<DateTime<Utc>> {
    let offset = if gmt_offset.starts_with('+') || gmt_offset.starts_with('-') {
        gmt_offset.to_string()
    } else {
        format!("+{gmt_offset}")
    };
    DateTime::parse_from_str(&format!("{date}{offset}"), "%Y-%m-%dT%H:%M:%S%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
