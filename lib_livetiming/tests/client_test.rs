//! Drives recorded reference and change frames through the client and
//! asserts on the snapshots the consumer channels receive. The fixtures
//! under `testdata/` are captured-shape frames from a race weekend: one
//! reference snapshot per session kind plus a handful of deltas.

use std::fs;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use tokio::sync::mpsc;

use lib_livetiming::domain::{SessionStatus, SessionType, TireCompound};
use lib_livetiming::livetiming::{Client, ClientOptions, Snapshots};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

/// Drains a channel and returns the newest snapshot, if any arrived.
fn latest<T>(rx: &mut mpsc::Receiver<T>) -> Option<T> {
    let mut last = None;
    while let Ok(value) = rx.try_recv() {
        last = Some(value);
    }
    last
}

fn drain(snapshots: &mut Snapshots) {
    latest(&mut snapshots.meetings);
    latest(&mut snapshots.drivers);
    latest(&mut snapshots.race_ctrl_msgs);
}

async fn referenced(name: &str) -> (Client, Snapshots) {
    let (mut client, snapshots) = Client::new(ClientOptions::default());
    client.process_frame(&fixture(name)).await;
    (client, snapshots)
}

#[tokio::test]
async fn practice_reference_populates_the_model() {
    let (_client, mut snapshots) = referenced("ref-msg-practice.json").await;

    let meeting = latest(&mut snapshots.meetings).expect("meeting snapshot");
    assert_eq!(meeting.name, "Abu Dhabi Grand Prix");
    assert_eq!(meeting.round_number, 24);
    assert_eq!(meeting.country_code, "UAE");
    assert_eq!(meeting.circuit_short_name, "Yas Marina Circuit");
    assert_eq!(meeting.session.session_type, SessionType::Practice);
    assert_eq!(meeting.session.name, "Practice 1");
    assert_eq!(meeting.session.part, 0);
    assert_eq!(meeting.session.current_lap, 0);
    assert_eq!(meeting.session.total_laps, 0);
    assert_eq!(meeting.session.gmt_offset, "0400");
    // 13:30 at a +04:00 venue
    assert_eq!(
        meeting.session.start_date,
        Some(Utc.with_ymd_and_hms(2024, 12, 6, 9, 30, 0).unwrap())
    );

    let drivers = latest(&mut snapshots.drivers).expect("drivers snapshot");
    assert_eq!(drivers.len(), 20);
    assert_eq!(drivers["1"].name, "Max Verstappen");
    assert_eq!(drivers["97"].name, "Robert Shwartzman");
    assert_eq!(drivers["81"].best_lap_time, "1:20.515");
    assert_eq!(drivers["81"].position, 9);
    assert_eq!(drivers["1"].tire_compound, TireCompound::Medium);
    assert_eq!(drivers["1"].number_of_laps, 6);
    for driver in drivers.values() {
        assert_eq!(driver.sectors.len(), 3, "driver {}", driver.number);
        assert_eq!(driver.best_lap_times.len(), 3, "driver {}", driver.number);
    }

    // the reference frame fans out on every channel
    assert!(latest(&mut snapshots.race_ctrl_msgs).is_some());
}

#[tokio::test]
async fn qualifying_reference_populates_the_model() {
    let (_client, mut snapshots) = referenced("ref-msg-qualifying.json").await;

    let meeting = latest(&mut snapshots.meetings).expect("meeting snapshot");
    assert_eq!(meeting.session.session_type, SessionType::Qualifying);
    assert_eq!(meeting.session.part, 1);
    assert_eq!(meeting.session.current_lap, 0);
    assert_eq!(meeting.session.total_laps, 0);

    let drivers = latest(&mut snapshots.drivers).expect("drivers snapshot");
    assert_eq!(drivers.len(), 20);
    assert_eq!(drivers["1"].name, "Max Verstappen");
    assert_eq!(drivers["24"].name, "Zhou Guanyu");
    assert_eq!(drivers["81"].best_lap_times[0], "1:23.640");
    assert_eq!(drivers["81"].position, 4);
    assert_eq!(drivers["1"].tire_compound, TireCompound::Soft);
    assert_eq!(drivers["1"].number_of_laps, 3);
}

#[tokio::test]
async fn race_reference_populates_the_model() {
    let (_client, mut snapshots) = referenced("ref-msg-race.json").await;

    let meeting = latest(&mut snapshots.meetings).expect("meeting snapshot");
    assert_eq!(meeting.session.session_type, SessionType::Race);
    assert_eq!(meeting.session.part, 0);
    assert_eq!(meeting.session.current_lap, 1);
    assert_eq!(meeting.session.total_laps, 58);
    assert_eq!(meeting.session.status, SessionStatus::Pending);

    let drivers = latest(&mut snapshots.drivers).expect("drivers snapshot");
    assert_eq!(drivers.len(), 20);
    assert_eq!(drivers["81"].best_lap_time, "");
    assert_eq!(drivers["81"].position, 2);
    assert_eq!(drivers["1"].tire_compound, TireCompound::Unknown);
    assert_eq!(drivers["1"].number_of_laps, 0);
}

#[tokio::test]
async fn qualifying_timing_delta_updates_positions_and_gaps() {
    let (mut client, mut snapshots) = referenced("ref-msg-qualifying.json").await;
    drain(&mut snapshots);

    client.process_frame(&fixture("ch-msg-qual-timingdata.json")).await;

    let drivers = latest(&mut snapshots.drivers).expect("drivers snapshot");
    assert_eq!(drivers["81"].position, 8);
    assert_eq!(drivers["27"].leader_gap, "+0.420");
    assert_eq!(drivers["27"].interval_gap, "+0.040");

    // the delta touched drivers only
    assert!(latest(&mut snapshots.meetings).is_none());
    assert!(latest(&mut snapshots.race_ctrl_msgs).is_none());
}

#[tokio::test]
async fn race_timing_delta_updates_positions_and_gaps() {
    let (mut client, mut snapshots) = referenced("ref-msg-race.json").await;
    drain(&mut snapshots);

    client.process_frame(&fixture("ch-msg-race-timingdata.json")).await;

    let drivers = latest(&mut snapshots.drivers).expect("drivers snapshot");
    assert_eq!(drivers["61"].position, 18);
    assert_eq!(drivers["23"].position, 16);
    assert_eq!(drivers["23"].leader_gap, "+4.625");
    assert_eq!(drivers["23"].interval_gap, "+0.133");
}

#[tokio::test]
async fn race_session_delta_starts_the_session() {
    let (mut client, mut snapshots) = referenced("ref-msg-race.json").await;
    drain(&mut snapshots);

    client.process_frame(&fixture("ch-msg-race-sessiondata.json")).await;

    let meeting = latest(&mut snapshots.meetings).expect("meeting snapshot");
    assert_eq!(meeting.session.status, SessionStatus::Started);
    assert!(latest(&mut snapshots.drivers).is_none());
}

#[tokio::test]
async fn reference_frames_are_self_contained() {
    // applying the same reference twice must land on the same state as
    // applying it once
    let (mut doubled, mut doubled_rx) = Client::new(ClientOptions::default());
    doubled.process_frame(&fixture("ref-msg-race.json")).await;
    drain(&mut doubled_rx);
    doubled.process_frame(&fixture("ref-msg-race.json")).await;

    let (_single, mut single_rx) = referenced("ref-msg-race.json").await;

    let doubled_drivers = latest(&mut doubled_rx.drivers).unwrap();
    let single_drivers = latest(&mut single_rx.drivers).unwrap();
    assert_eq!(doubled_drivers, single_drivers);
    assert_eq!(
        latest(&mut doubled_rx.meetings).unwrap(),
        latest(&mut single_rx.meetings).unwrap()
    );
}

#[tokio::test]
async fn change_deltas_are_idempotent() {
    let (mut once, mut once_rx) = referenced("ref-msg-qualifying.json").await;
    once.process_frame(&fixture("ch-msg-qual-timingdata.json")).await;

    let (mut twice, mut twice_rx) = referenced("ref-msg-qualifying.json").await;
    twice.process_frame(&fixture("ch-msg-qual-timingdata.json")).await;
    twice.process_frame(&fixture("ch-msg-qual-timingdata.json")).await;

    assert_eq!(
        latest(&mut once_rx.drivers).unwrap(),
        latest(&mut twice_rx.drivers).unwrap()
    );
}

#[tokio::test]
async fn change_before_reference_creates_default_drivers() {
    let (mut client, mut snapshots) = Client::new(ClientOptions::default());
    client.process_frame(&fixture("ch-msg-race-timingdata.json")).await;

    let drivers = latest(&mut snapshots.drivers).expect("drivers snapshot");
    assert_eq!(drivers.len(), 2);
    assert_eq!(drivers["61"].position, 18);
    assert_eq!(drivers["61"].sectors.len(), 3);
    assert!(drivers["61"].name.is_empty());
    assert_eq!(drivers["23"].position, 16);
}
