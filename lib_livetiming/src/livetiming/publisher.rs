//! Fans out snapshots of dirtied state to the consumer channels.
//!
//! Every send crosses a value boundary: the snapshot is a `Clone` of the
//! store slice, so consumers never hold a reference into state the receive
//! task keeps mutating. Channels are bounded and sends await a free slot,
//! which is deliberate back-pressure: a state update is never dropped on
//! the floor for a slow consumer.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::domain::{Driver, Meeting, RaceCtrlMsg};
use crate::livetiming::merge::Dirty;
use crate::livetiming::store::SessionStore;

/// Bounded depth of each snapshot channel. Small on purpose: the value of
/// a timing snapshot decays in seconds.
const CHANNEL_CAPACITY: usize = 16;

pub(crate) struct Publisher {
    meetings_tx: mpsc::Sender<Meeting>,
    drivers_tx: mpsc::Sender<HashMap<String, Driver>>,
    race_ctrl_tx: mpsc::Sender<RaceCtrlMsg>,
}

pub(crate) struct SnapshotReceivers {
    pub meetings: mpsc::Receiver<Meeting>,
    pub drivers: mpsc::Receiver<HashMap<String, Driver>>,
    pub race_ctrl_msgs: mpsc::Receiver<RaceCtrlMsg>,
}

impl Publisher {
    pub fn channel() -> (Publisher, SnapshotReceivers) {
        let (meetings_tx, meetings) = mpsc::channel(CHANNEL_CAPACITY);
        let (drivers_tx, drivers) = mpsc::channel(CHANNEL_CAPACITY);
        let (race_ctrl_tx, race_ctrl_msgs) = mpsc::channel(CHANNEL_CAPACITY);
        (
            Publisher { meetings_tx, drivers_tx, race_ctrl_tx },
            SnapshotReceivers { meetings, drivers, race_ctrl_msgs },
        )
    }

    /// Sends a deep copy of each dirtied slice, at most one snapshot per
    /// channel per inbound frame. A closed channel means the consumer went
    /// away; that is their prerogative, not an error.
    pub async fn publish(&self, store: &SessionStore, dirty: Dirty) {
        if dirty.meeting && self.meetings_tx.send(store.meeting.clone()).await.is_err() {
            log::debug!("meeting consumer gone; snapshot dropped");
        }
        if dirty.drivers && self.drivers_tx.send(store.drivers.clone()).await.is_err() {
            log::debug!("drivers consumer gone; snapshot dropped");
        }
        if dirty.race_ctrl && self.race_ctrl_tx.send(store.race_ctrl.clone()).await.is_err() {
            log::debug!("race control consumer gone; snapshot dropped");
        }
    }
}
