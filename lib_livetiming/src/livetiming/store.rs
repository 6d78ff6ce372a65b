//! The authoritative in-process session state.
//!
//! Owned exclusively by the receive task: all mutation happens there, so no
//! lock guards the store. Consumers only ever see cloned snapshots.

use std::collections::HashMap;

use crate::domain::{Driver, Meeting, RaceCtrlMsg};

#[derive(Debug, Default)]
pub(crate) struct SessionStore {
    pub meeting: Meeting,
    /// Drivers keyed by racing number. Entries are created on first
    /// observation in any topic and live until the client is torn down.
    pub drivers: HashMap<String, Driver>,
    /// The most recent race-control message.
    pub race_ctrl: RaceCtrlMsg,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }
}
