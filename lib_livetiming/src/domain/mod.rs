//! Normalized domain entities for a live session.
//!
//! Everything in here is plain owned data: snapshots handed to consumers are
//! deep copies produced with `Clone`, so a consumer never observes a value
//! the receive task may later mutate.

pub mod driver;
pub mod meeting;
pub mod racectrl;

pub use driver::{Driver, LastLap, Sector, SegmentStatus, TireCompound};
pub use meeting::{Meeting, Session, SessionStatus, SessionType};
pub use racectrl::{RaceCtrlCategory, RaceCtrlMsg};
