//! # F1 Live Timing Client
//!
//! Realtime client for the Formula 1 Live Timing feed. The feed speaks
//! SignalR 1.5: a short HTTP negotiate handshake followed by a long-lived
//! WebSocket that delivers one large reference snapshot and then a stream of
//! incremental change deltas for the duration of a session.
//!
//! The client maintains a normalized session model (meeting and session
//! metadata, per-driver intrinsic and timing state, the latest race-control
//! notice) and publishes deep-copied snapshots to consumer channels whenever
//! the model changes.
//!
//! ```no_run
//! use lib_livetiming::livetiming::{Client, ClientOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (shutdown_tx, _) = tokio::sync::broadcast::channel(1);
//!     let (client, mut snapshots) = Client::new(ClientOptions::default());
//!     tokio::spawn(client.listen(shutdown_tx.subscribe()));
//!
//!     while let Some(drivers) = snapshots.drivers.recv().await {
//!         println!("{} drivers on the board", drivers.len());
//!     }
//! }
//! ```

pub mod domain;
pub mod livetiming;

pub use domain::{Driver, Meeting, RaceCtrlMsg, Session};
pub use livetiming::{Client, ClientError, ClientOptions, Snapshots};
