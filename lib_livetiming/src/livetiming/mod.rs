//! The Live Timing protocol client.
//!
//! Frames flow through the module in one direction: the transport
//! (`client`) reads text frames off the WebSocket, `wire` classifies each
//! frame as a change or reference wrapper, `feed` decodes topic payloads
//! into optional-everything records, `merge` applies them to the `store`,
//! and `publisher` fans out cloned snapshots on the channels whose slice of
//! state was dirtied.

pub mod client;
pub mod error;
mod feed;
mod merge;
mod publisher;
mod store;
mod wire;

pub use client::{Client, ClientOptions, Snapshots};
pub use error::ClientError;
