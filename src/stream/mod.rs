//! Live-streaming preview sessions
//!
//! A streaming session pipes full-document snapshots to the `mkstream`
//! helper so Marked 2 refreshes as the user types. The session is a single
//! process-wide toggle: Off→On spawns the push task and sends a first
//! snapshot, On→Off disposes the session handle. There are no other
//! transitions; a crashed helper only costs the one snapshot it was fed.

mod service;
mod state;

pub use service::*;
pub use state::*;
