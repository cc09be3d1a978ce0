//! User-invocable entry points
//!
//! The host editor registers two commands: launch the document in Marked 2,
//! and toggle the live-streaming preview. Both are thin wrappers over the
//! discovery, process, and stream services; all user-facing error formatting
//! lives here.

pub mod launch;
pub mod stream;

pub use launch::run_marked;
pub use stream::{find_helper, stream_marked};
