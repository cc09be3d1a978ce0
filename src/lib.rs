//! marklaunch: editor companion for the Marked 2 Markdown previewer
//!
//! The crate locates the best installed copy of Marked 2 (ranking multiple
//! distributions by version, channel, and signing status, with a persisted
//! cache), launches it against a document, and can stream live full-document
//! snapshots to the `mkstream` helper while the user types.
//!
//! Host editors integrate through three seams: the [`process::CommandRunner`]
//! trait for process execution, the [`config::ConfigStore`] trait for the
//! preference store, and the [`host`] boundary types for documents and
//! notifications. A small CLI binary wires these against the real system.

pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod host;
pub mod logging;
pub mod process;
pub mod stream;
pub mod version;

pub use error::{MarklaunchError, Result};
