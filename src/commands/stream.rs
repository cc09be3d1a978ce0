//! Toggle the live-streaming preview
//!
//! The toggle command flips the single process-wide streaming session. The
//! `mkstream` helper location comes from the pinned preference when set,
//! falling back to a PATH lookup.

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::config::{ConfigStore, MKSTREAM_PATH_PREF};
use crate::error::{MarklaunchError, Result};
use crate::host::DocumentSnapshot;
use crate::stream::{StreamService, StreamState};

/// Name of the streaming helper binary searched on PATH
pub const MKSTREAM: &str = "mkstream";

/// Locate the mkstream helper
pub fn find_helper(config: &dyn ConfigStore) -> Result<PathBuf> {
    if let Some(pinned) = config.get(MKSTREAM_PATH_PREF) {
        let path = PathBuf::from(&pinned);
        if path.is_file() {
            return Ok(path);
        }
        tracing::warn!("pinned mkstream path is missing: {pinned}");
    }

    which::which(MKSTREAM)
        .map_err(|e| MarklaunchError::config(format!("mkstream helper not found: {e}")))
}

/// The `stream` command: toggle the streaming session for the active
/// document. `subscribe` is only called when the toggle turns streaming on,
/// and hands back the first snapshot plus the debounced change feed.
pub async fn stream_marked<F>(service: &StreamService, subscribe: F) -> StreamState
where
    F: FnOnce() -> (DocumentSnapshot, mpsc::Receiver<DocumentSnapshot>),
{
    service.toggle_with(subscribe).await
}
