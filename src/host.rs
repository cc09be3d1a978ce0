//! Boundary types for the host editor
//!
//! The host owns documents, command registration, notifications, and
//! localization. This module is the narrow surface the library sees: a
//! full-document snapshot, and somewhere to show a human-readable message.

use std::path::PathBuf;

/// Full-document snapshot delivered on each (host-debounced) change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    /// Path of the document on disk, when the document has one
    pub path: Option<PathBuf>,
    /// The complete document text
    pub text: String,
}

impl DocumentSnapshot {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            text: text.into(),
        }
    }

    /// Snapshot of a document that has never been saved
    pub fn unsaved(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
        }
    }
}

/// User-facing notifications, shown through the host's UI
pub trait Notifier: Send + Sync {
    fn show_message(&self, message: &str);
}

/// [`Notifier`] that writes to standard error, used by the CLI host
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_message(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsaved_snapshot_has_no_path() {
        let snap = DocumentSnapshot::unsaved("# draft");
        assert!(snap.path.is_none());
        assert_eq!(snap.text, "# draft");
    }

    #[test]
    fn test_saved_snapshot_keeps_path() {
        let snap = DocumentSnapshot::new("/notes/today.md", "# notes");
        assert_eq!(snap.path.as_deref(), Some(std::path::Path::new("/notes/today.md")));
    }
}
