//! Streaming session service
//!
//! Owns the single session handle and the push loop. The host delivers
//! debounced change events as [`DocumentSnapshot`]s over an mpsc channel,
//! the analog of the editor's "stopped changing" subscription. Each
//! snapshot feeds one freshly spawned helper process; push failures are
//! logged and never clear the session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::host::DocumentSnapshot;
use crate::process::CommandRunner;
use crate::stream::state::{StreamHandle, StreamState};

/// Toggleable live-preview streaming
pub struct StreamService {
    runner: Arc<dyn CommandRunner>,
    /// Path to the mkstream helper fed one snapshot per invocation
    helper: PathBuf,
    /// Host application name passed to the helper as `-a`, when known
    host_app: Option<String>,
    active: Mutex<Option<StreamHandle>>,
}

impl StreamService {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        helper: impl Into<PathBuf>,
        host_app: Option<String>,
    ) -> Self {
        Self {
            runner,
            helper: helper.into(),
            host_app,
            active: Mutex::new(None),
        }
    }

    /// Current session state
    pub async fn state(&self) -> StreamState {
        if self.active.lock().await.is_some() {
            StreamState::On
        } else {
            StreamState::Off
        }
    }

    /// Toggle the session, subscribing lazily: `subscribe` is only invoked
    /// when the toggle actually turns streaming on.
    pub async fn toggle_with<F>(&self, subscribe: F) -> StreamState
    where
        F: FnOnce() -> (DocumentSnapshot, mpsc::Receiver<DocumentSnapshot>),
    {
        if self.state().await == StreamState::On {
            return self.stop().await;
        }
        let (first, changes) = subscribe();
        self.start(first, changes).await
    }

    /// Start a session: push `first` immediately, then push every snapshot
    /// arriving on `changes`. A no-op when a session is already active;
    /// there is never more than one.
    pub async fn start(
        &self,
        first: DocumentSnapshot,
        mut changes: mpsc::Receiver<DocumentSnapshot>,
    ) -> StreamState {
        let mut active = self.active.lock().await;
        if active.is_some() {
            tracing::warn!("streaming session already active");
            return StreamState::On;
        }

        tracing::info!("Streaming preview ON");
        push_snapshot(&self.runner, &self.helper, self.host_app.as_deref(), first).await;

        let runner = Arc::clone(&self.runner);
        let helper = self.helper.clone();
        let host_app = self.host_app.clone();
        let task = tokio::spawn(async move {
            while let Some(snapshot) = changes.recv().await {
                push_snapshot(&runner, &helper, host_app.as_deref(), snapshot).await;
            }
        });

        *active = Some(StreamHandle::new(task));
        StreamState::On
    }

    /// Stop the session, disposing the handle and dropping the change
    /// subscription. Idempotent.
    pub async fn stop(&self) -> StreamState {
        if let Some(handle) = self.active.lock().await.take() {
            tracing::info!("Streaming preview OFF");
            handle.dispose();
        }
        StreamState::Off
    }
}

/// Feed one full-document snapshot to the helper. Failures are a local
/// warning only; the session stays nominally active.
async fn push_snapshot(
    runner: &Arc<dyn CommandRunner>,
    helper: &Path,
    host_app: Option<&str>,
    snapshot: DocumentSnapshot,
) {
    let mut args = Vec::new();
    if let Some(app) = host_app {
        args.push("-a".to_string());
        args.push(app.to_string());
    }
    if let Some(path) = &snapshot.path {
        args.push("-p".to_string());
        args.push(path.display().to_string());
    }

    if let Err(e) = runner.feed(helper, &args, &snapshot.text).await {
        tracing::warn!("failed to update Marked: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::process::testing::ScriptedRunner;

    fn service(runner: Arc<ScriptedRunner>) -> StreamService {
        StreamService::new(runner, "/ext/bin/mkstream", Some("Nova.app".to_string()))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_toggle_on_pushes_first_snapshot() {
        let runner = Arc::new(ScriptedRunner::new());
        let service = service(runner.clone());
        let (_tx, rx) = mpsc::channel(8);

        let state = service
            .toggle_with(|| (DocumentSnapshot::new("/doc.md", "# one"), rx))
            .await;

        assert_eq!(state, StreamState::On);
        let feeds = runner.feeds.lock().unwrap();
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].command, "/ext/bin/mkstream");
        assert_eq!(feeds[0].input, "# one");
        assert_eq!(
            feeds[0].args,
            vec!["-a", "Nova.app", "-p", "/doc.md"]
        );
    }

    #[tokio::test]
    async fn test_change_events_push_fresh_snapshots() {
        let runner = Arc::new(ScriptedRunner::new());
        let service = service(runner.clone());
        let (tx, rx) = mpsc::channel(8);

        service
            .toggle_with(|| (DocumentSnapshot::new("/doc.md", "v1"), rx))
            .await;
        tx.send(DocumentSnapshot::new("/doc.md", "v2")).await.unwrap();
        tx.send(DocumentSnapshot::new("/doc.md", "v3")).await.unwrap();
        settle().await;

        let feeds = runner.feeds.lock().unwrap();
        let texts: Vec<&str> = feeds.iter().map(|f| f.input.as_str()).collect();
        assert_eq!(texts, vec!["v1", "v2", "v3"]);
    }

    #[tokio::test]
    async fn test_second_toggle_turns_off() {
        let runner = Arc::new(ScriptedRunner::new());
        let service = service(runner.clone());

        let (_tx, rx) = mpsc::channel(8);
        let on = service
            .toggle_with(|| (DocumentSnapshot::unsaved("draft"), rx))
            .await;
        assert_eq!(on, StreamState::On);

        // The second toggle must not create a second session; its subscribe
        // closure is never invoked.
        let off = service
            .toggle_with(|| panic!("subscribed while toggling off"))
            .await;
        assert_eq!(off, StreamState::Off);
        assert_eq!(service.state().await, StreamState::Off);
    }

    #[tokio::test]
    async fn test_no_push_after_toggle_off() {
        let runner = Arc::new(ScriptedRunner::new());
        let service = service(runner.clone());
        let (tx, rx) = mpsc::channel(8);

        service
            .toggle_with(|| (DocumentSnapshot::new("/doc.md", "v1"), rx))
            .await;
        service.stop().await;
        settle().await;

        // The subscription is gone; a late change event cannot reach a
        // disposed session.
        let send = tx.send(DocumentSnapshot::new("/doc.md", "late")).await;
        assert!(send.is_err());
        settle().await;

        let feeds = runner.feeds.lock().unwrap();
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].input, "v1");
    }

    #[tokio::test]
    async fn test_push_failure_keeps_session_active() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.fail_feeds("broken pipe");
        let service = service(runner.clone());
        let (tx, rx) = mpsc::channel(8);

        service
            .toggle_with(|| (DocumentSnapshot::new("/doc.md", "v1"), rx))
            .await;
        assert_eq!(service.state().await, StreamState::On);

        // Later snapshots still attempt their own push, independent of the
        // earlier failure.
        tx.send(DocumentSnapshot::new("/doc.md", "v2")).await.unwrap();
        settle().await;

        assert_eq!(runner.feeds.lock().unwrap().len(), 2);
        assert_eq!(service.state().await, StreamState::On);
    }

    #[tokio::test]
    async fn test_unsaved_document_omits_path_arg() {
        let runner = Arc::new(ScriptedRunner::new());
        let service = StreamService::new(runner.clone(), "/ext/bin/mkstream", None);
        let (_tx, rx) = mpsc::channel(8);

        service
            .toggle_with(|| (DocumentSnapshot::unsaved("draft"), rx))
            .await;

        let feeds = runner.feeds.lock().unwrap();
        assert!(feeds[0].args.is_empty());
    }
}
