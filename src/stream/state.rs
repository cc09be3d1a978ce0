//! Stream session state

use tokio::task::JoinHandle;

/// Whether a streaming session is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Off,
    On,
}

/// Disposable token representing one active streaming session
///
/// Owned by the service; dropping it via [`dispose`](Self::dispose) stops the
/// push task, after which no further snapshot can be written.
pub struct StreamHandle {
    task: JoinHandle<()>,
}

impl StreamHandle {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub(crate) fn dispose(self) {
        self.task.abort();
    }
}
