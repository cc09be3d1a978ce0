//! Launch Marked 2 against a document
//!
//! Resolves the application path (discovering it if needed) and opens the
//! document with it. Discovery failures surface their message verbatim;
//! launch failures surface a formatted message carrying the captured
//! subprocess output.

use std::path::Path;
use std::sync::Arc;

use crate::discovery::AppLocator;
use crate::error::{MarklaunchError, Result};
use crate::host::Notifier;
use crate::process::CommandRunner;

/// Launcher used to open the document with the resolved bundle
pub const OPEN: &str = "/usr/bin/open";

const LAUNCH_ERROR_TITLE: &str = "Error Launching Marked 2";

/// The `launch` command: open `document` with the resolved Marked 2.
///
/// Never returns an error; every failure ends as a notification.
pub async fn run_marked(
    locator: &AppLocator,
    runner: &Arc<dyn CommandRunner>,
    notifier: &dyn Notifier,
    document: &Path,
) {
    if let Err(e) = launch(locator, runner, document).await {
        tracing::debug!("launch failed: {e}");
        match e {
            MarklaunchError::Discovery(message) => notifier.show_message(&message),
            MarklaunchError::CommandFailed(output) => notifier.show_message(&format!(
                "{LAUNCH_ERROR_TITLE}:\n\n{}",
                output.error_message()
            )),
            other => notifier.show_message(&format!("{LAUNCH_ERROR_TITLE}:\n\n{other}")),
        }
    }
}

/// Resolve and open, propagating failures to the caller
pub async fn launch(
    locator: &AppLocator,
    runner: &Arc<dyn CommandRunner>,
    document: &Path,
) -> Result<()> {
    let app = locator.resolve().await?;
    let args = vec![
        "-a".to_string(),
        app.display().to_string(),
        document.display().to_string(),
    ];
    runner.run(Path::new(OPEN), &args).await?;
    Ok(())
}
