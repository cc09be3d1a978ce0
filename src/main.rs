//! Minimal CLI host for marklaunch
//!
//! Wires the library against the real system runner and the on-disk
//! preference store. Stream mode polls the document's mtime as the
//! stand-in for an editor's debounced change events.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::mpsc;

use marklaunch::commands;
use marklaunch::config::Preferences;
use marklaunch::discovery::AppLocator;
use marklaunch::host::{ConsoleNotifier, DocumentSnapshot};
use marklaunch::logging;
use marklaunch::process::{CommandRunner, SystemRunner};
use marklaunch::stream::StreamService;

const USAGE: &str = "usage: marklaunch <launch|stream|resolve> [file]";

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Vec<String>) -> Result<(), String> {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());
    let prefs = Arc::new(Preferences::open_default().map_err(|e| e.to_string())?);

    match args.first().map(String::as_str) {
        Some("launch") => {
            let document = document_arg(&args)?;
            let locator = AppLocator::new(runner.clone(), prefs);
            commands::run_marked(&locator, &runner, &ConsoleNotifier, &document).await;
            Ok(())
        }
        Some("resolve") => {
            let locator = AppLocator::new(runner, prefs);
            let path = locator.resolve().await.map_err(|e| e.to_string())?;
            println!("{}", path.display());
            Ok(())
        }
        Some("stream") => {
            let document = document_arg(&args)?;
            stream(runner, prefs, document).await
        }
        _ => Err(USAGE.to_string()),
    }
}

fn document_arg(args: &[String]) -> Result<PathBuf, String> {
    args.get(1)
        .map(PathBuf::from)
        .ok_or_else(|| USAGE.to_string())
}

/// Stream the document until Ctrl-C, pushing a fresh snapshot whenever its
/// mtime changes.
async fn stream(
    runner: Arc<dyn CommandRunner>,
    prefs: Arc<Preferences>,
    document: PathBuf,
) -> Result<(), String> {
    let helper = commands::find_helper(prefs.as_ref()).map_err(|e| e.to_string())?;
    let service = StreamService::new(runner, helper, None);

    let first = snapshot(&document).map_err(|e| e.to_string())?;
    let (tx, rx) = mpsc::channel(16);
    service.start(first, rx).await;

    let mut last_modified = modified(&document);
    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let current = modified(&document);
                if current != last_modified {
                    last_modified = current;
                    match snapshot(&document) {
                        Ok(snap) => {
                            let _ = tx.send(snap).await;
                        }
                        Err(e) => {
                            tracing::warn!("failed to read {}: {e}", document.display());
                        }
                    }
                }
            }
        }
    }

    service.stop().await;
    Ok(())
}

fn snapshot(path: &Path) -> std::io::Result<DocumentSnapshot> {
    Ok(DocumentSnapshot::new(path, std::fs::read_to_string(path)?))
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
