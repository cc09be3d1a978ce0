//! Cache-first resolution of the Marked 2 bundle path
//!
//! Resolution order: trust the persisted path when it still points at a
//! bundle directory; otherwise search the metadata index, fetch per-candidate
//! metadata concurrently, rank the survivors, and persist the winner. A
//! successful search always rewrites the persisted path, including when a
//! stale cached value was present.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;

use crate::config::{ConfigStore, MARKED_PATH_PREF};
use crate::discovery::candidate::{
    rank, AppCandidate, BUNDLE_ID_PATTERN, PROP_BUNDLE_ID, PROP_STORE_SIGNED, PROP_VERSION,
};
use crate::error::{MarklaunchError, Result};
use crate::process::CommandRunner;

/// Metadata-index search tool
pub const MDFIND: &str = "/usr/bin/mdfind";

/// Per-path metadata fetch tool
pub const MDLS: &str = "/usr/bin/mdls";

/// User-facing message when no installation can be found
const NOT_FOUND_MESSAGE: &str = "Unable to find the Marked 2 application. \
Please set the Marked app you wish to use in the extension preferences.";

/// Locates the preferred Marked 2 installation
pub struct AppLocator {
    runner: Arc<dyn CommandRunner>,
    config: Arc<dyn ConfigStore>,
}

impl AppLocator {
    pub fn new(runner: Arc<dyn CommandRunner>, config: Arc<dyn ConfigStore>) -> Self {
        Self { runner, config }
    }

    /// Resolve the path to the Marked 2 bundle, discovering it if the cached
    /// path is absent or no longer a directory.
    pub async fn resolve(&self) -> Result<PathBuf> {
        // If the existing config for the path seems good, go with it.
        if let Some(cached) = self.config.get(MARKED_PATH_PREF) {
            let path = PathBuf::from(&cached);
            if path.is_dir() {
                tracing::debug!("using cached Marked path: {cached}");
                return Ok(path);
            }
            tracing::info!("cached Marked path is stale, rediscovering: {cached}");
        }

        let matches = self.search(BUNDLE_ID_PATTERN).await?;

        // Fetch metadata for every match concurrently; individual failures
        // drop that candidate, they never fail the discovery.
        let fetches = matches.into_iter().map(|path| self.fetch_metadata(path));
        let mut found = Vec::new();
        for result in join_all(fetches).await {
            match result {
                Ok(candidate) => found.push(candidate),
                Err(e) => tracing::warn!("mdls error: {e}"),
            }
        }

        if found.is_empty() {
            return Err(MarklaunchError::discovery(NOT_FOUND_MESSAGE));
        }

        found.sort_by(rank);
        tracing::info!(
            "Marked 2 discovery found: {}",
            serde_json::to_string(&found).unwrap_or_default()
        );

        let best = found.swap_remove(0);
        self.config
            .set(MARKED_PATH_PREF, &best.path.display().to_string())?;
        Ok(best.path)
    }

    /// Search the metadata index for bundle identifiers matching `pattern`
    async fn search(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let args = vec![
            "kMDItemCFBundleIdentifier".to_string(),
            "=".to_string(),
            pattern.to_string(),
        ];
        let output = self.runner.run(Path::new(MDFIND), &args).await?;

        Ok(output
            .stdout
            .iter()
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    /// Fetch the ranking properties for one candidate path
    async fn fetch_metadata(&self, path: PathBuf) -> Result<AppCandidate> {
        let mut args = Vec::new();
        for prop in [PROP_VERSION, PROP_STORE_SIGNED, PROP_BUNDLE_ID] {
            args.push("-name".to_string());
            args.push(prop.to_string());
        }
        args.push(path.display().to_string());

        let output = self
            .runner
            .run(Path::new(MDLS), &args)
            .await
            .map_err(|e| match e {
                MarklaunchError::CommandFailed(output) => {
                    MarklaunchError::query(output.error_message())
                }
                other => other,
            })?;

        Ok(AppCandidate::from_metadata(path, &output.stdout))
    }
}
