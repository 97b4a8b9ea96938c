//! Project directory loader
//!
//! Runs the discovery helper shipped with the extension and turns its output
//! into a [`ProjectCatalog`]. One helper run per load, no retries, no timeout.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Level, debug, info, warn};

use super::error::LoadError;
use super::protocol::{self, HelperResult};
use super::types::ProjectCatalog;
use crate::config::ExtensionConfig;
use crate::io::{ChildHelperRunner, HelperCommand, HelperRunner};
use crate::log_timing;

/// Source of project catalogs
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Produce a fresh catalog
    async fn load(&self) -> Result<ProjectCatalog, LoadError>;
}

/// Loads projects by running the helper script from the extension root
pub struct HelperProjectLoader {
    root: PathBuf,
    config: ExtensionConfig,
    runner: Arc<dyn HelperRunner>,
}

impl HelperProjectLoader {
    /// Create a loader spawning real child processes
    pub fn new(root: impl Into<PathBuf>, config: ExtensionConfig) -> Self {
        Self::with_runner(root, config, Arc::new(ChildHelperRunner::new()))
    }

    /// Create a loader with a custom helper runner
    pub fn with_runner(
        root: impl Into<PathBuf>,
        config: ExtensionConfig,
        runner: Arc<dyn HelperRunner>,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            runner,
        }
    }

    fn helper_command(&self) -> HelperCommand {
        HelperCommand::new(
            self.config.interpreter.clone(),
            self.config.helper_path(&self.root),
        )
        .with_working_directory(&self.root)
    }
}

#[async_trait]
impl ProjectSource for HelperProjectLoader {
    async fn load(&self) -> Result<ProjectCatalog, LoadError> {
        let command = self.helper_command();
        match tokio::fs::try_exists(&command.script).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(LoadError::HelperMissing {
                    path: command.script,
                });
            }
            Err(e) => {
                return Err(LoadError::process_failed(format!(
                    "Cannot access {}: {}",
                    command.script.display(),
                    e
                )));
            }
        }

        let start = Instant::now();
        let output = self.runner.run(&command).await?;
        log_timing!(Level::DEBUG, "find_projects", start.elapsed());

        parse_output(&output)
    }
}

/// Classify helper output
pub fn parse_output(output: &str) -> Result<ProjectCatalog, LoadError> {
    match protocol::decode(output) {
        Ok(HelperResult::Success { projects }) => {
            let catalog = projects.into_catalog();
            info!("Helper found {} projects", catalog.project_count());
            Ok(catalog)
        }
        Ok(HelperResult::Error { message, traceback }) => {
            debug!("Helper reported error: {}", message);
            Err(LoadError::HelperReportedError {
                message,
                diagnostic: traceback,
            })
        }
        Err(e) => {
            warn!("Rejected helper output: {}", e);
            Err(LoadError::protocol_violation(output, e.reason))
        }
    }
}
