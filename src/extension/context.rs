use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{ConfigError, ExtensionConfig, ExtensionMetadata};
use crate::host::ShellHost;

/// Everything the extension needs from its environment
///
/// Handed to the extension at construction instead of being looked up from
/// shell globals.
#[derive(Clone)]
pub struct ExtensionContext {
    pub root: PathBuf,
    pub metadata: ExtensionMetadata,
    pub config: ExtensionConfig,
    pub host: Arc<dyn ShellHost>,
}

impl ExtensionContext {
    pub fn new(
        root: impl Into<PathBuf>,
        metadata: ExtensionMetadata,
        config: ExtensionConfig,
        host: Arc<dyn ShellHost>,
    ) -> Self {
        Self {
            root: root.into(),
            metadata,
            config,
            host,
        }
    }

    /// Context for an extension installed at `root`
    ///
    /// Reads `metadata.json` and applies environment overrides to the default
    /// configuration.
    pub fn from_root(root: &Path, host: Arc<dyn ShellHost>) -> Result<Self, ConfigError> {
        let metadata = ExtensionMetadata::load(root)?;
        let config = ExtensionConfig::default().with_env_overrides();
        Ok(Self::new(root, metadata, config, host))
    }
}

impl fmt::Debug for ExtensionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionContext")
            .field("root", &self.root)
            .field("metadata", &self.metadata)
            .field("config", &self.config)
            .field("host", &"dyn ShellHost")
            .finish()
    }
}
