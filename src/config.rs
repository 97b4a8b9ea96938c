//! Extension configuration
//!
//! Provides ExtensionConfig with builder pattern, validation and environment
//! overrides, plus the extension metadata read from `metadata.json`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Helper script location, relative to the extension root
pub const DEFAULT_HELPER_SCRIPT: &str = "find-projects.py";

/// Interpreter the helper script is run with
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Base id of the registered search providers
pub const DEFAULT_PROVIDER_ID: &str = "intellij-idea-search-provider";

/// Desktop id of the IDE launched for single-product catalogs
pub const DEFAULT_APP_ID: &str = "jetbrains-idea.desktop";

/// Name of the metadata file in the extension root
pub const METADATA_FILE: &str = "metadata.json";

/// Overrides the interpreter
pub const ENV_INTERPRETER: &str = "IDEA_SEARCH_PYTHON";

/// Overrides the helper script path
pub const ENV_HELPER: &str = "IDEA_SEARCH_HELPER";

/// Known JetBrains products and their desktop ids
const DEFAULT_PRODUCTS: &[(&str, &str)] = &[
    ("clion", "jetbrains-clion.desktop"),
    ("datagrip", "jetbrains-datagrip.desktop"),
    ("goland", "jetbrains-goland.desktop"),
    ("idea", "jetbrains-idea.desktop"),
    ("phpstorm", "jetbrains-phpstorm.desktop"),
    ("pycharm", "jetbrains-pycharm.desktop"),
    ("rider", "jetbrains-rider.desktop"),
    ("rubymine", "jetbrains-rubymine.desktop"),
    ("webstorm", "jetbrains-webstorm.desktop"),
];

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration validation and loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Field present but unusable
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// metadata.json exists but could not be read or parsed
    #[error("Failed to load extension metadata from {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },
}

impl ConfigError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Extension Configuration
// ============================================================================

/// Complete extension configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Helper script, relative to the extension root unless absolute
    pub helper_script: PathBuf,

    /// Interpreter the helper runs under
    pub interpreter: String,

    /// Provider id; product providers append `-<product>`
    pub provider_id: String,

    /// Desktop id launched for single-product catalogs
    pub app_id: String,

    /// Product key to desktop id
    pub products: BTreeMap<String, String>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            helper_script: PathBuf::from(DEFAULT_HELPER_SCRIPT),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            provider_id: DEFAULT_PROVIDER_ID.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            products: DEFAULT_PRODUCTS
                .iter()
                .map(|(key, app_id)| (key.to_string(), app_id.to_string()))
                .collect(),
        }
    }
}

impl ExtensionConfig {
    pub fn builder() -> ExtensionConfigBuilder {
        ExtensionConfigBuilder::default()
    }

    /// Apply `IDEA_SEARCH_PYTHON` and `IDEA_SEARCH_HELPER` if set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            env::var(ENV_INTERPRETER).ok(),
            env::var(ENV_HELPER).ok().map(PathBuf::from),
        )
    }

    /// Override values, e.g. from CLI arguments
    pub fn with_overrides(mut self, interpreter: Option<String>, helper: Option<PathBuf>) -> Self {
        if let Some(interpreter) = interpreter.filter(|i| !i.trim().is_empty()) {
            self.interpreter = interpreter;
        }
        if let Some(helper) = helper.filter(|h| !h.as_os_str().is_empty()) {
            self.helper_script = helper;
        }
        self
    }

    /// Helper script location for an extension installed at `root`
    pub fn helper_path(&self, root: &Path) -> PathBuf {
        root.join(&self.helper_script)
    }

    /// Desktop id of a product's IDE
    ///
    /// Unknown products fall back to the `jetbrains-<key>.desktop` naming
    /// used by JetBrains Toolbox.
    pub fn product_app_id(&self, product: &str) -> String {
        self.products
            .get(product)
            .cloned()
            .unwrap_or_else(|| format!("jetbrains-{product}.desktop"))
    }

    /// Provider id for one product of a multi-product catalog
    pub fn product_provider_id(&self, product: &str) -> String {
        format!("{}-{}", self.provider_id, product)
    }
}

// ============================================================================
// Configuration Builder
// ============================================================================

/// Builder for ExtensionConfig with validation and defaults
#[derive(Debug, Default)]
pub struct ExtensionConfigBuilder {
    helper_script: Option<PathBuf>,
    interpreter: Option<String>,
    provider_id: Option<String>,
    app_id: Option<String>,
    products: BTreeMap<String, String>,
}

impl ExtensionConfigBuilder {
    pub fn helper_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.helper_script = Some(script.into());
        self
    }

    pub fn interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = Some(interpreter.into());
        self
    }

    pub fn provider_id(mut self, id: impl Into<String>) -> Self {
        self.provider_id = Some(id.into());
        self
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Add or replace a product mapping on top of the defaults
    pub fn product(mut self, key: impl Into<String>, app_id: impl Into<String>) -> Self {
        self.products.insert(key.into(), app_id.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ExtensionConfig, ConfigError> {
        let defaults = ExtensionConfig::default();

        let helper_script = self.helper_script.unwrap_or(defaults.helper_script);
        if helper_script.as_os_str().is_empty() {
            return Err(ConfigError::missing_field("helper_script"));
        }

        let interpreter = self.interpreter.unwrap_or(defaults.interpreter);
        if interpreter.trim().is_empty() {
            return Err(ConfigError::missing_field("interpreter"));
        }

        let provider_id = self.provider_id.unwrap_or(defaults.provider_id);
        if provider_id.trim().is_empty() {
            return Err(ConfigError::missing_field("provider_id"));
        }

        let app_id = self.app_id.unwrap_or(defaults.app_id);
        if !app_id.ends_with(".desktop") {
            return Err(ConfigError::invalid_value(
                "app_id",
                format!("'{app_id}' is not a desktop id"),
            ));
        }

        let mut products = defaults.products;
        for (key, product_app_id) in self.products {
            if key.trim().is_empty() {
                return Err(ConfigError::invalid_value("products", "empty product key"));
            }
            if !product_app_id.ends_with(".desktop") {
                return Err(ConfigError::invalid_value(
                    "products",
                    format!("'{product_app_id}' is not a desktop id"),
                ));
            }
            products.insert(key, product_app_id);
        }

        Ok(ExtensionConfig {
            helper_script,
            interpreter,
            provider_id,
            app_id,
            products,
        })
    }
}

// ============================================================================
// Extension Metadata
// ============================================================================

/// Contents of the extension's `metadata.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtensionMetadata {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<u32>,
}

impl Default for ExtensionMetadata {
    fn default() -> Self {
        Self {
            uuid: format!("{DEFAULT_PROVIDER_ID}@local"),
            name: "IntelliJ IDEA Search Provider".to_string(),
            description: None,
            version: None,
        }
    }
}

impl ExtensionMetadata {
    /// Read `metadata.json` from the extension root
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(METADATA_FILE);
        if !path.exists() {
            debug!("No {} in {}, using defaults", METADATA_FILE, root.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::Metadata {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| ConfigError::Metadata {
            path,
            reason: e.to_string(),
        })
    }
}
