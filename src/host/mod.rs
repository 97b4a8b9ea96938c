//! Host shell contract
//!
//! The desktop shell owns the search overlay, the application registry and the
//! notification tray. This module describes the narrow surface the extension
//! consumes from it:
//!
//! - **ShellHost**: provider registration, notifications and application lookup
//! - **SearchProvider**: the operations the shell calls on a registered provider
//! - **DesktopApp**: an installed application that can render an icon and launch
//!
//! Nothing here is implemented by this crate except in tests; the shell binding
//! supplies the real types.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Host Errors
// ============================================================================

/// Errors reported by host-side operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Application not found: {app_id}")]
    AppNotFound { app_id: String },

    #[error("Failed to launch {app}: {reason}")]
    LaunchFailed { app: String, reason: String },
}

impl HostError {
    /// Create a launch failure error
    pub fn launch_failed(app: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LaunchFailed {
            app: app.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Registration Handles
// ============================================================================

/// Opaque token returned by the host when a provider is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(u64);

impl RegistrationHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RegistrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Icons
// ============================================================================

/// Icon resource as handed out by an application's icon provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResource(pub String);

/// Icon wrapped for display at a fixed pixel size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub resource: IconResource,
    pub size: u32,
}

// ============================================================================
// Host Traits
// ============================================================================

/// An installed desktop application
pub trait DesktopApp: Send + Sync {
    /// Desktop id the application was looked up by
    fn id(&self) -> &str;

    /// Human readable application name
    fn name(&self) -> &str;

    /// Ask the application's icon provider for an icon of the given size
    fn icon(&self, size: u32) -> Option<IconResource>;

    /// Launch the application, optionally opening the given files
    fn launch(&self, files: &[PathBuf]) -> Result<(), HostError>;
}

/// Result metadata handed to the shell for rendering
#[derive(Clone)]
pub struct ResultMeta {
    pub id: String,
    pub name: String,
    pub description: String,
    app: Option<Arc<dyn DesktopApp>>,
}

impl ResultMeta {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        app: Option<Arc<dyn DesktopApp>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            app,
        }
    }

    /// Build the result icon at the requested size
    ///
    /// Queries the application's icon provider on every call. Returns `None`
    /// when the application is unknown or has no icon.
    pub fn create_icon(&self, size: u32) -> Option<Icon> {
        let resource = self.app.as_ref()?.icon(size)?;
        Some(Icon { resource, size })
    }
}

impl fmt::Debug for ResultMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultMeta")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("app", &self.app.as_ref().map(|app| app.id().to_string()))
            .finish()
    }
}

/// Operations the shell performs on a registered search provider
pub trait SearchProvider: Send + Sync {
    /// Unique provider id, used by the shell to tell providers apart
    fn id(&self) -> &str;

    /// Ids of all results matching a fresh query
    fn get_initial_result_set(&self, terms: &[String]) -> Vec<String>;

    /// Narrow a previous result set for a refined query
    fn get_subsearch_result_set(&self, previous: &[String], terms: &[String]) -> Vec<String>;

    /// Rendering metadata for the given result ids
    fn get_result_metas(&self, ids: &[String]) -> Vec<ResultMeta>;

    /// The user picked a result
    fn activate_result(&self, id: &str, terms: &[String]);

    /// The user clicked the provider icon instead of a result
    fn launch_search(&self, terms: &[String]);

    /// Truncate results before the shell renders them
    fn filter_results(&self, results: Vec<String>, max: usize) -> Vec<String>;
}

/// The desktop shell hosting the extension
///
/// The extension never holds its state lock while calling into the host, so
/// callbacks may call back into the extension, including `disable`.
pub trait ShellHost: Send + Sync {
    /// Add a provider to the search overlay
    fn register_provider(&self, provider: Arc<dyn SearchProvider>) -> RegistrationHandle;

    /// Remove a provider previously added with `register_provider`
    fn unregister_provider(&self, handle: RegistrationHandle);

    /// Fire-and-forget user notification
    fn notify(&self, title: &str, details: &str);

    /// Look up an installed application by desktop id
    fn lookup_app(&self, app_id: &str) -> Option<Arc<dyn DesktopApp>>;
}
