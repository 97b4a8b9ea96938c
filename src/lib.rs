//! Search provider for recently opened JetBrains IDE projects
//!
//! A helper script shipped with the extension reads the IDE's list of recent
//! projects and prints it as JSON. This crate runs that helper, matches the
//! projects against search terms and registers the results with the desktop
//! shell's search overlay through the [`host::ShellHost`] contract.

pub mod config;
pub mod extension;
pub mod host;
pub mod io;
pub mod logging;
pub mod project;
pub mod search;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, ExtensionConfig, ExtensionMetadata};
pub use extension::{Extension, ExtensionContext, RegistrationState};
pub use host::{DesktopApp, HostError, ResultMeta, SearchProvider, ShellHost};
pub use project::{LoadError, Project, ProjectCatalog, ProjectTable};
pub use search::{ActivationError, ProjectSearchProvider};
