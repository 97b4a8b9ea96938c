//! Extension lifecycle
//!
//! Ties the project loader to the host: [`Extension::enable`] loads projects
//! and registers one search provider per IDE, [`Extension::disable`] removes
//! them again.

pub mod context;
pub mod lifecycle;
pub mod state;


pub use context::ExtensionContext;
pub use lifecycle::Extension;
pub use state::{Registration, RegistrationState};
