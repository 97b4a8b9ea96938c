//! Recent project discovery
//!
//! - **types**: projects and the tables they are looked up in
//! - **protocol**: strict decoding of the helper's JSON output
//! - **loader**: running the helper and classifying its outcome
//! - **error**: why a load failed

pub mod error;
pub mod loader;
pub mod protocol;
pub mod types;

pub use error::LoadError;
pub use loader::{HelperProjectLoader, ProjectSource, parse_output};
pub use protocol::{HelperResult, ProjectListing, ProtocolError};
pub use types::{Project, ProjectCatalog, ProjectTable};
