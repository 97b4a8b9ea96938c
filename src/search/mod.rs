//! Search provider implementation
//!
//! - **matcher**: the term predicate and result truncation
//! - **provider**: [`ProjectSearchProvider`], the shell-facing adapter

pub mod error;
pub mod matcher;
pub mod provider;

pub use error::ActivationError;
pub use matcher::{matches_terms, matching_ids, truncate_results};
pub use provider::{LAUNCH_FAILED_TITLE, ProjectSearchProvider};
