//! I/O layer - helper process execution
//!
//! - **Process**: run an external helper to completion and capture its output
//!
//! Kept free of any knowledge about the helper's output format.

pub mod process;

pub use process::{ChildHelperRunner, HelperCommand, HelperRunner, ProcessError};

#[cfg(test)]
pub use process::MockHelperRunner;
