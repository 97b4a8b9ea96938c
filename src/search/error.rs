use thiserror::Error;

use crate::host::HostError;

/// Failure to act on a result the user picked
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("{source}")]
    LaunchFailed {
        app: String,
        #[source]
        source: HostError,
    },
}

impl ActivationError {
    pub fn launch_failed(app: impl Into<String>, source: HostError) -> Self {
        Self::LaunchFailed {
            app: app.into(),
            source,
        }
    }
}
