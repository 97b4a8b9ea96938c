//! Registration state tracking
//!
//! The extension is in exactly one of three states. `enable` moves
//! `Unregistered → Registering`, the load outcome moves `Registering →
//! Registered | Unregistered`, and `disable` forces `Unregistered` from
//! anywhere.

use std::fmt;
use std::sync::Arc;

use crate::host::RegistrationHandle;
use crate::search::ProjectSearchProvider;

/// A provider the host currently knows about
#[derive(Clone)]
pub struct Registration {
    pub handle: RegistrationHandle,
    pub provider: Arc<ProjectSearchProvider>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::host::SearchProvider;

        f.debug_struct("Registration")
            .field("handle", &self.handle)
            .field("provider", &self.provider.id())
            .finish()
    }
}

/// Registration lifecycle of the extension's providers
#[derive(Debug, Clone, Default)]
pub enum RegistrationState {
    /// Nothing registered, no load pending
    #[default]
    Unregistered,
    /// Load of enable cycle `cycle` is in flight
    Registering { cycle: u64 },
    /// Providers registered with the host, registered and removed as a unit
    Registered { registrations: Vec<Registration> },
}

impl RegistrationState {
    /// Whether a load result of `cycle` may still take effect
    pub fn is_awaiting(&self, cycle: u64) -> bool {
        matches!(self, RegistrationState::Registering { cycle: current } if *current == cycle)
    }

    pub fn is_unregistered(&self) -> bool {
        matches!(self, RegistrationState::Unregistered)
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationState::Registered { .. })
    }

    /// Host handles held in this state
    pub fn handles(&self) -> Vec<RegistrationHandle> {
        match self {
            RegistrationState::Registered { registrations } => {
                registrations.iter().map(|r| r.handle).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationState::Unregistered => write!(f, "unregistered"),
            RegistrationState::Registering { cycle } => write!(f, "registering (cycle {cycle})"),
            RegistrationState::Registered { registrations } => {
                write!(f, "registered ({} providers)", registrations.len())
            }
        }
    }
}
