//! Extension enable/disable lifecycle
//!
//! `enable` starts one project load and registers providers when it
//! completes; `disable` unregisters them. Both may be called at any time and
//! in any order. A load that completes after its cycle was disabled or
//! superseded is dropped without touching the host.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::context::ExtensionContext;
use super::state::{Registration, RegistrationState};
use crate::host::SearchProvider;
use crate::project::{HelperProjectLoader, LoadError, ProjectCatalog, ProjectSource};
use crate::search::ProjectSearchProvider;

struct Inner {
    state: RegistrationState,
    last_cycle: u64,
}

struct Shared {
    context: ExtensionContext,
    source: Arc<dyn ProjectSource>,
    inner: Mutex<Inner>,
}

/// The search provider extension
///
/// Cheap to clone; clones share one registration state.
#[derive(Clone)]
pub struct Extension {
    shared: Arc<Shared>,
}

impl Extension {
    /// Create an extension loading projects with the bundled helper
    pub fn new(context: ExtensionContext) -> Self {
        let source = Arc::new(HelperProjectLoader::new(
            context.root.clone(),
            context.config.clone(),
        ));
        Self::with_source(context, source)
    }

    /// Create an extension with a custom project source
    pub fn with_source(context: ExtensionContext, source: Arc<dyn ProjectSource>) -> Self {
        Self {
            shared: Arc::new(Shared {
                context,
                source,
                inner: Mutex::new(Inner {
                    state: RegistrationState::Unregistered,
                    last_cycle: 0,
                }),
            }),
        }
    }

    pub fn context(&self) -> &ExtensionContext {
        &self.shared.context
    }

    /// Snapshot of the registration state
    pub fn state(&self) -> RegistrationState {
        self.shared.lock().state.clone()
    }

    /// Ids of the providers currently registered with the host
    pub fn provider_ids(&self) -> Vec<String> {
        match &self.shared.lock().state {
            RegistrationState::Registered { registrations } => registrations
                .iter()
                .map(|r| r.provider.id().to_string())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Start loading projects and register providers once they are available
    ///
    /// Does nothing unless the extension is unregistered. Returns the handle
    /// of the spawned load; callers may drop it. Must be called from within
    /// a tokio runtime.
    #[instrument(name = "extension_enable", skip(self))]
    pub fn enable(&self) -> Option<JoinHandle<()>> {
        let cycle = {
            let mut inner = self.shared.lock();
            if !inner.state.is_unregistered() {
                debug!("Ignoring enable while {}", inner.state);
                return None;
            }
            inner.last_cycle += 1;
            inner.state = RegistrationState::Registering {
                cycle: inner.last_cycle,
            };
            inner.last_cycle
        };

        info!("Enabling, loading projects (cycle {})", cycle);
        let shared = Arc::clone(&self.shared);
        Some(tokio::spawn(async move {
            let result = shared.source.load().await;
            shared.complete(cycle, result);
        }))
    }

    /// Unregister all providers and forget any pending load
    ///
    /// Idempotent. A helper still running keeps running; its result is
    /// discarded.
    #[instrument(name = "extension_disable", skip(self))]
    pub fn disable(&self) {
        let host = &self.shared.context.host;
        let previous = std::mem::take(&mut self.shared.lock().state);

        match previous {
            RegistrationState::Registered { registrations } => {
                for registration in registrations {
                    debug!(
                        "Unregistering provider {} ({})",
                        registration.provider.id(),
                        registration.handle
                    );
                    host.unregister_provider(registration.handle);
                }
                info!("Disabled");
            }
            RegistrationState::Registering { cycle } => {
                info!("Disabled while loading, dropping cycle {}", cycle);
            }
            RegistrationState::Unregistered => debug!("Already disabled"),
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, cycle: u64, result: Result<ProjectCatalog, LoadError>) {
        match result {
            Ok(catalog) => self.install(cycle, catalog),
            Err(e) => self.fail(cycle, e),
        }
    }

    fn install(&self, cycle: u64, catalog: ProjectCatalog) {
        // Building providers queries the host for applications, keep it outside the lock
        let providers = self.build_providers(catalog);
        let host = &self.context.host;

        {
            let inner = self.lock();
            if !inner.state.is_awaiting(cycle) {
                warn!("Discarding projects of stale cycle {} ({})", cycle, inner.state);
                return;
            }
        }

        // Host callbacks run unlocked and may call back into the extension
        let registrations: Vec<Registration> = providers
            .into_iter()
            .map(|provider| {
                let handle = host.register_provider(provider.clone() as Arc<dyn SearchProvider>);
                debug!("Registered provider {} ({})", provider.id(), handle);
                Registration { handle, provider }
            })
            .collect();

        {
            let mut inner = self.lock();
            if inner.state.is_awaiting(cycle) {
                info!(
                    "Registered {} providers (cycle {})",
                    registrations.len(),
                    cycle
                );
                inner.state = RegistrationState::Registered { registrations };
                return;
            }
            warn!(
                "Cycle {} ended while registering ({}), withdrawing providers",
                cycle, inner.state
            );
        }

        for registration in registrations {
            host.unregister_provider(registration.handle);
        }
    }

    fn fail(&self, cycle: u64, e: LoadError) {
        {
            let mut inner = self.lock();
            if !inner.state.is_awaiting(cycle) {
                warn!("Discarding load failure of stale cycle {}: {}", cycle, e);
                return;
            }
            inner.state = RegistrationState::Unregistered;
        }

        error!("Failed to load projects: {}", e);
        let title = format!("{}: failed to load projects", self.context.metadata.name);
        let details = match e.diagnostic() {
            Some(diagnostic) => format!("{e}\n\n{diagnostic}"),
            None => e.to_string(),
        };
        self.context.host.notify(&title, &details);
    }

    fn build_providers(&self, catalog: ProjectCatalog) -> Vec<Arc<ProjectSearchProvider>> {
        let config = &self.context.config;
        let host = &self.context.host;

        match catalog {
            ProjectCatalog::Single(table) => vec![Arc::new(ProjectSearchProvider::new(
                config.provider_id.clone(),
                config.app_id.clone(),
                Arc::new(table),
                Arc::clone(host),
            ))],
            ProjectCatalog::Products(tables) => tables
                .into_iter()
                .map(|(product, table)| {
                    Arc::new(ProjectSearchProvider::new(
                        config.product_provider_id(&product),
                        config.product_app_id(&product),
                        Arc::new(table),
                        Arc::clone(host),
                    ))
                })
                .collect(),
        }
    }
}
