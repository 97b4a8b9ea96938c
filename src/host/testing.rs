//! Testing utilities and mock implementations
//!
//! Provides a recording shell host and a mock desktop application so the
//! extension lifecycle and providers can be exercised without a real shell.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::{DesktopApp, HostError, IconResource, RegistrationHandle, SearchProvider, ShellHost};

// ============================================================================
// Mock Desktop Application
// ============================================================================

/// Mock desktop application recording its launches
pub struct MockApp {
    id: String,
    name: String,
    icon: Option<String>,
    fail_launch: Option<String>,
    launches: Mutex<Vec<Vec<PathBuf>>>,
}

impl MockApp {
    /// Create a mock app whose icon name is the desktop id without extension
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: Some(id.trim_end_matches(".desktop").to_string()),
            fail_launch: None,
            launches: Mutex::new(Vec::new()),
        }
    }

    /// Drop the icon
    pub fn without_icon(mut self) -> Self {
        self.icon = None;
        self
    }

    /// Make every launch fail with the given reason
    pub fn failing(mut self, reason: &str) -> Self {
        self.fail_launch = Some(reason.to_string());
        self
    }

    /// File arguments of every launch so far
    pub fn launches(&self) -> Vec<Vec<PathBuf>> {
        self.launches.lock().unwrap().clone()
    }
}

impl DesktopApp for MockApp {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self, _size: u32) -> Option<IconResource> {
        self.icon.clone().map(IconResource)
    }

    fn launch(&self, files: &[PathBuf]) -> Result<(), HostError> {
        if let Some(reason) = &self.fail_launch {
            return Err(HostError::launch_failed(&self.name, reason.clone()));
        }
        self.launches.lock().unwrap().push(files.to_vec());
        Ok(())
    }
}

// ============================================================================
// Recording Shell Host
// ============================================================================

/// Notification captured by [`RecordingHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub details: String,
}

/// Shell host that records every call made against it
#[derive(Default)]
pub struct RecordingHost {
    next_handle: AtomicU64,
    register_calls: AtomicU64,
    providers: Mutex<Vec<(RegistrationHandle, Arc<dyn SearchProvider>)>>,
    unregistered: Mutex<Vec<RegistrationHandle>>,
    notifications: Mutex<Vec<Notification>>,
    apps: Mutex<HashMap<String, Arc<MockApp>>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an application available for lookup
    pub fn install_app(&self, app: MockApp) -> Arc<MockApp> {
        let app = Arc::new(app);
        self.apps
            .lock()
            .unwrap()
            .insert(app.id.clone(), Arc::clone(&app));
        app
    }

    /// Total number of `register_provider` calls, including since-removed ones
    pub fn register_calls(&self) -> u64 {
        self.register_calls.load(Ordering::SeqCst)
    }

    /// Currently registered providers
    pub fn providers(&self) -> Vec<Arc<dyn SearchProvider>> {
        self.providers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, provider)| Arc::clone(provider))
            .collect()
    }

    /// Ids of the currently registered providers
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers()
            .iter()
            .map(|provider| provider.id().to_string())
            .collect()
    }

    pub fn unregistered(&self) -> Vec<RegistrationHandle> {
        self.unregistered.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl ShellHost for RecordingHost {
    fn register_provider(&self, provider: Arc<dyn SearchProvider>) -> RegistrationHandle {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        let handle = RegistrationHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.providers.lock().unwrap().push((handle, provider));
        handle
    }

    fn unregister_provider(&self, handle: RegistrationHandle) {
        self.providers.lock().unwrap().retain(|(h, _)| *h != handle);
        self.unregistered.lock().unwrap().push(handle);
    }

    fn notify(&self, title: &str, details: &str) {
        self.notifications.lock().unwrap().push(Notification {
            title: title.to_string(),
            details: details.to_string(),
        });
    }

    fn lookup_app(&self, app_id: &str) -> Option<Arc<dyn DesktopApp>> {
        self.apps
            .lock()
            .unwrap()
            .get(app_id)
            .map(|app| Arc::clone(app) as Arc<dyn DesktopApp>)
    }
}
