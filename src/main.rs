use clap::Parser;
use idea_search_provider::host::{
    DesktopApp, HostError, IconResource, RegistrationHandle, SearchProvider, ShellHost,
};
use idea_search_provider::logging::{LogConfig, init_logging};
use idea_search_provider::{Extension, ExtensionContext};

use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Run one enable cycle of the search provider outside the shell and query it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Extension root containing the helper script (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Interpreter for the helper (overrides IDEA_SEARCH_PYTHON env var)
    #[arg(long, value_name = "PROGRAM")]
    interpreter: Option<String>,

    /// Helper script path, relative to the root (overrides IDEA_SEARCH_HELPER env var)
    #[arg(long, value_name = "PATH")]
    helper: Option<PathBuf>,

    /// Maximum number of results shown per provider
    #[arg(long, default_value_t = 5)]
    limit: usize,

    /// Open the result with this id in its IDE
    #[arg(long, value_name = "ID")]
    activate: Option<String>,

    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log file path (overrides IDEA_SEARCH_LOG_FILE env var)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Search terms; all of them must match
    terms: Vec<String>,
}

/// Application launched through `gtk-launch`
struct LaunchedApp {
    id: String,
}

impl DesktopApp for LaunchedApp {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn icon(&self, _size: u32) -> Option<IconResource> {
        Some(IconResource(self.id.trim_end_matches(".desktop").to_string()))
    }

    fn launch(&self, files: &[PathBuf]) -> Result<(), HostError> {
        Command::new("gtk-launch")
            .arg(&self.id)
            .args(files)
            .spawn()
            .map(|_| ())
            .map_err(|e| HostError::launch_failed(&self.id, e.to_string()))
    }
}

/// Host printing notifications to the terminal
#[derive(Default)]
struct ConsoleHost {
    next_handle: AtomicU64,
    providers: Mutex<Vec<(RegistrationHandle, Arc<dyn SearchProvider>)>>,
}

impl ConsoleHost {
    fn providers(&self) -> Vec<Arc<dyn SearchProvider>> {
        self.providers
            .lock()
            .map(|providers| providers.iter().map(|(_, p)| Arc::clone(p)).collect())
            .unwrap_or_default()
    }
}

impl ShellHost for ConsoleHost {
    fn register_provider(&self, provider: Arc<dyn SearchProvider>) -> RegistrationHandle {
        let handle = RegistrationHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        info!("Provider {} registered as {}", provider.id(), handle);
        if let Ok(mut providers) = self.providers.lock() {
            providers.push((handle, provider));
        }
        handle
    }

    fn unregister_provider(&self, handle: RegistrationHandle) {
        if let Ok(mut providers) = self.providers.lock() {
            providers.retain(|(h, _)| *h != handle);
        }
    }

    fn notify(&self, title: &str, details: &str) {
        eprintln!("{title}\n{details}");
    }

    fn lookup_app(&self, app_id: &str) -> Option<Arc<dyn DesktopApp>> {
        Some(Arc::new(LaunchedApp {
            id: app_id.to_string(),
        }))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_config = LogConfig::from_env().with_overrides(args.log_level, args.log_file);
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let host = Arc::new(ConsoleHost::default());
    let mut context = ExtensionContext::from_root(&root, host.clone())?;
    context.config = context.config.with_overrides(args.interpreter, args.helper);
    info!(
        "Probing {} ({})",
        context.metadata.name,
        context.root.display()
    );

    let extension = Extension::new(context);
    if let Some(load) = extension.enable() {
        load.await?;
    }

    if !extension.state().is_registered() {
        warn!("No providers registered");
        std::process::exit(1);
    }

    for provider in host.providers() {
        let ids = provider.get_initial_result_set(&args.terms);
        let shown = provider.filter_results(ids.clone(), args.limit);
        println!("{} ({} of {} results)", provider.id(), shown.len(), ids.len());
        for meta in provider.get_result_metas(&shown) {
            println!("  {:<30} {}  [{}]", meta.name, meta.description, meta.id);
        }

        if let Some(id) = &args.activate {
            if ids.contains(id) {
                provider.activate_result(id, &args.terms);
            }
        }
    }

    extension.disable();
    Ok(())
}
