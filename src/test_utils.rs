//! Test utilities and global setup
//!
//! Provides centralized test logging configuration and fixture extensions
//! with scripted helpers.

/// Test logging utilities
#[cfg(all(test, feature = "test-logging"))]
pub mod logging {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Initialize test logging globally - safe to call multiple times
    ///
    /// Respects `RUST_LOG`, defaulting to debug output for this crate.
    ///
    /// ```bash
    /// RUST_LOG=idea_search_provider=trace cargo test --features test-logging
    /// ```
    pub fn init() {
        INIT.call_once(|| {
            let env_filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("debug,tokio=info"));

            fmt()
                .with_env_filter(env_filter)
                .with_test_writer()
                .with_target(true)
                .with_thread_ids(true)
                .init();
        });
    }

    #[ctor::ctor]
    fn init_test_logging() {
        init();
    }
}

/// Extension roots on disk with shell-scripted helpers
#[cfg(test)]
pub mod fixtures {
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::config::{DEFAULT_HELPER_SCRIPT, ExtensionConfig};

    /// Temporary extension root
    pub struct FixtureExtension {
        dir: TempDir,
    }

    impl FixtureExtension {
        pub fn new() -> Self {
            Self {
                dir: TempDir::new().expect("Failed to create temp dir"),
            }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        /// Configuration running the helper with `sh`
        pub fn config(&self) -> ExtensionConfig {
            ExtensionConfig::builder()
                .interpreter("sh")
                .build()
                .expect("Fixture config is valid")
        }

        /// Write the helper script with the given shell body
        pub fn write_helper(&self, body: &str) {
            fs::write(self.root().join(DEFAULT_HELPER_SCRIPT), body)
                .expect("Failed to write helper");
        }

        /// Helper printing `output` verbatim
        pub fn write_helper_output(&self, output: &str) {
            self.write_helper(&format!("cat <<'EOF'\n{output}\nEOF\n"));
        }

        /// Helper reporting the given single-product projects
        pub fn write_success_helper(&self, projects: &[String]) {
            self.write_helper_output(&format!(
                r#"{{"kind": "success", "projects": [{}]}}"#,
                projects.join(", ")
            ));
        }

        pub fn write_metadata(&self, json: &str) {
            fs::write(self.root().join("metadata.json"), json).expect("Failed to write metadata");
        }
    }

    /// JSON object for one project entry
    pub fn project_json(id: &str, name: &str, path: &str, abspath: &str) -> String {
        serde_json::json!({
            "id": id,
            "name": name,
            "path": path,
            "abspath": abspath,
        })
        .to_string()
    }
}
