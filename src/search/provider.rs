//! Search provider backed by a project table
//!
//! One provider serves one IDE: it answers the shell's queries from an
//! immutable [`ProjectTable`] and opens picked projects in that IDE.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::ActivationError;
use super::matcher::{matching_ids, truncate_results};
use crate::host::{DesktopApp, HostError, ResultMeta, SearchProvider, ShellHost};
use crate::project::ProjectTable;

/// Notification title for failed launches
pub const LAUNCH_FAILED_TITLE: &str = "Failed to open project";

/// Search provider over the projects of one IDE
pub struct ProjectSearchProvider {
    id: String,
    app_id: String,
    app: Option<Arc<dyn DesktopApp>>,
    projects: Arc<ProjectTable>,
    host: Arc<dyn ShellHost>,
}

impl ProjectSearchProvider {
    /// Create a provider, resolving the IDE through the host
    ///
    /// A missing application is not an error here: results are still listed,
    /// without icons, and activation reports the missing application.
    pub fn new(
        id: impl Into<String>,
        app_id: impl Into<String>,
        projects: Arc<ProjectTable>,
        host: Arc<dyn ShellHost>,
    ) -> Self {
        let id = id.into();
        let app_id = app_id.into();
        let app = host.lookup_app(&app_id);
        if app.is_none() {
            warn!("Provider {}: application {} not installed", id, app_id);
        }

        Self {
            id,
            app_id,
            app,
            projects,
            host,
        }
    }

    pub fn projects(&self) -> &ProjectTable {
        &self.projects
    }

    /// Open the IDE with the given files
    pub fn launch(&self, files: &[PathBuf]) -> Result<(), ActivationError> {
        let app = self.app.as_ref().ok_or_else(|| {
            ActivationError::launch_failed(
                &self.app_id,
                HostError::AppNotFound {
                    app_id: self.app_id.clone(),
                },
            )
        })?;

        info!("Launching {} with {:?}", app.name(), files);
        app.launch(files)
            .map_err(|e| ActivationError::launch_failed(app.name(), e))
    }

    fn launch_or_notify(&self, files: &[PathBuf]) {
        if let Err(e) = self.launch(files) {
            warn!("{}", e);
            self.host.notify(LAUNCH_FAILED_TITLE, &e.to_string());
        }
    }
}

impl SearchProvider for ProjectSearchProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn get_initial_result_set(&self, terms: &[String]) -> Vec<String> {
        let ids = matching_ids(self.projects.iter(), terms);
        debug!("{}: {:?} matched {} projects", self.id, terms, ids.len());
        ids
    }

    fn get_subsearch_result_set(&self, previous: &[String], terms: &[String]) -> Vec<String> {
        let candidates = previous.iter().filter_map(|id| self.projects.get(id));
        let ids = matching_ids(candidates, terms);
        debug!(
            "{}: {:?} narrowed {} results to {}",
            self.id,
            terms,
            previous.len(),
            ids.len()
        );
        ids
    }

    fn get_result_metas(&self, ids: &[String]) -> Vec<ResultMeta> {
        ids.iter()
            .filter_map(|id| self.projects.get(id))
            .map(|project| {
                ResultMeta::new(
                    project.id.clone(),
                    project.name.clone(),
                    project.path.clone(),
                    self.app.clone(),
                )
            })
            .collect()
    }

    fn activate_result(&self, id: &str, _terms: &[String]) {
        match self.projects.get(id) {
            Some(project) => self.launch_or_notify(std::slice::from_ref(&project.abspath)),
            None => debug!("{}: ignoring activation of unknown result {}", self.id, id),
        }
    }

    fn launch_search(&self, _terms: &[String]) {
        // The IDE has no way to receive search terms on launch
        self.launch_or_notify(&[]);
    }

    fn filter_results(&self, results: Vec<String>, max: usize) -> Vec<String> {
        truncate_results(results, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::{MockApp, RecordingHost};
    use crate::project::Project;

    const APP_ID: &str = "jetbrains-idea.desktop";

    fn project(id: &str, name: &str, path: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            path: path.to_string(),
            abspath: PathBuf::from(path.replace('~', "/home/user")),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn foo_bar_table() -> Arc<ProjectTable> {
        Arc::new(
            vec![project("p1", "Foo", "~/foo"), project("p2", "Bar", "~/bar")]
                .into_iter()
                .collect(),
        )
    }

    fn provider_with_app(
        app: MockApp,
    ) -> (ProjectSearchProvider, Arc<MockApp>, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::new());
        let app = host.install_app(app);
        let provider =
            ProjectSearchProvider::new("provider", APP_ID, foo_bar_table(), host.clone());
        (provider, app, host)
    }

    #[test]
    fn test_initial_result_set_examples() {
        let (provider, _, _) = provider_with_app(MockApp::new(APP_ID, "IDEA"));

        assert_eq!(provider.get_initial_result_set(&strings(&["Fo"])), strings(&["p1"]));
        assert_eq!(provider.get_initial_result_set(&strings(&["fo"])), strings(&["p1"]));
        assert_eq!(
            provider.get_initial_result_set(&strings(&["~"])),
            strings(&["p1", "p2"])
        );
        assert!(provider.get_initial_result_set(&strings(&["zz"])).is_empty());
    }

    #[test]
    fn test_initial_result_set_matches_predicate_for_every_project() {
        let (provider, _, _) = provider_with_app(MockApp::new(APP_ID, "IDEA"));
        let queries = [
            vec![],
            strings(&["o"]),
            strings(&["a", "r"]),
            strings(&["~", "Foo"]),
            strings(&["Foo", "Bar"]),
        ];

        for terms in &queries {
            let ids = provider.get_initial_result_set(terms);
            for project in provider.projects().iter() {
                let expected = terms.iter().all(|t| {
                    project.name.contains(t.as_str()) || project.path.contains(t.as_str())
                });
                assert_eq!(ids.contains(&project.id), expected, "{terms:?} / {}", project.id);
            }
        }
    }

    #[test]
    fn test_subsearch_never_expands() {
        let (provider, _, _) = provider_with_app(MockApp::new(APP_ID, "IDEA"));

        let previous = strings(&["p2", "unknown"]);
        assert_eq!(
            provider.get_subsearch_result_set(&previous, &strings(&["~"])),
            strings(&["p2"])
        );
        assert!(provider
            .get_subsearch_result_set(&strings(&["p2"]), &strings(&["Foo"]))
            .is_empty());
        assert!(provider.get_subsearch_result_set(&[], &[]).is_empty());
    }

    #[test]
    fn test_result_metas_skip_unknown_ids() {
        let (provider, _, _) = provider_with_app(MockApp::new(APP_ID, "IDEA"));

        let metas = provider.get_result_metas(&strings(&["p2", "nope", "p1"]));
        assert_eq!(metas.len(), 2);
        assert_eq!(metas[0].id, "p2");
        assert_eq!(metas[0].name, "Bar");
        assert_eq!(metas[0].description, "~/bar");
        assert_eq!(metas[1].id, "p1");
        assert_eq!(metas[1].create_icon(64).unwrap().size, 64);
    }

    #[test]
    fn test_result_metas_without_app_have_no_icon() {
        let host = Arc::new(RecordingHost::new());
        let provider = ProjectSearchProvider::new("provider", APP_ID, foo_bar_table(), host);

        let metas = provider.get_result_metas(&strings(&["p1"]));
        assert_eq!(metas.len(), 1);
        assert!(metas[0].create_icon(16).is_none());
    }

    #[test]
    fn test_activate_result_opens_project() {
        let (provider, app, host) = provider_with_app(MockApp::new(APP_ID, "IDEA"));

        provider.activate_result("p1", &strings(&["Foo"]));
        provider.activate_result("unknown", &[]);

        assert_eq!(app.launches(), vec![vec![PathBuf::from("/home/user/foo")]]);
        assert!(host.notifications().is_empty());
    }

    #[test]
    fn test_activation_failure_is_notified() {
        let (provider, _, host) =
            provider_with_app(MockApp::new(APP_ID, "IDEA").failing("no display"));

        provider.activate_result("p2", &[]);

        let notifications = host.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, LAUNCH_FAILED_TITLE);
        assert_eq!(notifications[0].details, "Failed to launch IDEA: no display");
    }

    #[test]
    fn test_activation_without_app_is_notified() {
        let host = Arc::new(RecordingHost::new());
        let provider =
            ProjectSearchProvider::new("provider", APP_ID, foo_bar_table(), host.clone());

        provider.activate_result("p1", &[]);
        provider.launch_search(&strings(&["Foo"]));

        let notifications = host.notifications();
        assert_eq!(notifications.len(), 2);
        assert_eq!(
            notifications[0].details,
            format!("Application not found: {APP_ID}")
        );
    }

    #[test]
    fn test_launch_search_ignores_terms() {
        let (provider, app, _) = provider_with_app(MockApp::new(APP_ID, "IDEA"));

        provider.launch_search(&strings(&["Foo", "bar"]));

        assert_eq!(app.launches(), vec![Vec::<PathBuf>::new()]);
    }

    #[test]
    fn test_filter_results_truncates() {
        let (provider, _, _) = provider_with_app(MockApp::new(APP_ID, "IDEA"));
        let results = strings(&["p2", "p1", "p2"]);

        assert_eq!(provider.filter_results(results.clone(), 2), strings(&["p2", "p1"]));
        assert_eq!(provider.filter_results(results.clone(), 5), results);
    }
}
