use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// A recently opened IDE project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Unique id assigned by the helper, usually derived from `abspath`
    pub id: String,
    /// Display name
    pub name: String,
    /// Human readable path, typically with the home directory shortened to `~`
    pub path: String,
    /// Absolute filesystem path, handed to the IDE on activation
    pub abspath: PathBuf,
}

/// Projects from one helper run, keyed by id
///
/// Iterates in helper order. A repeated id replaces the earlier project but
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTable {
    projects: Vec<Project>,
    index: HashMap<String, usize>,
}

impl ProjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.index.get(id).map(|&position| &self.projects[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(|project| project.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    fn insert(&mut self, project: Project) {
        match self.index.get(&project.id) {
            Some(&position) => self.projects[position] = project,
            None => {
                self.index.insert(project.id.clone(), self.projects.len());
                self.projects.push(project);
            }
        }
    }
}

impl FromIterator<Project> for ProjectTable {
    fn from_iter<I: IntoIterator<Item = Project>>(iter: I) -> Self {
        let mut table = ProjectTable::new();
        for project in iter {
            table.insert(project);
        }
        table
    }
}

/// Everything one helper run discovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectCatalog {
    /// Projects of a single IDE
    Single(ProjectTable),
    /// Projects per IDE product, keyed by product key (`idea`, `webstorm`, ...)
    Products(BTreeMap<String, ProjectTable>),
}

impl ProjectCatalog {
    /// Total number of projects across all tables
    pub fn project_count(&self) -> usize {
        match self {
            ProjectCatalog::Single(table) => table.len(),
            ProjectCatalog::Products(tables) => tables.values().map(ProjectTable::len).sum(),
        }
    }
}
