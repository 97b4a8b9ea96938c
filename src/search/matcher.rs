//! Term matching over project tables

use crate::project::Project;

/// Whether every term occurs in the project's name or readable path
///
/// Matching is a case-sensitive substring test. Terms are AND-ed; an empty
/// term list matches everything.
pub fn matches_terms(project: &Project, terms: &[String]) -> bool {
    terms
        .iter()
        .all(|term| project.name.contains(term.as_str()) || project.path.contains(term.as_str()))
}

/// Ids of the matching projects, in candidate order
pub fn matching_ids<'a>(
    candidates: impl IntoIterator<Item = &'a Project>,
    terms: &[String],
) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|project| matches_terms(project, terms))
        .map(|project| project.id.clone())
        .collect()
}

/// The first `max` results, order untouched
pub fn truncate_results(mut results: Vec<String>, max: usize) -> Vec<String> {
    results.truncate(max);
    results
}
