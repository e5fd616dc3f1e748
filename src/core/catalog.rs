use std::collections::BTreeMap;

use super::label::Label;
use super::project::Project;

/// Session snapshot of labels and projects, keyed by id with display names
/// (`@label`, `#project`) precomputed. Built once per refresh and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    labels: BTreeMap<u64, String>,
    projects: BTreeMap<u64, String>,
}

impl Catalog {
    pub fn new(labels: &[Label], projects: &[Project]) -> Self {
        Self {
            labels: labels.iter().map(|l| (l.id, l.display_name())).collect(),
            projects: projects.iter().map(|p| (p.id, p.display_name())).collect(),
        }
    }

    pub fn projects(&self) -> &BTreeMap<u64, String> {
        &self.projects
    }

    pub fn labels(&self) -> &BTreeMap<u64, String> {
        &self.labels
    }

    /// Display name of a project, or an empty string for unknown ids.
    pub fn project_name(&self, id: u64) -> &str {
        self.projects.get(&id).map(String::as_str).unwrap_or("")
    }

    /// Display names for the given label ids, skipping unknown ones.
    pub fn label_names(&self, ids: &[u64]) -> Vec<&str> {
        ids.iter()
            .filter_map(|id| self.labels.get(id).map(String::as_str))
            .collect()
    }

    pub fn find_project(&self, name: &str) -> Option<u64> {
        match_project(&self.projects, name)
    }
}

/// Case-insensitive project lookup by display name. The leading `#` marker
/// is optional on both sides. Id 0 never matches.
pub fn match_project(projects: &BTreeMap<u64, String>, name: &str) -> Option<u64> {
    let wanted = name.trim().trim_start_matches('#').to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    projects
        .iter()
        .filter(|(id, _)| **id != 0)
        .find(|(_, display)| display.trim_start_matches('#').to_lowercase() == wanted)
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let labels = vec![
            Label { id: 10, name: "home".into(), order: 1 },
            Label { id: 11, name: "errand".into(), order: 2 },
        ];
        let projects = vec![
            Project { id: 1, name: "Inbox".into(), order: 0, indent: 1, comment_count: 0 },
            Project { id: 2, name: "Work".into(), order: 1, indent: 1, comment_count: 0 },
            Project { id: 3, name: "Größe".into(), order: 2, indent: 2, comment_count: 0 },
        ];
        Catalog::new(&labels, &projects)
    }

    #[test]
    fn display_names_carry_markers() {
        let c = catalog();
        assert_eq!(c.project_name(2), "#Work");
        assert_eq!(c.project_name(99), "");
        assert_eq!(c.label_names(&[11, 99, 10]), vec!["@errand", "@home"]);
    }

    #[test]
    fn project_lookup_ignores_case_and_marker() {
        let c = catalog();
        assert_eq!(c.find_project("#work"), Some(2));
        assert_eq!(c.find_project("WORK"), Some(2));
        assert_eq!(c.find_project(" inbox "), Some(1));
        assert_eq!(c.find_project("#GRÖSSE"), None);
        assert_eq!(c.find_project("#größe"), Some(3));
        assert_eq!(c.find_project("nope"), None);
        assert_eq!(c.find_project("#"), None);
    }
}
