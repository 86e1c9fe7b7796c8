//! Filtered view over the prompt collection
//!
//! A prompt is visible when it satisfies the search text, the folder
//! selection and the tag selection at the same time. Insertion order is
//! preserved; the store never re-sorts.

use super::types::{Prompt, StoreState};

/// Resolved filter criteria derived from the current selection state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFilter {
    /// Lowercased search text; empty matches everything
    query: String,
    folder_id: Option<String>,
    /// Name of the selected tag. `None` when no tag is selected *or* the
    /// selected id no longer resolves, in which case every prompt passes.
    tag_name: Option<String>,
}

impl PromptFilter {
    /// Build the filter for the selection held in `state`
    pub fn from_state(state: &StoreState) -> Self {
        let tag_name = state.selection.tag_id.as_deref().and_then(|tag_id| {
            state
                .tags
                .iter()
                .find(|t| t.id == tag_id)
                .map(|t| t.name.clone())
        });

        Self {
            query: state.selection.search_query.to_lowercase(),
            folder_id: state.selection.folder_id.clone(),
            tag_name,
        }
    }

    /// Case-insensitive substring match against title, content and tags
    pub fn matches_search(&self, prompt: &Prompt) -> bool {
        if self.query.is_empty() {
            return true;
        }
        prompt.title.to_lowercase().contains(&self.query)
            || prompt.content.to_lowercase().contains(&self.query)
            || prompt
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&self.query))
    }

    pub fn matches_folder(&self, prompt: &Prompt) -> bool {
        match &self.folder_id {
            None => true,
            Some(folder_id) => prompt.folder_id.as_deref() == Some(folder_id.as_str()),
        }
    }

    pub fn matches_tag(&self, prompt: &Prompt) -> bool {
        match &self.tag_name {
            None => true,
            Some(name) => prompt.has_tag(name),
        }
    }

    pub fn matches(&self, prompt: &Prompt) -> bool {
        self.matches_search(prompt) && self.matches_folder(prompt) && self.matches_tag(prompt)
    }

    /// Apply the filter, keeping insertion order
    pub fn apply<'a>(&self, prompts: &'a [Prompt]) -> Vec<&'a Prompt> {
        prompts.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{Selection, Tag};
    use chrono::Utc;
    use std::sync::Arc;

    fn prompt(id: &str, title: &str, content: &str, tags: &[&str], folder: Option<&str>) -> Prompt {
        let now = Utc::now();
        Prompt {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            folder_id: folder.map(str::to_string),
            is_favorite: false,
            created_at: now,
            updated_at: now,
            version: 1,
            history: vec![],
        }
    }

    fn state_with(prompts: Vec<Prompt>, tags: Vec<Tag>, selection: Selection) -> StoreState {
        StoreState {
            prompts: Arc::new(prompts),
            tags: Arc::new(tags),
            selection,
            ..StoreState::default()
        }
    }

    fn ids(found: Vec<&Prompt>) -> Vec<&str> {
        found.into_iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_search_matches_title_content_and_tags_case_insensitively() {
        let prompts = vec![
            prompt("1", "Code Review", "x", &[], None),
            prompt("2", "Essay", "write some CODE", &[], None),
            prompt("3", "Misc", "y", &["Coding"], None),
            prompt("4", "Poem", "roses", &["writing"], None),
        ];
        let state = state_with(
            prompts,
            vec![],
            Selection {
                search_query: "code".to_string(),
                ..Selection::default()
            },
        );
        let filter = PromptFilter::from_state(&state);
        assert_eq!(ids(filter.apply(&state.prompts)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let prompts = vec![prompt("1", "a", "b", &[], None), prompt("2", "c", "d", &[], None)];
        let state = state_with(prompts, vec![], Selection::default());
        let filter = PromptFilter::from_state(&state);
        assert_eq!(filter.apply(&state.prompts).len(), 2);
    }

    #[test]
    fn test_folder_selection_requires_exact_folder() {
        let prompts = vec![
            prompt("1", "a", "b", &[], Some("f1")),
            prompt("2", "a", "b", &[], Some("f2")),
            prompt("3", "a", "b", &[], None),
        ];
        let state = state_with(
            prompts,
            vec![],
            Selection {
                folder_id: Some("f1".to_string()),
                ..Selection::default()
            },
        );
        let filter = PromptFilter::from_state(&state);
        assert_eq!(ids(filter.apply(&state.prompts)), vec!["1"]);
    }

    #[test]
    fn test_tag_selection_matches_by_name() {
        let tag = Tag {
            id: "t1".to_string(),
            name: "coding".to_string(),
            color: None,
            created_at: Utc::now(),
        };
        let prompts = vec![
            prompt("1", "a", "b", &["coding"], None),
            prompt("2", "a", "b", &["writing"], None),
        ];
        let state = state_with(
            prompts,
            vec![tag],
            Selection {
                tag_id: Some("t1".to_string()),
                ..Selection::default()
            },
        );
        let filter = PromptFilter::from_state(&state);
        assert_eq!(ids(filter.apply(&state.prompts)), vec!["1"]);
    }

    #[test]
    fn test_unresolved_tag_selection_passes_everything() {
        let prompts = vec![
            prompt("1", "a", "b", &["coding"], None),
            prompt("2", "a", "b", &[], None),
        ];
        let state = state_with(
            prompts,
            vec![],
            Selection {
                tag_id: Some("gone".to_string()),
                ..Selection::default()
            },
        );
        let filter = PromptFilter::from_state(&state);
        assert_eq!(filter.apply(&state.prompts).len(), 2);
    }

    #[test]
    fn test_criteria_combine_conjunctively() {
        let tag = Tag {
            id: "t1".to_string(),
            name: "coding".to_string(),
            color: None,
            created_at: Utc::now(),
        };
        let prompts = vec![
            prompt("1", "Rust review", "b", &["coding"], Some("f1")),
            prompt("2", "Rust review", "b", &["coding"], Some("f2")),
            prompt("3", "Go review", "b", &["coding"], Some("f1")),
            prompt("4", "Rust review", "b", &[], Some("f1")),
        ];
        let state = state_with(
            prompts,
            vec![tag],
            Selection {
                folder_id: Some("f1".to_string()),
                tag_id: Some("t1".to_string()),
                search_query: "RUST".to_string(),
                ..Selection::default()
            },
        );
        let filter = PromptFilter::from_state(&state);
        assert_eq!(ids(filter.apply(&state.prompts)), vec!["1"]);
    }
}
