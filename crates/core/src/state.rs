//! Editor session state as a value with pure transitions.
//!
//! [`AppState`] holds everything an editing front end tracks for one blog:
//! the fetched document, the edited text and markup, meta tags, schema
//! blocks, and the latest analysis. [`reduce`] applies an [`Action`] and
//! returns the next state; it never performs I/O. The analysis and
//! checklist are recomputed whenever the document they describe changes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analyzer::{OptimizationChecklist, StructureAnalysis};
use crate::content::DEFAULT_WORDS_PER_MINUTE;
use crate::pipeline::BlogDocument;

/// Head tags the editor lets a user override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTags {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,
}

impl MetaTags {
    pub fn from_document(document: &BlogDocument) -> Self {
        let metadata = &document.metadata;
        Self {
            title: metadata.title.clone(),
            description: metadata.description.clone().unwrap_or_default(),
            author: metadata.author.clone(),
            og_image: metadata.featured_image.clone(),
            canonical: Some(document.url.clone()),
            ..Default::default()
        }
    }

    /// Overwrites every field that `update` sets.
    pub fn merge(&mut self, update: MetaTagsUpdate) {
        let MetaTagsUpdate { title, description, author, keywords, og_title, og_description, og_image, canonical, robots } =
            update;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(keywords) = keywords {
            self.keywords = keywords;
        }
        for (slot, value) in [
            (&mut self.author, author),
            (&mut self.og_title, og_title),
            (&mut self.og_description, og_description),
            (&mut self.og_image, og_image),
            (&mut self.canonical, canonical),
            (&mut self.robots, robots),
        ] {
            if value.is_some() {
                *slot = value;
            }
        }
    }
}

/// Partial [`MetaTags`]; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaTagsUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub blog_url: String,
    pub original_blog: Option<BlogDocument>,
    /// Plain text of the edited content.
    pub editor_text: String,
    /// Markup of the edited content region.
    pub editor_html: String,
    pub meta_tags: Option<MetaTags>,
    /// JSON-LD blocks, opaque to the core.
    pub schemas: Vec<Value>,
    /// Ids of optimizations the user accepted.
    pub applied_optimizations: Vec<String>,
    pub structure_analysis: Option<StructureAnalysis>,
    pub checklist: Option<OptimizationChecklist>,
    pub is_fetching: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetBlogUrl(String),
    FetchStarted,
    /// Carries the user-facing message.
    FetchFailed(String),
    BlogLoaded(Box<BlogDocument>),
    EditorHtmlChanged(String),
    EditorTextChanged(String),
    UpdateMetaTags(MetaTagsUpdate),
    AddSchema(Value),
    /// Out-of-range indices are ignored.
    RemoveSchema(usize),
    UpdateSchema(usize, Value),
    ApplyOptimization(String),
    ClearError,
    Reset,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded document as currently edited: editor markup for the
    /// content and meta tag overrides for the metadata.
    pub fn current_document(&self) -> Option<BlogDocument> {
        let original = self.original_blog.as_ref()?;
        let mut document = original.with_content_html(&self.editor_html, DEFAULT_WORDS_PER_MINUTE);

        if let Some(tags) = &self.meta_tags {
            document.metadata.title = tags.title.clone();
            document.metadata.description = Some(tags.description.clone()).filter(|d| !d.is_empty());
            document.metadata.author = tags.author.clone();
        }

        Some(document)
    }

    /// Recomputes analysis and checklist for the current document.
    fn refresh(mut self) -> Self {
        match self.current_document() {
            Some(document) => {
                let (analysis, checklist) = document.checklist();
                self.structure_analysis = Some(analysis);
                self.checklist = Some(checklist);
            }
            None => {
                self.structure_analysis = None;
                self.checklist = None;
            }
        }
        self
    }
}

/// Applies `action` to `state`.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SetBlogUrl(url) => {
            state.blog_url = url;
            state
        }
        Action::FetchStarted => {
            state.is_fetching = true;
            state.error = None;
            state
        }
        Action::FetchFailed(message) => {
            state.is_fetching = false;
            state.error = Some(message);
            state
        }
        Action::BlogLoaded(document) => {
            state.editor_text = document.content.plain_text.clone();
            state.editor_html = document.content.html.clone();
            state.meta_tags = Some(MetaTags::from_document(&document));
            state.original_blog = Some(*document);
            state.is_fetching = false;
            state.error = None;
            state.refresh()
        }
        Action::EditorHtmlChanged(html) => {
            state.editor_html = html;
            if let Some(document) = state.current_document() {
                state.editor_text = document.content.plain_text;
            }
            state.refresh()
        }
        Action::EditorTextChanged(text) => {
            state.editor_text = text;
            state
        }
        Action::UpdateMetaTags(update) => {
            let Some(tags) = state.meta_tags.as_mut() else {
                return state;
            };
            tags.merge(update);
            state.refresh()
        }
        Action::AddSchema(schema) => {
            state.schemas.push(schema);
            state
        }
        Action::RemoveSchema(index) => {
            if index < state.schemas.len() {
                state.schemas.remove(index);
            }
            state
        }
        Action::UpdateSchema(index, schema) => {
            if let Some(slot) = state.schemas.get_mut(index) {
                *slot = schema;
            }
            state
        }
        Action::ApplyOptimization(id) => {
            state.applied_optimizations.push(id);
            state
        }
        Action::ClearError => {
            state.error = None;
            state
        }
        Action::Reset => AppState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Check, ChecklistStatus};
    use crate::pipeline::analyze_html;
    use serde_json::json;

    const POST: &str = r#"<html><head><title>Bread</title><meta name="description" content="All about bread"></head>
        <body><article><h1>How do I bake bread?</h1><p>Knead, rest, bake.</p>
        <p>Bread is one of the oldest prepared foods and every culture has its own take on it.</p></article></body></html>"#;

    fn loaded() -> AppState {
        let document = analyze_html(POST, "https://example.com/bread");
        reduce(AppState::new(), Action::BlogLoaded(Box::new(document)))
    }

    #[test]
    fn test_blog_loaded_seeds_editor_and_analysis() {
        let state = loaded();

        assert!(state.editor_html.contains("<h1>How do I bake bread?</h1>"));
        assert!(state.editor_text.starts_with("How do I bake bread?"));

        let tags = state.meta_tags.as_ref().unwrap();
        assert_eq!(tags.title, "Bread");
        assert_eq!(tags.description, "All about bread");

        let analysis = state.structure_analysis.as_ref().unwrap();
        assert!(analysis.has_main_question);
        assert!(!analysis.has_author_info);
        assert_eq!(state.checklist.as_ref().unwrap().main_question.status, ChecklistStatus::Complete);
    }

    #[test]
    fn test_fetch_lifecycle() {
        let state = reduce(AppState::new(), Action::SetBlogUrl("https://example.com".into()));
        let state = reduce(state, Action::FetchStarted);
        assert!(state.is_fetching);

        let state = reduce(state, Action::FetchFailed("Request timeout.".into()));
        assert!(!state.is_fetching);
        assert_eq!(state.error.as_deref(), Some("Request timeout."));
        assert_eq!(state.blog_url, "https://example.com");

        let state = reduce(state, Action::ClearError);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_editing_html_recomputes_analysis() {
        let state = loaded();
        let before = state.structure_analysis.clone().unwrap();

        let edited = format!("{}<img src=\"/loaf.png\" alt=\"Loaf\">", state.editor_html);
        let state = reduce(state, Action::EditorHtmlChanged(edited));
        let after = state.structure_analysis.unwrap();

        assert!(!before.has_visuals);
        assert!(after.has_visuals);
        assert_eq!(after.score, before.score + Check::Visuals.weight());
    }

    #[test]
    fn test_editing_html_refreshes_text() {
        let state = reduce(loaded(), Action::EditorHtmlChanged("<p>Fresh words</p>".into()));
        assert_eq!(state.editor_text, "Fresh words");
    }

    #[test]
    fn test_meta_tag_author_satisfies_author_check() {
        let state = reduce(
            loaded(),
            Action::UpdateMetaTags(MetaTagsUpdate { author: Some("Jane Baker".into()), ..Default::default() }),
        );

        assert_eq!(state.meta_tags.as_ref().unwrap().author.as_deref(), Some("Jane Baker"));
        assert_eq!(state.meta_tags.as_ref().unwrap().title, "Bread");
        assert!(state.structure_analysis.unwrap().has_author_info);
    }

    #[test]
    fn test_meta_update_without_blog_is_ignored() {
        let state = reduce(AppState::new(), Action::UpdateMetaTags(MetaTagsUpdate::default()));
        assert_eq!(state, AppState::new());
    }

    #[test]
    fn test_schema_list_operations() {
        let state = reduce(AppState::new(), Action::AddSchema(json!({"@type": "Article"})));
        let state = reduce(state, Action::AddSchema(json!({"@type": "FAQPage"})));
        let state = reduce(state, Action::UpdateSchema(0, json!({"@type": "BlogPosting"})));
        let state = reduce(state, Action::UpdateSchema(9, json!({"@type": "Ignored"})));
        let state = reduce(state, Action::RemoveSchema(1));
        let state = reduce(state, Action::RemoveSchema(5));

        assert_eq!(state.schemas, vec![json!({"@type": "BlogPosting"})]);
    }

    #[test]
    fn test_applied_optimizations_accumulate() {
        let state = reduce(AppState::new(), Action::ApplyOptimization("tldr".into()));
        let state = reduce(state, Action::ApplyOptimization("cta".into()));
        assert_eq!(state.applied_optimizations, vec!["tldr", "cta"]);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let state = reduce(loaded(), Action::AddSchema(json!({})));
        assert_eq!(reduce(state, Action::Reset), AppState::default());
    }

    #[test]
    fn test_current_document_requires_blog() {
        assert!(AppState::new().current_document().is_none());
        assert_eq!(loaded().current_document().unwrap().metadata.title, "Bread");
    }
}
