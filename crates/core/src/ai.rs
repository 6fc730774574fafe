//! Contract for the AI content optimizer.
//!
//! The core hands an optimizer the plain text and a few metadata fields
//! and receives opaque JSON back. It never inspects or validates that
//! output. No optimizer ships with this crate; callers plug one in through
//! [`ContentOptimizer`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::Result;
use crate::analyzer::{Check, StructureAnalysis};
use crate::pipeline::BlogDocument;
use crate::state::AppState;

/// What an optimizer gets to see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInput {
    pub plain_text: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl AiInput {
    pub fn from_document(document: &BlogDocument) -> Self {
        Self {
            plain_text: document.content.plain_text.clone(),
            title: document.metadata.title.clone(),
            description: document.metadata.description.clone(),
            author: document.metadata.author.clone(),
        }
    }

    /// Input for the edited text and meta tags. `None` before a blog is loaded.
    pub fn from_state(state: &AppState) -> Option<Self> {
        let document = state.original_blog.as_ref()?;
        let mut input = Self::from_document(document);
        input.plain_text = state.editor_text.clone();

        if let Some(tags) = &state.meta_tags {
            input.title = tags.title.clone();
            input.description = Some(tags.description.clone()).filter(|d| !d.is_empty());
            input.author = tags.author.clone();
        }

        Some(input)
    }
}

/// Section an optimizer is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptimizationTarget {
    MetaTags,
    SchemaMarkup,
    MainQuestion,
    DirectAnswer,
    TldrSummary,
    CallToAction,
    AuthorCredibility,
    Formatting,
}

impl OptimizationTarget {
    /// The target that fixes a failing check, if text generation can.
    pub fn for_check(check: Check) -> Option<Self> {
        match check {
            Check::MainQuestion => Some(Self::MainQuestion),
            Check::DirectAnswer => Some(Self::DirectAnswer),
            Check::Tldr => Some(Self::TldrSummary),
            Check::CallToAction => Some(Self::CallToAction),
            Check::Formatting => Some(Self::Formatting),
            Check::AuthorInfo => Some(Self::AuthorCredibility),
            Check::Visuals | Check::CitableContent => None,
        }
    }
}

#[async_trait]
pub trait ContentOptimizer: Send + Sync {
    /// Produces content for `target`. The result is passed through untouched.
    async fn optimize(&self, input: &AiInput, target: OptimizationTarget) -> Result<Value>;
}

/// Targets for every failing check, in rubric order.
pub fn pending_targets(analysis: &StructureAnalysis) -> Vec<OptimizationTarget> {
    analysis.failing().filter_map(OptimizationTarget::for_check).collect()
}

/// Runs `optimizer` once per pending target. Stops at the first error.
pub async fn optimize_pending(
    optimizer: &dyn ContentOptimizer, input: &AiInput, analysis: &StructureAnalysis,
) -> Result<Vec<(OptimizationTarget, Value)>> {
    let mut results = Vec::new();
    for target in pending_targets(analysis) {
        debug!(?target, "requesting optimization");
        let value = optimizer.optimize(input, target).await?;
        results.push((target, value));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PostgradeError;
    use crate::pipeline::analyze_html;
    use crate::state::{Action, MetaTagsUpdate, reduce};
    use serde_json::json;
    use std::sync::Mutex;

    struct Recording {
        calls: Mutex<Vec<OptimizationTarget>>,
        fail_on: Option<OptimizationTarget>,
    }

    impl Recording {
        fn new(fail_on: Option<OptimizationTarget>) -> Self {
            Self { calls: Mutex::new(Vec::new()), fail_on }
        }
    }

    #[async_trait]
    impl ContentOptimizer for Recording {
        async fn optimize(&self, input: &AiInput, target: OptimizationTarget) -> Result<Value> {
            self.calls.lock().unwrap().push(target);
            if self.fail_on == Some(target) {
                return Err(PostgradeError::Optimizer("quota exceeded".into()));
            }
            Ok(json!({ "target": target, "title": input.title }))
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Runtime::new().unwrap().block_on(future)
    }

    const POST: &str = r#"<html><head><title>Bread</title></head>
        <body><h1>How do I bake bread?</h1><p>Knead it.</p><img src="/a.png"></body></html>"#;

    #[test]
    fn test_pending_targets_skip_non_text_checks() {
        let analysis = StructureAnalysis::from_results(|_| false);
        let targets = pending_targets(&analysis);

        assert_eq!(
            targets,
            vec![
                OptimizationTarget::MainQuestion,
                OptimizationTarget::DirectAnswer,
                OptimizationTarget::TldrSummary,
                OptimizationTarget::CallToAction,
                OptimizationTarget::Formatting,
                OptimizationTarget::AuthorCredibility,
            ]
        );
        assert!(pending_targets(&StructureAnalysis::from_results(|_| true)).is_empty());
    }

    #[test]
    fn test_input_from_document() {
        let input = AiInput::from_document(&analyze_html(POST, "https://example.com/bread"));
        assert_eq!(input.title, "Bread");
        assert!(input.plain_text.contains("Knead it."));
        assert_eq!(input.author, None);
    }

    #[test]
    fn test_input_from_state_uses_edits() {
        assert!(AiInput::from_state(&AppState::new()).is_none());

        let document = analyze_html(POST, "https://example.com/bread");
        let state = reduce(AppState::new(), Action::BlogLoaded(Box::new(document)));
        let state = reduce(state, Action::EditorTextChanged("Edited body".into()));
        let state = reduce(
            state,
            Action::UpdateMetaTags(MetaTagsUpdate { title: Some("Better bread".into()), ..Default::default() }),
        );

        let input = AiInput::from_state(&state).unwrap();
        assert_eq!(input.plain_text, "Edited body");
        assert_eq!(input.title, "Better bread");
    }

    #[test]
    fn test_optimize_pending_passes_output_through() {
        let document = analyze_html(POST, "https://example.com/bread");
        let analysis = document.analyze();
        let optimizer = Recording::new(None);

        let results = block_on(optimize_pending(&optimizer, &AiInput::from_document(&document), &analysis)).unwrap();

        assert_eq!(results.len(), pending_targets(&analysis).len());
        assert!(!results.iter().any(|(target, _)| *target == OptimizationTarget::MainQuestion));
        assert_eq!(results[0].1["title"], "Bread");
    }

    #[test]
    fn test_optimize_pending_stops_on_error() {
        let analysis = StructureAnalysis::from_results(|_| false);
        let optimizer = Recording::new(Some(OptimizationTarget::DirectAnswer));

        let result = block_on(optimize_pending(&optimizer, &AiInput::default(), &analysis));

        assert!(matches!(result, Err(PostgradeError::Optimizer(_))));
        assert_eq!(
            *optimizer.calls.lock().unwrap(),
            vec![OptimizationTarget::MainQuestion, OptimizationTarget::DirectAnswer]
        );
    }
}
