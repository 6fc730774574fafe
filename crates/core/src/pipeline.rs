//! The fetch → extract → analyze pipeline.
//!
//! [`Pipeline`] turns a URL or a [`RawDocument`] into a [`BlogDocument`].
//! Platform detection, metadata, and content extraction are independent
//! pure functions of the same markup; the pipeline parses once and runs
//! all three on that tree. The pipeline holds configuration only, so one
//! instance can serve any number of concurrent requests.
//!
//! # Example
//!
//! ```rust
//! use postgrade_core::Pipeline;
//!
//! let html = r#"<html><head><title>Why Rust?</title></head>
//!     <body><h1>Why Rust?</h1><p>Because it is fast.</p></body></html>"#;
//!
//! let document = Pipeline::new().analyze_html(html, "https://example.com/why-rust");
//! assert_eq!(document.metadata.title, "Why Rust?");
//!
//! let analysis = document.analyze();
//! assert!(analysis.has_main_question);
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::analyzer::{self, OptimizationChecklist, StructureAnalysis};
use crate::content::{ContentConfig, ParsedContent};
use crate::fetch::{FetchConfig, RawDocument};
use crate::metadata::Metadata;
use crate::parse::Document;
use crate::platform::Platform;
use crate::readability::ReadabilityConfig;

#[cfg(feature = "fetch")]
use crate::Result;

#[cfg(feature = "fetch")]
use crate::fetch::fetch_url;

/// A fully extracted blog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDocument {
    pub url: String,
    pub metadata: Metadata,
    pub content: ParsedContent,
    pub platform: Platform,
}

impl BlogDocument {
    pub fn base_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }

    /// Runs the structural checks.
    pub fn analyze(&self) -> StructureAnalysis {
        analyzer::analyze_structure(self)
    }

    /// Runs the structural checks and renders the checklist.
    pub fn checklist(&self) -> (StructureAnalysis, OptimizationChecklist) {
        let analysis = self.analyze();
        let checklist = analyzer::generate_checklist(self, &analysis);
        (analysis, checklist)
    }

    /// Copy of this document whose content is re-derived from edited
    /// region markup. Metadata and platform are kept.
    pub fn with_content_html(&self, html: &str, words_per_minute: usize) -> Self {
        let base = self.base_url();
        Self { content: ParsedContent::from_html(html, base.as_ref(), words_per_minute), ..self.clone() }
    }
}

/// Settings for every pipeline stage.
///
/// ```rust
/// use postgrade_core::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .min_container_chars(200)
///     .words_per_minute(250)
///     .timeout(30)
///     .build();
///
/// assert_eq!(config.content.min_container_chars, 200);
/// assert_eq!(config.fetch.timeout, 30);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub content: ContentConfig,
    pub fetch: FetchConfig,
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Characters a selector-matched container must exceed.
    pub fn min_container_chars(mut self, value: usize) -> Self {
        self.config.content.min_container_chars = value;
        self
    }

    pub fn words_per_minute(mut self, value: usize) -> Self {
        self.config.content.words_per_minute = value;
        self
    }

    pub fn readability(mut self, value: ReadabilityConfig) -> Self {
        self.config.content.readability = value;
        self
    }

    /// Minimum score for the readability tier's best candidate.
    pub fn min_readability_score(mut self, value: f64) -> Self {
        self.config.content.readability.min_score = value;
        self
    }

    /// HTTP timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    pub fn max_redirects(mut self, value: usize) -> Self {
        self.config.fetch.max_redirects = value;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

/// Stateless entry point for extraction.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Builds the document model from already-retrieved markup.
    pub fn assemble(&self, raw: &RawDocument) -> BlogDocument {
        let base = raw.base_url();
        let doc = Document::parse(&raw.html);

        BlogDocument {
            url: raw.final_url.clone(),
            metadata: doc.extract_metadata(base.as_ref()),
            content: doc.extract_content(&raw.html, base.as_ref(), &self.config.content),
            platform: doc.detect_platform(&raw.final_url),
        }
    }

    /// Builds the document model from markup and the URL it came from.
    pub fn analyze_html(&self, html: &str, url: &str) -> BlogDocument {
        self.assemble(&RawDocument::from_html(html, url))
    }

    /// Fetches `url` with this pipeline's fetch settings.
    #[cfg(feature = "fetch")]
    pub async fn fetch(&self, url: &str) -> Result<RawDocument> {
        fetch_url(url, &self.config.fetch).await
    }

    /// Fetches `url` and builds its document model.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_analyze(&self, url: &str) -> Result<BlogDocument> {
        let raw = self.fetch(url).await?;
        Ok(self.assemble(&raw))
    }
}

/// One-shot extraction with default settings.
pub fn analyze_html(html: &str, url: &str) -> BlogDocument {
    Pipeline::new().analyze_html(html, url)
}

/// One-shot fetch and extraction with default settings.
#[cfg(feature = "fetch")]
pub async fn fetch_and_analyze(url: &str) -> Result<BlogDocument> {
    Pipeline::new().fetch_and_analyze(url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDPRESS_POST: &str = r#"
        <html lang="en">
        <head>
            <meta name="generator" content="WordPress 6.4">
            <meta name="author" content="Jane Writer">
            <title>How do I proof sourdough?</title>
        </head>
        <body>
            <nav><a href="/">Home</a></nav>
            <div class="entry-content">
                <h1>How do I proof sourdough?</h1>
                <p>Proof it overnight in the fridge.</p>
                <h2>Steps</h2>
                <ul><li>Shape the dough, then cover it</li><li>Chill for 12 hours</li></ul>
                <p>According to bakers, cold proofing improves flavour by 30%.</p>
                <p>Key takeaways: go slow. Subscribe for more recipes.</p>
                <img src="/loaf.jpg" alt="Loaf">
            </div>
        </body>
        </html>
    "#;

    #[test]
    fn test_assemble_runs_every_stage() {
        let document = analyze_html(WORDPRESS_POST, "https://bakery.example.com/sourdough");

        assert_eq!(document.url, "https://bakery.example.com/sourdough");
        assert_eq!(document.platform, Platform::WordPress);
        assert_eq!(document.metadata.title, "How do I proof sourdough?");
        assert_eq!(document.metadata.lang.as_deref(), Some("en"));
        assert_eq!(document.content.images[0].src, "https://bakery.example.com/loaf.jpg");
        assert!(!document.content.plain_text.contains("Home"));
    }

    #[test]
    fn test_well_structured_post_scores_full_marks() {
        let (analysis, checklist) = analyze_html(WORDPRESS_POST, "https://bakery.example.com/sourdough").checklist();

        assert_eq!(analysis.score, 100, "{:?}", analysis.recommendations);
        assert!(analysis.recommendations.is_empty());
        assert!(checklist.items().all(|(_, item)| item.ai_suggestion.is_none()));
    }

    #[test]
    fn test_with_content_html_keeps_metadata() {
        let document = analyze_html(WORDPRESS_POST, "https://bakery.example.com/sourdough");
        let edited = document.with_content_html("<p>Rewritten in two words</p>", 200);

        assert_eq!(edited.metadata, document.metadata);
        assert_eq!(edited.content.word_count, 4);
        assert!(!edited.analyze().has_main_question);
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::builder()
            .min_readability_score(5.0)
            .max_redirects(2)
            .user_agent("postgrade-test")
            .build();

        assert_eq!(config.content.readability.min_score, 5.0);
        assert_eq!(config.fetch.max_redirects, 2);
        assert_eq!(config.fetch.user_agent, "postgrade-test");
        assert_eq!(config.content.words_per_minute, 200);
    }

    #[test]
    fn test_words_per_minute_drives_reading_time() {
        let html = format!("<html><body><article><p>{}</p></article></body></html>", "word ".repeat(300));
        let pipeline = Pipeline::with_config(PipelineConfig::builder().words_per_minute(100).build());

        assert_eq!(pipeline.analyze_html(&html, "https://example.com").content.reading_time, 3);
    }
}
