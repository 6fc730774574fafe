pub mod ai;
pub mod analyzer;
pub mod content;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod parse;
pub mod pipeline;
pub mod platform;
pub mod preprocess;
pub mod readability;
pub mod report;
pub mod state;

pub use ai::{AiInput, ContentOptimizer, OptimizationTarget, optimize_pending, pending_targets};
pub use analyzer::{
    Check, ChecklistItem, ChecklistStatus, OptimizationChecklist, StructureAnalysis, analyze_structure,
    generate_checklist,
};
pub use content::{Heading, Image, Link, ParsedContent, Tier, parse_content, parse_content_with_config};
pub use error::{PostgradeError, Result};
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use fetch::{FetchConfig, RawDocument, fetch_file, fetch_stdin, validate_url};
pub use metadata::{Metadata, extract_metadata};
pub use parse::{Document, Element, Node};
#[cfg(feature = "fetch")]
pub use pipeline::fetch_and_analyze;
pub use pipeline::{BlogDocument, Pipeline, PipelineConfig, PipelineConfigBuilder, analyze_html};
pub use platform::{Platform, detect as detect_platform};
#[doc(hidden)]
pub use preprocess::{PreprocessConfig, preprocess_html};
pub use readability::ReadabilityConfig;
pub use report::Report;
pub use state::{Action, AppState, MetaTags, MetaTagsUpdate, reduce};
