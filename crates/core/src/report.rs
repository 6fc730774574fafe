//! Text and JSON rendering of an analyzed document.

use std::fmt::Write;

use serde::Serialize;

use crate::Result;
use crate::analyzer::{ChecklistStatus, OptimizationChecklist, StructureAnalysis};
use crate::pipeline::BlogDocument;

/// A document together with its analysis and checklist.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub document: BlogDocument,
    pub analysis: StructureAnalysis,
    pub checklist: OptimizationChecklist,
}

impl Report {
    pub fn new(document: BlogDocument) -> Self {
        let (analysis, checklist) = document.checklist();
        Self { document, analysis, checklist }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty { serde_json::to_string_pretty(self)? } else { serde_json::to_string(self)? };
        Ok(json)
    }

    /// Plain-text summary. The per-check list is included when `checklist` is set.
    pub fn render_text(&self, checklist: bool) -> String {
        let Self { document, analysis, .. } = self;
        let mut out = String::new();

        let _ = writeln!(out, "Title:     {}", document.metadata.title);
        let _ = writeln!(out, "URL:       {}", document.url);
        let _ = writeln!(out, "Platform:  {}", document.platform);
        if let Some(author) = &document.metadata.author {
            let _ = writeln!(out, "Author:    {author}");
        }
        let _ = writeln!(
            out,
            "Length:    {} words, {} min read",
            document.content.word_count, document.content.reading_time
        );
        let _ = writeln!(out, "Score:     {}/100", analysis.score);

        if checklist {
            out.push_str("\nChecklist\n");
            for (check, item) in self.checklist.items() {
                let _ = writeln!(out, "  {} {}: {}", status_mark(item.status), check.label(), item.message);
                if let Some(suggestion) = &item.ai_suggestion {
                    let _ = writeln!(out, "      suggestion: {suggestion}");
                }
            }
        }

        if !analysis.recommendations.is_empty() {
            out.push_str("\nRecommendations\n");
            for recommendation in &analysis.recommendations {
                let _ = writeln!(out, "  - {recommendation}");
            }
        }

        out
    }
}

pub fn status_mark(status: ChecklistStatus) -> &'static str {
    match status {
        ChecklistStatus::Complete => "[x]",
        ChecklistStatus::NeedsImprovement => "[~]",
        ChecklistStatus::Incomplete => "[ ]",
    }
}
