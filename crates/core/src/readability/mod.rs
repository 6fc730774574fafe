//! Boilerplate removal by candidate scoring.
//!
//! This is the second content tier. It scores block containers, lets the
//! scores flow up to their parent (half) and grandparent (a third), picks
//! the best container, and keeps qualifying siblings next to it.
//!
//! ```rust
//! use postgrade_core::readability::{ReadabilityConfig, extract};
//!
//! let paragraph = "<p>Readable prose, with commas, spans sentences and goes on for a while here.</p>";
//! let html = format!("<html><body><div id=\"story\">{}</div></body></html>", paragraph.repeat(6));
//!
//! let extracted = extract(&html, None, &ReadabilityConfig::default()).unwrap();
//! assert!(extracted.text.contains("Readable prose"));
//! ```

pub mod scoring;

pub use scoring::{Score, ScoreConfig, link_density, score_element};

use url::Url;

use crate::parse::{Document, Element, Node};
use crate::{PostgradeError, Result};

/// Elements considered as content containers, as one selector group so
/// matches come back in document order.
const CANDIDATE_SELECTOR: &str = "div, article, section, main, p, td, pre, blockquote";

#[derive(Debug, Clone)]
pub struct ReadabilityConfig {
    /// Minimum score for the best candidate.
    pub min_score: f64,
    /// Non-structural candidates need a tenth of this many characters.
    pub char_threshold: usize,
    /// Cap on scored candidates, counted after the length filter (0 = unlimited).
    pub max_elements: usize,
    /// Siblings qualify at this fraction of the top score.
    pub sibling_threshold: f64,
    pub scoring: ScoreConfig,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            min_score: 10.0,
            char_threshold: 500,
            max_elements: 1000,
            sibling_threshold: 0.2,
            scoring: ScoreConfig::default(),
        }
    }
}

/// Result of a successful readability pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    /// Outer HTML of the chosen elements, in document order.
    pub content: String,
    /// Trimmed text of the chosen elements, one per line.
    pub text: String,
    pub top_score: f64,
    pub element_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    element: Element<'a>,
    score: f64,
}

/// Cleans `html` (see [`crate::preprocess`]) and extracts its main content.
pub fn extract(html: &str, base_url: Option<&Url>, config: &ReadabilityConfig) -> Result<Extracted> {
    let doc = Document::parse_with_preprocessing(html, base_url.cloned());
    extract_from(&doc, config)
}

/// Extracts the main content of an already-parsed document.
pub fn extract_from(doc: &Document, config: &ReadabilityConfig) -> Result<Extracted> {
    let mut candidates = collect_candidates(doc, config)?;
    propagate_scores(&mut candidates, config);

    let top = candidates
        .iter()
        .copied()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or(PostgradeError::NoContent)?;

    if top.score < config.min_score {
        return Err(PostgradeError::NotReadable { score: top.score, threshold: config.min_score });
    }

    let chosen = with_siblings(top, &candidates, config);
    let content = chosen.iter().map(Element::outer_html).collect::<Vec<_>>().join("\n");
    let text = chosen
        .iter()
        .map(|element| element.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Extracted { content, text, top_score: top.score, element_count: chosen.len() })
}

fn collect_candidates<'a>(doc: &'a Document, config: &ReadabilityConfig) -> Result<Vec<Candidate<'a>>> {
    let limit = if config.max_elements == 0 { usize::MAX } else { config.max_elements };
    let min_chars = config.char_threshold / 10;

    Ok(doc
        .select(CANDIDATE_SELECTOR)?
        .into_iter()
        .filter(|element| {
            matches!(element.tag_name().as_str(), "article" | "section" | "main")
                || element.text().trim().chars().count() >= min_chars
        })
        .take(limit)
        .map(|element| Candidate { element, score: score_element(&element, &config.scoring).total })
        .collect())
}

/// Adds each candidate's score to its parent (/2) and grandparent (/3).
/// Ancestors that were not candidates yet are scored on their own first.
fn propagate_scores<'a>(candidates: &mut Vec<Candidate<'a>>, config: &ReadabilityConfig) {
    let seeds: Vec<Candidate<'a>> = candidates.clone();

    for seed in seeds {
        let parent = seed.element.parent_element();
        let grandparent = parent.and_then(|p| p.parent_element());

        for (ancestor, divisor) in [(parent, 2.0), (grandparent, 3.0)] {
            let Some(ancestor) = ancestor.filter(|a| a.tag_name() != "html") else {
                continue;
            };
            let bonus = seed.score / divisor;

            match candidates.iter_mut().find(|c| c.element == ancestor) {
                Some(existing) => existing.score += bonus,
                None => candidates.push(Candidate {
                    element: ancestor,
                    score: score_element(&ancestor, &config.scoring).total + bonus,
                }),
            }
        }
    }
}

/// The top element plus siblings that look like part of the same article.
fn with_siblings<'a>(top: Candidate<'a>, candidates: &[Candidate<'a>], config: &ReadabilityConfig) -> Vec<Element<'a>> {
    let Some(parent) = top.element.parent_element() else {
        return vec![top.element];
    };
    let threshold = (top.score * config.sibling_threshold).max(10.0);

    parent
        .child_elements()
        .into_iter()
        .filter(|sibling| {
            if *sibling == top.element {
                return true;
            }

            let scored = candidates.iter().find(|c| c.element == *sibling).map(|c| c.score);
            if scored.is_some_and(|score| score >= threshold) && sibling.tag_name() != "p" {
                return true;
            }

            sibling.tag_name() == "p" && {
                let text = sibling.text();
                let len = text.trim().chars().count();
                let density = link_density(sibling);
                (len > 80 && density < 0.25) || (len > 0 && len <= 80 && density == 0.0 && text.contains(". "))
            }
        })
        .collect()
}
