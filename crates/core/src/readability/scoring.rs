//! Candidate scoring for the readability pass.
//!
//! A candidate's score is `(tag + class/id weight + density) * (1 - link
//! penalty)`. Prose-heavy containers with few links win.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse::{Element, Node};

static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story)")
        .expect("valid positive pattern")
});

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|share|social|widget)",
    )
    .expect("valid negative pattern")
});

#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub positive_weight: f64,
    pub negative_weight: f64,
    pub max_char_density_score: f64,
    pub max_comma_density_score: f64,
    /// Characters per density point.
    pub chars_per_point: usize,
    /// Text length above which the link penalty is halved.
    pub rich_text_chars: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            positive_weight: 25.0,
            negative_weight: -25.0,
            max_char_density_score: 3.0,
            max_comma_density_score: 3.0,
            chars_per_point: 100,
            rich_text_chars: 500,
        }
    }
}

/// Breakdown of one element's score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub base: f64,
    pub class_weight: f64,
    pub density: f64,
    /// Share of text inside links, 0.0 to 1.0.
    pub link_density: f64,
    pub total: f64,
}

/// Prior for how likely a tag is to hold the article body.
pub fn base_tag_score(tag: &str) -> f64 {
    match tag {
        "article" => 10.0,
        "section" | "main" => 8.0,
        "div" => 5.0,
        "td" | "blockquote" => 3.0,
        "form" | "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" | "aside" => -5.0,
        _ => 0.0,
    }
}

/// +positive_weight for content-like class/id names, negative_weight for
/// chrome-like ones. The id is checked before the class list.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let names = element
        .id()
        .into_iter()
        .chain(element.attr("class").unwrap_or_default().split_whitespace());

    for name in names {
        if POSITIVE.is_match(name) {
            return config.positive_weight;
        }
        if NEGATIVE.is_match(name) {
            return config.negative_weight;
        }
    }

    0.0
}

/// Points for text length and comma count, each capped.
pub fn content_density(text: &str, config: &ScoreConfig) -> f64 {
    let per_point = config.chars_per_point.max(1);
    let char_score = ((text.chars().count() / per_point) as f64).min(config.max_char_density_score);
    let comma_score = (text.matches(',').count() as f64).min(config.max_comma_density_score);

    char_score + comma_score
}

/// Ratio of link text to all text in `element`.
pub fn link_density(element: &Element<'_>) -> f64 {
    let text_length = element.text().chars().count();
    if text_length == 0 {
        return 0.0;
    }

    let link_length: usize = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| link.text().chars().count())
        .sum();

    (link_length as f64 / text_length as f64).min(1.0)
}

/// Symbol-heavy `<pre>` blocks without prose punctuation.
fn looks_like_code(tag: &str, text: &str) -> bool {
    let len = text.chars().count();
    if tag != "pre" || len <= 50 {
        return false;
    }

    let len = len as f64;
    let commas = text.matches(',').count() as f64 / len;
    let spaces = text.matches(' ').count() as f64 / len;
    let symbols = text.chars().filter(|c| !c.is_alphanumeric() && !c.is_whitespace()).count() as f64 / len;

    symbols > 0.15 && commas < 0.01 && spaces < 0.15
}

pub fn score_element(element: &Element<'_>, config: &ScoreConfig) -> Score {
    let tag = element.tag_name();
    let text = element.text();

    let base = base_tag_score(&tag);
    let class_weight = class_id_weight(element, config);
    let density = content_density(&text, config);
    let link_density = link_density(element);

    // Long prose and content-named containers tolerate more links.
    let link_penalty = if class_weight > 0.0 || text.chars().count() > config.rich_text_chars {
        1.0 - link_density * 0.5
    } else {
        1.0 - link_density
    };
    let code_penalty = if looks_like_code(&tag, &text) { -10.0 } else { 0.0 };

    let total = (base + class_weight + density + code_penalty) * link_penalty;

    Score { base, class_weight, density, link_density, total }
}
