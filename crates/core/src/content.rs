//! Main-content resolution and the fields derived from it.
//!
//! The content region comes from the first [`Tier`] in [`TIERS`] that yields
//! something usable: known container selectors, then the readability pass,
//! then the whole `<body>`. Headings, images, links, and counts are all
//! derived from that region's markup.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::metadata::absolutize;
use crate::parse::{Document, Node};
use crate::readability::{self, ReadabilityConfig};

/// Common article containers, tried in order.
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    r#"[role="main"]"#,
    "main",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".post-body",
    ".content",
    "#content",
    ".blog-post",
];

pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// A selector match needs strictly more trimmed characters than this.
    pub min_container_chars: usize,
    pub words_per_minute: usize,
    pub readability: ReadabilityConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            min_container_chars: 100,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            readability: ReadabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub href: String,
    pub text: String,
    pub is_external: bool,
}

/// The article body and everything derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedContent {
    /// Markup of the content region.
    pub html: String,
    pub plain_text: String,
    pub headings: Vec<Heading>,
    pub images: Vec<Image>,
    pub links: Vec<Link>,
    pub word_count: usize,
    /// Minutes, rounded up.
    pub reading_time: usize,
}

/// Strategy for locating the content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Selectors,
    Readability,
    Body,
}

/// Resolution order. The last tier always yields a region.
pub const TIERS: [Tier; 3] = [Tier::Selectors, Tier::Readability, Tier::Body];

/// A resolved content region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub html: String,
    pub text: String,
    pub tier: Tier,
}

impl Tier {
    /// Tries this tier alone. `doc` is `raw` parsed without cleaning.
    pub fn resolve(self, doc: &Document, raw: &str, base: Option<&Url>, config: &ContentConfig) -> Option<Region> {
        match self {
            Tier::Selectors => CONTENT_SELECTORS.iter().find_map(|selector| {
                let element = doc.first(selector)?;
                let text = element.text();
                let text = text.trim();
                (text.chars().count() > config.min_container_chars)
                    .then(|| Region { html: element.html(), text: text.to_string(), tier: self })
            }),
            Tier::Readability => match readability::extract(raw, base, &config.readability) {
                Ok(extracted) if !extracted.text.trim().is_empty() => {
                    Some(Region { html: extracted.content, text: extracted.text.trim().to_string(), tier: self })
                }
                Ok(_) => None,
                Err(err) => {
                    debug!(error = %err, "readability tier failed");
                    None
                }
            },
            Tier::Body => Some(match doc.body() {
                Some(body) => Region { html: body.html(), text: body.text().trim().to_string(), tier: self },
                None => Region { html: raw.to_string(), text: doc.text().trim().to_string(), tier: self },
            }),
        }
    }
}

/// Runs [`TIERS`] in order and returns the first region found.
pub fn resolve_region(doc: &Document, raw: &str, base: Option<&Url>, config: &ContentConfig) -> Region {
    TIERS
        .iter()
        .find_map(|tier| tier.resolve(doc, raw, base, config))
        .unwrap_or_else(|| Region { html: raw.to_string(), text: doc.text().trim().to_string(), tier: Tier::Body })
}

/// Whitespace-separated, non-empty tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `ceil(words / words_per_minute)`.
pub fn reading_time(words: usize, words_per_minute: usize) -> usize {
    words.div_ceil(words_per_minute.max(1))
}

/// External means the href has a host and it differs from the page host.
pub fn is_external(href: &str, page_host: Option<&str>) -> bool {
    match Url::parse(href) {
        Ok(url) => match url.host_str() {
            Some(host) => page_host.is_none_or(|page| !host.eq_ignore_ascii_case(page)),
            None => false,
        },
        Err(_) => false,
    }
}

impl ParsedContent {
    /// Derives headings, images, links, and counts from a content region.
    pub fn from_region(html: &str, plain_text: &str, base: Option<&Url>, words_per_minute: usize) -> Self {
        let fragment = Document::parse_fragment(html);
        let page_host = base.and_then(Url::host_str);

        let headings = fragment
            .select("h1, h2, h3, h4, h5, h6")
            .unwrap_or_default()
            .into_iter()
            .filter_map(|heading| {
                let level = heading.tag_name().get(1..)?.parse().ok()?;
                let text = heading.text().trim().to_string();
                (!text.is_empty()).then_some(Heading { level, text })
            })
            .collect();

        let images = fragment
            .select("img[src]")
            .unwrap_or_default()
            .into_iter()
            .filter_map(|img| {
                let src = img.attr("src")?.trim();
                (!src.is_empty()).then(|| Image {
                    src: absolutize(base, src),
                    alt: img.attr("alt").map(str::to_string),
                })
            })
            .collect();

        let links = fragment
            .select("a[href]")
            .unwrap_or_default()
            .into_iter()
            .filter_map(|anchor| {
                let href = anchor.attr("href")?.trim();
                let text = anchor.text().trim().to_string();
                if href.is_empty() || text.is_empty() {
                    return None;
                }
                let href = absolutize(base, href);
                let is_external = is_external(&href, page_host);
                Some(Link { href, text, is_external })
            })
            .collect();

        let word_count = count_words(plain_text);

        Self {
            html: html.to_string(),
            plain_text: plain_text.to_string(),
            headings,
            images,
            links,
            word_count,
            reading_time: reading_time(word_count, words_per_minute),
        }
    }

    /// Re-derives content from edited region markup.
    pub fn from_html(html: &str, base: Option<&Url>, words_per_minute: usize) -> Self {
        let text = Document::parse_fragment(html).text();
        Self::from_region(html, text.trim(), base, words_per_minute)
    }
}

impl Document {
    /// Resolves the content region of this page and derives its fields.
    pub fn extract_content(&self, raw: &str, base: Option<&Url>, config: &ContentConfig) -> ParsedContent {
        let region = resolve_region(self, raw, base, config);
        debug!(tier = ?region.tier, chars = region.text.len(), "resolved content region");

        ParsedContent::from_region(&region.html, &region.text, base, config.words_per_minute)
    }
}

/// Parses the main content of a page. Never fails.
///
/// ```rust
/// use postgrade_core::parse_content;
///
/// let html = r#"<html><body><p>Just a few words <img src="/a.png"></p></body></html>"#;
/// let content = parse_content(html, "https://example.com/post");
/// assert_eq!(content.word_count, 4);
/// assert_eq!(content.reading_time, 1);
/// assert_eq!(content.images[0].src, "https://example.com/a.png");
/// ```
pub fn parse_content(html: &str, url: &str) -> ParsedContent {
    parse_content_with_config(html, url, &ContentConfig::default())
}

pub fn parse_content_with_config(html: &str, url: &str, config: &ContentConfig) -> ParsedContent {
    let base = Url::parse(url).ok();
    Document::parse(html).extract_content(html, base.as_ref(), config)
}
