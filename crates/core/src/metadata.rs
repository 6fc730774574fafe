//! Document-level metadata with ranked fallback sources.
//!
//! Each field has its own table of [`Source`]s. The first source that
//! yields a non-empty trimmed value wins. Fields never depend on each
//! other and absence is never an error.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::parse::{Document, Node};

pub const DEFAULT_TITLE: &str = "Untitled";

/// Characters kept when the description falls back to paragraph text.
pub const DESCRIPTION_FALLBACK_CHARS: usize = 160;

/// Descriptive fields of a blog page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
    /// Absolute when the page URL is well-formed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// One candidate location for a metadata value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `content` of `<meta name=..>` or `<meta property=..>`.
    Meta(&'static str),
    /// `content` of `<meta http-equiv=..>`.
    HttpEquiv(&'static str),
    /// Text of the first match.
    Text(&'static str),
    /// Attribute of the first match.
    Attr(&'static str, &'static str),
    /// Text of the first match, cut to N characters.
    Truncated(&'static str, usize),
}

impl Source {
    /// Trimmed, non-empty value of this source, if any.
    pub fn resolve(&self, doc: &Document) -> Option<String> {
        let value = match *self {
            Source::Meta(key) => doc.meta_content(key),
            Source::HttpEquiv(key) => doc.first_attr(&format!(r#"meta[http-equiv="{}"]"#, key), "content"),
            Source::Text(selector) => doc.first_text(selector),
            Source::Attr(selector, attr) => doc.first_attr(selector, attr),
            Source::Truncated(selector, limit) => doc
                .first(selector)
                .map(|el| el.text().chars().take(limit).collect::<String>()),
        }?;

        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

pub const TITLE_SOURCES: &[Source] = &[
    Source::Meta("og:title"),
    Source::Meta("twitter:title"),
    Source::Text("title"),
    Source::Text("h1"),
];

pub const DESCRIPTION_SOURCES: &[Source] = &[
    Source::Meta("og:description"),
    Source::Meta("twitter:description"),
    Source::Meta("description"),
    Source::Truncated("p", DESCRIPTION_FALLBACK_CHARS),
];

pub const AUTHOR_SOURCES: &[Source] = &[
    Source::Meta("author"),
    Source::Meta("article:author"),
    Source::Meta("twitter:creator"),
    Source::Text(".author"),
    Source::Text(r#"[rel="author"]"#),
];

pub const PUBLISH_DATE_SOURCES: &[Source] = &[
    Source::Meta("article:published_time"),
    Source::Meta("publish_date"),
    Source::Attr("time[datetime]", "datetime"),
    Source::Text("time"),
];

pub const MODIFIED_DATE_SOURCES: &[Source] = &[Source::Meta("article:modified_time"), Source::Meta("last-modified")];

pub const IMAGE_SOURCES: &[Source] = &[
    Source::Meta("og:image"),
    Source::Meta("twitter:image"),
    Source::Attr("article img", "src"),
    Source::Attr("img", "src"),
];

pub const SITE_NAME_SOURCES: &[Source] = &[Source::Meta("og:site_name"), Source::Meta("application-name")];

pub const LANG_SOURCES: &[Source] = &[Source::Attr("html", "lang"), Source::HttpEquiv("content-language")];

/// First value produced by `sources`, in rank order.
pub fn resolve_first(doc: &Document, sources: &[Source]) -> Option<String> {
    sources.iter().find_map(|source| source.resolve(doc))
}

/// Resolves `value` against `base`, keeping it unchanged when that fails.
pub fn absolutize(base: Option<&Url>, value: &str) -> String {
    base.and_then(|base| base.join(value).ok())
        .map(String::from)
        .unwrap_or_else(|| value.to_string())
}

impl Document {
    /// Looks up `<meta name=key>` first, then `<meta property=key>`.
    pub fn meta_content(&self, key: &str) -> Option<String> {
        ["name", "property"]
            .iter()
            .find_map(|attr| self.first_attr(&format!(r#"meta[{}="{}"]"#, attr, key), "content"))
    }

    /// Extracts every metadata field. `page_url` anchors the featured image.
    pub fn extract_metadata(&self, page_url: Option<&Url>) -> Metadata {
        Metadata {
            title: resolve_first(self, TITLE_SOURCES).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: resolve_first(self, DESCRIPTION_SOURCES),
            author: resolve_first(self, AUTHOR_SOURCES),
            publish_date: resolve_first(self, PUBLISH_DATE_SOURCES),
            modified_date: resolve_first(self, MODIFIED_DATE_SOURCES),
            featured_image: resolve_first(self, IMAGE_SOURCES).map(|image| absolutize(page_url, &image)),
            site_name: resolve_first(self, SITE_NAME_SOURCES),
            lang: resolve_first(self, LANG_SOURCES),
        }
    }
}

/// Extracts metadata from raw markup.
///
/// ```rust
/// use postgrade_core::extract_metadata;
///
/// let html = r#"<html><head><meta property="og:title" content=" Hello "></head></html>"#;
/// let metadata = extract_metadata(html, "https://example.com/post");
/// assert_eq!(metadata.title, "Hello");
/// ```
pub fn extract_metadata(html: &str, url: &str) -> Metadata {
    let page_url = Url::parse(url).ok();
    Document::parse(html).extract_metadata(page_url.as_ref())
}
