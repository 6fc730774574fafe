//! Markup cleaning ahead of the readability pass.
//!
//! A single streaming `lol_html` pass strips non-content tags and comments,
//! drops hidden elements, unwraps elements whose class or id looks like
//! page chrome, and absolutizes link and image URLs.

use std::sync::LazyLock;

use lol_html::errors::RewritingError;
use regex::Regex;
use tracing::debug;
use url::Url;

/// Tags removed together with their contents.
pub const STRIPPED_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "canvas"];

/// `(tag, attribute)` pairs rewritten to absolute URLs.
pub const URL_ATTRIBUTES: &[(&str, &str)] = &[("a", "href"), ("img", "src"), ("link", "href")];

static UNLIKELY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup)",
    )
    .expect("valid unlikely pattern")
});

static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story)")
        .expect("valid positive pattern")
});

static HIDDEN_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("valid hidden pattern"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Remove [`STRIPPED_TAGS`] and comments.
    pub strip_tags: bool,
    /// Unwrap elements whose class or id matches the unlikely pattern.
    pub remove_unlikely: bool,
    /// Spare unlikely-looking names that also look like content.
    pub keep_positive: bool,
    /// Remove `display:none` / `visibility:hidden` elements.
    pub remove_hidden: bool,
    /// Absolutize [`URL_ATTRIBUTES`] against this URL.
    pub base_url: Option<Url>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { strip_tags: true, remove_unlikely: true, keep_positive: true, remove_hidden: true, base_url: None }
    }
}

/// True when a class or id token names page chrome rather than content.
pub fn is_unlikely(name: &str, keep_positive: bool) -> bool {
    UNLIKELY.is_match(name) && !(keep_positive && POSITIVE.is_match(name))
}

/// Cleans `html`. Markup that fails to rewrite is returned unchanged.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    match rewrite(html, config) {
        Ok(output) if !output.is_empty() => {
            WHITESPACE.replace_all(&String::from_utf8_lossy(&output), " ").into_owned()
        }
        Ok(_) => html.to_string(),
        Err(err) => {
            debug!(error = %err, "preprocessing failed, using raw markup");
            html.to_string()
        }
    }
}

fn rewrite(html: &str, config: &PreprocessConfig) -> Result<Vec<u8>, RewritingError> {
    let mut output = Vec::with_capacity(html.len());
    let strip_comments = config.strip_tags;

    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("*", |el| {
                let tag = el.tag_name();

                if config.strip_tags && STRIPPED_TAGS.contains(&tag.as_str()) {
                    el.remove();
                    return Ok(());
                }

                if config.remove_hidden
                    && let Some(style) = el.get_attribute("style")
                    && HIDDEN_STYLE.is_match(&style)
                {
                    el.remove();
                    return Ok(());
                }

                if config.remove_unlikely && !matches!(tag.as_str(), "html" | "body" | "article" | "main") {
                    let id = el.get_attribute("id").unwrap_or_default();
                    let class = el.get_attribute("class").unwrap_or_default();
                    if std::iter::once(id.as_str())
                        .chain(class.split_whitespace())
                        .any(|name| !name.is_empty() && is_unlikely(name, config.keep_positive))
                    {
                        el.remove_and_keep_content();
                    }
                }

                if let Some(base) = &config.base_url
                    && let Some(&(_, attr)) = URL_ATTRIBUTES.iter().find(|(name, _)| *name == tag)
                    && let Some(value) = el.get_attribute(attr)
                    && let Ok(absolute) = base.join(value.trim())
                {
                    el.set_attribute(attr, absolute.as_str()).ok();
                }

                Ok(())
            })],
            document_content_handlers: vec![lol_html::doc_comments!(|comment| {
                if strip_comments {
                    comment.remove();
                }
                Ok(())
            })],
            ..Default::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );

    rewriter.write(html.as_bytes())?;
    rewriter.end()?;

    Ok(output)
}
