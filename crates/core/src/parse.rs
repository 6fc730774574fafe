//! HTML parsing and DOM traversal.
//!
//! Extraction and analysis code talks to markup through the [`Node`] trait
//! (`select`, `text`, `attr`, `html`). [`Document`] and [`Element`] implement
//! it on top of `scraper`, so nothing else in the crate touches the parser
//! API directly.
//!
//! # Example
//!
//! ```rust
//! use postgrade_core::parse::{Document, Node};
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! assert_eq!(doc.first_text("h1").as_deref(), Some("Title"));
//! assert_eq!(doc.select("p.content").unwrap().len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::preprocess::{self, PreprocessConfig};
use crate::{PostgradeError, Result};

/// Read-only view over a piece of HTML.
///
/// Anything that can answer these four questions can be fed to the
/// metadata, content, and analyzer code.
pub trait Node {
    /// Selects descendants matching a CSS selector, in document order.
    fn select(&self, selector: &str) -> Result<Vec<Element<'_>>>;

    /// Concatenated text of all descendant text nodes.
    fn text(&self) -> String;

    /// Attribute of this node (for a document, of its root `<html>`).
    fn attr(&self, name: &str) -> Option<&str>;

    /// Serialized markup.
    fn html(&self) -> String;

    /// First match for `selector`, or `None` when nothing matches or the
    /// selector is invalid.
    fn first(&self, selector: &str) -> Option<Element<'_>> {
        self.select(selector).ok()?.into_iter().next()
    }

    fn exists(&self, selector: &str) -> bool {
        self.first(selector).is_some()
    }

    /// Trimmed text of the first match, skipping empty results.
    fn first_text(&self, selector: &str) -> Option<String> {
        let text = self.first(selector)?.text();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Trimmed attribute value of the first match, skipping empty results.
    fn first_attr(&self, selector: &str, name: &str) -> Option<String> {
        let element = self.first(selector)?;
        let value = element.attr(name)?.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PostgradeError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// A parsed HTML document.
///
/// ```rust
/// use postgrade_core::parse::{Document, Node};
///
/// let doc = Document::parse("<html lang=\"en\"><head><title>Test</title></head><body></body></html>");
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// assert_eq!(doc.attr("lang"), Some("en"));
/// ```
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses a full HTML document as-is.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html), base_url: None }
    }

    /// Parses a content fragment such as an article body.
    pub fn parse_fragment(html: &str) -> Self {
        Self { html: Html::parse_fragment(html), base_url: None }
    }

    /// Cleans the markup first (see [`preprocess`]) and then parses it.
    ///
    /// Relative `href`/`src` values are absolutized against `base_url`.
    pub fn parse_with_preprocessing(html: &str, base_url: Option<Url>) -> Self {
        let config = PreprocessConfig { base_url: base_url.clone(), ..Default::default() };
        let cleaned = preprocess::preprocess_html(html, &config);

        Self { html: Html::parse_document(&cleaned), base_url }
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Text of the `<title>` element, trimmed.
    pub fn title(&self) -> Option<String> {
        self.first_text("title")
    }

    /// The `<body>` element. html5ever always synthesizes one for documents.
    pub fn body(&self) -> Option<Element<'_>> {
        self.first("body")
    }
}

impl Node for Document {
    fn select(&self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(Element::from).collect())
    }

    fn text(&self) -> String {
        self.html.root_element().text().collect()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.html.root_element().value().attr(name)
    }

    fn html(&self) -> String {
        self.html.html()
    }
}

/// A single element inside a [`Document`].
///
/// ```rust
/// use postgrade_core::parse::{Document, Node};
///
/// let doc = Document::parse(r#"<a href="https://example.com">Link text</a>"#);
/// let link = doc.first("a").unwrap();
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> From<ElementRef<'a>> for Element<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self { element }
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl<'a> Element<'a> {
    /// Markup inside this element, excluding its own tags.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Markup including this element's own tags.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Lowercase tag name (e.g. "div").
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    pub fn id(&self) -> Option<&'a str> {
        self.element.value().id()
    }

    /// Whitespace-separated class list joined with single spaces.
    pub fn class_names(&self) -> String {
        self.element.value().classes().collect::<Vec<_>>().join(" ")
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.element.value().classes().any(|class| class == name)
    }

    /// Closest ancestor that is an element.
    pub fn parent_element(&self) -> Option<Element<'a>> {
        self.element.parent().and_then(ElementRef::wrap).map(Element::from)
    }

    /// Direct element children, in order.
    pub fn child_elements(&self) -> Vec<Element<'a>> {
        self.element.children().filter_map(ElementRef::wrap).map(Element::from).collect()
    }
}

impl Node for Element<'_> {
    fn select(&self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(Element::from).collect())
    }

    fn text(&self) -> String {
        self.element.text().collect()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    fn html(&self) -> String {
        self.element.inner_html()
    }
}
