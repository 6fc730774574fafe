//! Publishing-platform detection.
//!
//! Rules are checked in three ranked groups: URL substrings, the generator
//! meta tag, then structural fingerprints in the markup. The first hit wins
//! and [`Platform::Custom`] is the fallback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::parse::{Document, Node};

/// Blog platform a page was published with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    WordPress,
    Medium,
    Ghost,
    Substack,
    Blogger,
    Wix,
    Squarespace,
    #[default]
    Custom,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::WordPress,
        Platform::Medium,
        Platform::Ghost,
        Platform::Substack,
        Platform::Blogger,
        Platform::Wix,
        Platform::Squarespace,
        Platform::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::WordPress => "wordpress",
            Platform::Medium => "medium",
            Platform::Ghost => "ghost",
            Platform::Substack => "substack",
            Platform::Blogger => "blogger",
            Platform::Wix => "wix",
            Platform::Squarespace => "squarespace",
            Platform::Custom => "custom",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown platform `{}`", s))
    }
}

/// Lower-cased substrings of the page URL.
pub const URL_RULES: &[(&str, Platform)] = &[
    ("medium.com", Platform::Medium),
    ("substack.com", Platform::Substack),
    ("blogspot.com", Platform::Blogger),
    ("blogger.com", Platform::Blogger),
];

/// Lower-cased substrings of `<meta name="generator">`.
pub const GENERATOR_RULES: &[(&str, Platform)] = &[
    ("wordpress", Platform::WordPress),
    ("ghost", Platform::Ghost),
    ("wix", Platform::Wix),
    ("squarespace", Platform::Squarespace),
];

/// Markup evidence that identifies a platform.
#[derive(Debug, Clone, Copy)]
pub enum Fingerprint {
    /// Any element matches the selector.
    Selector(&'static str),
    /// `<body>` carries exactly this class.
    BodyClass(&'static str),
    /// `<body>`'s class attribute contains this substring.
    BodyClassContains(&'static str),
}

impl Fingerprint {
    pub fn matches(&self, doc: &Document) -> bool {
        match *self {
            Fingerprint::Selector(selector) => doc.exists(selector),
            Fingerprint::BodyClass(class) => doc.body().is_some_and(|body| body.has_class(class)),
            Fingerprint::BodyClassContains(needle) => doc
                .body()
                .and_then(|body| body.attr("class").map(|classes| classes.contains(needle)))
                .unwrap_or(false),
        }
    }
}

pub const FINGERPRINTS: &[(Fingerprint, Platform)] = &[
    (Fingerprint::Selector(r#"link[href*="wp-content"]"#), Platform::WordPress),
    (Fingerprint::Selector(r#"script[src*="wp-content"]"#), Platform::WordPress),
    (Fingerprint::Selector(r#"link[href*="wp-includes"]"#), Platform::WordPress),
    (Fingerprint::Selector(r#"script[src*="wp-includes"]"#), Platform::WordPress),
    (Fingerprint::BodyClass("wp-site"), Platform::WordPress),
    (Fingerprint::BodyClass("wordpress"), Platform::WordPress),
    (Fingerprint::Selector(r#"meta[name="generator"][content*="Ghost"]"#), Platform::Ghost),
    (Fingerprint::Selector(r#"meta[property="al:ios:app_name"][content="Medium"]"#), Platform::Medium),
    (Fingerprint::BodyClassContains("medium"), Platform::Medium),
];

/// Detects the platform of a page from its markup and URL.
///
/// ```rust
/// use postgrade_core::{Platform, detect_platform};
///
/// let html = r#"<meta name="generator" content="WordPress 6.4">"#;
/// assert_eq!(detect_platform(html, "https://blog.example.com"), Platform::WordPress);
/// assert_eq!(detect_platform(html, "https://medium.com/@me/post"), Platform::Medium);
/// ```
pub fn detect(html: &str, url: &str) -> Platform {
    Document::parse(html).detect_platform(url)
}

impl Document {
    /// Platform detection over an already-parsed page.
    pub fn detect_platform(&self, url: &str) -> Platform {
        let url = url.to_lowercase();
        if let Some(&(_, platform)) = URL_RULES.iter().find(|(needle, _)| url.contains(needle)) {
            return platform;
        }

        let generator = self
            .first_attr(r#"meta[name="generator"]"#, "content")
            .unwrap_or_default()
            .to_lowercase();
        if let Some(&(_, platform)) = GENERATOR_RULES.iter().find(|(needle, _)| generator.contains(needle)) {
            return platform;
        }

        FINGERPRINTS
            .iter()
            .find(|(fingerprint, _)| fingerprint.matches(self))
            .map(|&(_, platform)| platform)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://medium.com/@writer/post", Platform::Medium)]
    #[case("https://writer.substack.com/p/post", Platform::Substack)]
    #[case("https://writer.blogspot.com/2024/01/post.html", Platform::Blogger)]
    #[case("https://www.blogger.com/blog/post", Platform::Blogger)]
    #[case("https://example.com/post", Platform::Custom)]
    fn test_url_rules(#[case] url: &str, #[case] expected: Platform) {
        assert_eq!(detect("<html><body></body></html>", url), expected);
    }

    #[rstest]
    #[case("WordPress 6.4.2", Platform::WordPress)]
    #[case("Ghost 5.0", Platform::Ghost)]
    #[case("Wix.com Website Builder", Platform::Wix)]
    #[case("Squarespace", Platform::Squarespace)]
    #[case("Hugo 0.120", Platform::Custom)]
    fn test_generator_rules(#[case] generator: &str, #[case] expected: Platform) {
        let html = format!(r#"<html><head><meta name="generator" content="{}"></head></html>"#, generator);
        assert_eq!(detect(&html, "https://example.com"), expected);
    }

    #[test]
    fn test_url_rules_take_precedence_over_markup() {
        let html = r#"<html><head><meta name="generator" content="WordPress 6.4"></head>
            <body class="wordpress"><link href="/wp-content/style.css"></body></html>"#;
        assert_eq!(detect(html, "https://MEDIUM.com/@me/post"), Platform::Medium);
        assert_eq!(detect(html, "https://me.substack.com/p/x"), Platform::Substack);
    }

    #[test]
    fn test_wordpress_fingerprints() {
        let link = r#"<html><head><link rel="stylesheet" href="/wp-content/themes/x.css"></head></html>"#;
        let script = r#"<html><head><script src="/wp-includes/js/jquery.js"></script></head></html>"#;
        let body = r#"<html><body class="home wp-site"></body></html>"#;

        for html in [link, script, body] {
            assert_eq!(detect(html, "https://example.com"), Platform::WordPress);
        }
    }

    #[test]
    fn test_medium_fingerprints() {
        let meta = r#"<html><head><meta property="al:ios:app_name" content="Medium"></head></html>"#;
        let body = r#"<html><body class="is-medium-post"></body></html>"#;

        assert_eq!(detect(meta, "https://blog.example.com"), Platform::Medium);
        assert_eq!(detect(body, "https://blog.example.com"), Platform::Medium);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let html = r#"<html><body class="wp-site"><p>x</p></body></html>"#;
        let first = detect(html, "https://example.com");
        for _ in 0..5 {
            assert_eq!(detect(html, "https://example.com"), first);
        }
    }

    #[test]
    fn test_platform_round_trips_through_str() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
        assert!("tumblr".parse::<Platform>().is_err());
        assert_eq!(serde_json::to_string(&Platform::WordPress).unwrap(), "\"wordpress\"");
    }
}
