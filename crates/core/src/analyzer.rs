//! Structural scoring of a blog document against a fixed rubric.
//!
//! Eight boolean checks run over the content region, the plain text, and
//! the metadata. Each passing check contributes its weight to a 0-100
//! score. Each failing check contributes one recommendation and an AI
//! suggestion in the checklist. Everything here is pure and cheap to
//! re-run after every edit.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::content::Link;
use crate::metadata::Metadata;
use crate::parse::{Document, Node};
use crate::pipeline::BlogDocument;

/// Maximum characters of the opening paragraph that still count as a
/// direct answer.
pub const DIRECT_ANSWER_MAX_CHARS: usize = 300;

static TLDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)tl;?dr|summary|key (?:points?|takeaways)").expect("valid tl;dr pattern"));

/// Call-to-action markers matched against both markup and plain text.
pub const CTA_PATTERNS: &[&str] = &[
    r#"(?i)class="[^"]*(?:cta|call-to-action|btn-primary)[^"]*""#,
    r"(?i)get started|sign up|learn more|try (?:it|now)|contact us|subscribe",
    r"(?i)<button",
];

static CTA: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    CTA_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid call-to-action pattern"))
        .collect()
});

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+%|\$\d+|according to|research shows|study found").expect("valid citation pattern")
});

/// One structural check. Serialized names match the checklist keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Check {
    #[serde(rename = "mainQuestion")]
    MainQuestion,
    #[serde(rename = "directAnswer")]
    DirectAnswer,
    #[serde(rename = "tldrSummary")]
    Tldr,
    #[serde(rename = "visuals")]
    Visuals,
    #[serde(rename = "callToAction")]
    CallToAction,
    #[serde(rename = "formatting")]
    Formatting,
    #[serde(rename = "authorCredibility")]
    AuthorInfo,
    #[serde(rename = "citableContent")]
    CitableContent,
}

struct Rubric {
    weight: u8,
    label: &'static str,
    recommendation: &'static str,
    passed: &'static str,
    failed: &'static str,
    suggestion: &'static str,
}

/// Indexed by `Check as usize`. Weights sum to 100.
const RUBRIC: [Rubric; 8] = [
    Rubric {
        weight: 15,
        label: "Main question",
        recommendation: "Add a clear, question-focused H1 title",
        passed: "Main question found as H1",
        failed: "No clear main question (H1) found",
        suggestion: "Create a question-focused H1 that targets user search intent",
    },
    Rubric {
        weight: 15,
        label: "Direct answer",
        recommendation: "Start with a concise 1-2 sentence answer",
        passed: "Direct answer present in opening",
        failed: "Missing quick 1-2 sentence answer",
        suggestion: "Add a concise answer at the beginning (1-2 sentences max)",
    },
    Rubric {
        weight: 12,
        label: "TL;DR summary",
        recommendation: "Include a TL;DR summary section",
        passed: "TL;DR summary found",
        failed: "No TL;DR or summary section",
        suggestion: "Add a TL;DR section with 3-5 key bullet points",
    },
    Rubric {
        weight: 10,
        label: "Visuals",
        recommendation: "Add relevant images or diagrams",
        passed: "Visuals present in content",
        failed: "No images, diagrams, or charts found",
        suggestion: "Add relevant images, diagrams, or screenshots to support content",
    },
    Rubric {
        weight: 10,
        label: "Call to action",
        recommendation: "Add a clear call-to-action",
        passed: "Call to action present",
        failed: "No clear call to action",
        suggestion: "Add a CTA to encourage user interaction or next steps",
    },
    Rubric {
        weight: 13,
        label: "Formatting",
        recommendation: "Improve structure with H2/H3 headings and lists",
        passed: "Good heading hierarchy and structure",
        failed: "Formatting could be improved",
        suggestion: "Use H2/H3 headings, bullet points, and one idea per section",
    },
    Rubric {
        weight: 12,
        label: "Author credibility",
        recommendation: "Add author credentials and dates",
        passed: "Author information present",
        failed: "Missing author name or publish date",
        suggestion: "Add author name, credentials, and publish/update dates",
    },
    Rubric {
        weight: 13,
        label: "Citable content",
        recommendation: "Include statistics and cite sources",
        passed: "Contains sources and citations",
        failed: "No sources or citations found",
        suggestion: "Add statistics, case studies, and link to authoritative sources",
    },
];

impl Check {
    /// Rubric order, which is also the order of recommendations.
    pub const ALL: [Check; 8] = [
        Check::MainQuestion,
        Check::DirectAnswer,
        Check::Tldr,
        Check::Visuals,
        Check::CallToAction,
        Check::Formatting,
        Check::AuthorInfo,
        Check::CitableContent,
    ];

    fn rubric(self) -> &'static Rubric {
        &RUBRIC[self as usize]
    }

    pub fn weight(self) -> u8 {
        self.rubric().weight
    }

    pub fn label(self) -> &'static str {
        self.rubric().label
    }

    pub fn recommendation(self) -> &'static str {
        self.rubric().recommendation
    }

    /// Runs this check against a document.
    pub fn evaluate(self, subject: &Subject<'_>) -> bool {
        let content = &subject.content;
        match self {
            Check::MainQuestion => content.exists("h1"),
            Check::DirectAnswer => content
                .first("p")
                .map(|p| p.text().trim().chars().count())
                .is_some_and(|len| len > 0 && len <= DIRECT_ANSWER_MAX_CHARS),
            Check::Tldr => TLDR.is_match(subject.text),
            Check::Visuals => content.exists("img"),
            Check::CallToAction => {
                content.exists("button")
                    || CTA.iter().any(|pattern| pattern.is_match(subject.html) || pattern.is_match(subject.text))
            }
            Check::Formatting => content.exists("h2") && content.exists("ul, ol"),
            Check::AuthorInfo => subject.metadata.author.is_some() || subject.metadata.publish_date.is_some(),
            Check::CitableContent => {
                subject.links.iter().any(is_citable_link) || CITATION.is_match(subject.text)
            }
        }
    }
}

fn is_citable_link(link: &Link) -> bool {
    link.is_external && (link.href.starts_with("http://") || link.href.starts_with("https://"))
}

/// What the checks look at.
pub struct Subject<'a> {
    pub content: Document,
    pub html: &'a str,
    pub text: &'a str,
    pub metadata: &'a Metadata,
    pub links: &'a [Link],
}

impl<'a> Subject<'a> {
    pub fn new(document: &'a BlogDocument) -> Self {
        Self {
            content: Document::parse_fragment(&document.content.html),
            html: &document.content.html,
            text: &document.content.plain_text,
            metadata: &document.metadata,
            links: &document.content.links,
        }
    }
}

/// Outcome of the eight checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureAnalysis {
    /// 0 to 100.
    pub score: u8,
    pub has_main_question: bool,
    pub has_direct_answer: bool,
    pub has_tldr: bool,
    pub has_visuals: bool,
    #[serde(rename = "hasCTA")]
    pub has_cta: bool,
    pub has_proper_formatting: bool,
    pub has_author_info: bool,
    pub has_citable_content: bool,
    /// One entry per failing check, in rubric order.
    pub recommendations: Vec<String>,
}

impl StructureAnalysis {
    /// Builds the analysis from a verdict per check.
    pub fn from_results(passed: impl Fn(Check) -> bool) -> Self {
        let mut analysis = Self::default();

        for check in Check::ALL {
            let ok = passed(check);
            *analysis.flag_mut(check) = ok;
            if ok {
                analysis.score += check.weight();
            } else {
                analysis.recommendations.push(check.recommendation().to_string());
            }
        }

        analysis
    }

    pub fn passed(&self, check: Check) -> bool {
        match check {
            Check::MainQuestion => self.has_main_question,
            Check::DirectAnswer => self.has_direct_answer,
            Check::Tldr => self.has_tldr,
            Check::Visuals => self.has_visuals,
            Check::CallToAction => self.has_cta,
            Check::Formatting => self.has_proper_formatting,
            Check::AuthorInfo => self.has_author_info,
            Check::CitableContent => self.has_citable_content,
        }
    }

    fn flag_mut(&mut self, check: Check) -> &mut bool {
        match check {
            Check::MainQuestion => &mut self.has_main_question,
            Check::DirectAnswer => &mut self.has_direct_answer,
            Check::Tldr => &mut self.has_tldr,
            Check::Visuals => &mut self.has_visuals,
            Check::CallToAction => &mut self.has_cta,
            Check::Formatting => &mut self.has_proper_formatting,
            Check::AuthorInfo => &mut self.has_author_info,
            Check::CitableContent => &mut self.has_citable_content,
        }
    }

    /// Failing checks in rubric order.
    pub fn failing(&self) -> impl Iterator<Item = Check> + '_ {
        Check::ALL.into_iter().filter(|check| !self.passed(*check))
    }
}

/// Runs every check against `document`.
pub fn analyze_structure(document: &BlogDocument) -> StructureAnalysis {
    let subject = Subject::new(document);
    StructureAnalysis::from_results(|check| check.evaluate(&subject))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistStatus {
    Complete,
    Incomplete,
    NeedsImprovement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub status: ChecklistStatus,
    pub score: u8,
    pub message: String,
    /// Present only when the check fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_suggestion: Option<String>,
}

impl ChecklistItem {
    pub fn new(check: Check, passed: bool) -> Self {
        let rubric = check.rubric();
        let (status, score) = match (passed, check) {
            (true, _) => (ChecklistStatus::Complete, 100),
            (false, Check::Formatting) => (ChecklistStatus::NeedsImprovement, 50),
            (false, _) => (ChecklistStatus::Incomplete, 0),
        };

        Self {
            status,
            score,
            message: (if passed { rubric.passed } else { rubric.failed }).to_string(),
            ai_suggestion: (!passed).then(|| rubric.suggestion.to_string()),
        }
    }
}

/// Human-readable view of a [`StructureAnalysis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationChecklist {
    pub main_question: ChecklistItem,
    pub direct_answer: ChecklistItem,
    pub tldr_summary: ChecklistItem,
    pub visuals: ChecklistItem,
    pub formatting: ChecklistItem,
    pub author_credibility: ChecklistItem,
    pub citable_content: ChecklistItem,
    pub call_to_action: ChecklistItem,
}

impl OptimizationChecklist {
    pub fn item(&self, check: Check) -> &ChecklistItem {
        match check {
            Check::MainQuestion => &self.main_question,
            Check::DirectAnswer => &self.direct_answer,
            Check::Tldr => &self.tldr_summary,
            Check::Visuals => &self.visuals,
            Check::CallToAction => &self.call_to_action,
            Check::Formatting => &self.formatting,
            Check::AuthorInfo => &self.author_credibility,
            Check::CitableContent => &self.citable_content,
        }
    }

    /// Items in rubric order.
    pub fn items(&self) -> impl Iterator<Item = (Check, &ChecklistItem)> + '_ {
        Check::ALL.into_iter().map(move |check| (check, self.item(check)))
    }
}

/// Maps each check of `analysis` to a checklist entry.
///
/// The document is accepted for parity with [`analyze_structure`]; the
/// checklist itself depends only on the analysis.
pub fn generate_checklist(_document: &BlogDocument, analysis: &StructureAnalysis) -> OptimizationChecklist {
    let item = |check| ChecklistItem::new(check, analysis.passed(check));

    OptimizationChecklist {
        main_question: item(Check::MainQuestion),
        direct_answer: item(Check::DirectAnswer),
        tldr_summary: item(Check::Tldr),
        visuals: item(Check::Visuals),
        formatting: item(Check::Formatting),
        author_credibility: item(Check::AuthorInfo),
        citable_content: item(Check::CitableContent),
        call_to_action: item(Check::CallToAction),
    }
}
