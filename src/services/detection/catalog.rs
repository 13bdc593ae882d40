// Pattern Catalog
// Fixed, ordered table of rhetorical red-flag detectors and the signal detector that runs it.
// New detectors are new rows in CATALOG_ROWS.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Maximum number of signal categories reported per assessment
pub const MAX_REPORTED_SIGNALS: usize = 6;

/// Texts longer than this (in chars) are expected to cite something
const UNSOURCED_MIN_CHARS: usize = 120;
/// Texts shorter than this (in chars) carry too little context to verify
const SHORT_CLAIM_MAX_CHARS: usize = 40;

const LINK_PATTERN: &str = r"(?i)(https?://|www\.)";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Sensational,
    Absolutist,
    Urgency,
    Conspiracy,
    NoSources,
    VeryShort,
    CautiousLanguage,
}

impl SignalCategory {
    /// Human-readable label shown to readers
    pub fn label(self) -> &'static str {
        match self {
            SignalCategory::Sensational => "Sensational / clickbait language",
            SignalCategory::Absolutist => "Absolutist wording (always/never/guaranteed)",
            SignalCategory::Urgency => "Urgency / ‘share now’ framing",
            SignalCategory::Conspiracy => "Conspiracy framing (‘cover-up’, ‘they’re lying’)",
            SignalCategory::NoSources => "No sources/links provided",
            SignalCategory::VeryShort => "Very short claim (hard to verify from context)",
            SignalCategory::CautiousLanguage => "Uses cautious language (slightly lowers risk)",
        }
    }
}

/// How a catalog row decides whether it fires
#[derive(Debug, Clone, Copy)]
enum RuleSpec {
    /// Any phrase of the (case-insensitive) pattern occurs in the text
    Phrases(&'static str),
    /// No URL-like token and the text is longer than `min_chars`
    Unsourced { min_chars: usize },
    /// Text is shorter than `max_chars`
    ShortClaim { max_chars: usize },
}

const CATALOG_ROWS: &[(SignalCategory, RuleSpec, i32)] = &[
    (
        SignalCategory::Sensational,
        RuleSpec::Phrases(
            r"(?i)\b(shocking|explosive|they don[’']t want you to know|secret|wake up|exposed|destroyed)\b",
        ),
        15,
    ),
    (
        SignalCategory::Absolutist,
        RuleSpec::Phrases(r"(?i)\b(always|never|everyone|no one|guaranteed|proof)\b|\b100%"),
        10,
    ),
    (
        SignalCategory::Urgency,
        RuleSpec::Phrases(r"(?i)\b(share this|before it[’']s deleted|act now|urgent|must see)\b"),
        15,
    ),
    (
        SignalCategory::Conspiracy,
        RuleSpec::Phrases(r"(?i)\b(mainstream media|cover[- ]?up|deep state|they are lying)\b"),
        20,
    ),
    (
        SignalCategory::NoSources,
        RuleSpec::Unsourced {
            min_chars: UNSOURCED_MIN_CHARS,
        },
        10,
    ),
    (
        SignalCategory::VeryShort,
        RuleSpec::ShortClaim {
            max_chars: SHORT_CLAIM_MAX_CHARS,
        },
        5,
    ),
    (
        SignalCategory::CautiousLanguage,
        RuleSpec::Phrases(r"(?i)\b(might|could|unclear|preliminary|early findings)\b"),
        -10,
    ),
];

enum Rule {
    Phrases(Regex),
    Unsourced { link: Regex, min_chars: usize },
    ShortClaim { max_chars: usize },
}

impl Rule {
    fn compile(spec: RuleSpec) -> Self {
        match spec {
            RuleSpec::Phrases(pattern) => Rule::Phrases(Regex::new(pattern).unwrap()),
            RuleSpec::Unsourced { min_chars } => Rule::Unsourced {
                link: Regex::new(LINK_PATTERN).unwrap(),
                min_chars,
            },
            RuleSpec::ShortClaim { max_chars } => Rule::ShortClaim { max_chars },
        }
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            Rule::Phrases(re) => re.is_match(text),
            Rule::Unsourced { link, min_chars } => {
                !link.is_match(text) && text.chars().count() > *min_chars
            }
            Rule::ShortClaim { max_chars } => text.trim().chars().count() < *max_chars,
        }
    }
}

/// A single catalog row: category, compiled rule and score delta
pub struct Detector {
    pub category: SignalCategory,
    pub weight: i32,
    rule: Rule,
}

impl Detector {
    pub fn is_triggered(&self, text: &str) -> bool {
        self.rule.matches(text)
    }
}

/// Outcome of evaluating one detector against one text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub category: SignalCategory,
    pub weight: i32,
    pub triggered: bool,
}

static CATALOG: OnceLock<Vec<Detector>> = OnceLock::new();

/// The compiled catalog, in evaluation order
pub fn catalog() -> &'static [Detector] {
    CATALOG.get_or_init(|| {
        CATALOG_ROWS
            .iter()
            .map(|&(category, spec, weight)| Detector {
                category,
                weight,
                rule: Rule::compile(spec),
            })
            .collect()
    })
}

/// Evaluate every detector, triggered or not, in catalog order
pub fn evaluate_catalog(text: &str) -> Vec<Signal> {
    catalog()
        .iter()
        .map(|d| Signal {
            category: d.category,
            weight: d.weight,
            triggered: d.is_triggered(text),
        })
        .collect()
}

/// Triggered signals only, in catalog order (not by weight)
pub fn detect_signals(text: &str) -> Vec<Signal> {
    evaluate_catalog(text)
        .into_iter()
        .filter(|s| s.triggered)
        .collect()
}

/// Labels of the first `MAX_REPORTED_SIGNALS` triggered signals
pub fn reported_labels(signals: &[Signal]) -> Vec<String> {
    signals
        .iter()
        .filter(|s| s.triggered)
        .take(MAX_REPORTED_SIGNALS)
        .map(|s| s.category.label().to_string())
        .collect()
}
