//! Tome authentication: a cheap keyword scan that flags uploads which do not
//! look like board game rulebooks, so the UI can warn before any analysis.

/// Terms expected somewhere in a genuine rulebook.
const RULEBOOK_KEYWORDS: [&str; 8] = [
    "setup",
    "gameplay",
    "components",
    "turn order",
    "victory conditions",
    "rules",
    "player",
    "phase",
];

/// Minimum distinct keyword hits for a text to pass without a warning.
const MIN_KEYWORD_HITS: usize = 2;

/// Verdict of the keyword scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomeCheck {
    pub looks_like_rulebook: bool,
    /// Distinct keywords found, in scan order.
    pub found: Vec<&'static str>,
}

impl TomeCheck {
    /// Human-readable note for the UI.
    pub fn note(&self) -> String {
        if self.looks_like_rulebook {
            "Valid board game terminology detected.".to_string()
        } else {
            format!(
                "Few rulebook terms found ({} of {}); this may not be a rulebook.",
                self.found.len(),
                RULEBOOK_KEYWORDS.len()
            )
        }
    }
}

/// Scan `text` for rulebook vocabulary.
pub fn check_tome(text: &str) -> TomeCheck {
    let lower = text.to_lowercase();
    let found: Vec<&'static str> = RULEBOOK_KEYWORDS
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .collect();
    TomeCheck { looks_like_rulebook: found.len() >= MIN_KEYWORD_HITS, found }
}
