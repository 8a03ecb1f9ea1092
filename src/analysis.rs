//! Data model for Oracle analyses and Scribe simplifications.
//!
//! Invariants the rest of the app relies on:
//! * every score sits in [0.0, 10.0];
//! * all five dimensions are always present (the array form makes this
//!   structural, not a runtime check);
//! * `RiskLevel` is always one of the three enumerated verdicts — a response we
//!   could not parse is marked with `degraded: true` instead of a fourth value.

use std::fmt;

/// Coarse categorical verdict on a proposed house rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Safe,
    Risky,
    GameBreaking,
}

impl RiskLevel {
    /// Coerce a free-form provider string to the closest enumerated value.
    /// Unrecognized text falls back to `Safe`; the caller decides whether that
    /// warrants the degraded marker.
    pub fn from_model_text(s: &str) -> Self {
        let lower = s.to_lowercase();
        if lower.contains("break") {
            RiskLevel::GameBreaking
        } else if lower.contains("risk") {
            RiskLevel::Risky
        } else {
            RiskLevel::Safe
        }
    }

    /// Badge label shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::Risky => "Risky",
            RiskLevel::GameBreaking => "Game-Breaking",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five bounded impact dimensions of a house rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDimension {
    Balance,
    Complexity,
    FunFactor,
    Pacing,
    Clarity,
}

impl ScoreDimension {
    /// All dimensions in presentation order.
    pub const ALL: [ScoreDimension; 5] = [
        ScoreDimension::Balance,
        ScoreDimension::Complexity,
        ScoreDimension::FunFactor,
        ScoreDimension::Pacing,
        ScoreDimension::Clarity,
    ];

    /// Provider-facing label; must match the schema advertised by the prompt.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreDimension::Balance => "Balance",
            ScoreDimension::Complexity => "Complexity",
            ScoreDimension::FunFactor => "Fun Factor",
            ScoreDimension::Pacing => "Pacing",
            ScoreDimension::Clarity => "Clarity",
        }
    }
}

/// Lower and upper bound for every impact score.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;
/// Neutral default substituted for a missing dimension.
pub const SCORE_NEUTRAL: f64 = 5.0;

/// One submission to the Oracle. Immutable once built; constructed fresh per
/// submission, never reused.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Proposed house rule, verbatim user text.
    pub rule_text: String,
    /// Game system name, e.g. "D&D 5e".
    pub game_system: Option<String>,
    /// Rulebook excerpt extracted from an uploaded PDF (opaque text).
    pub rulebook_excerpt: Option<String>,
}

/// A single refinement suggestion from the Oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub rule: String,
    pub explanation: String,
}

/// Fully validated analysis result. The presentation layer never receives a
/// partially-typed value: every field is populated, possibly with defaults.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub risk: RiskLevel,
    /// One-to-two sentence explanation of the verdict.
    pub risk_note: String,
    pub summary: String,
    /// Indexed by `ScoreDimension::ALL` order; each in [SCORE_MIN, SCORE_MAX].
    pub scores: [f64; 5],
    /// Ordered textual findings (contradictions, economics, pacing).
    pub deep_dive: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    /// True when this is the degraded default substituted for an unparsable
    /// response ("Safe-unknown" marker).
    pub degraded: bool,
}

impl AnalysisResult {
    /// The documented degraded default used when the provider's response
    /// cannot be parsed.
    pub fn degraded() -> Self {
        Self {
            risk: RiskLevel::Safe,
            risk_note: String::new(),
            summary: String::new(),
            scores: [SCORE_NEUTRAL; 5],
            deep_dive: vec!["analysis unavailable".to_string()],
            suggestions: Vec::new(),
            degraded: true,
        }
    }

    /// Score for one dimension.
    pub fn score(&self, dim: ScoreDimension) -> f64 {
        let idx = ScoreDimension::ALL
            .iter()
            .position(|d| *d == dim)
            .unwrap_or(0);
        self.scores[idx]
    }
}

/// Progressive learning modes produced by the Scribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplifyMode {
    FirstGame,
    Advanced,
    Expert,
}

impl SimplifyMode {
    pub const ALL: [SimplifyMode; 3] =
        [SimplifyMode::FirstGame, SimplifyMode::Advanced, SimplifyMode::Expert];

    /// Tab label in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            SimplifyMode::FirstGame => "First Game",
            SimplifyMode::Advanced => "Advanced",
            SimplifyMode::Expert => "Expert",
        }
    }

    /// JSON key the provider is instructed to use for this mode.
    pub fn payload_key(&self) -> &'static str {
        match self {
            SimplifyMode::FirstGame => "first_game",
            SimplifyMode::Advanced => "advanced",
            SimplifyMode::Expert => "expert",
        }
    }

    /// Next mode in tab order, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            SimplifyMode::FirstGame => SimplifyMode::Advanced,
            SimplifyMode::Advanced => SimplifyMode::Expert,
            SimplifyMode::Expert => SimplifyMode::FirstGame,
        }
    }
}

/// One simplified rendition of the rulebook.
#[derive(Debug, Clone)]
pub struct SimplificationResult {
    pub mode: SimplifyMode,
    pub text: String,
}

/// All three simplification modes plus the meta summary, produced by a single
/// Scribe call. Held only in transient session state.
#[derive(Debug, Clone)]
pub struct SimplificationSet {
    pub summary: String,
    pub renditions: [SimplificationResult; 3],
}

impl SimplificationSet {
    /// Text for one mode.
    pub fn text_for(&self, mode: SimplifyMode) -> &str {
        self.renditions
            .iter()
            .find(|r| r.mode == mode)
            .map(|r| r.text.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_coercion_matches_closest_verdict() {
        assert_eq!(RiskLevel::from_model_text("Game-Breaking"), RiskLevel::GameBreaking);
        assert_eq!(RiskLevel::from_model_text("game breaking!"), RiskLevel::GameBreaking);
        assert_eq!(RiskLevel::from_model_text("Risky"), RiskLevel::Risky);
        assert_eq!(RiskLevel::from_model_text("somewhat risky"), RiskLevel::Risky);
        assert_eq!(RiskLevel::from_model_text("Safe"), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_model_text("???"), RiskLevel::Safe);
    }

    #[test]
    fn degraded_default_shape() {
        let r = AnalysisResult::degraded();
        assert!(r.degraded);
        assert_eq!(r.risk, RiskLevel::Safe);
        assert_eq!(r.scores, [SCORE_NEUTRAL; 5]);
        assert_eq!(r.deep_dive, vec!["analysis unavailable".to_string()]);
        assert!(r.suggestions.is_empty());
    }

    #[test]
    fn simplify_mode_tab_order_wraps() {
        assert_eq!(SimplifyMode::FirstGame.next(), SimplifyMode::Advanced);
        assert_eq!(SimplifyMode::Expert.next(), SimplifyMode::FirstGame);
    }
}
