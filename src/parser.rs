//! Decode-and-validate step for provider responses.
//!
//! The model is asked to embed a JSON payload in its free-text reply; this
//! module is the single place where a hallucinated or malformed reply is
//! handled. Everything downstream assumes well-formed data. A missing or
//! undecodable payload surfaces as `OracleError::Parse`; the worker then
//! substitutes `AnalysisResult::degraded()` instead of failing the page.

use crate::analysis::{
    AnalysisResult, RiskLevel, ScoreDimension, SimplificationResult, SimplificationSet,
    SimplifyMode, Suggestion, SCORE_MAX, SCORE_MIN, SCORE_NEUTRAL,
};
use crate::error::{OracleError, OracleResult};
use serde_json::Value;
use tracing::{debug, warn};

/// Locate the JSON payload embedded in free text.
///
/// Lookup order: a ```json fence, then any ``` fence, then the outermost
/// `{...}` braces. Returns the payload slice without the fences.
pub fn extract_payload(text: &str) -> OracleResult<&str> {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return Ok(rest[..end].trim());
        }
    }
    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        if let Some(end) = rest.find("```") {
            return Ok(rest[..end].trim());
        }
    }
    // Unfenced reply: take the outermost object braces.
    if let (Some(open), Some(close)) = (text.find('{'), text.rfind('}')) {
        if open < close {
            return Ok(text[open..=close].trim());
        }
    }
    Err(OracleError::Parse("no JSON payload found in response".to_string()))
}

/// Clamp a raw score into [SCORE_MIN, SCORE_MAX]; non-numeric → neutral.
fn clamp_score(raw: Option<&Value>) -> f64 {
    match raw.and_then(Value::as_f64) {
        Some(v) => v.clamp(SCORE_MIN, SCORE_MAX),
        None => SCORE_NEUTRAL,
    }
}

fn string_field(obj: &Value, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Parse and validate an Oracle analysis response.
///
/// Guarantees on success: five scores, each clamped to [0, 10]; missing
/// dimensions filled with the neutral default; unrecognized risk strings
/// coerced to the closest verdict. Never panics on odd shapes.
pub fn parse_analysis(raw_response: &str) -> OracleResult<AnalysisResult> {
    let payload = extract_payload(raw_response)?;
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| OracleError::Parse(format!("payload is not valid JSON: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| OracleError::Parse("payload is not a JSON object".to_string()))?;

    let risk_raw = string_field(&value, "risk_score");
    if risk_raw.is_empty() {
        warn!(target: "parser", "risk_score missing; coercing to Safe");
    }
    let risk = RiskLevel::from_model_text(&risk_raw);

    let score_map = obj.get("impact_scores");
    let mut scores = [SCORE_NEUTRAL; 5];
    for (i, dim) in ScoreDimension::ALL.iter().enumerate() {
        scores[i] = clamp_score(score_map.and_then(|m| m.get(dim.label())));
    }

    // Deep-dive findings in a stable order: contradictions first, then the
    // economics / exploits / pacing paragraphs.
    let mut deep_dive: Vec<String> = obj
        .get("contradictions")
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    for key in ["balance_impact", "exploits", "game_pace"] {
        let section = string_field(&value, key);
        if !section.is_empty() {
            deep_dive.push(section);
        }
    }

    let suggestions: Vec<Suggestion> = obj
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(|s| {
                    let rule = string_field(s, "rule");
                    if rule.is_empty() {
                        return None;
                    }
                    Some(Suggestion { rule, explanation: string_field(s, "explanation") })
                })
                .collect()
        })
        .unwrap_or_default();

    debug!(target: "parser", risk = %risk, findings = deep_dive.len(), "analysis_parsed");
    Ok(AnalysisResult {
        risk,
        risk_note: string_field(&value, "risk_explanation"),
        summary: string_field(&value, "summary"),
        scores,
        deep_dive,
        suggestions,
        degraded: false,
    })
}

/// Parse a Scribe simplification response into the three learning modes.
/// A missing mode text becomes a placeholder so the result stays well-typed.
pub fn parse_simplification(raw_response: &str) -> OracleResult<SimplificationSet> {
    let payload = extract_payload(raw_response)?;
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| OracleError::Parse(format!("payload is not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(OracleError::Parse("payload is not a JSON object".to_string()));
    }

    let renditions = SimplifyMode::ALL.map(|mode| {
        let text = string_field(&value, mode.payload_key());
        let text = if text.is_empty() {
            format!("({} rules unavailable)", mode.label())
        } else {
            text
        };
        SimplificationResult { mode, text }
    });

    Ok(SimplificationSet { summary: string_field(&value, "summary"), renditions })
}
