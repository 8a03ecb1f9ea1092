//! Prompt construction for the Oracle, the Scribe and the Sage.
//!
//! Pure functions of their input: no side effects, no failure modes. Each
//! prompt states the task, embeds the user text verbatim, and spells out the
//! exact JSON schema the parser expects, so the model's free-text reply can be
//! decoded mechanically. Oversized rulebook excerpts are truncated here,
//! deterministically from the end, before anything goes on the wire.

use crate::analysis::AnalysisRequest;
use crate::config::{MAX_RULE_INPUT_CHARS, MIN_RULE_INPUT_CHARS};
use crate::error::{OracleError, OracleResult};

/// Deterministically truncate `text` to at most `budget` characters, keeping
/// the start. Idempotent: truncating an already-truncated excerpt is a no-op.
pub fn truncate_excerpt(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    text.chars().take(budget).collect()
}

/// Reject empty, too-short or oversized rule input before any network call.
/// Only the rulebook excerpt is truncated; rule and question text over the
/// cap is the user's own input, so it is rejected rather than silently cut.
pub fn check_rule_input(text: &str) -> OracleResult<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(OracleError::Input("rule text is empty".to_string()));
    }
    let chars = trimmed.chars().count();
    if chars < MIN_RULE_INPUT_CHARS {
        return Err(OracleError::Input(format!(
            "rule text is too short (min {MIN_RULE_INPUT_CHARS} chars)"
        )));
    }
    if chars > MAX_RULE_INPUT_CHARS {
        return Err(OracleError::Input(format!(
            "rule text is too long (max {MAX_RULE_INPUT_CHARS} chars)"
        )));
    }
    Ok(())
}

/// Shared context block: game title plus the (already truncated) excerpt, or a
/// note telling the model to rely on internal knowledge.
fn context_block(game_system: Option<&str>, excerpt: Option<&str>) -> String {
    let mut ctx = String::new();
    if let Some(title) = game_system {
        if !title.trim().is_empty() {
            ctx.push_str(&format!("Game Title: {}\n\n", title.trim()));
        }
    }
    match excerpt {
        Some(text) if !text.trim().is_empty() => {
            ctx.push_str(&format!(
                "Official Rules (context from the rulebook):\n---\n{text}\n---"
            ));
        }
        _ => {
            ctx.push_str(
                "Note: No official rulebook was provided. Rely on your internal knowledge.",
            );
        }
    }
    ctx
}

/// Build the Oracle analysis prompt. The embedded schema must stay in sync
/// with `parser::parse_analysis`.
pub fn analysis_prompt(req: &AnalysisRequest, excerpt_budget: usize) -> String {
    let excerpt = req
        .rulebook_excerpt
        .as_deref()
        .map(|e| truncate_excerpt(e, excerpt_budget));
    let ctx = context_block(req.game_system.as_deref(), excerpt.as_deref());
    let game = req.game_system.as_deref().unwrap_or("this game");

    format!(
        r#"You are an expert tabletop game designer and rules lawyer.
Analyze the 'House Rule' for '{game}'.

{ctx}

Proposed House Rule:
---
{rule}
---

Analysis Criteria:
1. Contradictions: does it break existing rules?
2. Economics: resource impact?
3. Exploits: infinite loops / solved states?
4. Pacing: game length impact?
5. Impact Scores (0-10): Balance, Complexity, Fun Factor, Pacing, Clarity.

Return JSON only, inside a ```json fence:
{{
    "risk_score": "Safe | Risky | Game-Breaking",
    "risk_explanation": "1-2 sentence explanation of the risk level",
    "summary": "...",
    "contradictions": ["..."],
    "impact_scores": {{ "Balance": 5, "Complexity": 5, "Fun Factor": 5, "Pacing": 5, "Clarity": 5 }},
    "balance_impact": "...",
    "exploits": "...",
    "game_pace": "...",
    "suggestions": [ {{ "rule": "...", "explanation": "..." }} ]
}}"#,
        rule = req.rule_text,
    )
}

/// Build the Scribe simplification prompt (three progressive learning modes).
pub fn simplify_prompt(rulebook: &str, game_title: Option<&str>, excerpt_budget: usize) -> String {
    let text = truncate_excerpt(rulebook, excerpt_budget);
    let game = game_title.unwrap_or("a tabletop game");

    format!(
        r#"You are an expert tabletop game educator.
Rewrite the provided rulebook text for '{game}' into three progressive learning modes.

Rulebook Text:
---
{text}
---

Output Specifications:
1. First Game Rules: straightforward language, core mechanics only, bullet points.
2. Advanced Rules: additional mechanics and strategies, clear examples.
3. Expert Rules: all nuances, edge cases and advanced strategies.

Return JSON only, inside a ```json fence:
{{
    "first_game": "Markdown text for first game rules",
    "advanced": "Markdown text for advanced rules",
    "expert": "Markdown text for expert rules",
    "summary": "Quick meta-summary of the rulebook structure"
}}"#,
    )
}

/// Build the Sage Q&A prompt. The answer comes back as plain Markdown, no
/// embedded payload to parse.
pub fn question_prompt(
    question: &str,
    rulebook: Option<&str>,
    game_title: Option<&str>,
    excerpt_budget: usize,
) -> String {
    let excerpt = rulebook.map(|r| truncate_excerpt(r, excerpt_budget));
    let ctx = context_block(game_title, excerpt.as_deref());
    let game = game_title.unwrap_or("all games");

    format!(
        r#"You are the 'RuleMaster Sage', an expert in tabletop game rules for '{game}'.
Answer the user's question accurately and concisely, citing the official rules where possible.

{ctx}

User Question:
---
{question}
---

Answer in Markdown. If the answer is not in the provided rules, use your general
game expertise and say so."#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rule: &str, excerpt: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            rule_text: rule.to_string(),
            game_system: Some("Generic D20".to_string()),
            rulebook_excerpt: excerpt.map(|s| s.to_string()),
        }
    }

    #[test]
    fn truncation_preserves_start_and_is_idempotent() {
        let text = "abcdefghij".repeat(100);
        let once = truncate_excerpt(&text, 42);
        assert_eq!(once.chars().count(), 42);
        assert!(text.starts_with(&once));
        let twice = truncate_excerpt(&once, 42);
        assert_eq!(once, twice);
    }

    #[test]
    fn truncation_is_noop_under_budget() {
        assert_eq!(truncate_excerpt("short", 100), "short");
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        // マルチバイト文字でもパニックせず文字単位で切り詰める
        let text = "竜の巣窟".repeat(10);
        let cut = truncate_excerpt(&text, 7);
        assert_eq!(cut.chars().count(), 7);
    }

    #[test]
    fn oversized_excerpt_is_truncated_in_prompt() {
        // 10,000語相当の抜粋が予算まで切り詰められること
        let huge = "word ".repeat(10_000);
        let req = request("Players may reroll any failed save once per turn", Some(huge.as_str()));
        let budget = 500;
        let prompt = analysis_prompt(&req, budget);
        assert!(!prompt.contains(&huge));
        let expected = truncate_excerpt(&huge, budget);
        assert!(prompt.contains(&expected));
    }

    #[test]
    fn prompt_embeds_rule_verbatim_and_schema() {
        let req = request("Players may reroll any failed save once per turn", None);
        let p = analysis_prompt(&req, 1000);
        assert!(p.contains("Players may reroll any failed save once per turn"));
        assert!(p.contains("Generic D20"));
        // スキーマのキーが明示されていること（パーサと同期）
        for key in ["risk_score", "impact_scores", "suggestions", "Fun Factor"] {
            assert!(p.contains(key), "missing schema key: {key}");
        }
        // ルールブック無しの場合は内部知識を使う指示が入る
        assert!(p.contains("internal knowledge"));
    }

    #[test]
    fn rule_input_validation() {
        assert!(check_rule_input("").is_err());
        assert!(check_rule_input("   ").is_err());
        assert!(check_rule_input("hi").is_err());
        assert!(check_rule_input("Players draw two cards").is_ok());
    }

    #[test]
    fn oversized_rule_input_is_rejected() {
        // 上限ちょうどは通し、1文字でも超えたら拒否する
        let at_cap = "a".repeat(MAX_RULE_INPUT_CHARS);
        assert!(check_rule_input(&at_cap).is_ok());
        let over_cap = "a".repeat(MAX_RULE_INPUT_CHARS + 1);
        assert!(matches!(check_rule_input(&over_cap), Err(OracleError::Input(_))));
    }

    #[test]
    fn question_prompt_mentions_rulebook_when_present() {
        let p = question_prompt("How does initiative work?", Some("roll d20"), Some("D&D"), 100);
        assert!(p.contains("roll d20"));
        assert!(p.contains("How does initiative work?"));
        let p2 = question_prompt("How?", None, None, 100);
        assert!(p2.contains("internal knowledge"));
    }
}
