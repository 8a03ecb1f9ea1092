//! Prompt Builder → Parser round-trip and UI-state flow tests (no network).

use std::sync::mpsc::{channel, Receiver, Sender};
use tabletop_oracle::analysis::{AnalysisRequest, AnalysisResult, RiskLevel, ScoreDimension};
use tabletop_oracle::error::OracleError;
use tabletop_oracle::openai::JobOutcome;
use tabletop_oracle::{parser, prompt};

mod common;

#[ctor::ctor]
fn _init() {
    common::init();
}

/// Build a payload that matches the schema the analysis prompt advertises.
fn synthetic_payload(scores: [f64; 5]) -> String {
    let score_obj: Vec<String> = ScoreDimension::ALL
        .iter()
        .zip(scores)
        .map(|(dim, v)| format!("\"{}\": {}", dim.label(), v))
        .collect();
    format!(
        r#"```json
{{
    "risk_score": "Risky",
    "risk_explanation": "Compounds with advantage.",
    "summary": "Noticeable but not broken.",
    "contradictions": ["Overlaps the inspiration reroll."],
    "impact_scores": {{ {} }},
    "balance_impact": "Players succeed more often.",
    "exploits": "None.",
    "game_pace": "Marginally slower.",
    "suggestions": [{{ "rule": "Limit to once per session.", "explanation": "Keeps stakes." }}]
}}
```"#,
        score_obj.join(", ")
    )
}

#[test]
fn builder_schema_round_trips_through_parser() {
    // The prompt advertises the exact keys/labels the parser expects; a payload
    // following that schema must reproduce its values exactly.
    let req = AnalysisRequest {
        rule_text: "Players may reroll any failed save once per turn".to_string(),
        game_system: Some("Generic D20".to_string()),
        rulebook_excerpt: None,
    };
    let p = prompt::analysis_prompt(&req, 10_000);
    for dim in ScoreDimension::ALL {
        assert!(p.contains(dim.label()), "prompt must advertise {}", dim.label());
    }

    let scores = [4.0, 6.5, 8.0, 5.0, 9.0];
    let reply = format!("Certainly! Here is the analysis.\n{}", synthetic_payload(scores));
    let res = parser::parse_analysis(&reply).expect("well-formed payload");

    assert_eq!(res.risk, RiskLevel::Risky);
    assert_eq!(res.scores, scores);
    assert_eq!(res.suggestions[0].rule, "Limit to once per session.");
    assert!(!res.degraded);
    // Exactly five score entries, always.
    assert_eq!(res.scores.len(), ScoreDimension::ALL.len());
}

#[test]
fn builder_output_respects_truncation_budget() {
    // 10,000語の抜粋でもプロンプトに入るのは予算分の先頭だけ
    let huge = "word ".repeat(10_000);
    let budget = 2_000;
    let req = AnalysisRequest {
        rule_text: "Players may reroll any failed save once per turn".to_string(),
        game_system: None,
        rulebook_excerpt: Some(huge.clone()),
    };
    let p = prompt::analysis_prompt(&req, budget);
    let truncated = prompt::truncate_excerpt(&huge, budget);
    assert!(p.contains(&truncated));
    assert!(!p.contains(&huge));
    // Idempotence: truncating the already-truncated excerpt changes nothing.
    assert_eq!(prompt::truncate_excerpt(&truncated, budget), truncated);
}

#[test]
fn oversized_rule_text_is_rejected_before_any_network_call() {
    // 貼り付けられた50万文字級のルールはプロンプト構築よりも手前で弾く
    let huge_rule = "reroll ".repeat(100_000);
    let err = prompt::check_rule_input(&huge_rule).unwrap_err();
    assert!(matches!(err, OracleError::Input(_)));
    // 質問入力も同じ検査を通る（Sage 側の送信前チェック）
    assert!(prompt::check_rule_input("How does initiative work?").is_ok());
}

#[test]
fn unparsable_reply_degrades_instead_of_failing() {
    let reply = "The rule seems fine to me, nothing to worry about.";
    let err = parser::parse_analysis(reply).unwrap_err();
    assert!(matches!(err, OracleError::Parse(_)));

    // The worker substitutes the documented degraded default on Parse errors.
    let degraded = AnalysisResult::degraded();
    assert_eq!(degraded.risk, RiskLevel::Safe);
    assert!(degraded.degraded);
    assert_eq!(degraded.deep_dive, vec!["analysis unavailable".to_string()]);
}

/// A minimal mode-like struct to test UI state transitions without spawning
/// the real worker.
struct TestMode {
    result: Option<AnalysisResult>,
    error: Option<String>,
    pending: bool,
    tx: Sender<Result<JobOutcome, OracleError>>,
    rx: Receiver<Result<JobOutcome, OracleError>>,
}

impl TestMode {
    fn new() -> Self {
        let (tx, rx) = channel();
        Self { result: None, error: None, pending: false, tx, rx }
    }

    fn submit(&mut self) {
        self.result = None;
        self.error = None;
        self.pending = true;
    }

    fn check_outcome(&mut self) {
        if let Ok(outcome) = self.rx.try_recv() {
            self.pending = false;
            match outcome {
                Ok(JobOutcome::Analysis(res)) => self.result = Some(res),
                Ok(_) => {}
                Err(e) => self.error = Some(e.user_message()),
            }
        }
    }
}

#[test]
fn timeout_shows_service_unavailable_and_no_result() {
    let mut mode = TestMode::new();
    mode.submit();
    assert!(mode.pending);

    // ワーカーがタイムアウトをServiceUnavailableとして返した想定
    mode.tx
        .send(Err(OracleError::ServiceUnavailable("provider call exceeded 60s".into())))
        .unwrap();
    mode.check_outcome();

    assert!(!mode.pending);
    assert!(mode.result.is_none(), "no result may be rendered after a timeout");
    let msg = mode.error.expect("inline error message expected");
    assert!(msg.contains("再試行"));
}

#[test]
fn successful_outcome_replaces_pending_state() {
    let mut mode = TestMode::new();
    mode.submit();
    mode.tx
        .send(Ok(JobOutcome::Analysis(AnalysisResult::degraded())))
        .unwrap();
    mode.check_outcome();
    assert!(!mode.pending);
    assert!(mode.error.is_none());
    assert!(mode.result.unwrap().degraded);
}
