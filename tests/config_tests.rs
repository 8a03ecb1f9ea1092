use tabletop_oracle::config::{
    require_api_key, Config, DEFAULT_EXCERPT_BUDGET, MAX_RULE_INPUT_CHARS, MIN_RULE_INPUT_CHARS,
};

mod common;

#[ctor::ctor]
fn _init() {
    common::init();
}

#[test]
fn config_defaults() {
    let c = Config::new();
    assert_eq!(c.max_tokens, 2000);
    assert_eq!(c.request_timeout_secs, 60);
    assert_eq!(c.retries, 1);
    assert_eq!(c.poll_interval_ms, 100);
    assert_eq!(c.excerpt_budget, DEFAULT_EXCERPT_BUDGET);
    assert!(!c.model.is_empty());
}

#[test]
fn excerpt_budget_override() {
    let c = Config::new().with_excerpt_budget(1234);
    assert_eq!(c.excerpt_budget, 1234);
}

#[test]
fn api_key_check_matches_environment() {
    // 変異せずに現在の環境と整合していることだけ確認する
    let present = std::env::var("OPENAI_API_KEY")
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);
    assert_eq!(require_api_key().is_ok(), present);
}

#[test]
fn constants_values() {
    assert_eq!(DEFAULT_EXCERPT_BUDGET, 60_000);
    assert_eq!(MIN_RULE_INPUT_CHARS, 5);
    assert_eq!(MAX_RULE_INPUT_CHARS, 20_000);
}
