//! アプリケーション設定と定数

use crate::error::{OracleError, OracleResult};

/// プロンプトへ埋め込むルールブック抜粋の上限文字数（既定値）
pub const DEFAULT_EXCERPT_BUDGET: usize = 60_000;

/// 入力として受け付ける最小文字数（これ未満は送信前に拒否）
pub const MIN_RULE_INPUT_CHARS: usize = 5;

/// 入力として受け付ける最大文字数（ルール・質問はここで上限を掛け、
/// プロンプト長が入力に対して無制限にならないようにする。超過は送信前に拒否）
pub const MAX_RULE_INPUT_CHARS: usize = 20_000;

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct Config {
    /// プロバイダのモデル名
    pub model: String,
    /// 最大トークン数
    pub max_tokens: u32,
    /// プロバイダ呼び出しのタイムアウト（秒）
    pub request_timeout_secs: u64,
    /// 一時的な失敗に対するリトライ回数
    pub retries: u32,
    /// イベントポーリング間隔（ミリ秒）
    pub poll_interval_ms: u64,
    /// ルールブック抜粋の切り詰め上限（文字数）
    pub excerpt_budget: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // ORACLE_MODEL でモデルを差し替え可能（元実装の GEMINI_MODEL_NAME 相当）
            model: std::env::var("ORACLE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            // NOTE: Keep in sync with tests (tests/config_tests.rs).
            max_tokens: 2000,
            request_timeout_secs: 60,
            retries: 1,
            poll_interval_ms: 100,
            excerpt_budget: DEFAULT_EXCERPT_BUDGET,
        }
    }
}

impl Config {
    /// 新しい設定インスタンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 抜粋上限を差し替えた設定を返す（テスト用途）
    pub fn with_excerpt_budget(mut self, budget: usize) -> Self {
        self.excerpt_budget = budget;
        self
    }
}

/// 起動時のAPIキー確認。欠落は致命的エラーで、リクエストごとのエラーにはしない。
pub fn require_api_key() -> OracleResult<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(OracleError::Configuration(
            "OPENAI_API_KEY is not set (put it in .env or the environment)".to_string(),
        )),
    }
}
