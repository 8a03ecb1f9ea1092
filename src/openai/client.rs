//! プロバイダへの1回分の問い合わせ（タイムアウト・リトライ・エラー分類）
//!
//! プロバイダはテキスト補完サービスとして不透明に扱う。呼び出し1回につき
//! アウトバウンド通信1回。ネットワーク断/タイムアウトは `ServiceUnavailable`、
//! プロバイダ側のエラー応答は `Provider` として呼び出し元へ伝播する
//! （握りつぶさない。UIが失敗を表示する必要があるため）。

use crate::config::Config;
use crate::error::{OracleError, OracleResult};
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info, instrument, warn};

/// Oracle分析用の温度（元実装に合わせる）
pub const TEMP_ANALYSIS: f32 = 0.2;
/// Scribe簡略化用の温度
pub const TEMP_SIMPLIFY: f32 = 0.3;
/// Sage問答用の温度
pub const TEMP_QA: f32 = 0.4;

const SYSTEM_PROMPT: &str =
    "You are a precise assistant for tabletop game analysis. Follow the output \
     format in the user message exactly.";

/// `OpenAIError` をアプリのエラー分類に写像する
fn classify(err: OpenAIError) -> OracleError {
    match err {
        OpenAIError::ApiError(api) => OracleError::Provider(api.message),
        OpenAIError::Reqwest(e) => OracleError::ServiceUnavailable(e.to_string()),
        other => OracleError::Provider(other.to_string()),
    }
}

/// 1回のチャット補完を実行（タイムアウト付き、分類済みエラーを返す）
async fn attempt(prompt: &str, temperature: f32, config: &Config) -> OracleResult<String> {
    let client = Client::new(); // OPENAI_API_KEYを環境変数から読み取り

    let system = ChatCompletionRequestSystemMessageArgs::default()
        .content(SYSTEM_PROMPT)
        .build()
        .map_err(classify)?;
    let user = ChatCompletionRequestUserMessageArgs::default()
        .content(prompt)
        .build()
        .map_err(classify)?;

    let req = CreateChatCompletionRequestArgs::default()
        .model(&config.model)
        .messages([system.into(), user.into()])
        .temperature(temperature)
        .max_tokens(config.max_tokens)
        .build()
        .map_err(classify)?;

    let chat = client.chat();
    let call = chat.create(req);
    let resp = match tokio::time::timeout(Duration::from_secs(config.request_timeout_secs), call)
        .await
    {
        Ok(result) => result.map_err(classify)?,
        Err(_elapsed) => {
            return Err(OracleError::ServiceUnavailable(format!(
                "provider call exceeded {}s",
                config.request_timeout_secs
            )));
        }
    };
    debug!(target: "openai", "response_choices: {}", resp.choices.len());

    resp.choices
        .first()
        .and_then(|c| c.message.content.clone())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| OracleError::Provider("empty response from provider".to_string()))
}

/// 温度を指定して1回の補完を取得する。一時的な失敗は `config.retries` 回まで
/// 再試行する（既定1回）。
#[instrument(name = "complete", skip(prompt, config), fields(prompt_len = prompt.len()))]
pub async fn complete(prompt: &str, temperature: f32, config: &Config) -> OracleResult<String> {
    info!(target: "openai", "request: model={}, temperature={}", config.model, temperature);
    let mut last_err = None;
    for attempt_no in 0..=config.retries {
        match attempt(prompt, temperature, config).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_transient() && attempt_no < config.retries => {
                warn!(target: "openai", "transient_failure (attempt {}): {e}", attempt_no + 1);
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err
        .unwrap_or_else(|| OracleError::ServiceUnavailable("no attempts made".to_string())))
}

/// ランタイムを内部で作成してブロッキングで補完を取得するヘルパー
#[instrument(name = "complete_blocking", skip(prompt, config))]
pub fn complete_blocking(prompt: &str, temperature: f32, config: &Config) -> OracleResult<String> {
    let rt = Runtime::new()
        .map_err(|e| OracleError::ServiceUnavailable(format!("tokio runtime: {e}")))?;
    rt.block_on(complete(prompt, temperature, config))
}
