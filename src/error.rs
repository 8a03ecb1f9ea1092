//! Error taxonomy for the Oracle & Scribe pipeline.
//!
//! Per-request failures (`ServiceUnavailable` / `Provider` / `Parse` / `Input` /
//! `Pdf`) are caught at the worker boundary and turned into inline UI messages;
//! only `Configuration` is fatal, and only at startup.

use thiserror::Error;

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors that can occur while consulting the Oracle or the Scribe.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    /// Missing or unusable startup configuration (API key). Fatal.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network failure or timeout talking to the provider. Recoverable.
    #[error("provider unreachable: {0}")]
    ServiceUnavailable(String),

    /// The provider answered with an error status. Recoverable.
    #[error("provider error: {0}")]
    Provider(String),

    /// The response did not contain a decodable payload. The caller falls back
    /// to the degraded default result.
    #[error("response parse failure: {0}")]
    Parse(String),

    /// User input rejected before any network call.
    #[error("invalid input: {0}")]
    Input(String),

    /// Rulebook PDF could not be read or contained no text.
    #[error("rulebook extraction failed: {0}")]
    Pdf(String),
}

impl OracleError {
    /// Transient failures are worth a single retry; everything else is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, OracleError::ServiceUnavailable(_))
    }

    /// One-line message for the inline UI error slot.
    pub fn user_message(&self) -> String {
        match self {
            OracleError::Configuration(m) => format!("設定エラー: {m}"),
            OracleError::ServiceUnavailable(_) => {
                "オラクルに届きません。接続を確認して再試行してください。".to_string()
            }
            OracleError::Provider(m) => format!("プロバイダエラー: {m}"),
            OracleError::Parse(_) => "応答の解読に失敗しました。".to_string(),
            OracleError::Input(m) => format!("入力エラー: {m}"),
            OracleError::Pdf(m) => format!("ルールブック読取エラー: {m}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_service_unavailable_is_transient() {
        assert!(OracleError::ServiceUnavailable("timeout".into()).is_transient());
        assert!(!OracleError::Provider("429".into()).is_transient());
        assert!(!OracleError::Parse("bad json".into()).is_transient());
        assert!(!OracleError::Input("empty".into()).is_transient());
    }

    #[test]
    fn user_messages_are_nonempty() {
        let errors = [
            OracleError::Configuration("k".into()),
            OracleError::ServiceUnavailable("t".into()),
            OracleError::Provider("p".into()),
            OracleError::Parse("j".into()),
            OracleError::Input("i".into()),
            OracleError::Pdf("f".into()),
        ];
        for e in errors {
            assert!(!e.user_message().is_empty());
        }
    }
}
