//! ジョブワーカー（TUIとは別スレッドで動く）
//!
//! UIスレッドからmpsc経由でジョブを受け取り、プロンプト構築 → プロバイダ呼び出し
//! → 応答パースまでを1サイクルとして実行する。分析応答のパース失敗だけは
//! ここで劣化デフォルト結果に差し替える（ページ全体を失敗させない）。
//! それ以外のエラーはそのままUIへ返し、インライン表示される。

use crate::analysis::{AnalysisRequest, AnalysisResult, SimplificationSet};
use crate::config::Config;
use crate::error::OracleError;
use crate::openai::client::{complete, TEMP_ANALYSIS, TEMP_QA, TEMP_SIMPLIFY};
use crate::parser;
use crate::prompt;
use std::sync::mpsc::{Receiver, Sender};
use tokio::runtime::Runtime;
use tracing::{error, info, instrument, warn};

/// ワーカーへ送る1件のジョブ
#[derive(Debug, Clone)]
pub enum Job {
    /// ハウスルールのリスク分析
    Analyze(AnalysisRequest),
    /// ルールブックの3段階簡略化
    Simplify { rulebook: String, game_title: Option<String> },
    /// ルールに関する自由質問
    Ask { question: String, rulebook: Option<String>, game_title: Option<String> },
}

/// ワーカーからの応答
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Analysis(AnalysisResult),
    Simplification(SimplificationSet),
    Answer(String),
}

/// ジョブワーカーを開始
pub fn start_oracle_worker(
    rx_job: Receiver<Job>,
    tx_outcome: Sender<Result<JobOutcome, OracleError>>,
    config: Config,
) {
    std::thread::spawn(move || {
        // 専用スレッド内でTokioランタイムを構築
        let rt = Runtime::new().expect("tokio runtime");
        rt.block_on(async move {
            while let Ok(job) = rx_job.recv() {
                info!(target: "worker", "job_received: {}", job_label(&job));
                let outcome = process_job(job, &config).await;
                if let Err(e) = &outcome {
                    error!(target: "worker", "job_failed: {e}");
                }
                let _ = tx_outcome.send(outcome);
            }
        });
    });
}

fn job_label(job: &Job) -> &'static str {
    match job {
        Job::Analyze(_) => "analyze",
        Job::Simplify { .. } => "simplify",
        Job::Ask { .. } => "ask",
    }
}

/// 分析応答のパース結果を検証済み結果へ変換する。
/// パース失敗だけは劣化デフォルトに差し替え、それ以外のエラーは伝播する。
pub fn analysis_from_reply(raw: &str) -> Result<AnalysisResult, OracleError> {
    match parser::parse_analysis(raw) {
        Ok(result) => Ok(result),
        Err(OracleError::Parse(reason)) => {
            warn!(target: "worker", "analysis_parse_failed: {reason}; using degraded default");
            Ok(AnalysisResult::degraded())
        }
        Err(other) => Err(other),
    }
}

/// 1ジョブ分のパイプライン実行
#[instrument(name = "process_job", skip(job, config), fields(kind = job_label(&job)))]
async fn process_job(job: Job, config: &Config) -> Result<JobOutcome, OracleError> {
    match job {
        Job::Analyze(req) => {
            prompt::check_rule_input(&req.rule_text)?;
            let p = prompt::analysis_prompt(&req, config.excerpt_budget);
            let raw = complete(&p, TEMP_ANALYSIS, config).await?;
            Ok(JobOutcome::Analysis(analysis_from_reply(&raw)?))
        }
        Job::Simplify { rulebook, game_title } => {
            if rulebook.trim().is_empty() {
                return Err(OracleError::Input("rulebook text is empty".to_string()));
            }
            let p = prompt::simplify_prompt(&rulebook, game_title.as_deref(), config.excerpt_budget);
            let raw = complete(&p, TEMP_SIMPLIFY, config).await?;
            Ok(JobOutcome::Simplification(parser::parse_simplification(&raw)?))
        }
        Job::Ask { question, rulebook, game_title } => {
            prompt::check_rule_input(&question)?;
            let p = prompt::question_prompt(
                &question,
                rulebook.as_deref(),
                game_title.as_deref(),
                config.excerpt_budget,
            );
            let answer = complete(&p, TEMP_QA, config).await?;
            Ok(JobOutcome::Answer(answer))
        }
    }
}
