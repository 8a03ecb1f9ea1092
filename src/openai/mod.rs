//! プロバイダ連携のモジュール
//!
//! `client` が1回分のチャット補完呼び出し（タイムアウト+リトライ付き）を、
//! `worker` がTUIとは別スレッドのジョブループを担当する。

pub mod client;
pub mod worker;

// 代表的な公開APIを再エクスポート
pub use client::{complete, complete_blocking, TEMP_ANALYSIS, TEMP_QA, TEMP_SIMPLIFY};
pub use worker::{analysis_from_reply, start_oracle_worker, Job, JobOutcome};
