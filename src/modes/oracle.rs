//! House Rule Oracle モード: ハウスルールのリスク分析

use super::{AppMode, MenuMode, Mode};
use crate::analysis::{AnalysisRequest, AnalysisResult};
use crate::config::Config;
use crate::error::OracleError;
use crate::export;
use crate::openai::{start_oracle_worker, Job, JobOutcome};
use crate::prompt;
use crate::session::Session;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::info;

/// Oracle モード状態
pub struct OracleMode {
    session: Session,
    config: Config,
    /// 現在の入力テキスト（提案ハウスルール）
    input: String,
    /// 最後に送信されたルール
    last_submitted: String,
    /// 検証済みの分析結果（失敗時は None のままにして古い結果を見せない）
    result: Option<AnalysisResult>,
    /// インラインエラー表示
    error: Option<String>,
    /// エクスポート結果などの通知行
    notice: Option<String>,
    /// ワーカー処理中フラグ（同時に1リクエストまで）
    pending: bool,
    /// ジョブ送信用チャンネル
    tx: Sender<Job>,
    /// 結果受信用チャンネル
    rx: Receiver<std::result::Result<JobOutcome, OracleError>>,
}

impl OracleMode {
    /// 新しい Oracle モードを作成（ワーカーをバックグラウンドで開始）
    pub fn new(session: Session, config: Config) -> Self {
        let (tx_job, rx_job) = mpsc::channel::<Job>();
        let (tx_outcome, rx_outcome) = mpsc::channel();
        start_oracle_worker(rx_job, tx_outcome, config.clone());

        Self {
            session,
            config,
            input: String::new(),
            last_submitted: String::from("(まだありません)"),
            result: None,
            error: None,
            notice: None,
            pending: false,
            tx: tx_job,
            rx: rx_outcome,
        }
    }

    /// ルールを送信。送信前にローカル検証し、失敗はネットワーク前に弾く。
    fn submit(&mut self) {
        if self.pending {
            return; // 1セッション同時1リクエストまで
        }
        if let Err(e) = prompt::check_rule_input(&self.input) {
            self.error = Some(e.user_message());
            return;
        }
        // 送信ごとに新しいリクエストを構築（使い回さない）
        let request = AnalysisRequest {
            rule_text: self.input.trim().to_string(),
            game_system: self.session.game_title.clone(),
            rulebook_excerpt: self.session.rulebook_text.clone(),
        };
        self.last_submitted = self.input.trim().to_string();
        self.input.clear();
        self.result = None;
        self.error = None;
        self.notice = None;
        self.pending = true;
        info!(target: "oracle", "submit_rule: {}", self.last_submitted);
        let _ = self.tx.send(Job::Analyze(request)); // ワーカー終了時は送信エラーを無視
    }

    /// ワーカー応答をチェックして状態を更新
    fn check_outcome(&mut self) {
        if let Ok(outcome) = self.rx.try_recv() {
            self.pending = false;
            match outcome {
                Ok(JobOutcome::Analysis(result)) => {
                    info!(target: "oracle", risk = %result.risk, degraded = result.degraded, "analysis_received");
                    self.result = Some(result);
                }
                Ok(_) => {} // このモードでは他の結果種は来ない
                Err(e) => {
                    self.error = Some(e.user_message());
                }
            }
        }
    }

    /// 提案ルールを次の入力として採用する（採用後に Enter で占い直せる）
    fn adopt_suggestion(&mut self, index: usize) {
        let Some(result) = &self.result else { return };
        let Some(suggestion) = result.suggestions.get(index) else {
            return;
        };
        self.input = suggestion.rule.clone();
        self.notice = Some(format!("提案 {} を入力に採用しました", index + 1));
        info!(target: "oracle", "suggestion_adopted: {}", suggestion.rule);
    }

    /// 結果をMarkdownスクロールとして書き出す
    fn export_scroll(&mut self) {
        let Some(result) = &self.result else {
            self.notice = Some("書き出す結果がありません".to_string());
            return;
        };
        let md = export::analysis_markdown(result, self.session.game_title.as_deref());
        match export::write_scroll(
            Path::new("."),
            "oracle_results",
            self.session.game_title.as_deref(),
            &md,
        ) {
            Ok(path) => self.notice = Some(format!("書き出しました: {}", path.display())),
            Err(e) => self.error = Some(e.user_message()),
        }
    }

    fn render_result(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let mut lines: Vec<Line<'static>> = Vec::new();
        if self.pending {
            lines.push(ui::pending_line("オラクルに問い合わせ中..."));
        } else if let Some(err) = &self.error {
            lines.push(ui::error_line(err));
        } else if let Some(res) = &self.result {
            lines.push(ui::risk_badge(res));
            lines.push(Line::from(""));
            lines.extend(ui::score_chart(res));
            if !res.summary.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(format!("Insight: {}", res.summary)));
            }
            if !res.deep_dive.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from("Deep Dive".bold()));
                for finding in &res.deep_dive {
                    lines.push(Line::from(format!("- {finding}")));
                }
            }
            if !res.suggestions.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from("Expert Refinements".bold()));
                for (i, s) in res.suggestions.iter().enumerate() {
                    lines.push(Line::from(format!("{}. {}", i + 1, s.rule)));
                    if !s.explanation.is_empty() {
                        lines.push(Line::from(format!("   {}", s.explanation).italic()));
                    }
                }
            }
        } else {
            lines.push(Line::from("(まだ結果はありません)"));
        }
        if let Some(notice) = &self.notice {
            lines.push(Line::from(""));
            lines.push(Line::from(notice.clone()));
        }
        ui::render_block_paragraph(f, area, "Divination Results", lines);
    }
}

impl Mode for OracleMode {
    fn update(&mut self) {
        // ワーカー応答の非ブロッキングチェック
        self.check_outcome();
    }

    fn render(&self, f: &mut Frame) {
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),  // ヘッダ
                Constraint::Length(3),  // 入力欄
                Constraint::Length(3),  // 直近送信
                Constraint::Min(10),    // 結果
            ])
            .split(area);

        let guide = vec![
            Line::from("House Rule Oracle".bold()),
            Line::from("ルールをタイプ → Enter で占う / Alt+1..9: 提案を採用 / Ctrl+E: 書き出し / Esc: メニュー"),
            Line::from(format!(
                "Game: {} / Rulebook: {}",
                self.session.title_label(),
                self.session.rulebook_label()
            )),
        ];
        f.render_widget(
            Paragraph::new(guide).block(Block::default().borders(Borders::ALL).title("Guide")),
            chunks[0],
        );

        let mut current = self.input.clone();
        current.push('_'); // 簡易カーソル表示
        f.render_widget(
            Paragraph::new(current)
                .block(Block::default().borders(Borders::ALL).title("Proposed House Rule")),
            chunks[1],
        );

        f.render_widget(
            Paragraph::new(self.last_submitted.clone())
                .block(Block::default().borders(Borders::ALL).title("Last Submitted")),
            chunks[2],
        );

        self.render_result(f, chunks[3]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<AppMode>> {
        match key.code {
            KeyCode::Esc => {
                return Ok(Some(AppMode::Menu(MenuMode::new(
                    self.session.clone(),
                    self.config.clone(),
                ))));
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Some(AppMode::Exit));
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.export_scroll();
            }
            // Alt+1..9: 対応する番号の提案を入力へ採用（数字入力と衝突しないようAlt修飾）
            KeyCode::Char(ch)
                if key.modifiers.contains(KeyModifiers::ALT) && ch.is_ascii_digit() =>
            {
                if let Some(n) = ch.to_digit(10).filter(|n| *n >= 1) {
                    self.adopt_suggestion((n - 1) as usize);
                }
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) => {
                self.input.push(ch);
            }
            _ => {}
        }
        Ok(None)
    }
}
