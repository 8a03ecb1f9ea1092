//! RuleMaster Sage モード: ルールに関する自由質問（チャット形式）

use super::{AppMode, MenuMode, Mode};
use crate::config::Config;
use crate::error::OracleError;
use crate::openai::{start_oracle_worker, Job, JobOutcome};
use crate::prompt;
use crate::session::Session;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::info;

/// Sage モード状態
pub struct SageMode {
    session: Session,
    config: Config,
    /// 現在の入力テキスト（質問）
    input: String,
    /// 質問と回答の履歴（セッション内のみ）
    history: Vec<(String, String)>,
    /// 回答待ちの質問
    awaiting: Option<String>,
    error: Option<String>,
    pending: bool,
    /// 履歴のスクロール位置
    scroll: u16,
    tx: Sender<Job>,
    rx: Receiver<std::result::Result<JobOutcome, OracleError>>,
}

impl SageMode {
    /// 新しい Sage モードを作成（ワーカーをバックグラウンドで開始）
    pub fn new(session: Session, config: Config) -> Self {
        let (tx_job, rx_job) = mpsc::channel::<Job>();
        let (tx_outcome, rx_outcome) = mpsc::channel();
        start_oracle_worker(rx_job, tx_outcome, config.clone());

        Self {
            session,
            config,
            input: String::new(),
            history: Vec::new(),
            awaiting: None,
            error: None,
            pending: false,
            scroll: 0,
            tx: tx_job,
            rx: rx_outcome,
        }
    }

    fn submit(&mut self) {
        if self.pending {
            return;
        }
        if let Err(e) = prompt::check_rule_input(&self.input) {
            self.error = Some(e.user_message());
            return;
        }
        let question = self.input.trim().to_string();
        self.input.clear();
        self.error = None;
        self.pending = true;
        self.awaiting = Some(question.clone());
        info!(target: "sage", "submit_question: {question}");
        let _ = self.tx.send(Job::Ask {
            question,
            rulebook: self.session.rulebook_text.clone(),
            game_title: self.session.game_title.clone(),
        });
    }

    fn check_outcome(&mut self) {
        if let Ok(outcome) = self.rx.try_recv() {
            self.pending = false;
            match outcome {
                Ok(JobOutcome::Answer(answer)) => {
                    if let Some(question) = self.awaiting.take() {
                        info!(target: "sage", "answer_received: {} chars", answer.len());
                        self.history.push((question, answer));
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    self.awaiting = None;
                    self.error = Some(e.user_message());
                }
            }
        }
    }
}

impl Mode for SageMode {
    fn update(&mut self) {
        self.check_outcome();
    }

    fn render(&self, f: &mut Frame) {
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // ヘッダ
                Constraint::Min(8),    // 履歴
                Constraint::Length(3), // 入力欄
            ])
            .split(area);

        let guide = vec![
            Line::from("RuleMaster Sage".bold()),
            Line::from("質問をタイプ → Enter で送信 / ↑↓: スクロール / Esc: メニュー"),
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

        let mut lines: Vec<Line<'static>> = Vec::new();
        for (question, answer) in &self.history {
            lines.push(Line::from(format!("👤 {question}").bold()));
            for answer_line in answer.lines() {
                lines.push(Line::from(format!("🧙 {answer_line}")));
            }
            lines.push(Line::from(""));
        }
        if self.pending {
            if let Some(question) = &self.awaiting {
                lines.push(Line::from(format!("👤 {question}").bold()));
            }
            lines.push(ui::pending_line("賢者に伺っています..."));
        }
        if let Some(err) = &self.error {
            lines.push(ui::error_line(err));
        }
        if lines.is_empty() {
            lines.push(Line::from("(賢者はあなたの問いを待っています)"));
        }
        let history_widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(Block::default().borders(Borders::ALL).title("Dialogue"));
        f.render_widget(history_widget, chunks[1]);

        let mut current = self.input.clone();
        current.push('_'); // 簡易カーソル表示
        f.render_widget(
            Paragraph::new(current)
                .block(Block::default().borders(Borders::ALL).title("Ask the Sage")),
            chunks[2],
        );
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
            KeyCode::Enter => self.submit(),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
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
