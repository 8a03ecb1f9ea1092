//! Rule Scribe モード: ルールブックの3段階簡略化とフィードバック

use super::{AppMode, MenuMode, Mode};
use crate::analysis::{SimplificationSet, SimplifyMode};
use crate::config::Config;
use crate::error::OracleError;
use crate::export;
use crate::openai::{start_oracle_worker, Job, JobOutcome};
use crate::session::Session;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::info;

/// セッション内のみ保持するフィードバック（永続化しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Up,
    Down,
}

/// Scribe モード状態
pub struct ScribeMode {
    session: Session,
    config: Config,
    /// 現在表示中の学習モードタブ
    tab: SimplifyMode,
    /// 簡略化結果（3モード分 + 概要）
    result: Option<SimplificationSet>,
    error: Option<String>,
    notice: Option<String>,
    feedback: Option<Feedback>,
    /// 本文のスクロール位置
    scroll: u16,
    pending: bool,
    tx: Sender<Job>,
    rx: Receiver<std::result::Result<JobOutcome, OracleError>>,
}

impl ScribeMode {
    /// 新しい Scribe モードを作成（ワーカーをバックグラウンドで開始）
    pub fn new(session: Session, config: Config) -> Self {
        let (tx_job, rx_job) = mpsc::channel::<Job>();
        let (tx_outcome, rx_outcome) = mpsc::channel();
        start_oracle_worker(rx_job, tx_outcome, config.clone());

        Self {
            session,
            config,
            tab: SimplifyMode::FirstGame,
            result: None,
            error: None,
            notice: None,
            feedback: None,
            scroll: 0,
            pending: false,
            tx: tx_job,
            rx: rx_outcome,
        }
    }

    /// 簡略化を依頼。ルールブック未読込なら送信前に弾く。
    fn submit(&mut self) {
        if self.pending {
            return;
        }
        let Some(rulebook) = self.session.rulebook_text.clone() else {
            self.error = Some("先にメニューでルールブックを読み込んでください".to_string());
            return;
        };
        self.result = None;
        self.error = None;
        self.notice = None;
        self.feedback = None;
        self.scroll = 0;
        self.pending = true;
        info!(target: "scribe", chars = rulebook.len(), "submit_simplify");
        let _ = self.tx.send(Job::Simplify {
            rulebook,
            game_title: self.session.game_title.clone(),
        });
    }

    fn check_outcome(&mut self) {
        if let Ok(outcome) = self.rx.try_recv() {
            self.pending = false;
            match outcome {
                Ok(JobOutcome::Simplification(set)) => {
                    info!(target: "scribe", "simplification_received");
                    self.result = Some(set);
                }
                Ok(_) => {}
                Err(e) => self.error = Some(e.user_message()),
            }
        }
    }

    fn export_scroll(&mut self) {
        let Some(set) = &self.result else {
            self.notice = Some("書き出す結果がありません".to_string());
            return;
        };
        let md = export::simplification_markdown(set, self.session.game_title.as_deref());
        match export::write_scroll(
            Path::new("."),
            "simplified_rules",
            self.session.game_title.as_deref(),
            &md,
        ) {
            Ok(path) => self.notice = Some(format!("書き出しました: {}", path.display())),
            Err(e) => self.error = Some(e.user_message()),
        }
    }

    /// タブ見出し行（選択中を強調）
    fn tab_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for mode in SimplifyMode::ALL {
            let label = format!(" {} ", mode.label());
            if mode == self.tab {
                spans.push(Span::styled(
                    label,
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                ));
            } else {
                spans.push(Span::raw(label));
            }
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

impl Mode for ScribeMode {
    fn update(&mut self) {
        self.check_outcome();
    }

    fn render(&self, f: &mut Frame) {
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // ヘッダ
                Constraint::Length(2), // タブ
                Constraint::Min(8),    // 本文
                Constraint::Length(2), // ステータス/フィードバック
            ])
            .split(area);

        let guide = vec![
            Line::from("Rule Scribe".bold()),
            Line::from("Enter: 簡略化 / Tab: モード切替 / ↑↓: スクロール / u・d: 評価 / Ctrl+E: 書き出し / Esc: メニュー"),
            Line::from(format!("Rulebook: {}", self.session.rulebook_label())),
        ];
        f.render_widget(
            Paragraph::new(guide).block(Block::default().borders(Borders::ALL).title("Guide")),
            chunks[0],
        );

        f.render_widget(Paragraph::new(self.tab_line()), chunks[1]);

        let body: Vec<Line<'static>> = if self.pending {
            vec![ui::pending_line("書記が羊皮紙に向かっています...")]
        } else if let Some(err) = &self.error {
            vec![ui::error_line(err)]
        } else if let Some(set) = &self.result {
            let mut lines = Vec::new();
            if !set.summary.is_empty() {
                lines.push(Line::from(format!("Overview: {}", set.summary).italic()));
                lines.push(Line::from(""));
            }
            for text_line in set.text_for(self.tab).lines() {
                lines.push(Line::from(text_line.to_string()));
            }
            lines
        } else {
            vec![Line::from("(まだ結果はありません)")]
        };
        let body_widget = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(Block::default().borders(Borders::ALL).title(self.tab.label()));
        f.render_widget(body_widget, chunks[2]);

        let mut status = Vec::new();
        match self.feedback {
            Some(Feedback::Up) => status.push(Span::raw("評価: 👍 書記は深く感謝します ")),
            Some(Feedback::Down) => status.push(Span::raw("評価: 👎 書記は精進します ")),
            None => {}
        }
        if let Some(notice) = &self.notice {
            status.push(Span::raw(notice.clone()));
        }
        f.render_widget(Paragraph::new(Line::from(status)), chunks[3]);
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
            KeyCode::Enter => self.submit(),
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.scroll = 0;
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('u') if self.result.is_some() => self.feedback = Some(Feedback::Up),
            KeyCode::Char('d') if self.result.is_some() => self.feedback = Some(Feedback::Down),
            _ => {}
        }
        Ok(None)
    }
}
