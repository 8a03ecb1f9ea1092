//! メニューモード: ツール選択とキャンペーン設定（タイトル・ルールブック読込）

use super::{AppMode, Mode, OracleMode, SageMode, ScribeMode};
use crate::config::Config;
use crate::pdf;
use crate::rulebook;
use crate::session::Session;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// メニューの選択肢
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Oracle,
    Scribe,
    Sage,
    Exit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Oracle => write!(f, "House Rule Oracle"),
            MenuItem::Scribe => write!(f, "Rule Scribe (Simplifier)"),
            MenuItem::Sage => write!(f, "RuleMaster Sage (Q&A)"),
            MenuItem::Exit => write!(f, "Exit"),
        }
    }
}

impl MenuItem {
    fn all() -> [MenuItem; 4] {
        [MenuItem::Oracle, MenuItem::Scribe, MenuItem::Sage, MenuItem::Exit]
    }

    fn next(self) -> MenuItem {
        match self {
            MenuItem::Oracle => MenuItem::Scribe,
            MenuItem::Scribe => MenuItem::Sage,
            MenuItem::Sage => MenuItem::Exit,
            MenuItem::Exit => MenuItem::Oracle,
        }
    }

    fn prev(self) -> MenuItem {
        match self {
            MenuItem::Oracle => MenuItem::Exit,
            MenuItem::Scribe => MenuItem::Oracle,
            MenuItem::Sage => MenuItem::Scribe,
            MenuItem::Exit => MenuItem::Sage,
        }
    }
}

/// 編集中のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Editing {
    None,
    GameTitle,
    RulebookPath,
}

/// メニューモード状態
pub struct MenuMode {
    session: Session,
    config: Config,
    selected: MenuItem,
    editing: Editing,
    /// 編集中の入力バッファ
    input: String,
    /// 直近の操作結果（読込成否・警告など）
    status: Option<Line<'static>>,
}

impl MenuMode {
    pub fn new(session: Session, config: Config) -> Self {
        Self {
            session,
            config,
            selected: MenuItem::Oracle,
            editing: Editing::None,
            input: String::new(),
            status: None,
        }
    }

    /// 選択中のツールへ遷移（セッションは明示的に引き渡す）
    fn enter_selected(&self) -> Option<AppMode> {
        match self.selected {
            MenuItem::Oracle => Some(AppMode::Oracle(OracleMode::new(
                self.session.clone(),
                self.config.clone(),
            ))),
            MenuItem::Scribe => Some(AppMode::Scribe(ScribeMode::new(
                self.session.clone(),
                self.config.clone(),
            ))),
            MenuItem::Sage => Some(AppMode::Sage(SageMode::new(
                self.session.clone(),
                self.config.clone(),
            ))),
            MenuItem::Exit => Some(AppMode::Exit),
        }
    }

    /// ルールブックPDFを読み込み、キーワード検査の結果をステータスに反映
    fn load_rulebook(&mut self, path_text: &str) {
        let path = PathBuf::from(path_text.trim());
        match pdf::extract_rulebook(&path) {
            Ok(text) => {
                let check = rulebook::check_tome(&text);
                if check.looks_like_rulebook {
                    self.status = Some(Line::from(format!(
                        "読込完了: {} / {}",
                        path.display(),
                        check.note()
                    )));
                } else {
                    warn!(target: "menu", "tome_check_failed: {}", check.note());
                    self.status = Some(Line::from(Span::styled(
                        format!("警告: {}", check.note()),
                        Style::default().fg(Color::Yellow),
                    )));
                }
                info!(target: "menu", "rulebook_loaded: {}", path.display());
                self.session.rulebook_text = Some(text);
                self.session.rulebook_path = Some(path);
            }
            Err(e) => {
                self.status = Some(ui::error_line(&e.user_message()));
            }
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = self.input.clone();
                match self.editing {
                    Editing::GameTitle => {
                        self.session.game_title =
                            (!text.trim().is_empty()).then(|| text.trim().to_string());
                        self.status = Some(Line::from("タイトルを更新しました"));
                    }
                    Editing::RulebookPath => self.load_rulebook(&text),
                    Editing::None => {}
                }
                self.editing = Editing::None;
                self.input.clear();
            }
            KeyCode::Esc => {
                self.editing = Editing::None;
                self.input.clear();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) => {
                self.input.push(ch);
            }
            _ => {}
        }
    }
}

impl Mode for MenuMode {
    fn update(&mut self) {
        // メニューには定期更新は不要
    }

    fn render(&self, f: &mut Frame) {
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // ヘッダ
                Constraint::Length(6), // ツール選択
                Constraint::Length(4), // キャンペーン設定
                Constraint::Length(3), // 入力欄（編集時）
                Constraint::Min(0),    // ステータス
            ])
            .split(area);

        let guide = vec![
            Line::from("Oracle & Scribe — Ancient Rule Repository".bold()),
            Line::from("↑/↓ で選択 → Enter で開始 / t: タイトル編集, r: ルールブック読込"),
            Line::from("Esc or Ctrl+C で終了"),
        ];
        f.render_widget(
            Paragraph::new(guide).block(Block::default().borders(Borders::ALL).title("Guide")),
            chunks[0],
        );

        let items: Vec<Line> = MenuItem::all()
            .iter()
            .map(|item| {
                if self.selected == *item {
                    Line::from(format!("▶ {item}").bold().fg(Color::Cyan))
                } else {
                    Line::from(format!("  {item}"))
                }
            })
            .collect();
        f.render_widget(
            Paragraph::new(items)
                .block(Block::default().borders(Borders::ALL).title("Choose Your Tool")),
            chunks[1],
        );

        let settings = vec![
            Line::from(format!("Game Title: {}", self.session.title_label())),
            Line::from(format!("Rulebook:   {}", self.session.rulebook_label())),
        ];
        f.render_widget(
            Paragraph::new(settings)
                .block(Block::default().borders(Borders::ALL).title("Campaign Settings")),
            chunks[2],
        );

        if self.editing != Editing::None {
            let title = match self.editing {
                Editing::GameTitle => "Game Title",
                Editing::RulebookPath => "Rulebook PDF Path",
                Editing::None => "",
            };
            let mut current = self.input.clone();
            current.push('_'); // 簡易カーソル表示
            f.render_widget(
                Paragraph::new(current)
                    .block(Block::default().borders(Borders::ALL).title(title)),
                chunks[3],
            );
        }

        if let Some(status) = &self.status {
            f.render_widget(Paragraph::new(status.clone()), chunks[4]);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<AppMode>> {
        if self.editing != Editing::None {
            self.handle_edit_key(key);
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc => return Ok(Some(AppMode::Exit)),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Some(AppMode::Exit));
            }
            KeyCode::Up => self.selected = self.selected.prev(),
            KeyCode::Down => self.selected = self.selected.next(),
            KeyCode::Enter => return Ok(self.enter_selected()),
            KeyCode::Char('t') => {
                self.editing = Editing::GameTitle;
                self.input = self.session.game_title.clone().unwrap_or_default();
            }
            KeyCode::Char('r') => {
                self.editing = Editing::RulebookPath;
                self.input.clear();
            }
            _ => {}
        }
        Ok(None)
    }
}
