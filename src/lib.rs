// 同階層のファイルをモジュールとしてインポート
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod modes; // Mode system for the menu / Oracle / Scribe / Sage screens
pub mod openai;
pub mod parser;
pub mod pdf;
pub mod prompt;
pub mod rulebook;
pub mod session;
pub mod ui;

pub use config::Config;
pub use error::{OracleError, OracleResult};

use color_eyre::Result;
use crossterm::event::{self as crossterm_event, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::Duration;

// Ensure .env is loaded for tests before anything else runs in the test process.
#[cfg(test)]
#[ctor::ctor]
fn load_dotenv_for_tests() {
    let _ = dotenvy::dotenv();
}

/// アプリケーションのメインループを実行
pub fn run(mut terminal: DefaultTerminal) -> Result<()> {
    let config = Config::new();
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    // セッション状態はここが起点。各モードへ明示的に引き渡す。
    let session = session::Session::default();
    let mut current_mode = modes::AppMode::Menu(modes::MenuMode::new(session, config));

    loop {
        // 現在のモードで更新処理を実行
        current_mode.update();

        // 画面を描画
        terminal.draw(|f| current_mode.render(f))?;

        // poll_interval 以内にイベントが来たら処理
        if crossterm_event::poll(poll_interval)? {
            match crossterm_event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match current_mode.handle_key(key) {
                        Ok(Some(next_mode)) => {
                            // モード遷移またはExit
                            if matches!(next_mode, modes::AppMode::Exit) {
                                break;
                            }
                            current_mode = next_mode;
                        }
                        Ok(None) => {
                            // 同じモード継続
                        }
                        Err(e) => {
                            // エラーが発生した場合はメニューに戻す
                            tracing::error!("Error in mode: {:?}", e);
                            let session = session::Session::default();
                            current_mode =
                                modes::AppMode::Menu(modes::MenuMode::new(session, Config::new()));
                        }
                    }
                }
                Event::Resize(_, _) => {
                    // 次ループで再描画されるので特別な処理なし
                }
                _ => {}
            }
        }
    }
    Ok(())
}
