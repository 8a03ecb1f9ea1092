use color_eyre::Result;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    color_eyre::install()?;

    // Load .env (optional). This allows reading OPENAI_API_KEY from a local .env file.
    // If the file doesn't exist, ignore the error.
    let _ = dotenvy::dotenv();

    // APIキーは起動条件。欠落ならTUIを立ち上げる前に終了する。
    tabletop_oracle::config::require_api_key()?;

    // ログ: 標準出力は使わず、ファイルへのみ出力してratatuiと衝突しないようにする
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    // _guardはdropするとログが失われるため、スコープ終了まで保持
    let guard = _guard; // keep alive

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // ファイルにANSIカラー不要
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // guard を使うことでdropされないようにする
    let _keep_guard = guard;
    let terminal = ratatui::init();
    let res = tabletop_oracle::run(terminal);
    ratatui::restore();
    res
}
