use clap::Parser;
use mazepath::app::{self, Cli, Config};
use tracing_appender::non_blocking::WorkerGuard;

/// Environment variable holding the log level (`error`, `warn`, `info`, `debug` or `trace`)
const LOG_LEVEL_VAR: &str = "MAZEPATH_LOG";
const LOG_FILE: &str = "mazepath.log";

/// Logs go to a file since the terminal is taken by the renderer.
/// The returned guard flushes pending lines when dropped.
fn init_logging() -> WorkerGuard {
    let level = std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|s| s.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .init();
    guard
}

fn main() -> std::io::Result<()> {
    let config = Config::from(Cli::parse());

    let _guard = init_logging();
    tracing::info!("[main] starting with {:?}", config);

    if config.headless {
        return app::run_headless(&config, &mut std::io::stdout().lock());
    }

    let mut stdout = std::io::stdout();
    app::setup_terminal(&mut stdout)?;
    let result = app::run(&config, &mut stdout);
    app::restore_terminal(&mut stdout)?;
    result
}
