//! Ceramic entrypoint.

use anyhow::Result;
use clap::Parser;
use core_actions::Editor;
use core_terminal::{RawTerminal, Tty};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const HELP_MESSAGE: &str = "HELP: Ctrl-S: Save | Ctrl-Q: Quit | Ctrl-F: Find";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ceramic", version, about = "Ceramic editor")]
struct Args {
    /// Optional path to open at startup. A missing file opens an empty
    /// buffer that saves to that path.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `ceramic.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// Logging must not write to the terminal the editor owns, so it goes to a
/// file through a non-blocking appender. The guard flushes on drop.
fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("ceramic.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "ceramic.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // global subscriber already installed; drop the guard so the writer
        // thread shuts down
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = core_config::load_from(args.config)?;

    let mut terminal = RawTerminal::new();
    let _guard = terminal.enter_guard()?;

    let mut editor = Editor::new(Tty::new(), &config)?;
    if let Some(path) = args.path.as_deref() {
        editor.open(path)?;
    }
    editor.state_mut().set_message(HELP_MESSAGE);

    editor.run()
}
