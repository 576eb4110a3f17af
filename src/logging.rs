//! Tracing setup
//!
//! The full-screen UI owns the terminal, so its logs go to a file under the
//! application directory. Headless commands log to stderr.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "ORIENTADOR_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Log to `<dir>/orientador.log`, returning the file path
pub fn init_file(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).context("Failed to create log directory")?;
    let path = dir.join("orientador.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();

    Ok(path)
}
