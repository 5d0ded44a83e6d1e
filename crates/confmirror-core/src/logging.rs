//! Logging setup: `tracing` events go to a log file under the XDG state
//! directory, or to stderr when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,confmirror_core=debug,confmirror=debug";

/// `~/.local/state/confmirror/confmirror.log`
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("confmirror")?;
    Ok(xdg_dirs
        .get_state_home()
        .join("confmirror")
        .join("confmirror.log"))
}

/// Installs the global subscriber writing to [`log_file_path`] and returns
/// that path. On error nothing is installed, so the caller can fall back to
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    install(BoxMakeWriter::new(LogFile(file)));
    tracing::info!("confmirror logging to {}", path.display());
    Ok(path)
}

/// Installs the global subscriber writing to stderr.
pub fn init_logging_stderr() {
    install(BoxMakeWriter::new(io::stderr));
}

fn install(writer: BoxMakeWriter) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Hands out a clone of the log file per event; stderr if cloning fails.
struct LogFile(File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogSink::File)
            .unwrap_or(LogSink::Stderr)
    }
}

enum LogSink {
    File(File),
    Stderr,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}
