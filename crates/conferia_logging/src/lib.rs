//! Shared logging utilities for Conferia binaries.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "conferia=info,conferia_core=info,conferia_db=info";
const MAX_LOG_FILES: usize = 3;
const MAX_LOG_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Logging configuration shared by Conferia binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
}

/// Initialize tracing with a rotating log file and stderr output.
///
/// The file always receives the full filter; stderr stays at `warn` unless
/// `verbose` is set, so human CLI output is not drowned in spans.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    let file_writer = LogFileWriter::new(log_dir, config.app_name)
        .context("Failed to initialize log writer")?;

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_filter = if config.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .init();

    Ok(())
}

/// Get the Conferia home directory: ~/.conferia
pub fn conferia_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("CONFERIA_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .expect("Could not determine home directory")
        .join(".conferia")
}

/// Get the logs directory: ~/.conferia/logs
pub fn logs_dir() -> PathBuf {
    conferia_home().join("logs")
}

/// Default database location: ~/.conferia/conferia.sqlite3
pub fn default_db_path() -> PathBuf {
    conferia_home().join("conferia.sqlite3")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

/// Size-capped appender: `<app>.log` plus up to `MAX_LOG_FILES - 1` rotated
/// copies (`<app>.log.1` is the newest rotation).
struct RotatingAppender {
    dir: PathBuf,
    base_name: String,
    file: File,
    written: u64,
}

impl RotatingAppender {
    fn new(dir: PathBuf, base_name: &str) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        let base_name = sanitize_name(base_name);
        let (file, written) = Self::open_current(&dir, &base_name)?;
        Ok(Self {
            dir,
            base_name,
            file,
            written,
        })
    }

    fn open_current(dir: &PathBuf, base_name: &str) -> io::Result<(File, u64)> {
        let path = dir.join(format!("{base_name}.log"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();
        Ok((file, size))
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.base_name, index))
    }

    fn rotate(&mut self) -> io::Result<()> {
        let _ = self.file.flush();

        let oldest = self.rotated_path(MAX_LOG_FILES - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for idx in (1..MAX_LOG_FILES - 1).rev() {
            let src = self.rotated_path(idx);
            if src.exists() {
                fs::rename(&src, self.rotated_path(idx + 1))?;
            }
        }
        let current = self.dir.join(format!("{}.log", self.base_name));
        if current.exists() {
            fs::rename(current, self.rotated_path(1))?;
        }

        let (file, written) = Self::open_current(&self.dir, &self.base_name)?;
        self.file = file;
        self.written = written;
        Ok(())
    }
}

impl Write for RotatingAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written + buf.len() as u64 > MAX_LOG_FILE_SIZE {
            self.rotate()?;
        }
        let bytes = self.file.write(buf)?;
        self.written += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Cloneable `MakeWriter` over the shared appender.
#[derive(Clone)]
struct LogFileWriter {
    inner: Arc<Mutex<RotatingAppender>>,
}

impl LogFileWriter {
    fn new(dir: PathBuf, base_name: &str) -> Result<Self> {
        let appender = RotatingAppender::new(dir, base_name)
            .with_context(|| format!("Failed to open log file for {}", base_name))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(appender)),
        })
    }
}

struct LogFileHandle {
    inner: Arc<Mutex<RotatingAppender>>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileHandle;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Write for LogFileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.flush()
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_path_separators() {
        assert_eq!(sanitize_name("conferia/cli"), "conferia_cli");
        assert_eq!(sanitize_name("conferia-cli"), "conferia-cli");
    }

    #[test]
    fn appender_rotates_into_numbered_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut appender = RotatingAppender::new(tmp.path().to_path_buf(), "test").unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.rotate().unwrap();
        appender.write_all(b"world\n").unwrap();
        appender.flush().unwrap();

        assert!(tmp.path().join("test.log").exists());
        assert!(tmp.path().join("test.log.1").exists());
    }
}
