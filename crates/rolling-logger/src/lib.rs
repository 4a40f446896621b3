//! Rolling Logger
//!
//! File logger with size-based rotation and a circular buffer of recent lines.
//! `init_logger` installs a `tracing` fmt subscriber; `log` records emitted by
//! the rest of the workspace are bridged into it.

mod buffer;
mod file;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

pub use buffer::LineBuffer;
pub use file::RollingFile;

/// Rotate the active file once it grows past this size
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
/// Number of rotated files kept next to the active one
pub const DEFAULT_MAX_FILES: usize = 3;
/// Lines kept in memory for `recent_lines`
pub const DEFAULT_BUFFER_LINES: usize = 200;

static SINK: OnceLock<LogSink> = OnceLock::new();

/// Logger errors
#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    AlreadyInitialized,
    NotInitialized,
    Init(String),
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "Log file error: {}", e),
            LoggerError::AlreadyInitialized => write!(f, "Logger already initialized"),
            LoggerError::NotInitialized => write!(f, "Logger not initialized"),
            LoggerError::Init(msg) => write!(f, "Failed to install subscriber: {}", msg),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

struct SinkInner {
    file: RollingFile,
    buffer: LineBuffer,
}

/// Shared writer feeding both the rolling file and the line buffer
#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Mutex<SinkInner>>,
}

impl LogSink {
    pub fn new(file: RollingFile, buffer_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SinkInner {
                file,
                buffer: LineBuffer::new(buffer_lines),
            })),
        }
    }

    /// Snapshot of the buffered lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.buffer.snapshot())
            .unwrap_or_default()
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        inner.file.write_all(buf)?;
        for line in String::from_utf8_lossy(buf).lines() {
            if !line.is_empty() {
                inner.buffer.push(line.to_string());
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        inner.file.flush()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Local wall-clock timestamps
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the global logger writing to `<log_dir>/<app_name>.log`
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), LoggerError> {
    if SINK.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    std::fs::create_dir_all(&log_dir)?;
    let file = RollingFile::open(&log_dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES)?;
    let sink = LogSink::new(file, DEFAULT_BUFFER_LINES);

    tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_max_level(tracing::Level::INFO)
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))?;

    SINK.set(sink).map_err(|_| LoggerError::AlreadyInitialized)?;
    log::info!("{} logging to {}", app_name, log_dir.display());
    Ok(())
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    SINK.get().ok_or(LoggerError::NotInitialized)?;
    log::info!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    SINK.get().ok_or(LoggerError::NotInitialized)?;
    log::error!("{}", msg);
    Ok(())
}

/// Most recent log lines, oldest first (empty before `init_logger`)
pub fn recent_lines() -> Vec<String> {
    SINK.get().map(LogSink::recent).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_writes_file_and_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let file = RollingFile::open(dir.path(), "test", DEFAULT_MAX_BYTES, 2).unwrap();
        let mut sink = LogSink::new(file, 2);

        sink.write_all(b"first\n").unwrap();
        sink.write_all(b"second\nthird\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(sink.recent(), vec!["second".to_string(), "third".to_string()]);
        let on_disk = std::fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert_eq!(on_disk, "first\nsecond\nthird\n");
    }

    #[test]
    fn test_helpers_require_init() {
        assert!(matches!(info("hello"), Err(LoggerError::NotInitialized)));
        assert!(recent_lines().is_empty());
    }
}
