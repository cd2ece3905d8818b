//! Log writer module
//!
//! Provides thread-safe log writing to files or stdout/stderr.
//! One writer is installed process-wide; the request logging middleware
//! holds its own `Arc<LogWriter>` handle to it.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<Arc<LogWriter>> = OnceLock::new();

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to file
    File(Mutex<File>),
    /// Collect lines in memory
    #[cfg(test)]
    Memory(Mutex<Vec<String>>),
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Info/access log target
    access: LogTarget,
    /// Error log target
    error: LogTarget,
}

impl LogWriter {
    /// Create a new log writer with optional file paths
    pub fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self { access, error })
    }

    /// Write to info/access log
    pub fn write_info(&self, message: &str) {
        write_to_target(&self.access, message);
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        write_to_target(&self.error, message);
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            access: LogTarget::Memory(Mutex::new(Vec::new())),
            error: LogTarget::Memory(Mutex::new(Vec::new())),
        }
    }

    #[cfg(test)]
    pub fn info_lines(&self) -> Vec<String> {
        memory_lines(&self.access)
    }

    #[cfg(test)]
    pub fn error_lines(&self) -> Vec<String> {
        memory_lines(&self.error)
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Prefix a message with the local wall-clock time
fn stamp(message: &str) -> String {
    format!("{} {message}", Local::now().format("%Y/%m/%d %H:%M:%S"))
}

/// Write message to log target
fn write_to_target(target: &LogTarget, message: &str) {
    let line = stamp(message);
    match target {
        LogTarget::Stdout => {
            println!("{line}");
        }
        LogTarget::Stderr => {
            eprintln!("{line}");
        }
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{line}");
            }
        }
        #[cfg(test)]
        LogTarget::Memory(lines) => {
            if let Ok(mut lines) = lines.lock() {
                lines.push(line);
            }
        }
    }
}

#[cfg(test)]
fn memory_lines(target: &LogTarget) -> Vec<String> {
    match target {
        LogTarget::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
) -> io::Result<Arc<LogWriter>> {
    let writer = Arc::new(LogWriter::new(access_log_file, error_log_file)?);
    LOG_WRITER.set(Arc::clone(&writer)).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })?;
    Ok(writer)
}

/// Get the global log writer, if `init()` has run
pub fn get() -> Option<&'static Arc<LogWriter>> {
    LOG_WRITER.get()
}
