//! Append-only event log file.
//!
//! One event per line, flushed after every write. The log file is the only
//! audit trail once the console stream is gone, so a line must be durable as
//! soon as the aggregator accepts the event.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Writes event lines to a file, flushing each one.
pub struct LogFile {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl LogFile {
    /// Create (or truncate) the log file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Append one line, trimming trailing whitespace, and flush.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line.trim_end())?;
        self.writer.flush()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Default log file location: `<temp-dir>/meow-<timestamp>.log`, with colons
/// replaced so the name is portable.
pub fn default_log_path() -> PathBuf {
    let name = format!("meow-{}.log", Local::now().format("%Y-%m-%dT%H-%M-%S"));
    env::temp_dir().join(name)
}
