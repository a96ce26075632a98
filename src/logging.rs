//! Logging setup.
//!
//! Every record goes to stderr and is appended to the log file under the
//! `logs/` directory, prefixed with a local timestamp.

use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Writes each buffer to stderr and, when available, to the log file.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            // A broken log file must not take console logging down with it
            if file.write_all(buf).is_err() {
                self.file = None;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
        Ok(())
    }
}

/// Initializes the global logger. `RUST_LOG` overrides the default `info` filter.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(log_path: &Path) {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .ok();
    let file_missing = file.is_none();

    let result = Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {:<5} {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .try_init();

    if result.is_ok() && file_missing {
        log::warn!("Could not open log file {}", log_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_tee_writer_appends_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();

        let mut writer = TeeWriter { file: Some(file) };
        writer.write_all(b"first line\n").unwrap();
        writer.write_all(b"second line\n").unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first line\nsecond line\n");
    }

    #[test]
    fn test_tee_writer_without_file() {
        let mut writer = TeeWriter { file: None };
        assert_eq!(writer.write(b"console only\n").unwrap(), 13);
    }
}
