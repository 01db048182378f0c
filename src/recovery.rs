use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use uuid::Uuid;

use crate::errors::ScrapeError;

const TEMP_DIR: &str = "temp";

/// Append-only log of discovered profile URLs, one per line.
///
/// Written incrementally during collection so that partial progress survives
/// a crash or a mid-run account flag. It is a manual recovery aid only and is
/// never read back by the program. Appending the same URL twice is harmless.
pub struct RecoveryLog {
    path: PathBuf,
    file: File,
}

impl RecoveryLog {
    pub fn create() -> Result<Self, ScrapeError> {
        Self::create_in(TEMP_DIR)
    }

    pub fn create_in<P: AsRef<Path>>(dir: P) -> Result<Self, ScrapeError> {
        fs::create_dir_all(&dir)?;
        let path = dir
            .as_ref()
            .join(format!("profile_urls_{}.txt", Uuid::new_v4().simple()));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!("Recovery file: {}", path.display());
        Ok(RecoveryLog { path, file })
    }

    /// Appends one URL and flushes immediately, so the line is durable before
    /// the next page interaction happens.
    pub fn append(&mut self, url: &str) -> Result<(), ScrapeError> {
        writeln!(self.file, "{}", url)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_urls_are_durable_line_by_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RecoveryLog::create_in(dir.path()).unwrap();

        for i in 0..5 {
            log.append(&format!("https://www.linkedin.com/in/person-{}/", i))
                .unwrap();
        }

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "https://www.linkedin.com/in/person-0/");
        assert_eq!(lines[4], "https://www.linkedin.com/in/person-4/");
    }

    #[test]
    fn duplicate_append_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RecoveryLog::create_in(dir.path()).unwrap();

        log.append("https://www.linkedin.com/in/someone/").unwrap();
        log.append("https://www.linkedin.com/in/someone/").unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn log_files_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let a = RecoveryLog::create_in(dir.path()).unwrap();
        let b = RecoveryLog::create_in(dir.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }
}
