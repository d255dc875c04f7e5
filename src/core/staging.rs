//! Output files that can be written in place or staged and renamed on commit.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A destination file, optionally written through a sibling staging file.
///
/// A staged file only appears at its target path once [`OutputFile::commit`]
/// runs. Dropping an uncommitted staged file removes the staging copy.
#[derive(Debug)]
pub struct OutputFile {
    target: PathBuf,
    staging: Option<PathBuf>,
}

impl OutputFile {
    /// Writes go straight to `target`.
    pub fn direct(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            staging: None,
        }
    }

    /// Writes go to `.<name>.tmp` next to `target` until commit.
    pub fn staged(target: impl Into<PathBuf>) -> Self {
        let target = target.into();
        let staging = staging_path(&target);
        Self {
            target,
            staging: Some(staging),
        }
    }

    pub fn new(target: impl Into<PathBuf>, atomic: bool) -> Self {
        if atomic {
            Self::staged(target)
        } else {
            Self::direct(target)
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Path writers should open.
    pub fn write_path(&self) -> &Path {
        self.staging.as_deref().unwrap_or(&self.target)
    }

    pub fn is_staged(&self) -> bool {
        self.staging.is_some()
    }

    /// Moves the staged content over the target. No-op for direct files and
    /// for staged files that were never written.
    pub fn commit(&mut self) -> io::Result<()> {
        let Some(staging) = self.staging.take() else {
            return Ok(());
        };
        if staging.exists() {
            fs::rename(&staging, &self.target)?;
        }
        Ok(())
    }
}

impl Drop for OutputFile {
    fn drop(&mut self) {
        if let Some(staging) = self.staging.take() {
            let _ = fs::remove_file(staging);
        }
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    target.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_file_appears_only_on_commit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("sessions.json");
        let mut file = OutputFile::staged(&target);
        assert_eq!(file.write_path(), dir.path().join(".sessions.json.tmp"));

        fs::write(file.write_path(), b"[]").expect("write");
        assert!(!target.exists());

        file.commit().expect("commit");
        assert_eq!(fs::read_to_string(&target).expect("read"), "[]");
        assert!(!dir.path().join(".sessions.json.tmp").exists());
    }

    #[test]
    fn dropped_staging_file_is_removed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("state.json");
        fs::write(&target, b"old").expect("write");
        {
            let file = OutputFile::staged(&target);
            fs::write(file.write_path(), b"new").expect("write");
        }
        assert_eq!(fs::read_to_string(&target).expect("read"), "old");
        assert!(!dir.path().join(".state.json.tmp").exists());
    }

    #[test]
    fn direct_file_writes_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("sessions.csv");
        let mut file = OutputFile::direct(&target);
        assert_eq!(file.write_path(), target.as_path());
        assert!(!file.is_staged());
        file.commit().expect("commit");
    }
}
