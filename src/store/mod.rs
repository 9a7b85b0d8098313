use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;

/// The one value the app remembers between runs: whether onboarding was
/// completed. Only presence matters.
pub trait OnboardingStore {
    fn has_seen_splash(&self) -> Result<bool>;
    fn mark_seen(&mut self) -> Result<()>;
    fn reset(&mut self) -> Result<()>;
}

/// Keeps the flag as an empty marker file.
pub struct FileOnboardingStore {
    flag_path: PathBuf,
}

impl FileOnboardingStore {
    pub fn new(flag_path: impl Into<PathBuf>) -> Self {
        Self {
            flag_path: flag_path.into(),
        }
    }

    pub fn flag_path(&self) -> &Path {
        &self.flag_path
    }
}

impl OnboardingStore for FileOnboardingStore {
    fn has_seen_splash(&self) -> Result<bool> {
        match fs::metadata(&self.flag_path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err)
                .with_context(|| format!("checking {}", self.flag_path.display())),
        }
    }

    fn mark_seen(&mut self) -> Result<()> {
        if let Some(parent) = self.flag_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        fs::write(&self.flag_path, b"")
            .with_context(|| format!("writing {}", self.flag_path.display()))?;
        tracing::info!(path = %self.flag_path.display(), "onboarding completed");

        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        match fs::remove_file(&self.flag_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("removing {}", self.flag_path.display())),
        }
    }
}

/// Open the onboarding store configured for this run
pub fn init(config: &Config) -> FileOnboardingStore {
    FileOnboardingStore::new(config.onboarding_flag_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_absent_until_marked() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileOnboardingStore::new(dir.path().join("state").join("has_seen_splash"));

        assert!(!store.has_seen_splash().unwrap());

        store.mark_seen().unwrap();
        assert!(store.has_seen_splash().unwrap());
        assert!(store.flag_path().exists());
    }

    #[test]
    fn reset_clears_the_flag_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileOnboardingStore::new(dir.path().join("has_seen_splash"));

        store.reset().unwrap();
        store.mark_seen().unwrap();
        store.reset().unwrap();

        assert!(!store.has_seen_splash().unwrap());
    }
}
