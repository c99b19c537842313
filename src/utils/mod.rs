// Utility functions

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Name of the per-project data directory
pub const FORMS_DIR_NAME: &str = ".rfq-forms";

/// Get the .rfq-forms directory path for a project.
#[inline]
pub fn forms_dir(project_path: &Path) -> PathBuf {
    project_path.join(FORMS_DIR_NAME)
}

/// Get the .rfq-forms/drafts directory path for a project.
#[inline]
pub fn drafts_dir(project_path: &Path) -> PathBuf {
    forms_dir(project_path).join("drafts")
}

/// Get the .rfq-forms/config.toml path for a project.
#[inline]
pub fn config_path(project_path: &Path) -> PathBuf {
    forms_dir(project_path).join("config.toml")
}

/// Extension trait for Result that provides convenient error context methods.
/// Converts any error to a String with a descriptive message prefix.
pub trait ResultExt<T> {
    /// Converts the error to a String with context message.
    fn with_context(self, msg: &str) -> Result<T, String>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn with_context(self, msg: &str) -> Result<T, String> {
        self.map_err(|e| format!("{}: {}", msg, e))
    }
}

/// Safely acquire a mutex lock, recovering from poisoning by returning the guard.
/// Answer state is plain data, so continuing after a panicked writer is preferable
/// to losing the user's answers.
pub fn lock_mutex_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Mutex was poisoned, recovering: {}", poisoned);
            poisoned.into_inner()
        }
    }
}

/// Current time as an RFC 3339 string, the timestamp format used in events
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_forms_dir() {
        let dir = forms_dir(Path::new("/home/user/project"));
        assert_eq!(dir, PathBuf::from("/home/user/project/.rfq-forms"));
    }

    #[test]
    fn test_drafts_dir() {
        let dir = drafts_dir(Path::new("/home/user/project"));
        assert_eq!(dir, PathBuf::from("/home/user/project/.rfq-forms/drafts"));
    }

    #[test]
    fn test_config_path() {
        let path = config_path(Path::new("/home/user/project"));
        assert_eq!(path, PathBuf::from("/home/user/project/.rfq-forms/config.toml"));
    }

    #[test]
    fn test_with_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(result.with_context("Saving draft").unwrap_err(), "Saving draft: boom");
    }

    #[test]
    fn test_lock_mutex_recover_after_panic() {
        let mutex = Arc::new(Mutex::new(5));
        let clone = mutex.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.lock().unwrap();
            panic!("poison it");
        })
        .join();

        assert!(mutex.is_poisoned());
        assert_eq!(*lock_mutex_recover(&mutex), 5);
    }
}
