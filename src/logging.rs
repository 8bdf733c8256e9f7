use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info";

pub(crate) const LOG_FILE_NAME: &str = "mincal.log";

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Sends `tracing` output to the file at `path`, as the terminal belongs to
/// the UI.  `RUST_LOG` overrides the default filter.  Nothing is logged if
/// there is no path or the file cannot be opened.
///
/// Only the first call has any effect.
pub(crate) fn init_logging(path: Option<&Path>) {
    LOGGING_INITIALIZED.get_or_init(|| {
        let Some(file) = path.and_then(open_log_file) else {
            return;
        };
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        let _ = fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    });
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(LOG_FILE_NAME);
        assert!(open_log_file(&path).is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_init_logging_can_be_called_multiple_times() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        init_logging(Some(&path));
        init_logging(None);
    }
}
