use crate::errors::CoreError;
use std::env;
use std::path::{Path, PathBuf};

/// Host lookup boundary used when resolving the execution engine.
///
/// Keeping this trait narrow makes engine resolution deterministic in tests
/// without touching the real working directory or `PATH`.
pub trait HostFs {
    /// Returns true when path names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Returns the process working directory.
    fn current_dir(&self) -> crate::Result<PathBuf>;

    /// Looks up an executable on the search path.
    fn which(&self, program: &str) -> Option<PathBuf>;

    /// Returns the user's home directory, if known.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Default implementation backed by `std::fs`, `std::env` and `which`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealHostFs;

impl HostFs for RealHostFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn current_dir(&self) -> crate::Result<PathBuf> {
        env::current_dir().map_err(|err| CoreError::io("reading the working directory", err))
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }
}
