//! Resolution of the external execution engine executable.

use crate::config::Settings;
use crate::errors::CoreError;
use crate::fs::HostFs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the engine executable.
pub const ENGINE_PROGRAM: &str = "smartfilecmd";

/// Directory holding local build output, relative to the working directory.
pub const BUILD_DIR: &str = "build";

/// Finds the engine: explicit override, local build output, working
/// directory, then the system search path.
#[derive(Debug)]
pub struct EngineLocator<'a, H: HostFs> {
    host: &'a H,
    override_path: Option<PathBuf>,
}

impl<'a, H: HostFs> EngineLocator<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            override_path: None,
        }
    }

    pub fn from_settings(host: &'a H, settings: &Settings) -> Self {
        Self {
            host,
            override_path: settings.engine_override.clone(),
        }
    }

    pub fn with_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn locate(&self) -> crate::Result<PathBuf> {
        let mut searched = Vec::new();

        if let Some(explicit) = &self.override_path {
            if self.host.is_file(explicit) {
                debug!(path = %explicit.display(), "using engine override");
                return Ok(explicit.clone());
            }
            searched.push(explicit.clone());
        }

        let cwd = self.host.current_dir()?;
        for candidate in [
            cwd.join(BUILD_DIR).join(ENGINE_PROGRAM),
            cwd.join(ENGINE_PROGRAM),
        ] {
            if self.host.is_file(&candidate) {
                debug!(path = %candidate.display(), "found engine");
                return Ok(candidate);
            }
            searched.push(candidate);
        }

        if let Some(found) = self.host.which(ENGINE_PROGRAM) {
            debug!(path = %found.display(), "found engine on PATH");
            return Ok(found);
        }
        searched.push(PathBuf::from(format!("$PATH/{ENGINE_PROGRAM}")));

        Err(CoreError::unavailable(
            format!("`{ENGINE_PROGRAM}` executable not found. Please build the engine first."),
            searched,
        ))
    }
}

/// Expands a leading `~` against the host's home directory.
///
/// Paths without a tilde, or hosts without a home directory, are returned
/// unchanged.
pub fn expand_home<H: HostFs>(host: &H, path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match host.home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(Path::new(rest)),
        None => PathBuf::from(path),
    }
}
