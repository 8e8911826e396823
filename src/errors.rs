use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use std::{fmt, io};

/// Reason a draft command was rejected by the validator.
///
/// The display text is the user-facing reason and is part of the contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: action")]
    MissingAction,

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Missing required field: src")]
    MissingSource,

    #[error("Destination path is required for this operation")]
    MissingDestination,
}

/// Shared error type for every stage between raw text and a formatted result.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// No action verb was recognized in the input.
    #[error("Failed to parse command. Please try rephrasing.")]
    ParseFailure { input: String },

    /// The draft is structurally incomplete.
    #[error("Invalid command structure: {0}")]
    Validation(#[from] ValidationError),

    /// The engine executable could not be located or launched.
    #[error("Execution engine not available: {hint}")]
    EngineUnavailable { hint: String, searched: Vec<PathBuf> },

    /// The engine did not answer within the dispatch bound.
    #[error("Engine operation timed out after {limit:?}")]
    Timeout { limit: Duration },

    /// The engine ran but reported failure without a decodable result.
    #[error("Engine error: {stderr}")]
    EngineError { code: Option<i32>, stderr: String },

    /// The engine answered with output that is not a result payload.
    #[error("Failed to decode engine output: {reason}")]
    ProtocolError { reason: String, raw: String },

    /// The destructive-operation confirmation was declined or interrupted.
    #[error("Operation cancelled by user")]
    UserCancelled,

    /// Terminal or pipe I/O failure.
    #[error("I/O error while {0}")]
    Io(String, #[source] io::Error),
}

impl CoreError {
    pub fn parse_failure(input: impl Into<String>) -> Self {
        Self::ParseFailure {
            input: input.into(),
        }
    }

    pub fn unavailable(hint: impl Into<String>, searched: Vec<PathBuf>) -> Self {
        Self::EngineUnavailable {
            hint: hint.into(),
            searched,
        }
    }

    pub fn protocol(reason: impl fmt::Display, raw: impl Into<String>) -> Self {
        Self::ProtocolError {
            reason: reason.to_string(),
            raw: raw.into(),
        }
    }

    pub fn io(context: impl Into<String>, error: io::Error) -> Self {
        Self::Io(context.into(), error)
    }

    /// Every failure ends the invocation with the same non-zero status.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::ParseFailure { .. }
            | Self::Validation(_)
            | Self::EngineUnavailable { .. }
            | Self::Timeout { .. }
            | Self::EngineError { .. }
            | Self::ProtocolError { .. }
            | Self::UserCancelled
            | Self::Io(..) => ExitCode::from(1),
        }
    }

    /// Extra diagnostic lines shown only in verbose mode.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::ParseFailure { input } => Some(format!("input: {input:?}")),
            Self::EngineUnavailable { searched, .. } if !searched.is_empty() => {
                let paths: Vec<String> = searched
                    .iter()
                    .map(|path| format!("  searched: {}", path.display()))
                    .collect();
                Some(paths.join("\n"))
            }
            Self::EngineError { code, stderr } => Some(format!(
                "exit code: {}\nstderr:\n{stderr}",
                code.map_or_else(|| "signal".to_string(), |c| c.to_string())
            )),
            Self::ProtocolError { raw, .. } => Some(format!("raw output:\n{raw}")),
            Self::Io(_, err) => Some(format!("cause: {err}")),
            _ => None,
        }
    }
}

/// Shared result alias for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
