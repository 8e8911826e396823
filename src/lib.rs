//! Core of the natural-language file command tool.
//! Text is parsed into a draft, validated into a command, and handed to an
//! external execution engine whose result is rendered for the terminal.

pub mod cancel;
pub mod config;
pub mod confirm;
pub mod dispatcher;
pub mod engine;
pub mod errors;
pub mod format;
pub mod fs;
pub mod helpers;
pub mod model_parser;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod validator;
pub mod vocabulary;

pub use cancel::CancelToken;
pub use config::Settings;
pub use confirm::{confirm_destructive, is_affirmative};
pub use dispatcher::{
    decode_response, encode_request, Dispatcher, EngineOutput, ExecutionPort, ProcessEngine,
};
pub use engine::{expand_home, EngineLocator, ENGINE_PROGRAM};
pub use errors::{CoreError, Result, ValidationError};
pub use format::{format_dry_run, format_result};
pub use fs::{HostFs, RealHostFs};
pub use helpers::{elapsed_millis, parse_engine_timestamp, ENGINE_TIME_FORMAT};
pub use model_parser::{CompletionClient, ModelBackedParser};
pub use models::{Action, CommandDraft, ExecutionResult, RunFlags, ValidatedCommand};
pub use parser::{CommandParser, RuleBasedParser};
pub use pipeline::{prepare, Outcome, Pipeline};
pub use validator::validate;

/// Re-export a small stable API surface for the command crate.
pub mod prelude {
    pub use crate::{
        cancel::CancelToken,
        config::Settings,
        errors::{CoreError, Result},
        fs::{HostFs, RealHostFs},
        models::*,
        parser::{CommandParser, RuleBasedParser},
        pipeline::{prepare, Outcome, Pipeline},
    };
}
