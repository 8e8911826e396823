use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// File operation the execution engine knows how to perform.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Delete,
    Move,
    Copy,
    CreateFolder,
}

impl Action {
    pub const ALL: [Action; 4] = [Self::Delete, Self::Move, Self::Copy, Self::CreateFolder];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::CreateFolder => "create_folder",
        }
    }

    /// Actions that remove data and therefore go through the confirmation gate.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Delete)
    }

    /// Actions whose command text may name a target directory.
    pub fn takes_destination(&self) -> bool {
        !matches!(self, Self::Delete)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| value.to_string())
    }
}

/// Unvalidated structured interpretation of a natural-language command.
///
/// `action` stays a raw name so drafts coming from outside the rule-based
/// parser can carry a missing or unknown action for the validator to report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDraft {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, alias = "file_ext")]
    pub pattern: String,
    #[serde(default, alias = "src")]
    pub source: String,
    #[serde(default, alias = "dst")]
    pub destination: String,
    #[serde(default)]
    pub recursive: bool,
}

impl CommandDraft {
    pub fn new(action: Action) -> Self {
        Self {
            action: Some(action.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Typed action, if the raw name is one of the known actions.
    pub fn known_action(&self) -> Option<Action> {
        self.action.as_deref().and_then(|name| name.parse().ok())
    }
}

/// Run-time switches supplied on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub dry_run: bool,
    pub force: bool,
    pub recursive: bool,
    pub verbose: bool,
}

/// A draft that satisfied the per-action rules, merged with run-time flags.
///
/// Serializes to exactly the request payload the execution engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCommand {
    pub action: Action,
    #[serde(default, alias = "file_ext")]
    pub pattern: String,
    #[serde(default, alias = "src")]
    pub source: String,
    #[serde(default, alias = "dst")]
    pub destination: String,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub verbose: bool,
}

/// Outcome reported by the execution engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub files_scanned: u64,
    #[serde(default)]
    pub files_matched: u64,
    #[serde(default)]
    pub files_affected: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ExecutionResult {
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(error_message.into()),
            ..Self::default()
        }
    }
}

/// Engines emit timestamps either as formatted text or as raw clock counts.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}
