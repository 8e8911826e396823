//! Natural-language text to [`CommandDraft`].

use crate::models::{Action, CommandDraft};
use crate::vocabulary::{self, CURRENT_DIRECTORY, DEFAULT_FOLDER_PARENT};
use tracing::debug;

/// Strategy that turns free text into a draft command.
///
/// `None` means the text was not understood at all, which callers report
/// differently from a draft that later fails validation.
pub trait CommandParser {
    fn parse(&self, text: &str) -> Option<CommandDraft>;
}

/// Connectors that introduce the destination phrase, tried in order.
const DESTINATION_CONNECTORS: [&str; 2] = [" to ", " in "];

const FOLDER_NAME_MARKER: &str = "called";

const RECURSIVE_GLOB: &str = "**";
const RECURSIVE_WORD: &str = "recursive";

/// Deterministic keyword parser over the closed vocabulary.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedParser;

impl RuleBasedParser {
    pub fn new() -> Self {
        Self
    }
}

impl CommandParser for RuleBasedParser {
    fn parse(&self, text: &str) -> Option<CommandDraft> {
        // ASCII lowering keeps byte offsets aligned with `text`, so phrases
        // found in `lowered` can be sliced out of the original casing.
        let lowered = text.to_ascii_lowercase();

        let Some(action) = vocabulary::find_action(&lowered) else {
            debug!(input = text, "no action verb recognized");
            return None;
        };

        let mut draft = CommandDraft::new(action);
        draft.pattern = vocabulary::find_extension(&lowered)
            .or_else(|| vocabulary::find_category(&lowered))
            .unwrap_or_default()
            .to_string();
        draft.source = vocabulary::find_directory(&lowered)
            .unwrap_or_else(|| CURRENT_DIRECTORY.to_string());

        if action.takes_destination() {
            draft.destination = destination(text, &lowered).unwrap_or_default();
        }

        if action == Action::CreateFolder {
            if let Some(name) = folder_name(text, &lowered) {
                draft.destination = if draft.destination.is_empty() {
                    format!("{DEFAULT_FOLDER_PARENT}/{name}")
                } else {
                    format!("{}/{name}", draft.destination)
                };
            }
        }

        draft.recursive = text.contains(RECURSIVE_GLOB) || lowered.contains(RECURSIVE_WORD);

        debug!(
            action = %action,
            pattern = %draft.pattern,
            source = %draft.source,
            destination = %draft.destination,
            recursive = draft.recursive,
            "parsed command draft"
        );
        Some(draft)
    }
}

/// Everything after the first connector: a known directory if one is named
/// there, otherwise the phrase itself.
fn destination(text: &str, lowered: &str) -> Option<String> {
    let (offset, connector) = DESTINATION_CONNECTORS
        .iter()
        .find_map(|connector| lowered.find(connector).map(|idx| (idx, *connector)))?;
    let start = offset + connector.len();

    let phrase = lowered[start..].trim();
    if let Some(known) = vocabulary::find_directory(phrase) {
        return Some(known);
    }

    let verbatim = text[start..].trim();
    (!verbatim.is_empty()).then(|| verbatim.to_string())
}

/// The word right after "called", in the caller's casing.
fn folder_name<'a>(text: &'a str, lowered: &str) -> Option<&'a str> {
    let offset = lowered.find(FOLDER_NAME_MARKER)?;
    text[offset + FOLDER_NAME_MARKER.len()..]
        .split_whitespace()
        .next()
}
