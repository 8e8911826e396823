//! Per-action field presence rules.

use crate::errors::ValidationError;
use crate::models::{Action, CommandDraft, RunFlags, ValidatedCommand};

/// Checks that `draft` carries every field its action needs.
///
/// Presence only: values are not coerced or resolved against the filesystem.
pub fn validate(draft: &CommandDraft) -> Result<(), ValidationError> {
    let name = match draft.action.as_deref() {
        None | Some("") => return Err(ValidationError::MissingAction),
        Some(name) => name,
    };
    let action: Action = name.parse().map_err(ValidationError::InvalidAction)?;

    let has_source = !draft.source.is_empty();
    let has_destination = !draft.destination.is_empty();

    match action {
        Action::Delete if !has_source => Err(ValidationError::MissingSource),
        Action::Move | Action::Copy if !has_source => Err(ValidationError::MissingSource),
        Action::Move | Action::Copy | Action::CreateFolder if !has_destination => {
            Err(ValidationError::MissingDestination)
        }
        _ => Ok(()),
    }
}

impl ValidatedCommand {
    /// Validates `draft` and merges the run-time flags into it.
    pub fn from_draft(draft: CommandDraft, flags: RunFlags) -> Result<Self, ValidationError> {
        validate(&draft)?;
        let action = draft.known_action().ok_or(ValidationError::MissingAction)?;

        Ok(Self {
            action,
            pattern: draft.pattern,
            source: draft.source,
            destination: draft.destination,
            dry_run: flags.dry_run,
            force: flags.force,
            recursive: draft.recursive || flags.recursive,
            verbose: flags.verbose,
        })
    }
}
