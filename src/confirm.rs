//! Interactive gate in front of destructive operations.

use crate::cancel::CancelToken;
use crate::engine::expand_home;
use crate::errors::CoreError;
use crate::fs::HostFs;
use crate::models::ValidatedCommand;
use std::io::{BufRead, Write};

const AFFIRMATIVE: [&str; 2] = ["yes", "y"];

/// True for the accepted spellings of "yes", ignoring case and surrounding
/// whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    AFFIRMATIVE
        .iter()
        .any(|word| answer.eq_ignore_ascii_case(word))
}

/// Asks before destructive commands. Non-destructive or forced commands pass
/// without prompting; end of input counts as a decline. A `cancel` flag raised
/// while the prompt was open turns the answer into `UserCancelled`.
pub fn confirm_destructive<H, R, W>(
    host: &H,
    cmd: &ValidatedCommand,
    cancel: &CancelToken,
    mut input: R,
    mut output: W,
) -> crate::Result<bool>
where
    H: HostFs,
    R: BufRead,
    W: Write,
{
    if !cmd.action.is_destructive() || cmd.force {
        return Ok(true);
    }

    let target = expand_home(host, &cmd.source);
    let mut prompt = || -> std::io::Result<()> {
        writeln!(
            output,
            "\n⚠️  WARNING: This will DELETE files from '{}'",
            target.display()
        )?;
        write!(output, "Are you sure you want to continue? (yes/no): ")?;
        output.flush()
    };
    prompt().map_err(|err| CoreError::io("writing the confirmation prompt", err))?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .map_err(|err| CoreError::io("reading the confirmation answer", err))?;
    cancel.check()?;

    Ok(read > 0 && is_affirmative(&answer))
}
