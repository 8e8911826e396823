//! Language-model backed parsing strategy.
//!
//! The model only turns text into a draft; validation and execution stay the
//! same as for the rule-based parser. No transport ships with this crate: a
//! [`CompletionClient`] is injected by whoever owns the network access.

use crate::models::CommandDraft;
use crate::parser::{CommandParser, RuleBasedParser};
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, warn};

pub type ClientError = Box<dyn Error + Send + Sync>;

/// Something that can complete a prompt with text.
pub trait CompletionClient {
    fn complete(&self, prompt: &str) -> Result<String, ClientError>;
}

/// Draft fields as the model is asked to emit them. `action` and `src` are
/// mandatory in a model reply.
#[derive(Debug, Deserialize)]
struct ModelReply {
    action: String,
    #[serde(alias = "source")]
    src: String,
    #[serde(default, alias = "pattern")]
    file_ext: String,
    #[serde(default, alias = "destination")]
    dst: String,
    #[serde(default)]
    recursive: bool,
}

impl From<ModelReply> for CommandDraft {
    fn from(reply: ModelReply) -> Self {
        Self {
            action: Some(reply.action),
            pattern: reply.file_ext,
            source: reply.src,
            destination: reply.dst,
            recursive: reply.recursive,
        }
    }
}

/// Asks a model for the draft and falls back to [`RuleBasedParser`] when the
/// client fails or the reply cannot be decoded.
#[derive(Debug)]
pub struct ModelBackedParser<C: CompletionClient> {
    client: C,
    fallback: RuleBasedParser,
}

impl<C: CompletionClient> ModelBackedParser<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            fallback: RuleBasedParser::new(),
        }
    }

    fn ask(&self, text: &str) -> Result<CommandDraft, ClientError> {
        let reply = self.client.complete(&build_prompt(text))?;
        let json = extract_json(&reply).ok_or("no JSON object in model reply")?;
        let reply: ModelReply = serde_json::from_str(json)?;
        Ok(reply.into())
    }
}

impl<C: CompletionClient> CommandParser for ModelBackedParser<C> {
    fn parse(&self, text: &str) -> Option<CommandDraft> {
        match self.ask(text) {
            Ok(draft) => {
                debug!(?draft, "model produced draft");
                Some(draft)
            }
            Err(err) => {
                warn!(error = %err, "model parsing failed, using rule-based parser");
                self.fallback.parse(text)
            }
        }
    }
}

/// Slice from the first `{` to the last `}`, which drops code fences and any
/// prose the model wraps around the object.
fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

pub fn build_prompt(command: &str) -> String {
    format!(
        r#"You convert file management requests into JSON.

Fields:
- action: one of "move", "copy", "delete", "create_folder"
- file_ext: extension such as ".jpg" or ".pdf", or "" when not given
- src: source directory
- dst: destination directory, "" for delete

Examples:
"delete all .pngs in Downloads" -> {{"action": "delete", "file_ext": ".png", "src": "~/Downloads", "dst": ""}}
"copy all PDFs from Documents to Backup" -> {{"action": "copy", "file_ext": ".pdf", "src": "~/Documents", "dst": "~/Backup"}}
"create a new folder called Projects in Documents" -> {{"action": "create_folder", "file_ext": "", "src": "", "dst": "~/Documents/Projects"}}

Request: "{command}"

Reply with the JSON object only."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;

    struct Canned(Result<&'static str, &'static str>);

    impl CompletionClient for Canned {
        fn complete(&self, _prompt: &str) -> Result<String, ClientError> {
            self.0.map(str::to_string).map_err(Into::into)
        }
    }

    fn parse(reply: Result<&'static str, &'static str>, text: &str) -> Option<CommandDraft> {
        ModelBackedParser::new(Canned(reply)).parse(text)
    }

    #[test]
    fn decodes_fenced_reply() {
        let reply = "```json\n{\"action\": \"copy\", \"file_ext\": \".pdf\", \"src\": \"~/Documents\", \"dst\": \"~/Backup\"}\n```";
        let draft = parse(Ok(reply), "copy all PDFs from Documents to Backup").unwrap();
        assert_eq!(draft.known_action(), Some(Action::Copy));
        assert_eq!(draft.pattern, ".pdf");
        assert_eq!(draft.source, "~/Documents");
        assert_eq!(draft.destination, "~/Backup");
    }

    #[test]
    fn unknown_action_is_left_for_the_validator() {
        let draft = parse(Ok(r#"{"action": "rename", "src": "~/Desktop"}"#), "rename it").unwrap();
        assert_eq!(draft.action.as_deref(), Some("rename"));
        assert_eq!(draft.known_action(), None);
    }

    #[test]
    fn client_failure_falls_back_to_rules() {
        let draft = parse(Err("quota exceeded"), "delete all .pngs in Downloads").unwrap();
        assert_eq!(draft.known_action(), Some(Action::Delete));
        assert_eq!(draft.source, "~/Downloads");
    }

    #[test]
    fn reply_without_required_fields_falls_back() {
        let draft = parse(Ok(r#"{"action": "move"}"#), "move .txt to Backup").unwrap();
        assert_eq!(draft.source, ".");
        assert_eq!(draft.destination, "Backup");

        assert_eq!(parse(Ok("I cannot help with that"), "do something weird"), None);
    }

    #[test]
    fn prompt_embeds_the_request() {
        let prompt = build_prompt("move all .jpegs in Downloads to Pictures");
        assert!(prompt.contains("Request: \"move all .jpegs in Downloads to Pictures\""));
        assert!(prompt.contains(r#"{"action": "delete""#));
    }

    #[test]
    fn extract_json_handles_surrounding_text() {
        assert_eq!(extract_json("sure: {\"a\": 1} done"), Some("{\"a\": 1}"));
        assert_eq!(extract_json("} backwards {"), None);
        assert_eq!(extract_json("nothing"), None);
    }
}
