//! Closed vocabulary the rule-based parser recognizes.
//!
//! All lookups are plain substring containment against lowercased text. There
//! is no word-boundary check, so "downloads" inside a longer token still
//! matches; callers rely on this and the tests pin it down.

use crate::models::Action;

/// Verb sets in priority order. The first set with any hit decides the action.
pub static ACTION_SYNONYMS: &[(Action, &[&str])] = &[
    (Action::Delete, &["delete", "remove", "trash", "clean up"]),
    (Action::CreateFolder, &["create", "make", "build", "set up"]),
    (Action::Move, &["move", "relocate", "transfer", "shift"]),
    (Action::Copy, &["copy", "duplicate", "backup", "clone"]),
];

/// Literal extensions, checked in order. ".doc" precedes ".docx" on purpose.
pub static EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".pdf", ".doc", ".docx", ".txt", ".zip", ".rar",
    ".tar", ".gz", ".mp3", ".mp4", ".avi", ".mkv",
];

/// A class of files named by a noun rather than an extension.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub keywords: &'static [&'static str],
    pub pattern: &'static str,
}

pub static CATEGORIES: &[Category] = &[
    Category {
        keywords: &["images", "photos", "pictures"],
        pattern: "*.jpg",
    },
    Category {
        keywords: &["documents", "docs"],
        pattern: "*.doc*",
    },
    Category {
        keywords: &["archives", "compressed"],
        pattern: "*.zip",
    },
    Category {
        keywords: &["videos", "movies"],
        pattern: "*.mp4",
    },
    Category {
        keywords: &["music", "audio"],
        pattern: "*.mp3",
    },
    Category {
        keywords: &["text", "txt"],
        pattern: "*.txt",
    },
    Category {
        keywords: &["all", "every", "each"],
        pattern: "*",
    },
];

/// Well-known folders under the user's home directory.
pub static KNOWN_DIRECTORIES: &[&str] = &[
    "downloads",
    "documents",
    "pictures",
    "desktop",
    "home",
    "music",
    "videos",
];

/// Parent used for new folders when the command names no location.
pub const DEFAULT_FOLDER_PARENT: &str = "~/Downloads";

/// Source used when the command names no known directory.
pub const CURRENT_DIRECTORY: &str = ".";

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

pub fn find_action(text: &str) -> Option<Action> {
    ACTION_SYNONYMS
        .iter()
        .find(|(_, words)| contains_any(text, words))
        .map(|(action, _)| *action)
}

pub fn find_extension(text: &str) -> Option<&'static str> {
    EXTENSIONS.iter().copied().find(|ext| text.contains(ext))
}

pub fn find_category(text: &str) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .find(|category| contains_any(text, category.keywords))
        .map(|category| category.pattern)
}

/// First known directory mentioned in `text`, as a home-relative path.
pub fn find_directory(text: &str) -> Option<String> {
    KNOWN_DIRECTORIES
        .iter()
        .find(|name| text.contains(*name))
        .map(|name| home_relative(name))
}

fn home_relative(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("~/{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "~".to_string(),
    }
}
