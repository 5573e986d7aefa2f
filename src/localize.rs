//! Localized display strings.
//!
//! Lookup is total: a key with no translation comes back unchanged, so a
//! missing entry shows up on screen as its key rather than as a blank.
//! [`StringTable`] ships English text for every key the screen uses and can
//! layer an Apple-style `.strings` file on top:
//!
//! ```text
//! /* Success notice */
//! "alert_add_diary_title_success" = "Gespeichert";
//! "alert_add_diary_message_success" = "Eintrag %@ wurde angelegt.";
//! ```

use crate::error::DiaryError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// String keys used by the diary screen.
pub mod keys {
    pub const ACTION_CAMERA: &str = "alert_action_camera";
    pub const ACTION_SAVED_PHOTOS: &str = "alert_action_saved_photos";
    pub const ACTION_PHOTO_LIBRARY: &str = "alert_action_photo_library";
    pub const ACTION_CANCEL: &str = "alert_action_cancel";
    pub const TITLE_FAILED: &str = "alert_add_diary_title_failed";
    pub const MESSAGE_FAILED: &str = "alert_add_diary_message_failed";
    pub const TITLE_SUCCESS: &str = "alert_add_diary_title_success";
    pub const MESSAGE_SUCCESS: &str = "alert_add_diary_message_success";
    pub const CONFIRM_BUTTON: &str = "alert_confirm_button_title";
    pub const LOADING_MESSAGE: &str = "alert_loading_message";
}

const ENGLISH: &[(&str, &str)] = &[
    (keys::ACTION_CAMERA, "Camera"),
    (keys::ACTION_SAVED_PHOTOS, "Saved Photos"),
    (keys::ACTION_PHOTO_LIBRARY, "Photo Library"),
    (keys::ACTION_CANCEL, "Cancel"),
    (keys::TITLE_FAILED, "Failed"),
    (
        keys::MESSAGE_FAILED,
        "Please add at least one photo before submitting.",
    ),
    (keys::TITLE_SUCCESS, "Success"),
    (keys::MESSAGE_SUCCESS, "Diary entry %@ has been added."),
    (keys::CONFIRM_BUTTON, "OK"),
    (keys::LOADING_MESSAGE, "Please wait…"),
];

/// Maps a string key to display text. Never fails.
pub trait Localizer: Send + Sync {
    fn localize(&self, key: &str) -> String;
}

/// Key/value string table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: HashMap<String, String>,
}

static RE_BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static RE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"\s*=\s*"((?:[^"\\]|\\.)*)"\s*;"#).unwrap()
});

impl StringTable {
    /// Built-in English strings.
    pub fn english() -> Self {
        Self {
            entries: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Parse `.strings` source. Unparseable lines are skipped.
    pub fn parse(source: &str) -> Self {
        let without_blocks = RE_BLOCK_COMMENT.replace_all(source, "");
        let mut entries = HashMap::new();
        for line in without_blocks.lines() {
            if line.trim_start().starts_with("//") {
                continue;
            }
            for caps in RE_ENTRY.captures_iter(line) {
                entries.insert(unescape(&caps[1]), unescape(&caps[2]));
            }
        }
        Self { entries }
    }

    /// English strings overridden by the entries of a `.strings` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DiaryError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|source| DiaryError::StringsLoadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        let overrides = Self::parse(&source);
        debug!("Loaded {} strings from {}", overrides.len(), path.display());

        let mut table = Self::english();
        table.merge(overrides);
        Ok(table)
    }

    /// Add or replace entries from `other`.
    pub fn merge(&mut self, other: StringTable) {
        self.entries.extend(other.entries);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for StringTable {
    fn localize(&self, key: &str) -> String {
        self.get(key).unwrap_or(key).to_string()
    }
}

/// Substitute `arg` for the first `%@` or `%s` placeholder in `template`.
///
/// A template without a placeholder is returned as-is.
pub fn format_arg(template: &str, arg: &str) -> String {
    let at = template.find("%@");
    let s = template.find("%s");
    let pos = match (at, s) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return template.to_string(),
    };
    format!("{}{}{}", &template[..pos], arg, &template[pos + 2..])
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_covers_every_key() {
        let table = StringTable::english();
        for (key, _) in ENGLISH {
            assert_ne!(table.localize(key), *key);
        }
        assert_eq!(table.localize(keys::CONFIRM_BUTTON), "OK");
    }

    #[test]
    fn unknown_key_comes_back_unchanged() {
        let table = StringTable::english();
        assert_eq!(table.localize("no_such_key"), "no_such_key");
    }

    #[test]
    fn parses_strings_file_with_comments() {
        let src = r#"
/* Titles
   for notices */
"alert_add_diary_title_success" = "Gespeichert";
// "alert_confirm_button_title" = "Nope";
"alert_add_diary_message_success" = "Eintrag \"%@\" angelegt.\nDanke!";
"url" = "https://example.com/a";
garbage line
"#;
        let table = StringTable::parse(src);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(keys::TITLE_SUCCESS), Some("Gespeichert"));
        assert_eq!(
            table.get(keys::MESSAGE_SUCCESS),
            Some("Eintrag \"%@\" angelegt.\nDanke!")
        );
        assert_eq!(table.get("url"), Some("https://example.com/a"));
        assert_eq!(table.get(keys::CONFIRM_BUTTON), None);
    }

    #[test]
    fn load_layers_file_over_english() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.strings");
        std::fs::write(&path, "\"alert_confirm_button_title\" = \"Verstanden\";\n").unwrap();

        let table = StringTable::load(&path).unwrap();
        assert_eq!(table.localize(keys::CONFIRM_BUTTON), "Verstanden");
        assert_eq!(table.localize(keys::TITLE_FAILED), "Failed");
    }

    #[test]
    fn load_missing_file_is_error() {
        let err = StringTable::load("/definitely/not/here.strings").unwrap_err();
        assert!(matches!(err, DiaryError::StringsLoadFailed { .. }));
    }

    #[test]
    fn format_arg_substitutes_first_placeholder() {
        assert_eq!(format_arg("Entry %@ added", "7"), "Entry 7 added");
        assert_eq!(format_arg("%s then %@", "x"), "x then %@");
        assert_eq!(format_arg("no placeholder", "7"), "no placeholder");
    }
}
