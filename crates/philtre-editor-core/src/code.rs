//! Code block helpers: language classes, the highlight mirror and the
//! add-block shortcut.

use crate::actions::{Key, KeyCombo};

/// Class changes that point a highlight element at a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageClasses {
    /// Existing `lang*` classes from a previous language.
    pub remove: Vec<String>,
    /// `language-{lang}` and `lang-{lang}`.
    pub add: [String; 2],
}

impl LanguageClasses {
    pub fn new<'a>(current: impl IntoIterator<Item = &'a str>, language: &str) -> Self {
        let remove = current
            .into_iter()
            .filter(|class| class.starts_with("lang"))
            .map(str::to_string)
            .collect();
        Self {
            remove,
            add: [format!("language-{language}"), format!("lang-{language}")],
        }
    }
}

/// Text for the highlight mirror of a textarea holding `value`.
///
/// A trailing newline gets a second one so the mirror keeps the textarea's
/// empty last line.
pub fn highlight_source(value: &str) -> String {
    if value.ends_with('\n') {
        format!("{value}\n")
    } else {
        value.to_string()
    }
}

/// Shift+Enter leaves the code block for a new block.
pub fn is_add_block_key(combo: &KeyCombo) -> bool {
    combo.key == Key::Enter && combo.modifiers.shift
}
