//! Input vocabulary shared by the chip controller and its callers.

use crate::config::DEFAULT_RECOGNIZED_REGIONS;
use crate::model::category::Category;

/// Discrete key reported by the surrounding input widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Space,
    Char(char),
    Other,
}

impl Key {
    /// Comma commits the draft like Enter.
    pub const COMMA: Key = Key::Char(',');

    /// Maps a DOM-style key name (`"Enter"`, `"Backspace"`, `" "`, `","`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Self::Enter,
            "Backspace" => Self::Backspace,
            " " => Self::Space,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Self::Char(ch),
                    _ => Self::Other,
                }
            }
        }
    }

    pub(crate) fn commits_draft(self) -> bool {
        matches!(self, Self::Enter | Self::Char(','))
    }

    pub(crate) fn activates_chip_bar(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Whether the widget must still apply the key's default effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The controller handled the key; its character must not reach the draft.
    Consumed,
    PassThrough,
}

/// Caller-owned required free-text field guarding submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    input: String,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Required-field check: non-blank input.
    pub fn is_valid(&self) -> bool {
        !self.input.trim().is_empty()
    }

    pub fn reset(&mut self) {
        self.input.clear();
    }
}

/// Named containers whose interactions do not dismiss the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedRegions {
    names: Vec<String>,
}

impl RecognizedRegions {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// True when any ancestor container of the interaction target is one of
    /// the recognized regions.
    pub fn encloses<'a>(&self, ancestors: impl IntoIterator<Item = &'a str>) -> bool {
        ancestors
            .into_iter()
            .any(|ancestor| self.names.iter().any(|name| name == ancestor))
    }
}

impl Default for RecognizedRegions {
    fn default() -> Self {
        Self::new(DEFAULT_RECOGNIZED_REGIONS)
    }
}

/// What the rendering layer should do when a submitted chip is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemActivation {
    /// Open the literal URL in a new window.
    OpenUrl(String),
    /// Caller decides (compose mail, open contact, filter by tag).
    Delegate { category: Category, value: String },
}

#[cfg(test)]
mod tests {
    use super::{Key, RecognizedRegions, TaskForm};

    #[test]
    fn key_names_map_to_keys() {
        assert_eq!(Key::from_name("Enter"), Key::Enter);
        assert_eq!(Key::from_name(","), Key::COMMA);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("a"), Key::Char('a'));
        assert_eq!(Key::from_name("ArrowLeft"), Key::Other);
    }

    #[test]
    fn regions_match_any_ancestor() {
        let regions = RecognizedRegions::default();
        assert!(regions.encloses(["chip", "second-container"]));
        assert!(!regions.encloses(["not-in-container"]));
        assert!(!regions.encloses(std::iter::empty()));
    }

    #[test]
    fn form_requires_non_blank_input() {
        let mut form = TaskForm::new();
        assert!(!form.is_valid());
        form.set_input("   ");
        assert!(!form.is_valid());
        form.set_input("Some input");
        assert!(form.is_valid());
        form.reset();
        assert_eq!(form.input(), "");
    }
}
