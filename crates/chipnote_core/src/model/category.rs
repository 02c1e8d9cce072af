//! Chip category enum and display palette.
//!
//! # Responsibility
//! - Define the five mutually exclusive token categories.
//! - Map categories (and stored kind names) to chip colors.
//!
//! # Invariants
//! - Wire names are stable: `email|link|tag|contact|text`.
//! - Unknown kind names render with the default chip color.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Semantic category of one finalized chip token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Lowercase `local@domain.tld` address.
    Email,
    /// Absolute `http`/`https` URL.
    Link,
    /// Any token containing `#`.
    Tag,
    /// Token starting with an uppercase character.
    Contact,
    /// Residual category.
    #[serde(rename = "text")]
    PlainText,
}

impl Category {
    /// All categories in classification precedence order.
    pub const PRECEDENCE: [Category; 5] = [
        Category::Email,
        Category::Tag,
        Category::Link,
        Category::Contact,
        Category::PlainText,
    ];

    /// Stable storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Link => "link",
            Self::Tag => "tag",
            Self::Contact => "contact",
            Self::PlainText => "text",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind name is not one of the stable wire names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl Display for UnknownCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown chip category `{}`", self.0)
    }
}

impl Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "email" => Ok(Self::Email),
            "link" => Ok(Self::Link),
            "tag" => Ok(Self::Tag),
            "contact" => Ok(Self::Contact),
            "text" => Ok(Self::PlainText),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Fixed chip palette exposed to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipColor {
    Orange,
    Violet,
    Blue,
    Green,
    Default,
}

impl ChipColor {
    /// Palette entry for one category.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Email => Self::Orange,
            Category::Tag => Self::Violet,
            Category::Link => Self::Blue,
            Category::Contact => Self::Green,
            Category::PlainText => Self::Default,
        }
    }

    /// Palette entry for a stored kind name; unknown names fall back to
    /// `ChipColor::Default`.
    pub fn for_kind_name(kind: &str) -> Self {
        kind.parse::<Category>()
            .map(Self::for_category)
            .unwrap_or(Self::Default)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Violet => "violet",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Default => "default",
        }
    }
}

impl Display for ChipColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
