//! Spending categories
//!
//! Categories arrive as free text at the boundary and are normalized exactly
//! once, by [`Category::parse`]. Everything past the boundary works with the
//! normalized value and never re-uppercases.

use crate::{CarbonError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a normalized category code
pub const MAX_CATEGORY_LEN: usize = 64;

/// A normalized spending category.
///
/// The fourteen reference categories are closed variants. Any other
/// well-formed code is carried as [`Category::Custom`] so that unknown
/// categories stay legal (they resolve to the global default factor) and
/// administrators can attach factors to new codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Energy,
    Services,
    Entertainment,
    Travel,
    Healthcare,
    Education,
    Technology,
    Fashion,
    Home,
    Green,
    /// Miscellaneous, and the bucket for records with no category
    Other,
    /// Normalized code outside the reference set
    Custom(String),
}

impl Category {
    /// The reference categories, in seeding order
    pub const KNOWN: [Category; 14] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Energy,
        Category::Services,
        Category::Entertainment,
        Category::Travel,
        Category::Healthcare,
        Category::Education,
        Category::Technology,
        Category::Fashion,
        Category::Home,
        Category::Green,
        Category::Other,
    ];

    /// Normalize and validate a caller-supplied category.
    ///
    /// Surrounding whitespace is trimmed, inner spaces become `_`, and the
    /// result is uppercased. Empty codes, codes longer than
    /// [`MAX_CATEGORY_LEN`] and codes with characters other than ASCII
    /// alphanumerics, `_` or `-` are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CarbonError::invalid_input("category", "must not be empty"));
        }

        let mut code = String::with_capacity(trimmed.len());
        for c in trimmed.chars() {
            match c {
                ' ' => code.push('_'),
                '_' | '-' => code.push(c),
                c if c.is_ascii_alphanumeric() => code.push(c.to_ascii_uppercase()),
                other => {
                    return Err(CarbonError::invalid_input(
                        "category",
                        format!("unsupported character {:?} in '{}'", other, trimmed),
                    ))
                }
            }
        }

        if code.len() > MAX_CATEGORY_LEN {
            return Err(CarbonError::invalid_input(
                "category",
                format!("longer than {} characters", MAX_CATEGORY_LEN),
            ));
        }

        Ok(Self::from_code(code))
    }

    fn from_code(code: String) -> Self {
        match code.as_str() {
            "FOOD" => Self::Food,
            "TRANSPORT" => Self::Transport,
            "SHOPPING" => Self::Shopping,
            "ENERGY" => Self::Energy,
            "SERVICES" => Self::Services,
            "ENTERTAINMENT" => Self::Entertainment,
            "TRAVEL" => Self::Travel,
            "HEALTHCARE" => Self::Healthcare,
            "EDUCATION" => Self::Education,
            "TECHNOLOGY" => Self::Technology,
            "FASHION" => Self::Fashion,
            "HOME" => Self::Home,
            "GREEN" => Self::Green,
            "OTHER" => Self::Other,
            _ => Self::Custom(code),
        }
    }

    /// Bucket used for records whose category is unset
    pub fn fallback() -> Self {
        Self::Other
    }

    /// The normalized uppercase code
    pub fn code(&self) -> &str {
        match self {
            Self::Food => "FOOD",
            Self::Transport => "TRANSPORT",
            Self::Shopping => "SHOPPING",
            Self::Energy => "ENERGY",
            Self::Services => "SERVICES",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Travel => "TRAVEL",
            Self::Healthcare => "HEALTHCARE",
            Self::Education => "EDUCATION",
            Self::Technology => "TECHNOLOGY",
            Self::Fashion => "FASHION",
            Self::Home => "HOME",
            Self::Green => "GREEN",
            Self::Other => "OTHER",
            Self::Custom(code) => code,
        }
    }

    /// Check if this is one of the reference categories
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Category {
    type Err = CarbonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Category {
    type Error = CarbonError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Custom(code) => code,
            known => known.code().to_string(),
        }
    }
}
