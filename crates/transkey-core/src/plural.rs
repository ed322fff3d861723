//! Plural and ordinal key suffixes.
//!
//! The engine never picks a plural category itself. A category arrives with
//! the request, or is computed from a count by an installed [`PluralRules`]
//! collaborator, and this module maps it onto suffixed key names.

use crate::error::ParsePluralCategoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Infix marking ordinal plural keys (`place_ordinal_one`).
pub const ORDINAL_MARKER: &str = "ordinal";

/// CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    /// Suffix text used in resource keys.
    pub fn as_str(self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralCategory {
    type Err = ParsePluralCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PluralCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| ParsePluralCategoryError(value.to_string()))
    }
}

/// Locale plural rules supplied by the caller.
pub trait PluralRules: Send + Sync {
    /// Category for `count`, using ordinal rules when `ordinal` is set.
    fn category(&self, count: i64, ordinal: bool) -> PluralCategory;
}

/// Builds and strips plural suffixes for one separator.
#[derive(Debug, Clone, Copy)]
pub struct PluralSuffixes<'a> {
    separator: &'a str,
}

impl<'a> PluralSuffixes<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self { separator }
    }

    /// `base` + separator + category.
    pub fn cardinal(&self, base: &str, category: PluralCategory) -> String {
        format!("{base}{}{}", self.separator, category.as_str())
    }

    /// `base` + separator + `ordinal` + separator + category.
    pub fn ordinal(&self, base: &str, category: PluralCategory) -> String {
        let sep = self.separator;
        format!("{base}{sep}{ORDINAL_MARKER}{sep}{}", category.as_str())
    }

    /// Keys to try for `base`, most specific first.
    ///
    /// With a category: ordinal form, cardinal form, then the bare key.
    /// Without one only the bare key is tried.
    pub fn expand_for_lookup(&self, base: &str, category: Option<PluralCategory>) -> Vec<String> {
        match category {
            Some(category) => vec![
                self.ordinal(base, category),
                self.cardinal(base, category),
                base.to_string(),
            ],
            None => vec![base.to_string()],
        }
    }

    /// Base key of a plural- or ordinal-suffixed key.
    ///
    /// The ordinal pattern is checked first so `x_ordinal_one` yields `x`,
    /// not `x_ordinal`. Keys that would leave an empty base are not stripped.
    pub fn strip<'k>(&self, key: &'k str) -> Option<&'k str> {
        let sep = self.separator;
        let ordinal = PluralCategory::ALL.into_iter().find_map(|category| {
            key.strip_suffix(category.as_str())
                .and_then(|rest| rest.strip_suffix(sep))
                .and_then(|rest| rest.strip_suffix(ORDINAL_MARKER))
                .and_then(|rest| rest.strip_suffix(sep))
        });
        let base = ordinal.or_else(|| {
            PluralCategory::ALL.into_iter().find_map(|category| {
                key.strip_suffix(category.as_str())
                    .and_then(|rest| rest.strip_suffix(sep))
            })
        })?;
        (!base.is_empty()).then_some(base)
    }
}
