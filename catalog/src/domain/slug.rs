//! Derived entry identifiers and family disambiguation.
//!
//! A slug is the URL-safe identifier derived from an entry's name: lowercase
//! ASCII letters and digits, with runs of any other characters collapsed to
//! single hyphens. Slugs sharing a base (`cafe`, `cafe-2`, `cafe-3`) form a
//! family; the suffix assigned to a new family member is the count of
//! existing members plus one. The counter does not inspect existing
//! suffixes, so uniqueness rests on the storage guard, and existing entries
//! never have their slugs recomputed.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised when deriving or parsing a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The source name contains no characters usable in a slug.
    UnsluggableName { name: String },
    /// The value is not a well-formed stored slug.
    InvalidSlug { value: String },
}

impl fmt::Display for SlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsluggableName { name } => {
                write!(f, "name '{name}' contains no sluggable characters")
            }
            Self::InvalidSlug { value } => write!(
                f,
                "'{value}' is not a valid slug (lowercase ASCII letters, digits, and hyphens)"
            ),
        }
    }
}

impl std::error::Error for SlugError {}

/// A validated, URL-safe entry identifier.
///
/// Always non-empty, lowercase, and composed of ASCII letters, digits, and
/// hyphens. Serialises as a plain string.
///
/// # Examples
/// ```
/// use catalog::domain::Slug;
///
/// let base = Slug::base_from_name("  Dave's Dumplings! ")?;
/// assert_eq!(base.as_str(), "dave-s-dumplings");
///
/// assert_eq!(Slug::with_family_count(&base, 0).as_str(), "dave-s-dumplings");
/// assert_eq!(Slug::with_family_count(&base, 2).as_str(), "dave-s-dumplings-3");
/// # Ok::<(), catalog::domain::SlugError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Derive the base slug for an entry name.
    ///
    /// Lowercases the name, collapses every run of non-alphanumeric
    /// characters (including non-ASCII letters) into a single hyphen, and
    /// trims leading and trailing hyphens.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::UnsluggableName`] when nothing remains after
    /// normalisation, for example a name of punctuation only.
    pub fn base_from_name(name: &str) -> Result<Self, SlugError> {
        let lowered = name.to_lowercase();
        let mut slug = String::with_capacity(lowered.len());
        let mut pending_separator = false;

        for ch in lowered.chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(ch);
            } else {
                pending_separator = true;
            }
        }

        if slug.is_empty() {
            return Err(SlugError::UnsluggableName {
                name: name.to_owned(),
            });
        }
        Ok(Self(slug))
    }

    /// Parse an already-derived slug, validating its stored form.
    pub fn parse(value: impl Into<String>) -> Result<Self, SlugError> {
        let value = value.into();
        if !is_valid_slug(&value) {
            return Err(SlugError::InvalidSlug { value });
        }
        Ok(Self(value))
    }

    /// The slug as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Return `true` when `self` belongs to the family of `base`.
    ///
    /// A family member is the base itself or the base followed by a hyphen
    /// and one or more digits. `cafe-2` is in the family of `cafe`;
    /// `cafe-bar` and `cafeteria` are not.
    pub fn is_family_member(&self, base: &Slug) -> bool {
        if self == base {
            return true;
        }
        self.0
            .strip_prefix(base.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|suffix| {
                !suffix.is_empty() && suffix.bytes().all(|byte| byte.is_ascii_digit())
            })
    }

    /// Build the slug for the next member of a family with `members`
    /// existing entries.
    ///
    /// Zero members yields the base unchanged; otherwise the suffix is the
    /// member count plus one, so the second `cafe` becomes `cafe-2`. The
    /// count ignores suffix values: after removals leave gaps, a candidate
    /// may collide with a survivor, which the storage uniqueness guard
    /// reports for the caller to retry.
    pub fn with_family_count(base: &Slug, members: usize) -> Self {
        if members == 0 {
            base.clone()
        } else {
            Self(format!("{}-{}", base.0, members + 1))
        }
    }
}

/// Return `true` when `value` is a well-formed stored slug.
fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Borrow<str> for Slug {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}
