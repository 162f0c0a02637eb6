//! Reviews left against catalog entries.
//!
//! A review always carries text; the star rating is optional, and only rated
//! reviews contribute to an entry's average.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::EntryId;
use super::user::UserId;
use super::validation::{CatalogValidationError, FieldViolation, require_trimmed};

/// Unique identifier of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Wrap an existing UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The wrapped UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error raised when a rating falls outside the one-to-five scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingError {
    value: u8,
}

impl fmt::Display for RatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rating must be between 1 and 5 (got {})", self.value)
    }
}

impl std::error::Error for RatingError {}

/// A star rating between one and five inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw rating value.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError`] when `value` is zero or greater than five.
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError { value })
        }
    }

    /// The rating value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw review fields accepted from callers before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewReviewDraft {
    /// Entry the review is left against.
    pub entry_id: EntryId,
    /// Reviewing author.
    pub author_id: UserId,
    /// Review text.
    pub text: String,
    /// Optional star rating between one and five.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Timestamp recorded by the caller's clock.
    pub created_at: DateTime<Utc>,
}

/// A validated review awaiting its storage-assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    entry_id: EntryId,
    author_id: UserId,
    text: String,
    rating: Option<Rating>,
    created_at: DateTime<Utc>,
}

impl NewReview {
    /// Validate `draft`, collecting every field violation before reporting.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogValidationError`] when the text is blank or the
    /// rating falls outside the one-to-five scale.
    pub fn new(draft: NewReviewDraft) -> Result<Self, CatalogValidationError> {
        let text = require_trimmed(&draft.text, "text");
        let rating = draft
            .rating
            .map(Rating::new)
            .transpose()
            .map_err(|error| FieldViolation::new("rating", error.to_string()));

        match (text, rating) {
            (Ok(text), Ok(rating)) => Ok(Self {
                entry_id: draft.entry_id,
                author_id: draft.author_id,
                text,
                rating,
                created_at: draft.created_at,
            }),
            (text, rating) => {
                let violations: Vec<FieldViolation> =
                    text.err().into_iter().chain(rating.err()).collect();
                Err(CatalogValidationError::new(violations))
            }
        }
    }

    /// Entry the review is left against.
    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    /// Reviewing author.
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Trimmed review text.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Validated rating, when one was given.
    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    /// Timestamp recorded by the caller's clock.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ReviewDraft")]
pub struct Review {
    id: ReviewId,
    entry_id: EntryId,
    author_id: UserId,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<Rating>,
    created_at: DateTime<Utc>,
}

/// Raw stored-review fields accepted before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewDraft {
    /// Stored identifier.
    pub id: ReviewId,
    /// Entry the review is left against.
    pub entry_id: EntryId,
    /// Reviewing author.
    pub author_id: UserId,
    /// Review text.
    pub text: String,
    /// Optional star rating.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReviewDraft> for Review {
    type Error = CatalogValidationError;

    fn try_from(draft: ReviewDraft) -> Result<Self, Self::Error> {
        let new = NewReview::new(NewReviewDraft {
            entry_id: draft.entry_id,
            author_id: draft.author_id,
            text: draft.text,
            rating: draft.rating,
            created_at: draft.created_at,
        })?;
        Ok(Self::from_parts(draft.id, new))
    }
}

impl Review {
    /// Materialise a stored review from its assigned identifier and
    /// validated fields.
    pub fn from_parts(id: ReviewId, new: NewReview) -> Self {
        let NewReview {
            entry_id,
            author_id,
            text,
            rating,
            created_at,
        } = new;
        Self {
            id,
            entry_id,
            author_id,
            text,
            rating,
            created_at,
        }
    }

    /// Stored identifier.
    pub fn id(&self) -> ReviewId {
        self.id
    }

    /// Entry the review is left against.
    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    /// Reviewing author.
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Review text.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Star rating, when one was given.
    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
