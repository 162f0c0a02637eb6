//! Catalog entries and their validated content.
//!
//! Content arrives as an [`EntryContentDraft`], is checked into an
//! [`EntryContent`] carrying the base slug derived from the name, and is
//! paired with an assigned slug and provenance as a [`NewCatalogEntry`]
//! before storage materialises it into a [`CatalogEntry`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geo::{GeoPoint, GeoValidationError, Location, LocationDraft};
use super::slug::Slug;
use super::user::UserId;
use super::validation::{CatalogValidationError, FieldViolation, require_trimmed, trim_optional};

/// Unique identifier of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
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

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw entry fields accepted from callers before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntryContentDraft {
    /// Display name of the entry.
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form tags describing the entry.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional location with coordinates and address.
    #[serde(default)]
    pub location: Option<LocationDraft>,
    /// Optional stored photo reference.
    #[serde(default)]
    pub photo_ref: Option<String>,
}

/// Validated, storage-ready entry content.
///
/// Carries the base slug derived from the validated name; the slug actually
/// assigned to the entry is decided later, once the existing family has been
/// counted.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryContent {
    name: String,
    base_slug: Slug,
    description: Option<String>,
    tags: Vec<String>,
    location: Option<Location>,
    photo_ref: Option<String>,
}

impl EntryContent {
    /// Validate `draft`, collecting every field violation before reporting.
    ///
    /// # Examples
    /// ```
    /// use catalog::domain::{EntryContent, EntryContentDraft};
    ///
    /// let content = EntryContent::new(EntryContentDraft {
    ///     name: "  The Brined Anchor  ".to_owned(),
    ///     tags: vec!["Licensed".to_owned()],
    ///     ..EntryContentDraft::default()
    /// })?;
    /// assert_eq!(content.name(), "The Brined Anchor");
    /// assert_eq!(content.base_slug().as_str(), "the-brined-anchor");
    /// # Ok::<(), catalog::domain::CatalogValidationError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogValidationError`] carrying all violations when the
    /// name is blank or contains no sluggable characters, a tag is blank, or
    /// the location fails coordinate or address checks.
    pub fn new(draft: EntryContentDraft) -> Result<Self, CatalogValidationError> {
        let named = validate_name(&draft.name);
        let tags = validate_tags(draft.tags);
        let location = draft.location.map(validate_location).transpose();

        match (named, tags, location) {
            (Ok((name, base_slug)), Ok(tags), Ok(location)) => Ok(Self {
                name,
                base_slug,
                description: trim_optional(draft.description),
                tags,
                location,
                photo_ref: trim_optional(draft.photo_ref),
            }),
            (named, tags, location) => {
                let mut violations: Vec<FieldViolation> = Vec::new();
                violations.extend(named.err());
                violations.extend(tags.err());
                violations.extend(location.err().into_iter().flatten());
                Err(CatalogValidationError::new(violations))
            }
        }
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Base slug derived from the name, before family disambiguation.
    pub fn base_slug(&self) -> &Slug {
        &self.base_slug
    }

    /// Trimmed description, when one was given.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Trimmed tags, in draft order.
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    /// Validated location, when one was given.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Stored photo reference, when one was given.
    pub fn photo_ref(&self) -> Option<&str> {
        self.photo_ref.as_deref()
    }
}

fn validate_name(name: &str) -> Result<(String, Slug), FieldViolation> {
    let name = require_trimmed(name, "name")?;
    let base_slug = Slug::base_from_name(&name).map_err(|_| {
        FieldViolation::new("name", "name must contain at least one letter or digit")
    })?;
    Ok((name, base_slug))
}

fn validate_tags(tags: Vec<String>) -> Result<Vec<String>, FieldViolation> {
    let mut cleaned = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(FieldViolation::new(
                "tags",
                "tags must not include blank values",
            ));
        }
        cleaned.push(trimmed.to_owned());
    }
    Ok(cleaned)
}

fn validate_location(draft: LocationDraft) -> Result<Location, Vec<FieldViolation>> {
    let point = GeoPoint::new(draft.longitude, draft.latitude).map_err(|error| {
        let field = match &error {
            GeoValidationError::LongitudeOutOfRange { .. } => "location.longitude",
            GeoValidationError::LatitudeOutOfRange { .. } => "location.latitude",
        };
        FieldViolation::new(field, error.to_string())
    });
    let address = require_trimmed(&draft.address, "location.address");

    match (point, address) {
        (Ok(point), Ok(address)) => Ok(Location::from_parts(point, address)),
        (point, address) => Err(point.err().into_iter().chain(address.err()).collect()),
    }
}

/// A fully-prepared entry awaiting its storage-assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogEntry {
    slug: Slug,
    content: EntryContent,
    author_id: UserId,
    created_at: DateTime<Utc>,
}

impl NewCatalogEntry {
    /// Bundle validated content with its assigned slug and provenance.
    pub fn new(
        content: EntryContent,
        slug: Slug,
        author_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            slug,
            content,
            author_id,
            created_at,
        }
    }

    /// Replace the assigned slug, used when retrying after a collision.
    pub fn with_slug(self, slug: Slug) -> Self {
        Self { slug, ..self }
    }

    /// The slug assigned for storage.
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Display name from the validated content.
    pub fn name(&self) -> &str {
        self.content.name()
    }

    /// Description from the validated content.
    pub fn description(&self) -> Option<&str> {
        self.content.description()
    }

    /// Tags from the validated content.
    pub fn tags(&self) -> &[String] {
        self.content.tags()
    }

    /// Location from the validated content.
    pub fn location(&self) -> Option<&Location> {
        self.content.location()
    }

    /// Photo reference from the validated content.
    pub fn photo_ref(&self) -> Option<&str> {
        self.content.photo_ref()
    }

    /// The creating author.
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Creation timestamp recorded by the caller's clock.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A stored catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CatalogEntryDraft")]
pub struct CatalogEntry {
    id: EntryId,
    name: String,
    slug: Slug,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_ref: Option<String>,
    author_id: UserId,
    created_at: DateTime<Utc>,
}

/// Raw stored-entry fields accepted before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogEntryDraft {
    /// Stored identifier.
    pub id: EntryId,
    /// Display name.
    pub name: String,
    /// Assigned slug, including any family suffix.
    pub slug: Slug,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Tags describing the entry.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional location.
    #[serde(default)]
    pub location: Option<LocationDraft>,
    /// Optional photo reference.
    #[serde(default)]
    pub photo_ref: Option<String>,
    /// Creating author.
    pub author_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CatalogEntryDraft> for CatalogEntry {
    type Error = CatalogValidationError;

    fn try_from(draft: CatalogEntryDraft) -> Result<Self, Self::Error> {
        let content = EntryContent::new(EntryContentDraft {
            name: draft.name,
            description: draft.description,
            tags: draft.tags,
            location: draft.location,
            photo_ref: draft.photo_ref,
        })?;
        Ok(Self::from_parts(
            draft.id,
            NewCatalogEntry::new(content, draft.slug, draft.author_id, draft.created_at),
        ))
    }
}

impl CatalogEntry {
    /// Materialise a stored entry from its assigned identifier and prepared
    /// fields.
    pub fn from_parts(id: EntryId, new: NewCatalogEntry) -> Self {
        let NewCatalogEntry {
            slug,
            content,
            author_id,
            created_at,
        } = new;
        let EntryContent {
            name,
            description,
            tags,
            location,
            photo_ref,
            ..
        } = content;
        Self {
            id,
            name,
            slug,
            description,
            tags,
            location,
            photo_ref,
            author_id,
            created_at,
        }
    }

    /// Replace the assigned slug, used when retrying after a collision.
    pub fn with_slug(self, slug: Slug) -> Self {
        Self { slug, ..self }
    }

    /// Apply replacement content and its recomputed slug, keeping the
    /// identifier, author, and creation timestamp.
    pub fn with_content(self, content: EntryContent, slug: Slug) -> Self {
        let EntryContent {
            name,
            description,
            tags,
            location,
            photo_ref,
            ..
        } = content;
        Self {
            name,
            slug,
            description,
            tags,
            location,
            photo_ref,
            ..self
        }
    }

    /// Stored identifier.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Assigned slug, including any family suffix.
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Description, when one is stored.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Tags, in stored order.
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    /// Location, when one is stored.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Photo reference, when one is stored.
    pub fn photo_ref(&self) -> Option<&str> {
        self.photo_ref.as_deref()
    }

    /// The creating author.
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
