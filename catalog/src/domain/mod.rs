//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed catalog entities used by the query,
//! aggregation, and persistence layers. Keep types immutable and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic error payload and stable codes.
//! - CatalogEntry / EntryContent / NewCatalogEntry — directory entries.
//! - Review / NewReview / Rating — reviews attached to entries.
//! - Slug — derived, deduplicated entry identifiers.
//! - GeoPoint / Location — validated coordinates and addresses.
//! - QueryLimits / TextSearchWeights — environment-tunable read settings.
//! - CatalogCommandService / CatalogQueryService — the driving-port services.

pub mod config;
pub mod entry;
pub mod error;
pub mod geo;
pub mod ports;
pub mod review;
pub mod slug;
pub mod user;

mod aggregation_service;
mod catalog_service;
mod repository_errors;
mod validation;

pub use self::aggregation_service::CatalogQueryService;
pub use self::catalog_service::CatalogCommandService;
pub use self::config::{CatalogEnv, DefaultCatalogEnv, QueryLimits, TextSearchWeights};
pub use self::entry::{
    CatalogEntry, CatalogEntryDraft, EntryContent, EntryContentDraft, EntryId, NewCatalogEntry,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{GeoPoint, GeoValidationError, Location, LocationDraft};
pub use self::review::{NewReview, NewReviewDraft, Rating, RatingError, Review, ReviewDraft, ReviewId};
pub use self::slug::{Slug, SlugError};
pub use self::user::{UserId, UserIdError};
pub use self::validation::{CatalogValidationError, FieldViolation};
