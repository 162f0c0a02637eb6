//! Deterministic example catalog data for demonstrations and tests.
//!
//! This crate generates reproducible catalog entries (venues with tags,
//! coordinates, and reviews) from a numeric seed. The same seed always
//! produces identical output, so integration tests and demo environments can
//! rely on stable data without checking fixtures into every consumer.
//!
//! Seed types are plain data, independent of the catalog's domain types, to
//! avoid circular dependencies. Consumers convert seeds into domain drafts at
//! the point of use.

mod generator;
mod seed;

pub use generator::{TAG_CHOICES, generate_entries};
pub use seed::{EntrySeed, LocationSeed, ReviewSeed};
