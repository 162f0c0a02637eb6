//! Generated catalog seed types.
//!
//! This module defines the output types from catalog generation. These types
//! are independent of the catalog's domain types to avoid circular
//! dependencies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated venue location.
///
/// Coordinates are decimal degrees. Mirrors the catalog's location shape
/// without creating a dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSeed {
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Human-readable street address.
    pub address: String,
}

/// A generated review attached to a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSeed {
    /// Unique identifier for the review.
    pub id: Uuid,
    /// Identifier of the reviewing user.
    pub author_id: Uuid,
    /// Review body text.
    pub text: String,
    /// Star rating from 1 to 5, absent when the reviewer left text only.
    pub rating: Option<u8>,
}

/// A generated example catalog entry with its reviews.
///
/// Contains all the fields needed to create an entry and its reviews through
/// the catalog's write path. Entry names repeat once generation exhausts the
/// venue roster, which exercises downstream slug disambiguation.
///
/// # Example
///
/// ```
/// use example_data::{EntrySeed, ReviewSeed};
/// use uuid::Uuid;
///
/// let entry = EntrySeed {
///     id: Uuid::new_v4(),
///     name: "The Brined Anchor".to_owned(),
///     description: None,
///     tags: vec!["Licensed".to_owned()],
///     location: None,
///     photo_ref: None,
///     author_id: Uuid::new_v4(),
///     reviews: vec![],
/// };
///
/// assert_eq!(entry.name, "The Brined Anchor");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySeed {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// Venue name.
    pub name: String,
    /// Optional venue description.
    pub description: Option<String>,
    /// Tags in presentation order; duplicates are meaningful downstream.
    pub tags: Vec<String>,
    /// Venue location, absent for delivery-only venues.
    pub location: Option<LocationSeed>,
    /// Opaque photo reference, absent when no photo was uploaded.
    pub photo_ref: Option<String>,
    /// Identifier of the user who created the entry.
    pub author_id: Uuid,
    /// Reviews left on this entry.
    pub reviews: Vec<ReviewSeed>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_seed_serializes_to_camel_case() {
        let entry = EntrySeed {
            id: Uuid::nil(),
            name: "Test".to_owned(),
            description: None,
            tags: vec![],
            location: Some(LocationSeed {
                longitude: -0.1276,
                latitude: 51.5072,
                address: "1 Test Row".to_owned(),
            }),
            photo_ref: None,
            author_id: Uuid::nil(),
            reviews: vec![],
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(json.contains("authorId"));
        assert!(json.contains("longitude"));
        assert!(json.contains("latitude"));
        assert!(json.contains("address"));
    }

    #[test]
    fn review_seed_round_trips() {
        let review = ReviewSeed {
            id: Uuid::nil(),
            author_id: Uuid::nil(),
            text: "Superb dumplings.".to_owned(),
            rating: Some(5),
        };
        let json = serde_json::to_string(&review).expect("serialize");
        let back: ReviewSeed = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, review);
    }

    #[test]
    fn unrated_review_round_trips_with_null_rating() {
        let review = ReviewSeed {
            id: Uuid::nil(),
            author_id: Uuid::nil(),
            text: "Came for the tea.".to_owned(),
            rating: None,
        };
        let json = serde_json::to_string(&review).expect("serialize");
        assert!(json.contains("\"rating\":null"));
        let back: ReviewSeed = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.rating, None);
    }
}
