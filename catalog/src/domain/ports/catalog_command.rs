//! Driving port for catalog mutations.
//!
//! Callers create entries, edit them as their author, and leave reviews; the
//! port owns slug assignment and authorship checks behind the boundary.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{
    CatalogEntry, EntryContent, EntryContentDraft, EntryId, Error, NewCatalogEntry, NewReview,
    NewReviewDraft, Review, ReviewId, UserId,
};

/// Request to create a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub author_id: UserId,
    pub content: EntryContentDraft,
}

/// Response from creating a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryResponse {
    pub entry: CatalogEntry,
}

/// Request to replace the editable fields of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub entry_id: EntryId,
    pub author_id: UserId,
    pub content: EntryContentDraft,
}

/// Response from updating a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryResponse {
    pub entry: CatalogEntry,
}

/// Request to leave a review against an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewRequest {
    pub entry_id: EntryId,
    pub author_id: UserId,
    pub text: String,
    #[serde(default)]
    pub rating: Option<u8>,
}

/// Response from leaving a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewResponse {
    pub review: Review,
}

/// Driving port for catalog write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogCommand: Send + Sync {
    /// Validate content, assign a slug unique within its family, and store
    /// the entry.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use catalog::domain::{EntryContentDraft, UserId};
    /// # use catalog::domain::ports::{CatalogCommand, CreateEntryRequest, FixtureCatalogCommand};
    /// # async fn example() -> Result<(), catalog::domain::Error> {
    /// let command = FixtureCatalogCommand;
    /// let response = command
    ///     .create_entry(CreateEntryRequest {
    ///         author_id: UserId::random(),
    ///         content: EntryContentDraft {
    ///             name: "Pickled Fox".to_owned(),
    ///             tags: vec!["Open Late".to_owned()],
    ///             ..EntryContentDraft::default()
    ///         },
    ///     })
    ///     .await?;
    /// assert_eq!(response.entry.slug().as_str(), "pickled-fox");
    /// # Ok(())
    /// # }
    /// ```
    async fn create_entry(&self, request: CreateEntryRequest)
    -> Result<CreateEntryResponse, Error>;

    /// Replace the editable fields of an entry on behalf of its author.
    ///
    /// Fails with a forbidden error when `author_id` does not match the
    /// stored author, and recomputes the slug only when the name changed.
    async fn update_entry(&self, request: UpdateEntryRequest)
    -> Result<UpdateEntryResponse, Error>;

    /// Validate and store a review against an existing entry.
    async fn add_review(&self, request: AddReviewRequest) -> Result<AddReviewResponse, Error>;
}

/// Fixture command implementation for tests that do not need persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogCommand;

#[async_trait]
impl CatalogCommand for FixtureCatalogCommand {
    async fn create_entry(
        &self,
        request: CreateEntryRequest,
    ) -> Result<CreateEntryResponse, Error> {
        let content = EntryContent::new(request.content)
            .map_err(|err| Error::validation(err.into_violations()))?;
        let slug = content.base_slug().clone();
        let entry = CatalogEntry::from_parts(
            EntryId::random(),
            NewCatalogEntry::new(content, slug, request.author_id, Utc::now()),
        );
        Ok(CreateEntryResponse { entry })
    }

    async fn update_entry(
        &self,
        request: UpdateEntryRequest,
    ) -> Result<UpdateEntryResponse, Error> {
        let content = EntryContent::new(request.content)
            .map_err(|err| Error::validation(err.into_violations()))?;
        let slug = content.base_slug().clone();
        let entry = CatalogEntry::from_parts(
            request.entry_id,
            NewCatalogEntry::new(content, slug, request.author_id, Utc::now()),
        );
        Ok(UpdateEntryResponse { entry })
    }

    async fn add_review(&self, request: AddReviewRequest) -> Result<AddReviewResponse, Error> {
        let new = NewReview::new(NewReviewDraft {
            entry_id: request.entry_id,
            author_id: request.author_id,
            text: request.text,
            rating: request.rating,
            created_at: Utc::now(),
        })
        .map_err(|err| Error::validation(err.into_violations()))?;
        Ok(AddReviewResponse {
            review: Review::from_parts(ReviewId::random(), new),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ErrorCode;

    #[fixture]
    fn sample_content() -> EntryContentDraft {
        EntryContentDraft {
            name: "Ember Flats".to_owned(),
            description: Some("Charcoal everything.".to_owned()),
            tags: vec!["Licensed".to_owned()],
            ..EntryContentDraft::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_create_derives_the_slug(sample_content: EntryContentDraft) {
        let command = FixtureCatalogCommand;
        let response = command
            .create_entry(CreateEntryRequest {
                author_id: UserId::random(),
                content: sample_content,
            })
            .await
            .expect("fixture create succeeds");

        assert_eq!(response.entry.name(), "Ember Flats");
        assert_eq!(response.entry.slug().as_str(), "ember-flats");
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_create_rejects_invalid_content() {
        let command = FixtureCatalogCommand;
        let error = command
            .create_entry(CreateEntryRequest {
                author_id: UserId::random(),
                content: EntryContentDraft {
                    name: "   ".to_owned(),
                    ..EntryContentDraft::default()
                },
            })
            .await
            .expect_err("blank name rejected");

        assert_eq!(error.code(), ErrorCode::Validation);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_update_keeps_the_requested_id(sample_content: EntryContentDraft) {
        let command = FixtureCatalogCommand;
        let entry_id = EntryId::random();
        let response = command
            .update_entry(UpdateEntryRequest {
                entry_id,
                author_id: UserId::random(),
                content: sample_content,
            })
            .await
            .expect("fixture update succeeds");

        assert_eq!(response.entry.id(), entry_id);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_add_review_validates_the_rating() {
        let command = FixtureCatalogCommand;
        let error = command
            .add_review(AddReviewRequest {
                entry_id: EntryId::random(),
                author_id: UserId::random(),
                text: "Six stars if I could.".to_owned(),
                rating: Some(6),
            })
            .await
            .expect_err("rating off the scale rejected");

        assert_eq!(error.code(), ErrorCode::Validation);
    }

    #[rstest]
    fn requests_round_trip_through_json(sample_content: EntryContentDraft) {
        let request = CreateEntryRequest {
            author_id: UserId::random(),
            content: sample_content,
        };
        let json = serde_json::to_string(&request).expect("serialize");
        let back: CreateEntryRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, request);
    }
}
