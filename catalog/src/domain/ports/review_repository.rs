//! Port for review persistence and per-entry review reads.

use async_trait::async_trait;

use crate::domain::{EntryId, NewReview, Review, ReviewId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review store adapters.
    pub enum ReviewRepositoryError {
        /// Store could not be reached or refused the operation outright.
        Unavailable { message: String } =>
            "review store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "review store query failed: {message}",
    }
}

impl ReviewRepositoryError {
    /// Whether the error indicates the store itself was unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Port for writing reviews and reading them back per entry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persist a validated review, assigning its identifier.
    async fn insert(&self, new: NewReview) -> Result<Review, ReviewRepositoryError>;

    /// List reviews left against one entry, oldest first.
    async fn find_by_entry(&self, entry_id: EntryId)
    -> Result<Vec<Review>, ReviewRepositoryError>;

    /// List reviews left against any of `entry_ids`, oldest first.
    ///
    /// One batched call serves ranking passes that join many entries with
    /// their reviews.
    async fn find_by_entries(
        &self,
        entry_ids: &[EntryId],
    ) -> Result<Vec<Review>, ReviewRepositoryError>;
}

/// Fixture implementation for tests that do not exercise review storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReviewRepository;

#[async_trait]
impl ReviewRepository for FixtureReviewRepository {
    async fn insert(&self, new: NewReview) -> Result<Review, ReviewRepositoryError> {
        Ok(Review::from_parts(ReviewId::random(), new))
    }

    async fn find_by_entry(
        &self,
        _entry_id: EntryId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_entries(
        &self,
        _entry_ids: &[EntryId],
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{NewReviewDraft, UserId};

    #[rstest]
    #[tokio::test]
    async fn fixture_insert_materialises_the_review() {
        let repo = FixtureReviewRepository;
        let new = NewReview::new(NewReviewDraft {
            entry_id: EntryId::random(),
            author_id: UserId::random(),
            text: "Still thinking about the cardamom buns.".to_owned(),
            rating: Some(5),
            created_at: Utc::now(),
        })
        .expect("valid review");

        let stored = repo.insert(new).await.expect("fixture insert succeeds");
        assert_eq!(stored.text(), "Still thinking about the cardamom buns.");
        assert_eq!(stored.rating().map(|rating| rating.value()), Some(5));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_reads_return_empty() {
        let repo = FixtureReviewRepository;
        let singles = repo
            .find_by_entry(EntryId::random())
            .await
            .expect("fixture read succeeds");
        assert!(singles.is_empty());

        let batched = repo
            .find_by_entries(&[EntryId::random(), EntryId::random()])
            .await
            .expect("fixture batch read succeeds");
        assert!(batched.is_empty());
    }

    #[rstest]
    fn unavailable_is_flagged_for_retry() {
        let err = ReviewRepositoryError::unavailable("connection reset");
        assert!(err.is_unavailable());
        assert_eq!(
            err.to_string(),
            "review store unavailable: connection reset"
        );
    }
}
