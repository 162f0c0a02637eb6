//! In-memory `ReviewRepository` implementation over the shared catalog state.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{EntryId, NewReview, Review};

use super::store::CatalogState;

/// Review repository handle over the shared in-memory state.
#[derive(Clone)]
pub struct MemoryReviewRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl MemoryReviewRepository {
    pub(super) fn new(state: Arc<RwLock<CatalogState>>) -> Self {
        Self { state }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogState>, ReviewRepositoryError> {
        self.state
            .read()
            .map_err(|_| ReviewRepositoryError::unavailable("catalog state lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>, ReviewRepositoryError> {
        self.state
            .write()
            .map_err(|_| ReviewRepositoryError::unavailable("catalog state lock poisoned"))
    }
}

#[async_trait]
impl ReviewRepository for MemoryReviewRepository {
    async fn insert(&self, new: NewReview) -> Result<Review, ReviewRepositoryError> {
        Ok(self.write()?.insert_review(new))
    }

    async fn find_by_entry(
        &self,
        entry_id: EntryId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(self.read()?.reviews_for(entry_id))
    }

    async fn find_by_entries(
        &self,
        entry_ids: &[EntryId],
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(self.read()?.reviews_for_many(entry_ids))
    }
}
