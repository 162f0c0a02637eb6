//! In-memory `EntryRepository` implementation over the shared catalog state.
//!
//! A thin handle: every operation takes the lock, delegates to the state,
//! and maps lock poisoning to the port's unavailable error.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    EntryPage, EntryRepository, EntryRepositoryError, NearbyEntry, TagCount, TextMatch,
};
use crate::domain::{CatalogEntry, EntryId, GeoPoint, NewCatalogEntry, Slug};

use super::store::CatalogState;

/// Entry repository handle over the shared in-memory state.
#[derive(Clone)]
pub struct MemoryEntryRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl MemoryEntryRepository {
    pub(super) fn new(state: Arc<RwLock<CatalogState>>) -> Self {
        Self { state }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogState>, EntryRepositoryError> {
        self.state
            .read()
            .map_err(|_| EntryRepositoryError::unavailable("catalog state lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>, EntryRepositoryError> {
        self.state
            .write()
            .map_err(|_| EntryRepositoryError::unavailable("catalog state lock poisoned"))
    }
}

#[async_trait]
impl EntryRepository for MemoryEntryRepository {
    async fn insert(&self, new: NewCatalogEntry) -> Result<CatalogEntry, EntryRepositoryError> {
        self.write()?.insert_entry(new)
    }

    async fn update(&self, entry: CatalogEntry) -> Result<CatalogEntry, EntryRepositoryError> {
        self.write()?.update_entry(entry)
    }

    async fn find_by_id(
        &self,
        id: EntryId,
    ) -> Result<Option<CatalogEntry>, EntryRepositoryError> {
        Ok(self.read()?.find_by_id(id))
    }

    async fn find_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<CatalogEntry>, EntryRepositoryError> {
        Ok(self.read()?.find_by_slug(slug))
    }

    async fn slugs_in_family(&self, base: &Slug) -> Result<Vec<Slug>, EntryRepositoryError> {
        Ok(self.read()?.slugs_in_family(base))
    }

    async fn search_text(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<TextMatch>, EntryRepositoryError> {
        Ok(self.read()?.search_text(query, limit))
    }

    async fn find_near(
        &self,
        origin: GeoPoint,
        radius_metres: f64,
        limit: usize,
    ) -> Result<Vec<NearbyEntry>, EntryRepositoryError> {
        Ok(self.read()?.find_near(origin, radius_metres, limit))
    }

    async fn entries_with_tag(
        &self,
        tag: Option<String>,
    ) -> Result<Vec<CatalogEntry>, EntryRepositoryError> {
        Ok(self.read()?.entries_with_tag(tag.as_deref()))
    }

    async fn tag_counts(&self) -> Result<Vec<TagCount>, EntryRepositoryError> {
        Ok(self.read()?.tag_counts())
    }

    async fn list_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<EntryPage, EntryRepositoryError> {
        Ok(self.read()?.list_page(offset, limit))
    }
}
