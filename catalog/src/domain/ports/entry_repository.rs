//! Port for catalog entry persistence and the read views built over it.
//!
//! Adapters own the indexes behind the read views (slug lookup, text
//! search, proximity, tag histogram, creation order) so the domain services
//! stay storage-agnostic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{CatalogEntry, EntryId, GeoPoint, NewCatalogEntry, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalog entry store adapters.
    pub enum EntryRepositoryError {
        /// Store could not be reached or refused the operation outright.
        Unavailable { message: String } =>
            "catalog entry store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "catalog entry store query failed: {message}",
        /// The slug chosen for a write is already held by another entry.
        SlugTaken { slug: Slug } =>
            "slug '{slug}' is already taken",
        /// The entry targeted by a write does not exist.
        Missing { id: EntryId } =>
            "catalog entry {id} does not exist",
    }
}

impl EntryRepositoryError {
    /// Whether the error indicates the store itself was unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// A text search hit with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMatch {
    /// The matched entry.
    pub entry: CatalogEntry,
    /// Weighted term-frequency relevance, higher is better.
    pub score: f64,
}

/// A proximity search hit with its distance from the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyEntry {
    /// The located entry.
    pub entry: CatalogEntry,
    /// Great-circle distance from the search origin.
    pub distance_metres: f64,
}

/// One tag with the number of times entries carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    /// The tag value.
    pub tag: String,
    /// Occurrences across all entries, counting duplicates within an entry.
    pub count: u64,
}

/// One window of the newest-first entry listing.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPage {
    /// Entries in the window, newest first.
    pub entries: Vec<CatalogEntry>,
    /// Total number of entries in the catalog.
    pub total: u64,
}

/// Port for writing catalog entries and reading the views built over them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Persist a prepared entry, assigning its identifier.
    ///
    /// Fails with [`EntryRepositoryError::SlugTaken`] when the assigned slug
    /// is already held; the caller picks a fresh slug and retries.
    async fn insert(&self, new: NewCatalogEntry) -> Result<CatalogEntry, EntryRepositoryError>;

    /// Replace a stored entry, reindexing every read view.
    ///
    /// Fails with [`EntryRepositoryError::Missing`] when the entry no longer
    /// exists, and [`EntryRepositoryError::SlugTaken`] when its replacement
    /// slug is held by a different entry.
    async fn update(&self, entry: CatalogEntry) -> Result<CatalogEntry, EntryRepositoryError>;

    /// Find an entry by its identifier.
    async fn find_by_id(&self, id: EntryId)
    -> Result<Option<CatalogEntry>, EntryRepositoryError>;

    /// Find an entry by its slug.
    async fn find_by_slug(&self, slug: &Slug)
    -> Result<Option<CatalogEntry>, EntryRepositoryError>;

    /// List the stored slugs belonging to the family of `base`.
    ///
    /// The family is the base itself plus `base-N` for numeric `N`, so
    /// `cafe-bar` never counts against `cafe`.
    async fn slugs_in_family(&self, base: &Slug) -> Result<Vec<Slug>, EntryRepositoryError>;

    /// Score entries against a free-text query, best first, at most `limit`.
    async fn search_text(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<TextMatch>, EntryRepositoryError>;

    /// Find located entries within `radius_metres` of `origin`, nearest
    /// first, at most `limit`. Entries without a location never appear.
    async fn find_near(
        &self,
        origin: GeoPoint,
        radius_metres: f64,
        limit: usize,
    ) -> Result<Vec<NearbyEntry>, EntryRepositoryError>;

    /// List entries carrying `tag`, or every entry when no tag is given, in
    /// insertion order.
    async fn entries_with_tag(
        &self,
        tag: Option<String>,
    ) -> Result<Vec<CatalogEntry>, EntryRepositoryError>;

    /// The catalog-wide tag histogram, descending by count with ties broken
    /// by tag.
    async fn tag_counts(&self) -> Result<Vec<TagCount>, EntryRepositoryError>;

    /// One window of the newest-first listing, with the catalog total.
    async fn list_page(&self, offset: u64, limit: u64)
    -> Result<EntryPage, EntryRepositoryError>;
}

/// Fixture implementation for tests that do not exercise entry storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEntryRepository;

#[async_trait]
impl EntryRepository for FixtureEntryRepository {
    async fn insert(&self, new: NewCatalogEntry) -> Result<CatalogEntry, EntryRepositoryError> {
        Ok(CatalogEntry::from_parts(EntryId::random(), new))
    }

    async fn update(&self, entry: CatalogEntry) -> Result<CatalogEntry, EntryRepositoryError> {
        Ok(entry)
    }

    async fn find_by_id(
        &self,
        _id: EntryId,
    ) -> Result<Option<CatalogEntry>, EntryRepositoryError> {
        Ok(None)
    }

    async fn find_by_slug(
        &self,
        _slug: &Slug,
    ) -> Result<Option<CatalogEntry>, EntryRepositoryError> {
        Ok(None)
    }

    async fn slugs_in_family(&self, _base: &Slug) -> Result<Vec<Slug>, EntryRepositoryError> {
        Ok(Vec::new())
    }

    async fn search_text(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<TextMatch>, EntryRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_near(
        &self,
        _origin: GeoPoint,
        _radius_metres: f64,
        _limit: usize,
    ) -> Result<Vec<NearbyEntry>, EntryRepositoryError> {
        Ok(Vec::new())
    }

    async fn entries_with_tag(
        &self,
        _tag: Option<String>,
    ) -> Result<Vec<CatalogEntry>, EntryRepositoryError> {
        Ok(Vec::new())
    }

    async fn tag_counts(&self) -> Result<Vec<TagCount>, EntryRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_page(
        &self,
        _offset: u64,
        _limit: u64,
    ) -> Result<EntryPage, EntryRepositoryError> {
        Ok(EntryPage {
            entries: Vec::new(),
            total: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{EntryContent, EntryContentDraft, UserId};

    fn build_new_entry(name: &str) -> NewCatalogEntry {
        let content = EntryContent::new(EntryContentDraft {
            name: name.to_owned(),
            ..EntryContentDraft::default()
        })
        .expect("valid content");
        let slug = content.base_slug().clone();
        NewCatalogEntry::new(content, slug, UserId::random(), Utc::now())
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_insert_materialises_the_entry() {
        let repo = FixtureEntryRepository;
        let stored = repo
            .insert(build_new_entry("Pickled Fox"))
            .await
            .expect("fixture insert succeeds");
        assert_eq!(stored.name(), "Pickled Fox");
        assert_eq!(stored.slug().as_str(), "pickled-fox");
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_return_nothing() {
        let repo = FixtureEntryRepository;
        let by_slug = repo
            .find_by_slug(&Slug::parse("pickled-fox").expect("valid slug"))
            .await
            .expect("fixture lookup succeeds");
        assert!(by_slug.is_none());

        let page = repo
            .list_page(0, 4)
            .await
            .expect("fixture page succeeds");
        assert!(page.entries.is_empty());
        assert_eq!(page.total, 0);
    }

    #[rstest]
    fn slug_taken_formats_the_slug() {
        let err = EntryRepositoryError::slug_taken(Slug::parse("cafe-2").expect("valid slug"));
        assert_eq!(err.to_string(), "slug 'cafe-2' is already taken");
        assert!(!err.is_unavailable());
    }

    #[rstest]
    fn unavailable_is_flagged_for_retry() {
        let err = EntryRepositoryError::unavailable("connection refused");
        assert!(err.is_unavailable());
    }
}
