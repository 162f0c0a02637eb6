//! Shared state behind the in-memory catalog store.
//!
//! All index maintenance happens here, under the caller's lock: the slug
//! BTree, the inverted text index, the geo grid, tag occurrence buckets, and
//! the creation-order index are updated together so every read view stays
//! consistent with the entries map.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::domain::ports::{EntryPage, EntryRepositoryError, NearbyEntry, TagCount, TextMatch};
use crate::domain::{
    CatalogEntry, EntryId, GeoPoint, NewCatalogEntry, NewReview, Review, ReviewId, Slug,
    TextSearchWeights,
};

use super::geo_grid::GeoGrid;
use super::memory_entry_repository::MemoryEntryRepository;
use super::memory_review_repository::MemoryReviewRepository;
use super::text_index::TextIndex;

/// Handle to one in-memory catalog store.
///
/// Clones share the same state; repositories created from any clone observe
/// the same entries, reviews, and indexes.
#[derive(Clone)]
pub struct MemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl MemoryCatalog {
    /// Create an empty store with the default text search weights.
    #[must_use]
    pub fn new() -> Self {
        Self::with_weights(TextSearchWeights::default())
    }

    /// Create an empty store scoring text matches with `weights`.
    #[must_use]
    pub fn with_weights(weights: TextSearchWeights) -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState::new(weights))),
        }
    }

    /// An entry repository handle over this store.
    #[must_use]
    pub fn entry_repository(&self) -> MemoryEntryRepository {
        MemoryEntryRepository::new(Arc::clone(&self.state))
    }

    /// A review repository handle over this store.
    #[must_use]
    pub fn review_repository(&self) -> MemoryReviewRepository {
        MemoryReviewRepository::new(Arc::clone(&self.state))
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct TagBucket {
    /// Occurrences across all entries, counting duplicates within an entry.
    count: u64,
    /// Sequence numbers of entries carrying the tag at least once.
    members: BTreeSet<u64>,
}

/// Entries, reviews, and the indexes over them.
///
/// Entries are keyed by an insertion sequence number; sequence order is the
/// store's insertion order everywhere a view asks for it.
pub(super) struct CatalogState {
    entries: BTreeMap<u64, CatalogEntry>,
    ids: HashMap<EntryId, u64>,
    slugs: BTreeMap<Slug, u64>,
    created: BTreeSet<(i64, u64)>,
    tags: BTreeMap<String, TagBucket>,
    text: TextIndex,
    geo: GeoGrid,
    next_seq: u64,
    reviews: BTreeMap<u64, Review>,
    reviews_by_entry: HashMap<EntryId, Vec<u64>>,
    next_review_seq: u64,
}

impl CatalogState {
    fn new(weights: TextSearchWeights) -> Self {
        Self {
            entries: BTreeMap::new(),
            ids: HashMap::new(),
            slugs: BTreeMap::new(),
            created: BTreeSet::new(),
            tags: BTreeMap::new(),
            text: TextIndex::new(weights),
            geo: GeoGrid::new(),
            next_seq: 0,
            reviews: BTreeMap::new(),
            reviews_by_entry: HashMap::new(),
            next_review_seq: 0,
        }
    }

    pub(super) fn insert_entry(
        &mut self,
        new: NewCatalogEntry,
    ) -> Result<CatalogEntry, EntryRepositoryError> {
        if self.slugs.contains_key(new.slug()) {
            return Err(EntryRepositoryError::slug_taken(new.slug().clone()));
        }
        let entry = CatalogEntry::from_parts(EntryId::random(), new);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index_entry(seq, &entry);
        self.entries.insert(seq, entry.clone());
        Ok(entry)
    }

    pub(super) fn update_entry(
        &mut self,
        entry: CatalogEntry,
    ) -> Result<CatalogEntry, EntryRepositoryError> {
        let seq = *self
            .ids
            .get(&entry.id())
            .ok_or_else(|| EntryRepositoryError::missing(entry.id()))?;
        if let Some(&owner) = self.slugs.get(entry.slug()) {
            if owner != seq {
                return Err(EntryRepositoryError::slug_taken(entry.slug().clone()));
            }
        }
        let old = self
            .entries
            .get(&seq)
            .cloned()
            .ok_or_else(|| EntryRepositoryError::missing(entry.id()))?;
        self.unindex_entry(seq, &old);
        self.index_entry(seq, &entry);
        self.entries.insert(seq, entry.clone());
        Ok(entry)
    }

    pub(super) fn find_by_id(&self, id: EntryId) -> Option<CatalogEntry> {
        self.ids
            .get(&id)
            .and_then(|seq| self.entries.get(seq))
            .cloned()
    }

    pub(super) fn find_by_slug(&self, slug: &Slug) -> Option<CatalogEntry> {
        self.slugs
            .get(slug)
            .and_then(|seq| self.entries.get(seq))
            .cloned()
    }

    /// Range-scan the slug BTree for the family of `base`.
    ///
    /// Every family member shares the base as a prefix, so the scan starts at
    /// the base and stops at the first key not carrying it; the family
    /// predicate then drops prefix neighbours like `cafe-bar` or `cafeteria`.
    pub(super) fn slugs_in_family(&self, base: &Slug) -> Vec<Slug> {
        use std::ops::Bound;

        self.slugs
            .range::<str, _>((Bound::Included(base.as_str()), Bound::Unbounded))
            .take_while(|(slug, _)| slug.as_str().starts_with(base.as_str()))
            .filter(|(slug, _)| slug.is_family_member(base))
            .map(|(slug, _)| slug.clone())
            .collect()
    }

    pub(super) fn search_text(&self, query: &str, limit: usize) -> Vec<TextMatch> {
        self.text
            .search(query)
            .into_iter()
            .take(limit)
            .filter_map(|(seq, score)| {
                self.entries.get(&seq).map(|entry| TextMatch {
                    entry: entry.clone(),
                    score,
                })
            })
            .collect()
    }

    pub(super) fn find_near(
        &self,
        origin: GeoPoint,
        radius_metres: f64,
        limit: usize,
    ) -> Vec<NearbyEntry> {
        let mut hits: Vec<(u64, f64)> = self
            .geo
            .candidates(origin, radius_metres)
            .into_iter()
            .filter_map(|(seq, point)| {
                let distance = origin.distance_metres(&point);
                (distance <= radius_metres).then_some((seq, distance))
            })
            .collect();
        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        hits.truncate(limit);
        hits.into_iter()
            .filter_map(|(seq, distance_metres)| {
                self.entries.get(&seq).map(|entry| NearbyEntry {
                    entry: entry.clone(),
                    distance_metres,
                })
            })
            .collect()
    }

    pub(super) fn entries_with_tag(&self, tag: Option<&str>) -> Vec<CatalogEntry> {
        match tag {
            None => self.entries.values().cloned().collect(),
            Some(tag) => self
                .tags
                .get(tag)
                .map(|bucket| {
                    bucket
                        .members
                        .iter()
                        .filter_map(|seq| self.entries.get(seq))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub(super) fn tag_counts(&self) -> Vec<TagCount> {
        let mut counts: Vec<TagCount> = self
            .tags
            .iter()
            .map(|(tag, bucket)| TagCount {
                tag: tag.clone(),
                count: bucket.count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        counts
    }

    pub(super) fn list_page(&self, offset: u64, limit: u64) -> EntryPage {
        let total = self.entries.len() as u64;
        let entries = self
            .created
            .iter()
            .rev()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .filter_map(|(_, seq)| self.entries.get(seq))
            .cloned()
            .collect();
        EntryPage { entries, total }
    }

    pub(super) fn insert_review(&mut self, new: NewReview) -> Review {
        let review = Review::from_parts(ReviewId::random(), new);
        let seq = self.next_review_seq;
        self.next_review_seq += 1;
        self.reviews_by_entry
            .entry(review.entry_id())
            .or_default()
            .push(seq);
        self.reviews.insert(seq, review.clone());
        review
    }

    pub(super) fn reviews_for(&self, entry_id: EntryId) -> Vec<Review> {
        self.reviews_by_entry
            .get(&entry_id)
            .map(|seqs| {
                seqs.iter()
                    .filter_map(|seq| self.reviews.get(seq))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(super) fn reviews_for_many(&self, entry_ids: &[EntryId]) -> Vec<Review> {
        entry_ids
            .iter()
            .flat_map(|entry_id| self.reviews_for(*entry_id))
            .collect()
    }

    fn index_entry(&mut self, seq: u64, entry: &CatalogEntry) {
        self.ids.insert(entry.id(), seq);
        self.slugs.insert(entry.slug().clone(), seq);
        self.created
            .insert((entry.created_at().timestamp_micros(), seq));
        for tag in entry.tags() {
            let bucket = self.tags.entry(tag.clone()).or_default();
            bucket.count += 1;
            bucket.members.insert(seq);
        }
        self.text.index(seq, entry.name(), entry.description());
        if let Some(location) = entry.location() {
            self.geo.insert(seq, location.point());
        }
    }

    /// Drop the content projections of `old`.
    ///
    /// Identity and creation order survive updates, so `ids` and `created`
    /// are left alone; re-indexing overwrites them with identical values.
    fn unindex_entry(&mut self, seq: u64, old: &CatalogEntry) {
        self.slugs.remove(old.slug());
        for tag in old.tags() {
            let drained = match self.tags.get_mut(tag) {
                Some(bucket) => {
                    bucket.count = bucket.count.saturating_sub(1);
                    bucket.members.remove(&seq);
                    bucket.count == 0
                }
                None => false,
            };
            if drained {
                self.tags.remove(tag);
            }
        }
        self.text.remove(seq, old.name(), old.description());
        if let Some(location) = old.location() {
            self.geo.remove(seq, location.point());
        }
    }
}
