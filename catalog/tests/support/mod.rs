//! Shared harness for catalog integration tests.
//!
//! Integration tests compile as separate crates under `catalog/tests/`, so
//! this module gives them one place to build the command and query services
//! over a single in-memory store, plus helpers for turning generated example
//! data into stored entries.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use catalog::domain::ports::{AddReviewRequest, CatalogCommand, CreateEntryRequest};
use catalog::domain::{
    CatalogCommandService, CatalogEntry, CatalogQueryService, EntryContentDraft, LocationDraft,
    QueryLimits, UserId,
};
use catalog::outbound::persistence::{MemoryCatalog, MemoryEntryRepository, MemoryReviewRepository};
use chrono::{Duration, TimeZone, Utc};
use example_data::EntrySeed;
use mockable::{Clock, MockClock};

/// Both catalog services wired over one shared in-memory store.
pub struct Harness {
    pub commands: CatalogCommandService<MemoryEntryRepository, MemoryReviewRepository>,
    pub queries: CatalogQueryService<MemoryEntryRepository, MemoryReviewRepository>,
}

/// Build the services over a fresh store with the default query limits.
///
/// The command service's clock advances by one second per reading, so every
/// stored entry and review carries a distinct `created_at` and newest-first
/// assertions do not depend on wall-clock resolution.
pub fn harness() -> Harness {
    let store = MemoryCatalog::new();
    let entry_repo = Arc::new(store.entry_repository());
    let review_repo = Arc::new(store.review_repository());
    let commands = CatalogCommandService::new(
        Arc::clone(&entry_repo),
        Arc::clone(&review_repo),
        stepping_clock(),
    );
    let queries = CatalogQueryService::new(entry_repo, review_repo, QueryLimits::default());
    Harness { commands, queries }
}

fn stepping_clock() -> Arc<dyn Clock> {
    let start = Utc
        .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    let ticks = AtomicI64::new(0);
    let mut clock = MockClock::new();
    clock.expect_utc().returning(move || {
        let step = ticks.fetch_add(1, Ordering::SeqCst);
        start + Duration::seconds(step)
    });
    Arc::new(clock)
}

// Used by a subset of integration-test crates.
/// A minimal valid draft for tests that only care about the entry name.
#[allow(dead_code)]
pub fn draft(name: &str) -> EntryContentDraft {
    EntryContentDraft {
        name: name.to_owned(),
        description: None,
        tags: Vec::new(),
        location: None,
        photo_ref: None,
    }
}

// Used by a subset of integration-test crates.
/// Map one generated seed onto the draft the command port accepts.
#[allow(dead_code)]
pub fn draft_from_seed(seed: &EntrySeed) -> EntryContentDraft {
    EntryContentDraft {
        name: seed.name.clone(),
        description: seed.description.clone(),
        tags: seed.tags.clone(),
        location: seed.location.as_ref().map(|location| LocationDraft {
            longitude: location.longitude,
            latitude: location.latitude,
            address: location.address.clone(),
        }),
        photo_ref: seed.photo_ref.clone(),
    }
}

// Used by a subset of integration-test crates.
/// Store every seed through the command port, reviews included.
///
/// Entries are created in seed order, so the newest-first listing serves the
/// last seed first. Returns the stored entries in creation order.
#[allow(dead_code)]
pub async fn replay_seeds(harness: &Harness, seeds: &[EntrySeed]) -> Vec<CatalogEntry> {
    let mut created = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let response = harness
            .commands
            .create_entry(CreateEntryRequest {
                author_id: UserId::new(seed.author_id),
                content: draft_from_seed(seed),
            })
            .await
            .expect("seed entry stores");
        for review in &seed.reviews {
            harness
                .commands
                .add_review(AddReviewRequest {
                    entry_id: response.entry.id(),
                    author_id: UserId::new(review.author_id),
                    text: review.text.clone(),
                    rating: review.rating,
                })
                .await
                .expect("seed review stores");
        }
        created.push(response.entry);
    }
    created
}
