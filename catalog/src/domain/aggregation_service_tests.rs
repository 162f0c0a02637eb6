//! Tests for the catalog query service.

use chrono::{DateTime, TimeZone, Utc};
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    EntryPage, EntryRepositoryError, MockEntryRepository, MockReviewRepository, NearbyEntry,
    TagCount, TextMatch,
};
use crate::domain::{
    CatalogEnv, EntryContent, EntryContentDraft, ErrorCode, LocationDraft, NewCatalogEntry,
    NewReview, NewReviewDraft, ReviewId, UserId,
    config::{CATALOG_TEXT_RESULT_CAP_ENV, CATALOG_TOP_RATED_LIMIT_ENV},
};

struct FakeEnv(HashMap<&'static str, &'static str>);

impl CatalogEnv for FakeEnv {
    fn string(&self, name: &str) -> Option<String> {
        self.0.get(name).map(|value| (*value).to_owned())
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn stored_entry(name: &str, assigned_slug: &str) -> CatalogEntry {
    entry_from_draft(
        assigned_slug,
        EntryContentDraft {
            name: name.to_owned(),
            description: Some("A dependable plate.".to_owned()),
            tags: vec!["Open Late".to_owned()],
            ..EntryContentDraft::default()
        },
    )
}

fn located_entry(name: &str, assigned_slug: &str, longitude: f64, latitude: f64) -> CatalogEntry {
    entry_from_draft(
        assigned_slug,
        EntryContentDraft {
            name: name.to_owned(),
            location: Some(LocationDraft {
                longitude,
                latitude,
                address: "12 Riverside Walk, London".to_owned(),
            }),
            ..EntryContentDraft::default()
        },
    )
}

fn entry_from_draft(assigned_slug: &str, draft: EntryContentDraft) -> CatalogEntry {
    let content = EntryContent::new(draft).expect("valid content");
    CatalogEntry::from_parts(
        EntryId::random(),
        NewCatalogEntry::new(
            content,
            Slug::parse(assigned_slug).expect("valid slug"),
            UserId::random(),
            fixture_timestamp(),
        ),
    )
}

fn review_for(entry_id: EntryId, rating: Option<u8>) -> Review {
    let new = NewReview::new(NewReviewDraft {
        entry_id,
        author_id: UserId::random(),
        text: "Solid plates all round.".to_owned(),
        rating,
        created_at: fixture_timestamp(),
    })
    .expect("valid review");
    Review::from_parts(ReviewId::random(), new)
}

fn violation_fields(error: &Error) -> Vec<String> {
    error
        .details()
        .and_then(|details| details["violations"].as_array().cloned())
        .unwrap_or_default()
        .iter()
        .filter_map(|violation| violation["field"].as_str().map(str::to_owned))
        .collect()
}

fn make_service(
    entry_repo: MockEntryRepository,
    review_repo: MockReviewRepository,
) -> CatalogQueryService<MockEntryRepository, MockReviewRepository> {
    make_service_with_limits(entry_repo, review_repo, QueryLimits::default())
}

fn make_service_with_limits(
    entry_repo: MockEntryRepository,
    review_repo: MockReviewRepository,
    limits: QueryLimits,
) -> CatalogQueryService<MockEntryRepository, MockReviewRepository> {
    CatalogQueryService::new(Arc::new(entry_repo), Arc::new(review_repo), limits)
}

#[tokio::test]
async fn search_entries_trims_the_query_and_applies_the_default_cap() {
    let entry = stored_entry("Smoked Beet Shack", "smoked-beet-shack");
    let hit = TextMatch {
        entry: entry.clone(),
        score: 2.0,
    };
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_search_text()
        .withf(|query, limit| query == "smoked beets" && *limit == 5)
        .times(1)
        .return_once(move |_, _| Ok(vec![hit]));

    let service = make_service(entry_repo, MockReviewRepository::new());
    let response = service
        .search_entries(SearchEntriesRequest {
            query: "  smoked beets  ".to_owned(),
        })
        .await
        .expect("search succeeds");

    assert_eq!(response.matches.len(), 1);
    assert_eq!(response.matches[0].entry.id(), entry.id());
}

#[tokio::test]
async fn search_entries_answers_a_blank_query_without_touching_the_store() {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo.expect_search_text().times(0);

    let service = make_service(entry_repo, MockReviewRepository::new());
    let response = service
        .search_entries(SearchEntriesRequest {
            query: "   ".to_owned(),
        })
        .await
        .expect("blank query succeeds");

    assert!(response.matches.is_empty());
}

#[tokio::test]
async fn search_entries_honours_a_configured_result_cap() {
    let limits = QueryLimits::from_env_with(&FakeEnv(HashMap::from([(
        CATALOG_TEXT_RESULT_CAP_ENV,
        "2",
    )])));
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_search_text()
        .withf(|_, limit| *limit == 2)
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let service = make_service_with_limits(entry_repo, MockReviewRepository::new(), limits);
    service
        .search_entries(SearchEntriesRequest {
            query: "beets".to_owned(),
        })
        .await
        .expect("search succeeds");
}

#[tokio::test]
async fn search_entries_retries_once_when_the_store_is_unreachable() {
    let mut seq = mockall::Sequence::new();
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_search_text()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_, _| Err(EntryRepositoryError::unavailable("connection reset")));
    entry_repo
        .expect_search_text()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_, _| Ok(Vec::new()));

    let service = make_service(entry_repo, MockReviewRepository::new());
    let response = service
        .search_entries(SearchEntriesRequest {
            query: "beets".to_owned(),
        })
        .await
        .expect("retried read succeeds");

    assert!(response.matches.is_empty());
}

#[tokio::test]
async fn search_entries_gives_up_after_a_second_store_failure() {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_search_text()
        .times(2)
        .returning(|_, _| Err(EntryRepositoryError::unavailable("connection reset")));

    let service = make_service(entry_repo, MockReviewRepository::new());
    let error = service
        .search_entries(SearchEntriesRequest {
            query: "beets".to_owned(),
        })
        .await
        .expect_err("second failure surfaces");

    assert_eq!(error.code(), ErrorCode::StoreUnavailable);
}

#[tokio::test]
async fn search_entries_does_not_retry_a_query_failure() {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_search_text()
        .times(1)
        .return_once(|_, _| Err(EntryRepositoryError::query("malformed index")));

    let service = make_service(entry_repo, MockReviewRepository::new());
    let error = service
        .search_entries(SearchEntriesRequest {
            query: "beets".to_owned(),
        })
        .await
        .expect_err("query failure surfaces");

    assert_eq!(error.code(), ErrorCode::Internal);
}

#[tokio::test]
async fn nearby_entries_applies_the_default_radius_and_cap() {
    let entry = located_entry("The Brined Anchor", "the-brined-anchor", -0.0910, 51.5055);
    let hit = NearbyEntry {
        entry,
        distance_metres: 120.0,
    };
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_find_near()
        .withf(|origin, radius, limit| {
            origin.longitude() == -0.09
                && origin.latitude() == 51.505
                && *radius == 16_093.0
                && *limit == 10
        })
        .times(1)
        .return_once(move |_, _, _| Ok(vec![hit]));

    let service = make_service(entry_repo, MockReviewRepository::new());
    let response = service
        .nearby_entries(NearbyEntriesRequest {
            longitude: -0.09,
            latitude: 51.505,
            max_distance_metres: None,
        })
        .await
        .expect("proximity search succeeds");

    assert_eq!(response.entries.len(), 1);
    assert_eq!(response.entries[0].distance_metres, 120.0);
}

#[rstest]
#[case(-183.0, 51.0, "longitude")]
#[case(-0.09, 123.0, "latitude")]
#[tokio::test]
async fn nearby_entries_rejects_out_of_range_coordinates(
    #[case] longitude: f64,
    #[case] latitude: f64,
    #[case] field: &str,
) {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo.expect_find_near().times(0);

    let service = make_service(entry_repo, MockReviewRepository::new());
    let error = service
        .nearby_entries(NearbyEntriesRequest {
            longitude,
            latitude,
            max_distance_metres: None,
        })
        .await
        .expect_err("coordinates rejected");

    assert_eq!(error.code(), ErrorCode::Validation);
    assert_eq!(violation_fields(&error), [field]);
}

#[rstest]
#[case(0.0)]
#[case(-250.0)]
#[case(f64::NAN)]
#[tokio::test]
async fn nearby_entries_rejects_a_non_positive_radius(#[case] radius: f64) {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo.expect_find_near().times(0);

    let service = make_service(entry_repo, MockReviewRepository::new());
    let error = service
        .nearby_entries(NearbyEntriesRequest {
            longitude: -0.09,
            latitude: 51.505,
            max_distance_metres: Some(radius),
        })
        .await
        .expect_err("radius rejected");

    assert_eq!(error.code(), ErrorCode::Validation);
    assert_eq!(violation_fields(&error), ["maxDistanceMetres"]);
}

#[tokio::test]
async fn tag_view_pairs_the_histogram_with_the_filtered_entries() {
    let entry = stored_entry("Pickled Fox", "pickled-fox");
    let filtered = vec![entry.clone()];
    let mut entry_repo = MockEntryRepository::new();
    entry_repo.expect_tag_counts().times(1).return_once(|| {
        Ok(vec![
            TagCount {
                tag: "Wifi".to_owned(),
                count: 3,
            },
            TagCount {
                tag: "Open Late".to_owned(),
                count: 1,
            },
        ])
    });
    entry_repo
        .expect_entries_with_tag()
        .withf(|tag| tag.as_deref() == Some("Wifi"))
        .times(1)
        .return_once(move |_| Ok(filtered));

    let service = make_service(entry_repo, MockReviewRepository::new());
    let response = service
        .tag_view(TagViewRequest {
            tag: Some("Wifi".to_owned()),
        })
        .await
        .expect("tag view succeeds");

    assert_eq!(response.counts.len(), 2);
    assert_eq!(response.counts[0].tag, "Wifi");
    assert_eq!(response.entries.len(), 1);
    assert_eq!(response.entries[0].id(), entry.id());
    assert_eq!(response.active_tag.as_deref(), Some("Wifi"));
}

#[tokio::test]
async fn tag_view_surfaces_a_histogram_store_failure() {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_tag_counts()
        .times(2)
        .returning(|| Err(EntryRepositoryError::unavailable("connection reset")));
    entry_repo
        .expect_entries_with_tag()
        .returning(|_| Ok(Vec::new()));

    let service = make_service(entry_repo, MockReviewRepository::new());
    let error = service
        .tag_view(TagViewRequest::default())
        .await
        .expect_err("store failure surfaces");

    assert_eq!(error.code(), ErrorCode::StoreUnavailable);
}

#[tokio::test]
async fn top_rated_ranks_by_mean_rating_with_unrated_entries_last() {
    let first = stored_entry("Ember Flats", "ember-flats");
    let second = stored_entry("Pickled Fox", "pickled-fox");
    let unrated = stored_entry("Cardamom Yard", "cardamom-yard");
    let sparse = stored_entry("The Brined Anchor", "the-brined-anchor");

    let reviews = vec![
        review_for(second.id(), Some(3)),
        review_for(second.id(), Some(3)),
        review_for(first.id(), Some(5)),
        review_for(first.id(), Some(4)),
        review_for(unrated.id(), None),
        review_for(unrated.id(), None),
        review_for(sparse.id(), Some(5)),
    ];
    let listed = vec![
        second.clone(),
        first.clone(),
        unrated.clone(),
        sparse.clone(),
    ];

    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_entries_with_tag()
        .withf(Option::is_none)
        .times(1)
        .return_once(move |_| Ok(listed));
    let mut review_repo = MockReviewRepository::new();
    review_repo
        .expect_find_by_entries()
        .withf(|ids| ids.len() == 4)
        .times(1)
        .return_once(move |_| Ok(reviews));

    let service = make_service(entry_repo, review_repo);
    let response = service.top_rated().await.expect("ranking succeeds");

    let ids: Vec<EntryId> = response.entries.iter().map(|ranked| ranked.id).collect();
    assert_eq!(ids, [first.id(), second.id(), unrated.id()]);
    assert_eq!(response.entries[0].average_rating, Some(4.5));
    assert_eq!(response.entries[1].average_rating, Some(3.0));
    assert_eq!(response.entries[2].average_rating, None);
    assert_eq!(response.entries[2].review_count, 2);
}

#[tokio::test]
async fn top_rated_averages_only_the_rated_reviews() {
    let entry = stored_entry("Pickled Fox", "pickled-fox");
    let reviews = vec![
        review_for(entry.id(), Some(5)),
        review_for(entry.id(), None),
        review_for(entry.id(), None),
    ];
    let listed = vec![entry.clone()];

    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_entries_with_tag()
        .times(1)
        .return_once(move |_| Ok(listed));
    let mut review_repo = MockReviewRepository::new();
    review_repo
        .expect_find_by_entries()
        .times(1)
        .return_once(move |_| Ok(reviews));

    let service = make_service(entry_repo, review_repo);
    let response = service.top_rated().await.expect("ranking succeeds");

    assert_eq!(response.entries.len(), 1);
    assert_eq!(response.entries[0].average_rating, Some(5.0));
    assert_eq!(response.entries[0].review_count, 3);
}

#[tokio::test]
async fn top_rated_keeps_tied_entries_in_insertion_order() {
    let first = stored_entry("Ember Flats", "ember-flats");
    let second = stored_entry("Pickled Fox", "pickled-fox");
    let reviews = vec![
        review_for(first.id(), Some(4)),
        review_for(first.id(), Some(4)),
        review_for(second.id(), Some(5)),
        review_for(second.id(), Some(3)),
    ];
    let listed = vec![first.clone(), second.clone()];

    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_entries_with_tag()
        .times(1)
        .return_once(move |_| Ok(listed));
    let mut review_repo = MockReviewRepository::new();
    review_repo
        .expect_find_by_entries()
        .times(1)
        .return_once(move |_| Ok(reviews));

    let service = make_service(entry_repo, review_repo);
    let response = service.top_rated().await.expect("ranking succeeds");

    let ids: Vec<EntryId> = response.entries.iter().map(|ranked| ranked.id).collect();
    assert_eq!(ids, [first.id(), second.id()]);
}

#[tokio::test]
async fn top_rated_truncates_to_the_configured_limit() {
    let limits = QueryLimits::from_env_with(&FakeEnv(HashMap::from([(
        CATALOG_TOP_RATED_LIMIT_ENV,
        "1",
    )])));
    let better = stored_entry("Ember Flats", "ember-flats");
    let worse = stored_entry("Pickled Fox", "pickled-fox");
    let reviews = vec![
        review_for(worse.id(), Some(4)),
        review_for(worse.id(), Some(4)),
        review_for(better.id(), Some(5)),
        review_for(better.id(), Some(5)),
    ];
    let listed = vec![worse.clone(), better.clone()];

    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_entries_with_tag()
        .times(1)
        .return_once(move |_| Ok(listed));
    let mut review_repo = MockReviewRepository::new();
    review_repo
        .expect_find_by_entries()
        .times(1)
        .return_once(move |_| Ok(reviews));

    let service = make_service_with_limits(entry_repo, review_repo, limits);
    let response = service.top_rated().await.expect("ranking succeeds");

    let ids: Vec<EntryId> = response.entries.iter().map(|ranked| ranked.id).collect();
    assert_eq!(ids, [better.id()]);
}

#[tokio::test]
async fn entry_detail_joins_the_entry_with_its_reviews() {
    let entry = stored_entry("Pickled Fox", "pickled-fox");
    let entry_id = entry.id();
    let review = review_for(entry_id, Some(4));

    let mut entry_repo = MockEntryRepository::new();
    let found = entry.clone();
    entry_repo
        .expect_find_by_slug()
        .withf(|slug| slug.as_str() == "pickled-fox")
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    let mut review_repo = MockReviewRepository::new();
    let joined = vec![review.clone()];
    review_repo
        .expect_find_by_entry()
        .withf(move |id| *id == entry_id)
        .times(1)
        .return_once(move |_| Ok(joined));

    let service = make_service(entry_repo, review_repo);
    let response = service
        .entry_detail(EntryDetailRequest {
            slug: "pickled-fox".to_owned(),
        })
        .await
        .expect("detail succeeds");

    assert_eq!(response.entry.id(), entry_id);
    assert_eq!(response.reviews, [review]);
}

#[tokio::test]
async fn entry_detail_reports_an_unknown_slug() {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_find_by_slug()
        .times(1)
        .return_once(|_| Ok(None));

    let service = make_service(entry_repo, MockReviewRepository::new());
    let error = service
        .entry_detail(EntryDetailRequest {
            slug: "lost-fox".to_owned(),
        })
        .await
        .expect_err("unknown slug");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "no catalog entry with slug 'lost-fox'");
}

#[tokio::test]
async fn entry_detail_rejects_a_malformed_slug_without_touching_the_store() {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo.expect_find_by_slug().times(0);

    let service = make_service(entry_repo, MockReviewRepository::new());
    let error = service
        .entry_detail(EntryDetailRequest {
            slug: "Pickled Fox!".to_owned(),
        })
        .await
        .expect_err("malformed slug");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn list_entries_fetches_the_requested_window() {
    let entry = stored_entry("Pickled Fox", "pickled-fox");
    let window = vec![entry.clone()];
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_list_page()
        .withf(|offset, limit| *offset == 3 && *limit == 3)
        .times(1)
        .return_once(move |_, _| {
            Ok(EntryPage {
                entries: window,
                total: 7,
            })
        });

    let service = make_service(entry_repo, MockReviewRepository::new());
    let response = service
        .list_entries(ListEntriesRequest {
            page: Some(2),
            per_page: Some(3),
        })
        .await
        .expect("listing succeeds");

    let info = response.entries.page_info;
    assert_eq!(info.page, 2);
    assert_eq!(info.per_page, 3);
    assert_eq!(info.total_items, 7);
    assert_eq!(info.total_pages, 3);
    assert_eq!(info.redirected_from, None);
    assert_eq!(response.entries.items, [entry]);
}

#[tokio::test]
async fn list_entries_defaults_to_the_first_page_of_four() {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_list_page()
        .withf(|offset, limit| *offset == 0 && *limit == 4)
        .times(1)
        .return_once(|_, _| {
            Ok(EntryPage {
                entries: Vec::new(),
                total: 0,
            })
        });

    let service = make_service(entry_repo, MockReviewRepository::new());
    let response = service
        .list_entries(ListEntriesRequest::default())
        .await
        .expect("listing succeeds");

    assert!(response.entries.items.is_empty());
    assert_eq!(response.entries.page_info.total_items, 0);
    assert_eq!(response.entries.page_info.total_pages, 0);
}

#[tokio::test]
async fn list_entries_clamps_a_page_beyond_the_end() {
    let newest = stored_entry("Ember Flats", "ember-flats");
    let oldest = stored_entry("Pickled Fox", "pickled-fox");
    let last_window = vec![newest.clone(), oldest.clone()];

    let mut seq = mockall::Sequence::new();
    let mut entry_repo = MockEntryRepository::new();
    entry_repo
        .expect_list_page()
        .withf(|offset, limit| *offset == 32 && *limit == 4)
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_, _| {
            Ok(EntryPage {
                entries: Vec::new(),
                total: 10,
            })
        });
    entry_repo
        .expect_list_page()
        .withf(|offset, limit| *offset == 8 && *limit == 4)
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_, _| {
            Ok(EntryPage {
                entries: last_window,
                total: 10,
            })
        });

    let service = make_service(entry_repo, MockReviewRepository::new());
    let response = service
        .list_entries(ListEntriesRequest {
            page: Some(9),
            per_page: Some(4),
        })
        .await
        .expect("clamped listing succeeds");

    let info = response.entries.page_info;
    assert_eq!(info.page, 3);
    assert_eq!(info.total_pages, 3);
    assert_eq!(info.redirected_from, Some(9));
    assert_eq!(response.entries.items.len(), 2);
}

#[rstest]
#[case(Some(0), None, "page")]
#[case(None, Some(0), "perPage")]
#[tokio::test]
async fn list_entries_rejects_zero_paging_values(
    #[case] page: Option<u64>,
    #[case] per_page: Option<u64>,
    #[case] field: &str,
) {
    let mut entry_repo = MockEntryRepository::new();
    entry_repo.expect_list_page().times(0);

    let service = make_service(entry_repo, MockReviewRepository::new());
    let error = service
        .list_entries(ListEntriesRequest { page, per_page })
        .await
        .expect_err("zero paging value rejected");

    assert_eq!(error.code(), ErrorCode::Validation);
    assert_eq!(violation_fields(&error), [field]);
}
