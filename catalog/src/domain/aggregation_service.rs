//! Catalog read-path domain service.
//!
//! Implements the query driving port: text search, proximity search, the
//! tag histogram view, the top-rated ranking, entry detail, and the
//! newest-first listing. Store reads that fail because the store was
//! unreachable are retried once before the failure surfaces.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::try_join;
use pagination::{PageInfo, PagePlan, PageRequest, PageRequestError, Paged};

use crate::domain::ports::{
    CatalogQuery, EntryDetailRequest, EntryDetailResponse, EntryRepository, ListEntriesRequest,
    ListEntriesResponse, NearbyEntriesRequest, NearbyEntriesResponse, ReviewRepository,
    SearchEntriesRequest, SearchEntriesResponse, TagViewRequest, TagViewResponse, TopRatedEntry,
    TopRatedResponse,
};
use crate::domain::{
    CatalogEntry, EntryId, Error, FieldViolation, GeoPoint, GeoValidationError, QueryLimits,
    Review, Slug,
};

use super::repository_errors::{map_entry_repository_error, map_review_repository_error};

/// Evaluate a store read, repeating it once when the store was unreachable.
macro_rules! retry_once {
    ($call:expr) => {
        match $call {
            Err(error) if error.is_unavailable() => {
                tracing::warn!(error = %error, "store unreachable, retrying read once");
                $call
            }
            result => result,
        }
    };
}

/// Catalog service implementing the query driving port.
#[derive(Clone)]
pub struct CatalogQueryService<E, R> {
    entry_repo: Arc<E>,
    review_repo: Arc<R>,
    limits: QueryLimits,
}

impl<E, R> CatalogQueryService<E, R> {
    /// Create a new query service over the entry and review stores.
    pub fn new(entry_repo: Arc<E>, review_repo: Arc<R>, limits: QueryLimits) -> Self {
        Self {
            entry_repo,
            review_repo,
            limits,
        }
    }
}

#[async_trait]
impl<E, R> CatalogQuery for CatalogQueryService<E, R>
where
    E: EntryRepository,
    R: ReviewRepository,
{
    async fn search_entries(
        &self,
        request: SearchEntriesRequest,
    ) -> Result<SearchEntriesResponse, Error> {
        let query = request.query.trim();
        if query.is_empty() {
            return Ok(SearchEntriesResponse {
                matches: Vec::new(),
            });
        }
        let matches = retry_once!(
            self.entry_repo
                .search_text(query, self.limits.text_result_cap())
                .await
        )
        .map_err(map_entry_repository_error)?;
        Ok(SearchEntriesResponse { matches })
    }

    async fn nearby_entries(
        &self,
        request: NearbyEntriesRequest,
    ) -> Result<NearbyEntriesResponse, Error> {
        let origin = GeoPoint::new(request.longitude, request.latitude).map_err(|error| {
            let field = match error {
                GeoValidationError::LongitudeOutOfRange { .. } => "longitude",
                GeoValidationError::LatitudeOutOfRange { .. } => "latitude",
            };
            Error::validation(vec![FieldViolation::new(field, error.to_string())])
        })?;
        let radius = request
            .max_distance_metres
            .unwrap_or(self.limits.proximity_radius_metres());
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::validation(vec![FieldViolation::new(
                "maxDistanceMetres",
                format!("maxDistanceMetres must be a positive distance (got {radius})"),
            )]));
        }
        let entries = retry_once!(
            self.entry_repo
                .find_near(origin, radius, self.limits.proximity_result_cap())
                .await
        )
        .map_err(map_entry_repository_error)?;
        Ok(NearbyEntriesResponse { entries })
    }

    async fn tag_view(&self, request: TagViewRequest) -> Result<TagViewResponse, Error> {
        let counts = async {
            retry_once!(self.entry_repo.tag_counts().await).map_err(map_entry_repository_error)
        };
        let entries = async {
            retry_once!(self.entry_repo.entries_with_tag(request.tag.clone()).await)
                .map_err(map_entry_repository_error)
        };
        let (counts, entries) = try_join!(counts, entries)?;
        Ok(TagViewResponse {
            counts,
            entries,
            active_tag: request.tag,
        })
    }

    async fn top_rated(&self) -> Result<TopRatedResponse, Error> {
        let entries = retry_once!(self.entry_repo.entries_with_tag(None).await)
            .map_err(map_entry_repository_error)?;
        let ids: Vec<EntryId> = entries.iter().map(CatalogEntry::id).collect();
        let reviews = retry_once!(self.review_repo.find_by_entries(&ids).await)
            .map_err(map_review_repository_error)?;

        let mut by_entry: HashMap<EntryId, Vec<Review>> = HashMap::new();
        for review in reviews {
            by_entry.entry(review.entry_id()).or_default().push(review);
        }

        let mut ranked: Vec<TopRatedEntry> = entries
            .into_iter()
            .filter_map(|entry| {
                let reviews = by_entry.remove(&entry.id()).unwrap_or_default();
                if reviews.len() < self.limits.min_review_count() {
                    return None;
                }
                Some(ranked_entry(entry, reviews))
            })
            .collect();

        // Stable sort keeps tied entries in insertion order.
        ranked.sort_by(|a, b| compare_averages(a.average_rating, b.average_rating));
        ranked.truncate(self.limits.top_rated_limit());
        Ok(TopRatedResponse { entries: ranked })
    }

    async fn entry_detail(
        &self,
        request: EntryDetailRequest,
    ) -> Result<EntryDetailResponse, Error> {
        let slug = Slug::parse(&request.slug).map_err(|_| {
            Error::not_found(format!("no catalog entry with slug '{}'", request.slug))
        })?;
        let entry = retry_once!(self.entry_repo.find_by_slug(&slug).await)
            .map_err(map_entry_repository_error)?
            .ok_or_else(|| Error::not_found(format!("no catalog entry with slug '{slug}'")))?;
        let reviews = retry_once!(self.review_repo.find_by_entry(entry.id()).await)
            .map_err(map_review_repository_error)?;
        Ok(EntryDetailResponse { entry, reviews })
    }

    async fn list_entries(
        &self,
        request: ListEntriesRequest,
    ) -> Result<ListEntriesResponse, Error> {
        let page = request.page.unwrap_or(1);
        let per_page = request
            .per_page
            .unwrap_or(self.limits.default_page_size());
        let page_request = PageRequest::new(page, per_page).map_err(map_page_request_error)?;

        let fetched = retry_once!(
            self.entry_repo
                .list_page(page_request.offset(), page_request.per_page())
                .await
        )
        .map_err(map_entry_repository_error)?;

        let entries = match page_request.plan(fetched.total) {
            PagePlan::Fetch { .. } => Paged::new(
                fetched.entries,
                PageInfo::new(page_request, fetched.total),
            ),
            PagePlan::OutOfRange { last_page } => {
                tracing::warn!(
                    page = page_request.page(),
                    last_page,
                    "requested page is beyond the listing, serving the last page"
                );
                let last_request = PageRequest::new(last_page, per_page)
                    .map_err(|error| Error::internal(error.to_string()))?;
                let refetched = retry_once!(
                    self.entry_repo
                        .list_page(last_request.offset(), last_request.per_page())
                        .await
                )
                .map_err(map_entry_repository_error)?;
                Paged::new(
                    refetched.entries,
                    PageInfo::new(last_request, refetched.total)
                        .with_redirect(page_request.page()),
                )
            }
        };
        Ok(ListEntriesResponse { entries })
    }
}

fn ranked_entry(entry: CatalogEntry, reviews: Vec<Review>) -> TopRatedEntry {
    let rated: Vec<f64> = reviews
        .iter()
        .filter_map(Review::rating)
        .map(|rating| f64::from(rating.value()))
        .collect();
    let average_rating = if rated.is_empty() {
        None
    } else {
        Some(rated.iter().sum::<f64>() / rated.len() as f64)
    };
    TopRatedEntry {
        id: entry.id(),
        name: entry.name().to_owned(),
        slug: entry.slug().clone(),
        photo_ref: entry.photo_ref().map(str::to_owned),
        average_rating,
        review_count: reviews.len() as u64,
        reviews,
    }
}

/// Descending by average; unrated entries sort after every rated one.
fn compare_averages(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn map_page_request_error(error: PageRequestError) -> Error {
    let field = match error {
        PageRequestError::ZeroPage => "page",
        PageRequestError::ZeroPerPage => "perPage",
    };
    Error::validation(vec![FieldViolation::new(field, error.to_string())])
}

#[cfg(test)]
#[path = "aggregation_service_tests.rs"]
mod tests;
