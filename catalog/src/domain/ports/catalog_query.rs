//! Driving port for catalog read views.
//!
//! Exposes the text search, proximity search, tag histogram, top-rated
//! ranking, entry detail, and paged listing views over the catalog.

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest, PageRequestError, Paged};
use serde::{Deserialize, Serialize};

use crate::domain::{CatalogEntry, EntryId, Error, FieldViolation, Review, Slug};

use super::{NearbyEntry, TagCount, TextMatch};

/// Request for a free-text search over entry names and descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntriesRequest {
    pub query: String,
}

/// Response from a free-text search, best match first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntriesResponse {
    pub matches: Vec<TextMatch>,
}

/// Request for entries near a coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyEntriesRequest {
    pub longitude: f64,
    pub latitude: f64,
    /// Search radius in metres; the configured default applies when absent.
    #[serde(default)]
    pub max_distance_metres: Option<f64>,
}

/// Response from a proximity search, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyEntriesResponse {
    pub entries: Vec<NearbyEntry>,
}

/// Request for the tag histogram alongside entries filtered by one tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagViewRequest {
    /// Tag to filter by; every entry is listed when absent.
    #[serde(default)]
    pub tag: Option<String>,
}

/// Response pairing the catalog-wide histogram with the filtered entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagViewResponse {
    pub counts: Vec<TagCount>,
    pub entries: Vec<CatalogEntry>,
    /// Echo of the requested tag, for view highlighting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_tag: Option<String>,
}

/// One entry in the top-rated ranking with its joined reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRatedEntry {
    pub id: EntryId,
    pub name: String,
    pub slug: Slug,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
    /// Mean of the rated reviews; absent when none carry a rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    pub review_count: u64,
    pub reviews: Vec<Review>,
}

/// Response carrying the top-rated ranking, best average first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRatedResponse {
    pub entries: Vec<TopRatedEntry>,
}

/// Request for one entry looked up by slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetailRequest {
    pub slug: String,
}

/// Response pairing an entry with its reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetailResponse {
    pub entry: CatalogEntry,
    pub reviews: Vec<Review>,
}

/// Request for one page of the newest-first listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesRequest {
    /// One-based page number; defaults to the first page.
    #[serde(default)]
    pub page: Option<u64>,
    /// Page size; the configured default applies when absent.
    #[serde(default)]
    pub per_page: Option<u64>,
}

/// Response carrying one page of the newest-first listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesResponse {
    pub entries: Paged<CatalogEntry>,
}

/// Driving port for catalog read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// Score entries against a free-text query, best first.
    ///
    /// A blank query yields an empty response rather than an error.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use catalog::domain::ports::{CatalogQuery, FixtureCatalogQuery, SearchEntriesRequest};
    /// # async fn example() -> Result<(), catalog::domain::Error> {
    /// let query = FixtureCatalogQuery;
    /// let response = query
    ///     .search_entries(SearchEntriesRequest {
    ///         query: "coffee".to_owned(),
    ///     })
    ///     .await?;
    /// assert!(response.matches.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    async fn search_entries(
        &self,
        request: SearchEntriesRequest,
    ) -> Result<SearchEntriesResponse, Error>;

    /// Find located entries near a coordinate pair, nearest first.
    async fn nearby_entries(
        &self,
        request: NearbyEntriesRequest,
    ) -> Result<NearbyEntriesResponse, Error>;

    /// The tag histogram alongside entries filtered by the requested tag.
    async fn tag_view(&self, request: TagViewRequest) -> Result<TagViewResponse, Error>;

    /// Rank entries by mean review rating, best first.
    async fn top_rated(&self) -> Result<TopRatedResponse, Error>;

    /// Look up one entry by slug, joined with its reviews.
    async fn entry_detail(
        &self,
        request: EntryDetailRequest,
    ) -> Result<EntryDetailResponse, Error>;

    /// One page of the newest-first listing.
    ///
    /// A page beyond the end of a non-empty catalog is answered with the last
    /// page and a redirect marker rather than an error.
    async fn list_entries(
        &self,
        request: ListEntriesRequest,
    ) -> Result<ListEntriesResponse, Error>;
}

/// Fixture query implementation for tests that do not exercise reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogQuery;

#[async_trait]
impl CatalogQuery for FixtureCatalogQuery {
    async fn search_entries(
        &self,
        _request: SearchEntriesRequest,
    ) -> Result<SearchEntriesResponse, Error> {
        Ok(SearchEntriesResponse {
            matches: Vec::new(),
        })
    }

    async fn nearby_entries(
        &self,
        _request: NearbyEntriesRequest,
    ) -> Result<NearbyEntriesResponse, Error> {
        Ok(NearbyEntriesResponse {
            entries: Vec::new(),
        })
    }

    async fn tag_view(&self, request: TagViewRequest) -> Result<TagViewResponse, Error> {
        Ok(TagViewResponse {
            counts: Vec::new(),
            entries: Vec::new(),
            active_tag: request.tag,
        })
    }

    async fn top_rated(&self) -> Result<TopRatedResponse, Error> {
        Ok(TopRatedResponse {
            entries: Vec::new(),
        })
    }

    async fn entry_detail(
        &self,
        request: EntryDetailRequest,
    ) -> Result<EntryDetailResponse, Error> {
        Err(Error::not_found(format!(
            "no catalog entry with slug '{}'",
            request.slug
        )))
    }

    async fn list_entries(
        &self,
        request: ListEntriesRequest,
    ) -> Result<ListEntriesResponse, Error> {
        let page_request = PageRequest::new(
            request.page.unwrap_or(1),
            request.per_page.unwrap_or(4),
        )
        .map_err(|err| {
            let field = match err {
                PageRequestError::ZeroPage => "page",
                PageRequestError::ZeroPerPage => "perPage",
            };
            Error::validation(vec![FieldViolation::new(field, err.to_string())])
        })?;
        Ok(ListEntriesResponse {
            entries: Paged::new(Vec::new(), PageInfo::new(page_request, 0)),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[tokio::test]
    async fn fixture_views_return_empty(
        #[values("", "smoked", "tag histogram")] query: &str,
    ) {
        let fixture = FixtureCatalogQuery;
        let searched = fixture
            .search_entries(SearchEntriesRequest {
                query: query.to_owned(),
            })
            .await
            .expect("fixture search succeeds");
        assert!(searched.matches.is_empty());

        let ranked = fixture.top_rated().await.expect("fixture ranking succeeds");
        assert!(ranked.entries.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_tag_view_echoes_the_requested_tag() {
        let fixture = FixtureCatalogQuery;
        let response = fixture
            .tag_view(TagViewRequest {
                tag: Some("Wifi".to_owned()),
            })
            .await
            .expect("fixture view succeeds");
        assert_eq!(response.active_tag.as_deref(), Some("Wifi"));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_detail_reports_not_found() {
        let fixture = FixtureCatalogQuery;
        let error = fixture
            .entry_detail(EntryDetailRequest {
                slug: "missing".to_owned(),
            })
            .await
            .expect_err("fixture detail is empty");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_listing_rejects_page_zero() {
        let fixture = FixtureCatalogQuery;
        let error = fixture
            .list_entries(ListEntriesRequest {
                page: Some(0),
                per_page: None,
            })
            .await
            .expect_err("page zero rejected");
        assert_eq!(error.code(), ErrorCode::Validation);
    }

    #[rstest]
    fn top_rated_entry_serialises_camel_case() {
        let entry = TopRatedEntry {
            id: EntryId::new(uuid::Uuid::nil()),
            name: "Cardamom Yard".to_owned(),
            slug: Slug::parse("cardamom-yard").expect("valid slug"),
            photo_ref: None,
            average_rating: Some(4.5),
            review_count: 2,
            reviews: Vec::new(),
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "name": "Cardamom Yard",
                "slug": "cardamom-yard",
                "averageRating": 4.5,
                "reviewCount": 2,
                "reviews": [],
            })
        );
    }
}
