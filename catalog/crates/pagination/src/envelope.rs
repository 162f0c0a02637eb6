//! Response envelopes carrying one page of items plus paging bookkeeping.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// Paging bookkeeping for one page of a listing.
///
/// `total_pages` is zero for an empty collection. When the requested page lay
/// beyond the collection and the listing was re-issued for the last page,
/// `redirected_from` holds the page number originally asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// One-based number of the page being returned.
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
    /// Total items across all pages.
    pub total_items: u64,
    /// Total number of populated pages.
    pub total_pages: u64,
    /// The originally requested page, when the listing was clamped to the
    /// last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<u64>,
}

impl PageInfo {
    /// Build page bookkeeping for `request` against the collection size.
    #[must_use]
    pub const fn new(request: PageRequest, total_items: u64) -> Self {
        Self {
            page: request.page(),
            per_page: request.per_page(),
            total_items,
            total_pages: total_items.div_ceil(request.per_page()),
            redirected_from: None,
        }
    }

    /// Record that this page was served in place of `requested_page`.
    #[must_use]
    pub const fn with_redirect(self, requested_page: u64) -> Self {
        Self {
            redirected_from: Some(requested_page),
            ..self
        }
    }
}

/// One page of a listing together with its [`PageInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    /// The items on this page, in listing order.
    pub items: Vec<T>,
    /// Paging bookkeeping for this page.
    pub page_info: PageInfo,
}

impl<T> Paged<T> {
    /// Wrap one page of items with its bookkeeping.
    #[must_use]
    pub const fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn request(page: u64, per_page: u64) -> PageRequest {
        PageRequest::new(page, per_page).expect("valid request")
    }

    #[rstest]
    #[case::empty_collection(0, 0)]
    #[case::partial_final_page(10, 3)]
    #[case::exact_pages(12, 3)]
    #[case::single_item(1, 1)]
    fn total_pages_rounds_up(#[case] total_items: u64, #[case] total_pages: u64) {
        let info = PageInfo::new(request(1, 4), total_items);
        assert_eq!(info.total_pages, total_pages);
    }

    #[test]
    fn with_redirect_records_requested_page() {
        let info = PageInfo::new(request(3, 4), 10).with_redirect(9);
        assert_eq!(info.page, 3);
        assert_eq!(info.redirected_from, Some(9));
    }

    #[test]
    fn envelope_serializes_camel_case_and_omits_absent_redirect() {
        let paged = Paged::new(vec!["a", "b"], PageInfo::new(request(1, 2), 5));
        let json = serde_json::to_string(&paged).expect("serialize");
        assert_eq!(
            json,
            r#"{"items":["a","b"],"pageInfo":{"page":1,"perPage":2,"totalItems":5,"totalPages":3}}"#
        );
    }

    #[test]
    fn envelope_round_trips_with_redirect() {
        let paged = Paged::new(vec![1, 2], PageInfo::new(request(2, 2), 4).with_redirect(7));
        let json = serde_json::to_string(&paged).expect("serialize");
        let back: Paged<i32> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, paged);
    }
}
