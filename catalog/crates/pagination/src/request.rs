//! Validated page requests and fetch-window planning.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The page number was zero; pages are one-based.
    #[error("page number must be at least 1")]
    ZeroPage,
    /// The page size was zero; a page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPerPage,
}

/// Wire shape for [`PageRequest`], used for serde conversions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageRequest {
    page: u64,
    per_page: u64,
}

/// A validated request for one page of a listing.
///
/// Page numbers are one-based. Both the page number and the page size are
/// guaranteed non-zero by construction, so offset arithmetic cannot wrap.
///
/// # Example
///
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 4)?;
/// assert_eq!(request.page(), 2);
/// assert_eq!(request.offset(), 4);
/// # Ok::<(), pagination::PageRequestError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    page: NonZeroU64,
    per_page: NonZeroU64,
}

impl PageRequest {
    /// Build a request for `page` with `per_page` items per page.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroPage`] or
    /// [`PageRequestError::ZeroPerPage`] when either argument is zero.
    pub const fn new(page: u64, per_page: u64) -> Result<Self, PageRequestError> {
        let Some(page) = NonZeroU64::new(page) else {
            return Err(PageRequestError::ZeroPage);
        };
        let Some(per_page) = NonZeroU64::new(per_page) else {
            return Err(PageRequestError::ZeroPerPage);
        };
        Ok(Self { page, per_page })
    }

    /// The one-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page.get()
    }

    /// The number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page.get()
    }

    /// The number of items to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.get() - 1).saturating_mul(self.per_page.get())
    }

    /// Resolve this request against the collection size.
    ///
    /// A request is out of range only when its offset reaches past a
    /// non-empty collection; page one of an empty collection resolves to an
    /// empty fetch window. Out-of-range plans carry the last populated page
    /// so the caller can re-issue the query there.
    #[must_use]
    pub const fn plan(&self, total: u64) -> PagePlan {
        let offset = self.offset();
        if offset >= total && total > 0 {
            PagePlan::OutOfRange {
                last_page: total.div_ceil(self.per_page.get()),
            }
        } else {
            PagePlan::Fetch {
                offset,
                limit: self.per_page.get(),
            }
        }
    }
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.per_page)
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(request: PageRequest) -> Self {
        Self {
            page: request.page(),
            per_page: request.per_page(),
        }
    }
}

/// The resolved fetch window for a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePlan {
    /// Fetch `limit` items after skipping `offset`.
    Fetch {
        /// Items to skip before the window starts.
        offset: u64,
        /// Maximum number of items in the window.
        limit: u64,
    },
    /// The requested page lies beyond the collection.
    OutOfRange {
        /// The last page that holds any items.
        last_page: u64,
    },
}
