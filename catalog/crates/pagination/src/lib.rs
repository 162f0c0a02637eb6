//! Page-window planning and response envelopes for catalog listings.
//!
//! Listings are paged with one-based page numbers. A [`PageRequest`] captures
//! the caller's page and page size; [`PageRequest::plan`] turns it into a
//! fetch window against a known total, reporting when the requested page lies
//! beyond the data so the caller can re-issue the query for the last page.
//! [`Paged`] wraps the fetched rows together with the [`PageInfo`] bookkeeping
//! a client needs to render pagination controls.
//!
//! A request is only out of range when its offset reaches past a non-empty
//! collection. Page one of an empty collection is a valid, empty page.
//!
//! # Example
//!
//! ```
//! use pagination::{PagePlan, PageRequest};
//!
//! let request = PageRequest::new(4, 4)?;
//! assert_eq!(request.offset(), 12);
//! assert_eq!(request.plan(10), PagePlan::OutOfRange { last_page: 3 });
//! # Ok::<(), pagination::PageRequestError>(())
//! ```

mod envelope;
mod request;

pub use envelope::{PageInfo, Paged};
pub use request::{PagePlan, PageRequest, PageRequestError};
