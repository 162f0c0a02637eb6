//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_command;
mod catalog_query;
mod entry_repository;
mod review_repository;

#[cfg(test)]
pub use catalog_command::MockCatalogCommand;
pub use catalog_command::{
    AddReviewRequest, AddReviewResponse, CatalogCommand, CreateEntryRequest, CreateEntryResponse,
    FixtureCatalogCommand, UpdateEntryRequest, UpdateEntryResponse,
};
#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
pub use catalog_query::{
    CatalogQuery, EntryDetailRequest, EntryDetailResponse, FixtureCatalogQuery, ListEntriesRequest,
    ListEntriesResponse, NearbyEntriesRequest, NearbyEntriesResponse, SearchEntriesRequest,
    SearchEntriesResponse, TagViewRequest, TagViewResponse, TopRatedEntry, TopRatedResponse,
};
#[cfg(test)]
pub use entry_repository::MockEntryRepository;
pub use entry_repository::{
    EntryPage, EntryRepository, EntryRepositoryError, FixtureEntryRepository, NearbyEntry,
    TagCount, TextMatch,
};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{FixtureReviewRepository, ReviewRepository, ReviewRepositoryError};
