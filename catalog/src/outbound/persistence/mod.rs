//! In-memory catalog persistence backed by real indexes.
//!
//! The store keeps every read view behind an index rather than a scan: a
//! BTree over slugs (doubling as the uniqueness guard), an inverted token
//! index over names and descriptions, a tiled grid over locations, tag
//! occurrence counters, and a creation-order index for listing. Repositories
//! are thin handles over the shared state; all index maintenance lives with
//! the state itself.
//!
//! Shared state sits behind a `std::sync::RwLock`, so reads run in parallel
//! and writes are exclusive. The slug uniqueness check and the insert happen
//! under one write lock, which makes the store the authoritative guard the
//! services rely on.
//!
//! # Example
//!
//! ```rust
//! use catalog::outbound::persistence::MemoryCatalog;
//!
//! let store = MemoryCatalog::new();
//! let entries = store.entry_repository();
//! let reviews = store.review_repository();
//! ```

mod geo_grid;
mod memory_entry_repository;
mod memory_review_repository;
mod store;
mod text_index;

pub use memory_entry_repository::MemoryEntryRepository;
pub use memory_review_repository::MemoryReviewRepository;
pub use store::MemoryCatalog;
