//! Outbound adapters implementing domain ports for infrastructure.
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.
//!
//! - **persistence**: the index-backed in-memory catalog store.

pub mod persistence;
