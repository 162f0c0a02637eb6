//! Savour catalog query and aggregation engine.
//!
//! This crate owns the write path (slug derivation and deduplication, entry
//! and review validation) and the read path (text search, proximity search,
//! tag histograms, top-rated ranking, paged listings) of the Savour business
//! directory. Transport, identity, and media handling live in other services;
//! they drive this crate through the ports in [`domain::ports`].
//!
//! Storage is injected: services depend on repository ports, and
//! [`outbound::persistence`] provides the reference adapters backed by real
//! in-memory indexes.

pub mod domain;
pub mod outbound;
