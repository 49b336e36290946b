//! Response cache for the cinemeta API client.
//!
//! Caches raw HTTP response bodies keyed by request URL across two tiers:
//! a bounded in-memory LRU (`HotCache`) and a persistent `rusqlite`-backed
//! key-value store (`DurableStore`). `ResponseCache` coordinates lookups
//! across both tiers and decides when to call out to the network through
//! the [`Fetch`] collaborator.

mod connection;
mod coordinator;
mod fetch;
/// Bounded in-memory LRU tier.
pub mod hot;
mod migrations;
mod policy;
/// Persistent key-value tier.
pub mod store;

pub use connection::open_db;
pub use coordinator::ResponseCache;
pub use fetch::{CachedResponse, Fetch, FetchedPayload, LocalFetch, Provenance};
pub use hot::HotCache;
pub use policy::CachePolicy;
pub use store::DurableStore;
