//! Request Cache - memoization and in-flight deduplication for upstream calls
//!
//! Every rate-limited upstream call goes through a [`RequestCache`]: fresh
//! values are served from memory, concurrent callers for the same key share
//! one producer, and failures are delivered to all waiters without being
//! stored.

pub mod cache;
pub mod config;

pub use cache::{fingerprint, CacheStats, Expiry, RequestCache};
pub use config::CacheConfig;
