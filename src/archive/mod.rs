//! Contest archive access with caching and rate limiting
//!
//! All outbound traffic to the remote contest archive flows through
//! [`ArchiveClient`]: repeated reads are served from an in-memory TTL cache,
//! and live calls are serialized so they are never spaced closer than the
//! configured minimum interval, no matter how many tasks fetch concurrently.
//!
//! # Modules
//!
//! - [`cache`] - In-memory TTL response cache with prefix invalidation
//! - [`client`] - Rate-limited HTTP client with typed archive endpoints
//! - [`error`] - Archive error types

pub mod cache;
pub mod client;
pub mod error;

pub use cache::{CacheStats, ResponseCache};
pub use client::ArchiveClient;
pub use error::ArchiveError;
