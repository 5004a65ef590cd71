//! Cloudflare R2 storage backend for review sessions.
//!
//! This crate provides:
//! - The R2 client (listing, presigned GET URLs, JSON document read/write)
//! - Bucket layout (which objects are reviewable, where the label document lives)
//! - The storage traits the review core is written against
//! - An in-memory backend for tests and local runs

pub mod backend;
pub mod bucket;
pub mod client;
pub mod error;
pub mod layout;
pub mod memory;

pub use backend::{CatalogSource, SnapshotStore, UrlSigner};
pub use bucket::ReviewBucket;
pub use client::{ObjectInfo, R2Client, R2Config};
pub use error::{StorageError, StorageResult};
pub use layout::BucketLayout;
pub use memory::MemoryBackend;
