//! Object storage adapters for product images.
//!
//! - **s3**: S3-compatible buckets through `aws-sdk-s3`, with presigned
//!   download links.
//! - **memory**: a process-local store for tests and local runs.

mod memory;
mod s3;

pub use memory::InMemoryImageStorage;
pub use s3::{S3ImageStorage, S3StorageConfig};
