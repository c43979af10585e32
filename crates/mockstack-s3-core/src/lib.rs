//! In-memory S3 object-store engine for MockStack.
//!
//! This crate implements the data model and algorithms behind an
//! S3-compatible object store: buckets, objects, object versions and delete
//! markers, multipart uploads, and prefix/delimiter listing with pagination.
//! It takes already-parsed arguments and returns domain values or a typed
//! [`error::S3ServiceError`]; HTTP routing, wire encoding and authentication
//! belong to the caller.
//!
//! # Architecture
//!
//! ```text
//! caller (HTTP layer, tests)
//!        |
//!        v
//! MockStackS3 (ops: bucket, object, list, multipart)
//!        |
//!        v
//!   S3ServiceState (bucket table, version-ID source)
//!        |
//!        v
//!   S3Bucket (ObjectStore, multipart uploads, versioning status)
//! ```

pub mod checksums;
pub mod config;
pub mod error;
mod ops;
pub mod provider;
pub mod state;
pub mod utils;

pub use config::S3Config;
pub use ops::list::ListObjectsV2Result;
pub use ops::multipart::{CompletedPart, ListPartsResult};
pub use provider::MockStackS3;
