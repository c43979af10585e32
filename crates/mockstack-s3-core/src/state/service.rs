//! Top-level S3 service state.
//!
//! [`S3ServiceState`] manages the collection of buckets and the version-ID
//! source shared by all of them. All operations are thread-safe via
//! `DashMap`.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::Ref;
use tracing::{debug, info};

use super::bucket::{BucketInfo, S3Bucket};
use crate::error::S3ServiceError;
use crate::utils::VersionIdGenerator;

/// Top-level S3 service state holding all buckets.
///
/// All fields are accessed concurrently; no external locking is required.
pub struct S3ServiceState {
    /// Bucket name to `S3Bucket` mapping.
    buckets: DashMap<String, S3Bucket>,
    /// Source of version IDs for every versioned write in this store.
    version_ids: VersionIdGenerator,
}

impl std::fmt::Debug for S3ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ServiceState")
            .field("bucket_count", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

impl Default for S3ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

impl S3ServiceState {
    /// Create a new, empty service state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
            version_ids: VersionIdGenerator::new(),
        }
    }

    /// Create a new bucket.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::BucketAlreadyOwnedByYou`] if a bucket with
    /// the same name exists.
    pub fn create_bucket(&self, name: &str) -> Result<DateTime<Utc>, S3ServiceError> {
        match self.buckets.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(S3ServiceError::BucketAlreadyOwnedByYou {
                bucket: name.to_owned(),
            }),
            Entry::Vacant(slot) => {
                let bucket = slot.insert(S3Bucket::new(name.to_owned()));
                info!(bucket = %name, "bucket created");
                Ok(bucket.creation_date)
            }
        }
    }

    /// Delete a bucket.
    ///
    /// The emptiness check and the removal happen under the same table lock,
    /// so a concurrent put cannot slip in between them.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`S3ServiceError::BucketNotEmpty`] if the bucket still holds a
    ///   current object.
    pub fn delete_bucket(&self, name: &str) -> Result<(), S3ServiceError> {
        if let Some((_, bucket)) = self
            .buckets
            .remove_if(name, |_, bucket| !bucket.has_live_objects())
        {
            info!(
                bucket = %name,
                abandoned_uploads = bucket.multipart_uploads.len(),
                "bucket deleted"
            );
            return Ok(());
        }

        if self.buckets.contains_key(name) {
            Err(S3ServiceError::BucketNotEmpty {
                bucket: name.to_owned(),
            })
        } else {
            Err(S3ServiceError::NoSuchBucket {
                bucket: name.to_owned(),
            })
        }
    }

    /// Get an immutable reference to a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    pub fn get_bucket(&self, name: &str) -> Result<Ref<'_, String, S3Bucket>, S3ServiceError> {
        self.buckets
            .get(name)
            .ok_or_else(|| S3ServiceError::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }

    /// List all buckets, sorted by name.
    #[must_use]
    pub fn list_buckets(&self) -> Vec<BucketInfo> {
        let mut buckets: Vec<BucketInfo> = self
            .buckets
            .iter()
            .map(|entry| BucketInfo {
                name: entry.key().clone(),
                creation_date: entry.value().creation_date,
            })
            .collect();
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        buckets
    }

    /// Check whether a bucket exists.
    #[must_use]
    pub fn bucket_exists(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// Allocate the next version ID.
    #[must_use]
    pub fn next_version_id(&self) -> String {
        self.version_ids.next_id()
    }

    /// Reset all state, removing all buckets.
    pub fn reset(&self) {
        debug!("resetting all S3 service state");
        self.buckets.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
