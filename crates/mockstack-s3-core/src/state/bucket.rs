//! S3 bucket data structure and versioning status.
//!
//! An [`S3Bucket`] holds all per-bucket state: objects, multipart uploads and
//! versioning status.
//!
//! Interior mutability is achieved through `parking_lot::RwLock` for the
//! versioning status and the object store, and `DashMap` for the multipart
//! upload table. Locks are always taken in the order versioning, objects,
//! multipart entry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keystore::ObjectStore;
use super::multipart::MultipartUpload;
use crate::error::S3ServiceError;

// ---------------------------------------------------------------------------
// VersioningStatus
// ---------------------------------------------------------------------------

/// Bucket versioning status.
///
/// A bucket starts `Unset`. Once `Enabled` or `Suspended` it can move between
/// those two but never back to `Unset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningStatus {
    /// Versioning has never been configured on this bucket.
    #[default]
    Unset,
    /// Versioning is currently enabled.
    Enabled,
    /// Versioning is suspended; new writes use the `"null"` version.
    Suspended,
}

impl VersioningStatus {
    /// Return the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "Unset",
            Self::Enabled => "Enabled",
            Self::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for VersioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersioningStatus {
    type Err = S3ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unset" => Ok(Self::Unset),
            "Enabled" => Ok(Self::Enabled),
            "Suspended" => Ok(Self::Suspended),
            _ => Err(S3ServiceError::InvalidVersioningState {
                status: s.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// BucketInfo
// ---------------------------------------------------------------------------

/// A bucket as reported by bucket listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfo {
    /// Bucket name.
    pub name: String,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// S3Bucket
// ---------------------------------------------------------------------------

/// An S3 bucket with all its state.
pub struct S3Bucket {
    /// Bucket name.
    pub name: String,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,

    // -- object storage --
    /// Object key storage (un-versioned or versioned).
    pub objects: RwLock<ObjectStore>,
    /// In-progress multipart uploads, keyed by upload ID.
    pub multipart_uploads: DashMap<String, MultipartUpload>,

    // -- versioning --
    /// Bucket versioning status.
    pub versioning: RwLock<VersioningStatus>,
}

impl fmt::Debug for S3Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Bucket")
            .field("name", &self.name)
            .field("creation_date", &self.creation_date)
            .field("versioning", &*self.versioning.read())
            .field("uploads", &self.multipart_uploads.len())
            .finish_non_exhaustive()
    }
}

impl S3Bucket {
    /// Create a new, empty, un-versioned bucket.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            creation_date: Utc::now(),
            objects: RwLock::new(ObjectStore::default()),
            multipart_uploads: DashMap::new(),
            versioning: RwLock::new(VersioningStatus::default()),
        }
    }

    /// Whether the bucket holds any current (non-delete-marker) object.
    ///
    /// Delete markers, older versions and in-progress uploads do not count.
    #[must_use]
    pub fn has_live_objects(&self) -> bool {
        !self.objects.read().is_empty()
    }

    /// The current versioning status.
    #[must_use]
    pub fn versioning_status(&self) -> VersioningStatus {
        *self.versioning.read()
    }

    /// Change the versioning status.
    ///
    /// Moving to `Enabled` or `Suspended` converts the object store to a
    /// versioned store; objects written before that keep their data and take
    /// the `"null"` version ID.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::InvalidVersioningState`] when asked to go
    /// back to `Unset` after versioning was configured.
    pub fn set_versioning(&self, target: VersioningStatus) -> Result<(), S3ServiceError> {
        let mut status = self.versioning.write();
        if *status == target {
            return Ok(());
        }
        if target == VersioningStatus::Unset {
            return Err(S3ServiceError::InvalidVersioningState {
                status: target.as_str().to_owned(),
            });
        }

        self.objects.write().transition_to_versioned();
        debug!(
            bucket = %self.name,
            from = status.as_str(),
            to = target.as_str(),
            "versioning status changed"
        );
        *status = target;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
