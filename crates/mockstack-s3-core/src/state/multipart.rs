//! Multipart upload state management.
//!
//! Tracks in-progress multipart uploads and their constituent parts.
//! Each [`MultipartUpload`] captures the metadata provided at initiation
//! time and accumulates [`UploadPart`] entries as they are uploaded.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::object::ObjectMetadata;
use crate::checksums::compute_etag;

/// An in-progress multipart upload.
///
/// Created by `create_multipart_upload` and discarded on completion or
/// abort. Metadata is captured at creation time and applied to the final
/// object upon completion.
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    /// Unique identifier for this upload.
    pub upload_id: String,
    /// The bucket the upload targets.
    pub bucket: String,
    /// The object key that this upload will create.
    pub key: String,
    /// When the upload was initiated.
    pub initiated: DateTime<Utc>,
    /// Object metadata captured at initiation time.
    pub metadata: ObjectMetadata,
    /// Parts uploaded so far, keyed by part number.
    pub parts: BTreeMap<u32, UploadPart>,
}

impl MultipartUpload {
    /// Create a new multipart upload.
    #[must_use]
    pub fn new(upload_id: String, bucket: String, key: String, metadata: ObjectMetadata) -> Self {
        Self {
            upload_id,
            bucket,
            key,
            initiated: Utc::now(),
            metadata,
            parts: BTreeMap::new(),
        }
    }

    /// Insert or replace a part in this upload.
    pub fn put_part(&mut self, part: UploadPart) {
        self.parts.insert(part.part_number, part);
    }

    /// Get a part by its number.
    #[must_use]
    pub fn get_part(&self, part_number: u32) -> Option<&UploadPart> {
        self.parts.get(&part_number)
    }

    /// Return the total number of parts uploaded so far.
    #[must_use]
    pub fn parts_count(&self) -> usize {
        self.parts.len()
    }

    /// Compute the total size of all uploaded parts.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.parts.values().map(|p| p.size).sum()
    }

    /// The part-free description of this upload.
    #[must_use]
    pub fn summary(&self) -> UploadSummary {
        UploadSummary {
            upload_id: self.upload_id.clone(),
            bucket: self.bucket.clone(),
            key: self.key.clone(),
            initiated: self.initiated,
            metadata: self.metadata.clone(),
        }
    }
}

/// Description of a multipart upload without its parts.
///
/// Returned by `create_multipart_upload` and `list_multipart_uploads`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    /// Unique identifier for the upload.
    pub upload_id: String,
    /// The bucket the upload targets.
    pub bucket: String,
    /// The object key the upload will create.
    pub key: String,
    /// When the upload was initiated.
    pub initiated: DateTime<Utc>,
    /// Object metadata captured at initiation time.
    pub metadata: ObjectMetadata,
}

/// A single part within a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    /// The part number.
    pub part_number: u32,
    /// The entity tag for this part (quoted hex MD5).
    pub etag: String,
    /// Size of this part in bytes.
    pub size: u64,
    /// The part body.
    pub body: Bytes,
    /// When this part was last uploaded.
    pub last_modified: DateTime<Utc>,
}

impl UploadPart {
    /// Build a part from its body, computing ETag and size.
    #[must_use]
    pub fn new(part_number: u32, body: Bytes) -> Self {
        Self {
            part_number,
            etag: compute_etag(&body),
            size: body.len() as u64,
            body,
            last_modified: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
