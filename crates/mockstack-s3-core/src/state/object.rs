//! S3 object types and metadata.
//!
//! This module defines the stored object version ([`S3Object`]), its
//! body-less view ([`ObjectHead`]), delete markers, object metadata and the
//! result of a delete call.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checksums::compute_etag;
use crate::utils::NULL_VERSION_ID;

// ---------------------------------------------------------------------------
// ObjectMetadata
// ---------------------------------------------------------------------------

/// Metadata associated with an S3 object.
///
/// Includes the standard content headers and user-defined metadata
/// (`x-amz-meta-*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// The MIME type of the object (e.g. `application/octet-stream`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Content encoding (e.g. `gzip`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    /// Content disposition (e.g. `attachment; filename="file.txt"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_disposition: Option<String>,
    /// Content language (e.g. `en-US`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_language: Option<String>,
    /// Cache control directives (e.g. `max-age=3600`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
    /// User-defined metadata headers (`x-amz-meta-*`).
    #[serde(default)]
    pub user_metadata: HashMap<String, String>,
}

impl ObjectMetadata {
    /// Metadata carrying only a content type.
    #[must_use]
    pub fn with_content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// S3Object
// ---------------------------------------------------------------------------

/// A stored S3 object version (non-delete-marker).
///
/// Versions are immutable once stored; a put creates a new value rather than
/// editing an existing one. The body is a reference-counted [`Bytes`]
/// buffer, so handing out clones never copies or exposes stored bytes for
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Object {
    /// The object key.
    pub key: String,
    /// The version ID: `None` in a bucket that never had versioning,
    /// `"null"` for suspended-mode writes, otherwise a generated ID.
    pub version_id: Option<String>,
    /// The object body.
    pub body: Bytes,
    /// The entity tag (quoted hex MD5 digest, or a composite multipart tag).
    pub etag: String,
    /// The object size in bytes.
    pub size: u64,
    /// The time this version was written.
    pub last_modified: DateTime<Utc>,
    /// Object metadata.
    pub metadata: ObjectMetadata,
    /// The number of parts if this object was created via multipart upload.
    pub parts_count: Option<u32>,
}

impl S3Object {
    /// Build a single-part object, computing its ETag and size from `body`.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        version_id: Option<String>,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> Self {
        Self {
            key: key.into(),
            version_id,
            etag: compute_etag(&body),
            size: body.len() as u64,
            body,
            last_modified: Utc::now(),
            metadata,
            parts_count: None,
        }
    }

    /// Returns `false` because an `S3Object` is never a delete marker.
    #[must_use]
    pub fn is_delete_marker(&self) -> bool {
        false
    }

    /// The body-less view of this object.
    #[must_use]
    pub fn head(&self) -> ObjectHead {
        ObjectHead::from(self)
    }
}

// ---------------------------------------------------------------------------
// ObjectHead
// ---------------------------------------------------------------------------

/// Everything about an object version except its body.
///
/// Returned by `head_object` and by object listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectHead {
    /// The object key.
    pub key: String,
    /// The version ID, if the object has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// The entity tag.
    pub etag: String,
    /// The object size in bytes.
    pub size: u64,
    /// The time this version was written.
    pub last_modified: DateTime<Utc>,
    /// Object metadata.
    pub metadata: ObjectMetadata,
    /// The number of parts if this object was created via multipart upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts_count: Option<u32>,
}

impl From<&S3Object> for ObjectHead {
    fn from(object: &S3Object) -> Self {
        Self {
            key: object.key.clone(),
            version_id: object.version_id.clone(),
            etag: object.etag.clone(),
            size: object.size,
            last_modified: object.last_modified,
            metadata: object.metadata.clone(),
            parts_count: object.parts_count,
        }
    }
}

// ---------------------------------------------------------------------------
// S3DeleteMarker
// ---------------------------------------------------------------------------

/// A delete marker in a versioned bucket.
///
/// Delete markers are created when an object is deleted in a versioned bucket.
/// They act as a placeholder that indicates the object has been logically deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3DeleteMarker {
    /// The object key.
    pub key: String,
    /// The version ID of this delete marker.
    pub version_id: String,
    /// The time this delete marker was created.
    pub last_modified: DateTime<Utc>,
}

impl S3DeleteMarker {
    /// Create a delete marker stamped with the current time.
    #[must_use]
    pub fn new(key: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version_id: version_id.into(),
            last_modified: Utc::now(),
        }
    }

    /// Returns `true` because an `S3DeleteMarker` is always a delete marker.
    #[must_use]
    pub fn is_delete_marker(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// ObjectVersion
// ---------------------------------------------------------------------------

/// A version entry in a versioned bucket, which is either an object or a
/// delete marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectVersion {
    /// A real object version (boxed to reduce enum size).
    Object(Box<S3Object>),
    /// A delete-marker version.
    DeleteMarker(S3DeleteMarker),
}

impl ObjectVersion {
    /// Returns the object key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Object(obj) => &obj.key,
            Self::DeleteMarker(dm) => &dm.key,
        }
    }

    /// Returns the version ID, if any.
    #[must_use]
    pub fn version_id(&self) -> Option<&str> {
        match self {
            Self::Object(obj) => obj.version_id.as_deref(),
            Self::DeleteMarker(dm) => Some(&dm.version_id),
        }
    }

    /// Returns the version ID, reporting an absent ID as `"null"` the way S3
    /// version listings do.
    #[must_use]
    pub fn version_id_or_null(&self) -> &str {
        self.version_id().unwrap_or(NULL_VERSION_ID)
    }

    /// Returns the last-modified timestamp.
    #[must_use]
    pub fn last_modified(&self) -> DateTime<Utc> {
        match self {
            Self::Object(obj) => obj.last_modified,
            Self::DeleteMarker(dm) => dm.last_modified,
        }
    }

    /// Returns `true` if this version is a delete marker.
    #[must_use]
    pub fn is_delete_marker(&self) -> bool {
        matches!(self, Self::DeleteMarker(_))
    }

    /// Returns a reference to the inner `S3Object`, if this is an object version.
    #[must_use]
    pub fn as_object(&self) -> Option<&S3Object> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::DeleteMarker(_) => None,
        }
    }

    /// Returns a reference to the inner `S3DeleteMarker`, if this is a delete marker.
    #[must_use]
    pub fn as_delete_marker(&self) -> Option<&S3DeleteMarker> {
        match self {
            Self::Object(_) => None,
            Self::DeleteMarker(dm) => Some(dm),
        }
    }
}

// ---------------------------------------------------------------------------
// DeletedObject
// ---------------------------------------------------------------------------

/// Outcome of a delete call.
///
/// Deletes never fail for a missing key or version; in that case (and for
/// deletes in a bucket without versioning) the result is the empty
/// placeholder: no version ID, no delete marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedObject {
    /// The key the delete was addressed to.
    pub key: String,
    /// Version ID of the created delete marker, or of the removed version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Whether the created or removed version is a delete marker.
    pub delete_marker: bool,
}

impl DeletedObject {
    /// The empty placeholder for `key`.
    #[must_use]
    pub fn placeholder(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version_id: None,
            delete_marker: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
