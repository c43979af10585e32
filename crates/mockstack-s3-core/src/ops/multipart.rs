//! Multipart upload operations.
//!
//! Implements `create_multipart_upload`, `upload_part`,
//! `complete_multipart_upload`, `abort_multipart_upload`, `list_parts`,
//! and `list_multipart_uploads`.
//!
//! Every operation on an existing session answers `NoSuchUpload` when the
//! bucket, the upload ID, or the key does not match the session.

use std::ops::Bound;

use bytes::{Bytes, BytesMut};
use dashmap::mapref::entry::Entry;
use mockstack_core::{Page, paginate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checksums::compute_multipart_etag;
use crate::error::{S3ServiceError, S3ServiceResult};
use crate::provider::MockStackS3;
use crate::state::{MultipartUpload, ObjectMetadata, S3Object, UploadPart, UploadSummary};
use crate::utils::{generate_upload_id, normalize_etag};

/// A part named by the caller when completing an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPart {
    /// The part number.
    pub part_number: u32,
    /// The ETag returned when the part was uploaded, quoted or not.
    pub etag: String,
}

impl CompletedPart {
    /// Create a completed-part reference.
    #[must_use]
    pub fn new(part_number: u32, etag: impl Into<String>) -> Self {
        Self {
            part_number,
            etag: etag.into(),
        }
    }
}

/// One page of the parts of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPartsResult {
    /// Parts in ascending part-number order.
    pub parts: Vec<UploadPart>,
    /// Whether more parts exist past this page.
    pub is_truncated: bool,
    /// Part number to pass as the marker for the next page.
    pub next_part_number_marker: Option<u32>,
}

fn no_such_upload(upload_id: &str) -> S3ServiceError {
    S3ServiceError::NoSuchUpload {
        upload_id: upload_id.to_owned(),
    }
}

impl MockStackS3 {
    /// Start a multipart upload for `key`.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist.
    pub fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        metadata: ObjectMetadata,
    ) -> S3ServiceResult<UploadSummary> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let upload_id = generate_upload_id();
        let upload = MultipartUpload::new(
            upload_id.clone(),
            bucket.to_owned(),
            key.to_owned(),
            metadata,
        );
        let summary = upload.summary();
        bucket_ref.multipart_uploads.insert(upload_id, upload);

        debug!(
            bucket = %bucket,
            key = %key,
            upload_id = %summary.upload_id,
            "multipart upload created"
        );
        Ok(summary)
    }

    /// Store one part of an upload, replacing any part with the same number.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchUpload` if the session does not exist for this bucket
    /// and key.
    pub fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u32,
        body: Bytes,
    ) -> S3ServiceResult<UploadPart> {
        let bucket_ref = self
            .state
            .get_bucket(bucket)
            .map_err(|_| no_such_upload(upload_id))?;
        let mut upload = bucket_ref
            .multipart_uploads
            .get_mut(upload_id)
            .filter(|u| u.key == key)
            .ok_or_else(|| no_such_upload(upload_id))?;

        let part = UploadPart::new(part_number, body);
        upload.put_part(part.clone());

        debug!(
            bucket = %bucket,
            key = %key,
            upload_id = %upload_id,
            part_number,
            size = part.size,
            "part uploaded"
        );
        Ok(part)
    }

    /// Assemble the listed parts into an object and end the session.
    ///
    /// Part bodies are concatenated in the listed order. The object is
    /// written through the normal put path, so the bucket's versioning
    /// status applies. On any error the session and the object table are
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// - `NoSuchUpload` if the session does not exist for this bucket and key.
    /// - `InvalidArgument` if `parts` is empty.
    /// - `InvalidPartOrder` if part numbers are not strictly increasing.
    /// - `InvalidPart` if a listed part is missing or its ETag differs.
    pub fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> S3ServiceResult<S3Object> {
        let bucket_ref = self
            .state
            .get_bucket(bucket)
            .map_err(|_| no_such_upload(upload_id))?;
        let Entry::Occupied(entry) = bucket_ref.multipart_uploads.entry(upload_id.to_owned())
        else {
            return Err(no_such_upload(upload_id));
        };
        let upload = entry.get();
        if upload.key != key {
            return Err(no_such_upload(upload_id));
        }
        if parts.is_empty() {
            return Err(S3ServiceError::InvalidArgument {
                message: "You must specify at least one part".to_owned(),
            });
        }

        let mut selected: Vec<&UploadPart> = Vec::with_capacity(parts.len());
        let mut previous: Option<u32> = None;
        for requested in parts {
            if previous.is_some_and(|n| requested.part_number <= n) {
                return Err(S3ServiceError::InvalidPartOrder {
                    upload_id: upload_id.to_owned(),
                });
            }
            previous = Some(requested.part_number);

            let stored = upload
                .get_part(requested.part_number)
                .filter(|p| normalize_etag(&p.etag) == normalize_etag(&requested.etag))
                .ok_or_else(|| S3ServiceError::InvalidPart {
                    upload_id: upload_id.to_owned(),
                    part_number: requested.part_number,
                })?;
            selected.push(stored);
        }

        let total: usize = selected.iter().map(|p| p.body.len()).sum();
        let mut body = BytesMut::with_capacity(total);
        for part in &selected {
            body.extend_from_slice(&part.body);
        }
        let part_etags: Vec<&str> = selected.iter().map(|p| p.etag.as_str()).collect();
        let etag = compute_multipart_etag(&part_etags);
        let parts_count = u32::try_from(selected.len()).unwrap_or(u32::MAX);
        let metadata = upload.metadata.clone();

        let object = self.store_object(&bucket_ref, |version_id| {
            let mut object = S3Object::new(key, version_id, body.freeze(), metadata);
            object.etag = etag;
            object.parts_count = Some(parts_count);
            object
        });
        entry.remove();

        debug!(
            bucket = %bucket,
            key = %key,
            upload_id = %upload_id,
            parts = parts_count,
            version_id = object.version_id.as_deref().unwrap_or(""),
            "multipart upload completed"
        );
        Ok(object)
    }

    /// Discard an upload and its parts.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchUpload` if the session does not exist for this bucket
    /// and key.
    pub fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> S3ServiceResult<()> {
        let bucket_ref = self
            .state
            .get_bucket(bucket)
            .map_err(|_| no_such_upload(upload_id))?;
        let (_, upload) = bucket_ref
            .multipart_uploads
            .remove_if(upload_id, |_, u| u.key == key)
            .ok_or_else(|| no_such_upload(upload_id))?;

        debug!(
            bucket = %bucket,
            key = %key,
            upload_id = %upload_id,
            discarded_parts = upload.parts_count(),
            discarded_bytes = upload.total_size(),
            "multipart upload aborted"
        );
        Ok(())
    }

    /// List the parts of an upload after `part_number_marker`.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchUpload` if the session does not exist for this bucket
    /// and key.
    pub fn list_parts(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number_marker: Option<u32>,
        max_parts: Option<usize>,
    ) -> S3ServiceResult<ListPartsResult> {
        let bucket_ref = self
            .state
            .get_bucket(bucket)
            .map_err(|_| no_such_upload(upload_id))?;
        let upload = bucket_ref
            .multipart_uploads
            .get(upload_id)
            .filter(|u| u.key == key)
            .ok_or_else(|| no_such_upload(upload_id))?;

        let max_parts = max_parts.unwrap_or(self.config.default_max_parts);
        let start = part_number_marker.map_or(Bound::Unbounded, Bound::Excluded);
        let mut remaining = upload
            .parts
            .range((start, Bound::Unbounded))
            .map(|(_, p)| p);

        let parts: Vec<UploadPart> = remaining.by_ref().take(max_parts).cloned().collect();
        let is_truncated = remaining.next().is_some();
        let next_part_number_marker = if is_truncated {
            parts.last().map(|p| p.part_number)
        } else {
            None
        };

        Ok(ListPartsResult {
            parts,
            is_truncated,
            next_part_number_marker,
        })
    }

    /// List in-progress uploads under `prefix`, ordered by key then
    /// initiation time.
    ///
    /// `upload_id_token` is the `next_token` of the previous page.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist.
    pub fn list_multipart_uploads(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        upload_id_token: Option<&str>,
        max_uploads: Option<usize>,
    ) -> S3ServiceResult<Page<UploadSummary>> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let prefix = prefix.unwrap_or_default();

        let mut uploads: Vec<UploadSummary> = bucket_ref
            .multipart_uploads
            .iter()
            .filter(|entry| entry.key.starts_with(prefix))
            .map(|entry| entry.summary())
            .collect();
        uploads.sort_by(|a, b| {
            a.key
                .cmp(&b.key)
                .then(a.initiated.cmp(&b.initiated))
                .then_with(|| a.upload_id.cmp(&b.upload_id))
        });

        let max = max_uploads.unwrap_or(self.config.default_max_uploads);
        Ok(paginate(&uploads, upload_id_token, max, |u| {
            u.upload_id.as_str()
        }))
    }
}
