//! Listing operations.
//!
//! Implements `list_objects` (marker pagination), `list_objects_v2`
//! (continuation-token pagination), and `list_object_versions`.

use serde::Serialize;
use tracing::debug;

use crate::error::S3ServiceResult;
use crate::provider::MockStackS3;
use crate::state::{ListResult, ObjectHead, VersionListResult};
use crate::utils::{decode_continuation_token, encode_continuation_token};

/// One page of a continuation-token object listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsV2Result {
    /// Current objects in key order.
    pub contents: Vec<ObjectHead>,
    /// Rolled-up common prefixes in sorted order.
    pub common_prefixes: Vec<String>,
    /// Whether more matches exist past this page.
    pub is_truncated: bool,
    /// Opaque token resuming after this page.
    pub next_continuation_token: Option<String>,
    /// Number of entries plus common prefixes in this page.
    pub key_count: usize,
}

impl MockStackS3 {
    /// List current objects under `prefix`, rolling keys up at `delimiter`.
    ///
    /// Results start strictly after `marker`. Entries and common prefixes
    /// together are capped at `max_keys` (config default when `None`).
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist.
    pub fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
        marker: Option<&str>,
        max_keys: Option<usize>,
    ) -> S3ServiceResult<ListResult> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let max_keys = max_keys.unwrap_or(self.config.default_max_keys);
        let result = bucket_ref.objects.read().list_objects(
            prefix.unwrap_or_default(),
            delimiter.unwrap_or_default(),
            marker.unwrap_or_default(),
            max_keys,
        );

        debug!(
            bucket = %bucket,
            count = result.objects.len(),
            prefixes = result.common_prefixes.len(),
            truncated = result.is_truncated,
            "list_objects completed"
        );
        Ok(result)
    }

    /// List current objects with opaque continuation tokens.
    ///
    /// A `continuation_token` takes precedence over `start_after`.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist, or
    /// `InvalidArgument` if the continuation token cannot be decoded.
    pub fn list_objects_v2(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
        continuation_token: Option<&str>,
        start_after: Option<&str>,
        max_keys: Option<usize>,
    ) -> S3ServiceResult<ListObjectsV2Result> {
        let decoded = continuation_token
            .map(decode_continuation_token)
            .transpose()?;
        let marker = decoded.as_deref().or(start_after);

        let result = self.list_objects(bucket, prefix, delimiter, marker, max_keys)?;
        let next_continuation_token = if result.is_truncated {
            result.next_marker.as_deref().map(encode_continuation_token)
        } else {
            None
        };

        Ok(ListObjectsV2Result {
            key_count: result.objects.len() + result.common_prefixes.len(),
            contents: result.objects,
            common_prefixes: result.common_prefixes,
            is_truncated: result.is_truncated,
            next_continuation_token,
        })
    }

    /// List every version and delete marker under `prefix`.
    ///
    /// Keys are visited in order and versions newest first. With both
    /// markers set, the listing resumes after that version of `key_marker`;
    /// with only `key_marker`, it resumes at the next key.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist.
    pub fn list_object_versions(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
        key_marker: Option<&str>,
        version_id_marker: Option<&str>,
        max_keys: Option<usize>,
    ) -> S3ServiceResult<VersionListResult> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let max_keys = max_keys.unwrap_or(self.config.default_max_keys);
        let result = bucket_ref.objects.read().list_object_versions(
            prefix.unwrap_or_default(),
            delimiter.unwrap_or_default(),
            key_marker.unwrap_or_default(),
            version_id_marker.unwrap_or_default(),
            max_keys,
        );

        debug!(
            bucket = %bucket,
            count = result.versions.len(),
            prefixes = result.common_prefixes.len(),
            truncated = result.is_truncated,
            "list_object_versions completed"
        );
        Ok(result)
    }
}
