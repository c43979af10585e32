//! Shared utilities for the S3 engine.
//!
//! Provides version-ID and upload-ID generation, continuation-token
//! encoding, and ETag comparison helpers for conditional requests.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::Utc;
use uuid::Uuid;

use crate::error::S3ServiceError;

/// Version ID carried by objects written while versioning is suspended, and
/// by pre-versioning objects once versioning is turned on.
pub const NULL_VERSION_ID: &str = "null";

// ---------------------------------------------------------------------------
// ID generation
// ---------------------------------------------------------------------------

/// Monotonic version-ID source.
///
/// Every ID is a fixed-width, zero-padded decimal, so IDs compare the same
/// way as strings and as numbers, and each ID is strictly greater than every
/// ID issued before it by the same generator. The counter is seeded from the
/// wall clock (microseconds) so a freshly constructed store does not reissue
/// the IDs of a discarded one.
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::utils::VersionIdGenerator;
///
/// let ids = VersionIdGenerator::new();
/// let a = ids.next_id();
/// let b = ids.next_id();
/// assert!(b > a);
/// assert_eq!(a.len(), 20);
/// ```
#[derive(Debug)]
pub struct VersionIdGenerator {
    next: AtomicU64,
}

impl Default for VersionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionIdGenerator {
    /// Create a generator seeded from the current time.
    #[must_use]
    pub fn new() -> Self {
        let seed = u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0);
        Self::starting_at(seed)
    }

    /// Create a generator whose first ID is `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Allocate the next version ID.
    #[must_use]
    pub fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{n:020}")
    }
}

/// Generate a random upload ID for multipart uploads.
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::utils::generate_upload_id;
///
/// let id = generate_upload_id();
/// assert_eq!(id.len(), 32);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn generate_upload_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// ---------------------------------------------------------------------------
// Conditional request helpers
// ---------------------------------------------------------------------------

/// Check whether the given ETag satisfies an `If-Match` condition.
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::utils::is_valid_if_match;
///
/// assert!(is_valid_if_match("\"abc\"", "*"));
/// assert!(is_valid_if_match("\"abc\"", "abc"));
/// assert!(!is_valid_if_match("\"abc\"", "\"xyz\""));
/// ```
#[must_use]
pub fn is_valid_if_match(etag: &str, if_match: &str) -> bool {
    if if_match == "*" {
        return true;
    }
    normalize_etag(etag) == normalize_etag(if_match)
}

/// Check whether the given ETag satisfies an `If-None-Match` condition.
///
/// Returns `false` when the ETags match (a 304 is appropriate).
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::utils::is_valid_if_none_match;
///
/// assert!(!is_valid_if_none_match("\"abc\"", "*"));
/// assert!(is_valid_if_none_match("\"abc\"", "\"xyz\""));
/// ```
#[must_use]
pub fn is_valid_if_none_match(etag: &str, if_none_match: &str) -> bool {
    if if_none_match == "*" {
        return false;
    }
    normalize_etag(etag) != normalize_etag(if_none_match)
}

/// Strip surrounding double quotes from an ETag.
pub(crate) fn normalize_etag(etag: &str) -> &str {
    etag.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(etag)
}

// ---------------------------------------------------------------------------
// Continuation tokens
// ---------------------------------------------------------------------------

/// Encode a listing marker as an opaque continuation token.
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::utils::{decode_continuation_token, encode_continuation_token};
///
/// let token = encode_continuation_token("photos/2024/img.jpg");
/// assert_eq!(decode_continuation_token(&token).unwrap(), "photos/2024/img.jpg");
/// ```
#[must_use]
pub fn encode_continuation_token(key: &str) -> String {
    BASE64_STANDARD.encode(key.as_bytes())
}

/// Decode a continuation token back to a listing marker.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] if the token is not valid
/// base64 or does not decode to valid UTF-8.
pub fn decode_continuation_token(token: &str) -> Result<String, S3ServiceError> {
    let bytes = BASE64_STANDARD
        .decode(token)
        .map_err(|_| S3ServiceError::InvalidArgument {
            message: "Invalid continuation token".to_owned(),
        })?;
    String::from_utf8(bytes).map_err(|_| S3ServiceError::InvalidArgument {
        message: "Continuation token contains invalid UTF-8".to_owned(),
    })
}
