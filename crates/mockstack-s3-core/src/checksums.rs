//! Content hashing for ETags.
//!
//! Single-part objects carry the quoted hex MD5 of their body. Objects
//! assembled from a multipart upload carry the composite form
//! `"<md5 of concatenated part digests>-<part count>"`.

use digest::Digest;

/// Compute the hex-encoded MD5 digest of `data`.
///
/// This is the raw hex digest. For an S3-formatted ETag (quoted), use
/// [`compute_etag`].
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::checksums::compute_md5;
///
/// let digest = compute_md5(b"hello");
/// assert_eq!(digest, "5d41402abc4b2a76b9719d911017c592");
/// ```
#[must_use]
pub fn compute_md5(data: &[u8]) -> String {
    let hash = md5::Md5::digest(data);
    hex::encode(hash)
}

/// Compute the quoted hex-encoded MD5 digest of `data`, suitable for use as
/// an S3 ETag.
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::checksums::compute_etag;
///
/// let etag = compute_etag(b"");
/// assert_eq!(etag, "\"d41d8cd98f00b204e9800998ecf8427e\"");
/// ```
#[must_use]
pub fn compute_etag(data: &[u8]) -> String {
    format!("\"{}\"", compute_md5(data))
}

/// Compute a composite ETag for a multipart upload.
///
/// Each entry of `part_etags` is a part ETag, quoted or not. The digests are
/// decoded, concatenated in the given order and hashed again; the part count
/// is appended after a dash.
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::checksums::compute_multipart_etag;
///
/// let etag = compute_multipart_etag(&["\"5d41402abc4b2a76b9719d911017c592\""]);
/// assert!(etag.ends_with("-1\""));
/// ```
#[must_use]
pub fn compute_multipart_etag(part_etags: &[impl AsRef<str>]) -> String {
    let mut combined = Vec::with_capacity(part_etags.len() * 16);
    for etag in part_etags {
        let hex_str = etag.as_ref().trim_matches('"');
        if let Ok(bytes) = hex::decode(hex_str) {
            combined.extend_from_slice(&bytes);
        }
    }
    let final_md5 = hex::encode(md5::Md5::digest(&combined));
    format!("\"{final_md5}-{}\"", part_etags.len())
}
