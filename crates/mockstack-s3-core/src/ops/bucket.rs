//! Bucket operations.
//!
//! Implements `create_bucket`, `delete_bucket`, `list_buckets`,
//! `list_buckets_page`, `bucket_exists`, and the bucket versioning
//! get/put pair.

use mockstack_core::{Page, paginate};
use tracing::debug;

use crate::error::S3ServiceResult;
use crate::provider::MockStackS3;
use crate::state::{BucketInfo, VersioningStatus};

impl MockStackS3 {
    /// Create a new, empty, un-versioned bucket.
    ///
    /// # Errors
    ///
    /// Returns `BucketAlreadyOwnedByYou` if the name is taken.
    pub fn create_bucket(&self, name: &str) -> S3ServiceResult<()> {
        self.state.create_bucket(name)?;
        Ok(())
    }

    /// Delete a bucket.
    ///
    /// Delete markers, older versions and in-progress multipart uploads do
    /// not block deletion; they are dropped with the bucket.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if absent, `BucketNotEmpty` if any key still
    /// has a current object.
    pub fn delete_bucket(&self, name: &str) -> S3ServiceResult<()> {
        self.state.delete_bucket(name)
    }

    /// List all buckets ordered by name.
    #[must_use]
    pub fn list_buckets(&self) -> Vec<BucketInfo> {
        self.state.list_buckets()
    }

    /// List one page of buckets ordered by name.
    ///
    /// `continuation_token` is the `next_token` of the previous page. A token
    /// naming a bucket that no longer exists restarts the listing.
    #[must_use]
    pub fn list_buckets_page(
        &self,
        continuation_token: Option<&str>,
        max_buckets: Option<usize>,
    ) -> Page<BucketInfo> {
        let buckets = self.state.list_buckets();
        let max = max_buckets.unwrap_or(self.config.default_max_buckets);
        paginate(&buckets, continuation_token, max, |b| b.name.as_str())
    }

    /// Whether a bucket exists.
    #[must_use]
    pub fn bucket_exists(&self, name: &str) -> bool {
        self.state.bucket_exists(name)
    }

    /// Set the versioning status of a bucket from its string form
    /// (`"Enabled"`, `"Suspended"` or `"Unset"`).
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if absent. Returns `InvalidVersioningState` for
    /// an unknown status, or for `"Unset"` once versioning was configured.
    pub fn put_bucket_versioning(&self, name: &str, status: &str) -> S3ServiceResult<()> {
        let target: VersioningStatus = status.parse()?;
        let bucket = self.state.get_bucket(name)?;
        bucket.set_versioning(target)?;
        debug!(bucket = %name, status = target.as_str(), "put_bucket_versioning completed");
        Ok(())
    }

    /// Get the versioning status of a bucket.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if absent.
    pub fn get_bucket_versioning(&self, name: &str) -> S3ServiceResult<VersioningStatus> {
        let bucket = self.state.get_bucket(name)?;
        Ok(bucket.versioning_status())
    }
}
