//! Object operations.
//!
//! Implements `put_object`, `get_object`, `get_object_version`,
//! `head_object`, `head_object_version`, `delete_object`, and
//! `delete_object_version`.

use bytes::Bytes;
use tracing::debug;

use crate::error::{S3ServiceError, S3ServiceResult};
use crate::provider::MockStackS3;
use crate::state::{
    DeletedObject, ObjectHead, ObjectMetadata, ObjectVersion, S3Bucket, S3DeleteMarker, S3Object,
    VersioningStatus,
};
use crate::utils::NULL_VERSION_ID;

impl MockStackS3 {
    /// Store an object, creating a new version according to the bucket's
    /// versioning status.
    ///
    /// - `Enabled`: a fresh version ID is allocated and the version is
    ///   prepended to the key's history.
    /// - `Suspended`: the version ID is `"null"` and any existing `"null"`
    ///   version of the key is replaced.
    /// - `Unset`: the object has no version ID and overwrites the key.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist.
    pub fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> S3ServiceResult<S3Object> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let object = self.store_object(&bucket_ref, |version_id| {
            S3Object::new(key, version_id, body, metadata)
        });

        debug!(
            bucket = %bucket,
            key = %key,
            version_id = object.version_id.as_deref().unwrap_or(""),
            size = object.size,
            "put_object completed"
        );
        Ok(object)
    }

    /// Write the object produced by `build` as the key's newest version.
    ///
    /// The version ID is allocated under the object-store write lock, so
    /// versions of a key are ordered the same way as their IDs.
    pub(crate) fn store_object(
        &self,
        bucket: &S3Bucket,
        build: impl FnOnce(Option<String>) -> S3Object,
    ) -> S3Object {
        let status = bucket.versioning.read();
        let mut store = bucket.objects.write();
        let version_id = match *status {
            VersioningStatus::Unset => None,
            VersioningStatus::Enabled => Some(self.state.next_version_id()),
            VersioningStatus::Suspended => Some(NULL_VERSION_ID.to_owned()),
        };
        let object = build(version_id);
        store.insert(ObjectVersion::Object(Box::new(object.clone())));
        object
    }

    /// Get the current version of an object.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket`, or `NoSuchKey` if the key is absent or its
    /// newest version is a delete marker.
    pub fn get_object(&self, bucket: &str, key: &str) -> S3ServiceResult<S3Object> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let store = bucket_ref.objects.read();
        store
            .get(key)
            .cloned()
            .ok_or_else(|| S3ServiceError::NoSuchKey {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            })
    }

    /// Get a specific version of an object.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket`, `NoSuchVersion` if the key has no such
    /// version, or `MethodNotAllowed` if the version is a delete marker.
    pub fn get_object_version(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> S3ServiceResult<S3Object> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let store = bucket_ref.objects.read();
        if let Some(obj) = store.get_version(key, version_id) {
            return Ok(obj.clone());
        }
        if store.is_delete_marker(key, version_id) {
            return Err(S3ServiceError::MethodNotAllowed {
                key: key.to_owned(),
                version_id: version_id.to_owned(),
            });
        }
        Err(S3ServiceError::NoSuchVersion {
            key: key.to_owned(),
            version_id: version_id.to_owned(),
        })
    }

    /// Get the metadata of the current version of an object, without its
    /// body.
    ///
    /// # Errors
    ///
    /// Same as [`MockStackS3::get_object`].
    pub fn head_object(&self, bucket: &str, key: &str) -> S3ServiceResult<ObjectHead> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let store = bucket_ref.objects.read();
        store
            .get(key)
            .map(ObjectHead::from)
            .ok_or_else(|| S3ServiceError::NoSuchKey {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            })
    }

    /// Get the metadata of a specific version of an object.
    ///
    /// # Errors
    ///
    /// Same as [`MockStackS3::get_object_version`].
    pub fn head_object_version(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> S3ServiceResult<ObjectHead> {
        self.get_object_version(bucket, key, version_id)
            .map(|obj| obj.head())
    }

    /// Delete the current version of an object.
    ///
    /// - `Enabled`: prepends a new delete marker and returns its version ID.
    /// - `Suspended`: writes a `"null"` delete marker, replacing any existing
    ///   `"null"` version.
    /// - `Unset`: removes the key and returns the empty placeholder.
    ///
    /// Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist.
    pub fn delete_object(&self, bucket: &str, key: &str) -> S3ServiceResult<DeletedObject> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let status = bucket_ref.versioning.read();
        let mut store = bucket_ref.objects.write();

        let version_id = match *status {
            VersioningStatus::Unset => {
                store.remove(key);
                debug!(bucket = %bucket, key = %key, "delete_object removed key");
                return Ok(DeletedObject::placeholder(key));
            }
            VersioningStatus::Enabled => self.state.next_version_id(),
            VersioningStatus::Suspended => NULL_VERSION_ID.to_owned(),
        };

        store.insert(ObjectVersion::DeleteMarker(S3DeleteMarker::new(
            key,
            version_id.clone(),
        )));
        debug!(bucket = %bucket, key = %key, version_id = %version_id, "delete marker created");

        Ok(DeletedObject {
            key: key.to_owned(),
            version_id: Some(version_id),
            delete_marker: true,
        })
    }

    /// Permanently remove one version (object or delete marker) of a key.
    ///
    /// The next newest version becomes current. Removing a version that does
    /// not exist succeeds with the empty placeholder.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist.
    pub fn delete_object_version(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> S3ServiceResult<DeletedObject> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let removed = bucket_ref.objects.write().delete_version(key, version_id);

        let Some(removed) = removed else {
            return Ok(DeletedObject::placeholder(key));
        };
        debug!(
            bucket = %bucket,
            key = %key,
            version_id = %version_id,
            delete_marker = removed.is_delete_marker(),
            "object version removed"
        );
        Ok(DeletedObject {
            key: key.to_owned(),
            version_id: Some(version_id.to_owned()),
            delete_marker: removed.is_delete_marker(),
        })
    }
}
