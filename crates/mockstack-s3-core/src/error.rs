//! S3 engine error types.
//!
//! Defines [`S3ServiceError`], the error enum returned by every engine
//! operation. Each variant carries the identifiers the caller needs to build
//! a response message, and maps to a well-known S3 error code and HTTP
//! status through [`S3ServiceError::code`] and
//! [`S3ServiceError::status_code`]. Callers match on variants, never on the
//! message text.
//!
//! # Usage
//!
//! ```
//! use mockstack_s3_core::error::S3ServiceError;
//!
//! let err = S3ServiceError::NoSuchBucket {
//!     bucket: "my-bucket".to_owned(),
//! };
//! assert_eq!(err.code(), "NoSuchBucket");
//! assert_eq!(err.status_code(), 404);
//! ```

/// S3 engine error type.
///
/// None of these are fatal: every failure leaves the store untouched and a
/// retry of the same call is always safe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum S3ServiceError {
    // -----------------------------------------------------------------------
    // Bucket errors
    // -----------------------------------------------------------------------
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The bucket already exists and is owned by you.
    #[error(
        "Your previous request to create the named bucket succeeded and you already own it: {bucket}"
    )]
    BucketAlreadyOwnedByYou {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The bucket still holds current objects and cannot be deleted.
    #[error("The bucket you tried to delete is not empty: {bucket}")]
    BucketNotEmpty {
        /// The bucket name that is not empty.
        bucket: String,
    },

    /// The requested versioning status is not valid for this bucket.
    #[error("The versioning status is not valid: {status}")]
    InvalidVersioningState {
        /// The rejected status.
        status: String,
    },

    // -----------------------------------------------------------------------
    // Object / key errors
    // -----------------------------------------------------------------------
    /// The specified key does not exist (or its newest version is a delete
    /// marker).
    #[error("The specified key does not exist: {bucket}/{key}")]
    NoSuchKey {
        /// The bucket that was searched.
        bucket: String,
        /// The key that was not found.
        key: String,
    },

    /// The specified version does not exist.
    #[error("The specified version does not exist: key={key}, version_id={version_id}")]
    NoSuchVersion {
        /// The key for the version.
        key: String,
        /// The version ID that was not found.
        version_id: String,
    },

    /// A delete marker was addressed directly; it has no body to return.
    #[error(
        "The specified method is not allowed against this resource: key={key}, version_id={version_id}"
    )]
    MethodNotAllowed {
        /// The key of the delete marker.
        key: String,
        /// The version ID of the delete marker.
        version_id: String,
    },

    // -----------------------------------------------------------------------
    // Multipart upload errors
    // -----------------------------------------------------------------------
    /// The specified multipart upload does not exist.
    #[error("The specified upload does not exist: {upload_id}")]
    NoSuchUpload {
        /// The upload ID that was not found.
        upload_id: String,
    },

    /// A listed part is missing or its ETag does not match the stored part.
    #[error("One or more of the specified parts could not be found: upload_id={upload_id}, part={part_number}")]
    InvalidPart {
        /// The upload being completed.
        upload_id: String,
        /// The offending part number.
        part_number: u32,
    },

    /// The list of parts was not in strictly ascending order.
    #[error("The list of parts was not in ascending order: upload_id={upload_id}")]
    InvalidPartOrder {
        /// The upload being completed.
        upload_id: String,
    },

    // -----------------------------------------------------------------------
    // Argument errors
    // -----------------------------------------------------------------------
    /// An argument provided is invalid.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },
}

impl S3ServiceError {
    /// The S3 error code string for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSuchBucket { .. } => "NoSuchBucket",
            Self::BucketAlreadyOwnedByYou { .. } => "BucketAlreadyOwnedByYou",
            Self::BucketNotEmpty { .. } => "BucketNotEmpty",
            Self::InvalidVersioningState { .. } => "IllegalVersioningConfigurationException",
            Self::NoSuchKey { .. } => "NoSuchKey",
            Self::NoSuchVersion { .. } => "NoSuchVersion",
            Self::MethodNotAllowed { .. } => "MethodNotAllowed",
            Self::NoSuchUpload { .. } => "NoSuchUpload",
            Self::InvalidPart { .. } => "InvalidPart",
            Self::InvalidPartOrder { .. } => "InvalidPartOrder",
            Self::InvalidArgument { .. } => "InvalidArgument",
        }
    }

    /// The HTTP status code S3 uses for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NoSuchBucket { .. }
            | Self::NoSuchKey { .. }
            | Self::NoSuchVersion { .. }
            | Self::NoSuchUpload { .. } => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::BucketAlreadyOwnedByYou { .. } | Self::BucketNotEmpty { .. } => 409,
            Self::InvalidVersioningState { .. }
            | Self::InvalidPart { .. }
            | Self::InvalidPartOrder { .. }
            | Self::InvalidArgument { .. } => 400,
        }
    }
}

/// Convenience result type for S3 engine operations.
pub type S3ServiceResult<T> = Result<T, S3ServiceError>;
