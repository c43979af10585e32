//! The S3 engine entry point.
//!
//! [`MockStackS3`] owns all engine state (buckets, objects, versions,
//! multipart uploads). Individual operations are implemented in the
//! [`crate::ops`] submodules as inherent methods on this type.

use std::sync::Arc;

use crate::config::S3Config;
use crate::state::service::S3ServiceState;

/// The S3 engine.
///
/// All fields are `Arc`-wrapped for cheap cloning and shared ownership
/// across request tasks. Every operation is synchronous and bounded-time.
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::MockStackS3;
/// use mockstack_s3_core::config::S3Config;
///
/// let s3 = MockStackS3::new(S3Config::default());
/// s3.create_bucket("b1").unwrap();
/// assert!(s3.bucket_exists("b1"));
/// ```
#[derive(Debug, Clone)]
pub struct MockStackS3 {
    /// Bucket, object and upload state.
    pub(crate) state: Arc<S3ServiceState>,
    /// Engine configuration.
    pub(crate) config: Arc<S3Config>,
}

impl Default for MockStackS3 {
    fn default() -> Self {
        Self::new(S3Config::default())
    }
}

impl MockStackS3 {
    /// Create a new engine with the given configuration and no buckets.
    #[must_use]
    pub fn new(config: S3Config) -> Self {
        Self {
            state: Arc::new(S3ServiceState::new()),
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the service state.
    #[must_use]
    pub fn state(&self) -> &S3ServiceState {
        &self.state
    }

    /// Returns a reference to the engine configuration.
    #[must_use]
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Reset all state (buckets, objects, multipart uploads).
    pub fn reset(&self) {
        self.state.reset();
    }
}
