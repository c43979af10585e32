//! End-to-end scenario tests for the MockStack S3 engine.
//!
//! Each test builds its own engine through [`test_engine`], so tests never
//! share state. Tracing goes through the test writer; set `RUST_LOG` to see
//! engine events:
//! ```text
//! RUST_LOG=mockstack_s3_core=debug cargo test -p mockstack-integration
//! ```

use std::sync::Once;

use bytes::Bytes;
use mockstack_s3_core::state::ObjectMetadata;
use mockstack_s3_core::{MockStackS3, S3Config};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        let config = S3Config::from_env();
        mockstack_core::telemetry::init_test_tracing(&config.log_level);
    });
}

/// Create an engine with default configuration.
#[must_use]
pub fn test_engine() -> MockStackS3 {
    test_engine_with(S3Config::default())
}

/// Create an engine with the given configuration.
#[must_use]
pub fn test_engine_with(config: S3Config) -> MockStackS3 {
    init_tracing();
    MockStackS3::new(config)
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket and return its name.
pub fn create_test_bucket(s3: &MockStackS3, prefix: &str) -> String {
    let name = test_bucket_name(prefix);
    s3.create_bucket(&name)
        .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
    name
}

/// Store `body` under `key` with default metadata.
pub fn put_text(s3: &MockStackS3, bucket: &str, key: &str, body: &str) -> Option<String> {
    s3.put_object(
        bucket,
        key,
        Bytes::copy_from_slice(body.as_bytes()),
        ObjectMetadata::default(),
    )
    .unwrap_or_else(|e| panic!("failed to put {bucket}/{key}: {e}"))
    .version_id
}

/// Remove every version and upload in a bucket, then delete the bucket.
pub fn cleanup_bucket(s3: &MockStackS3, bucket: &str) {
    let Ok(versions) = s3.list_object_versions(bucket, None, None, None, None, Some(usize::MAX))
    else {
        return;
    };
    for entry in &versions.versions {
        let version_id = entry.version.version_id_or_null();
        let _ = s3.delete_object_version(bucket, entry.version.key(), version_id);
    }

    if let Ok(uploads) = s3.list_multipart_uploads(bucket, None, None, Some(usize::MAX)) {
        for upload in &uploads.items {
            let _ = s3.abort_multipart_upload(bucket, &upload.key, &upload.upload_id);
        }
    }

    let _ = s3.delete_bucket(bucket);
}

mod test_bucket;
mod test_concurrency;
mod test_error;
mod test_list;
mod test_object;
mod test_precondition;
