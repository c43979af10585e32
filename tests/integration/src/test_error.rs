//! Error taxonomy integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use mockstack_s3_core::error::S3ServiceError;
    use mockstack_s3_core::state::ObjectMetadata;

    use crate::{cleanup_bucket, create_test_bucket, put_text, test_bucket_name, test_engine};

    #[test]
    fn test_should_return_no_such_bucket_on_put() {
        let s3 = test_engine();
        let bucket = test_bucket_name("ghost");

        let err = s3
            .put_object(&bucket, "file.txt", Bytes::new(), ObjectMetadata::default())
            .err()
            .unwrap_or_else(|| panic!("put to missing bucket should fail"));
        assert_eq!(err, S3ServiceError::NoSuchBucket { bucket });
        assert_eq!(err.code(), "NoSuchBucket");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_should_map_object_errors_to_s3_codes() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "codes");
        s3.put_bucket_versioning(&bucket, "Enabled")
            .unwrap_or_else(|e| panic!("enable failed: {e}"));
        put_text(&s3, &bucket, "k", "v");
        let marker = s3
            .delete_object(&bucket, "k")
            .unwrap_or_else(|e| panic!("delete failed: {e}"))
            .version_id
            .unwrap_or_default();

        let cases = [
            (s3.get_object(&bucket, "k").err(), "NoSuchKey", 404),
            (
                s3.get_object_version(&bucket, "k", "missing").err(),
                "NoSuchVersion",
                404,
            ),
            (
                s3.get_object_version(&bucket, "k", &marker).err(),
                "MethodNotAllowed",
                405,
            ),
            (s3.create_bucket(&bucket).err(), "BucketAlreadyOwnedByYou", 409),
            (
                s3.put_bucket_versioning(&bucket, "Maybe").err(),
                "IllegalVersioningConfigurationException",
                400,
            ),
            (
                s3.abort_multipart_upload(&bucket, "k", "no-such-upload").err(),
                "NoSuchUpload",
                404,
            ),
        ];

        for (err, code, status) in cases {
            let err = err.unwrap_or_else(|| panic!("expected {code}"));
            assert_eq!(err.code(), code);
            assert_eq!(err.status_code(), status, "{code}");
        }

        cleanup_bucket(&s3, &bucket);
    }

    #[test]
    fn test_should_render_identifiers_in_messages() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "msg");
        let err = s3
            .get_object(&bucket, "missing.txt")
            .err()
            .unwrap_or_else(|| panic!("get should fail"));
        assert!(err.to_string().contains("missing.txt"));

        cleanup_bucket(&s3, &bucket);
    }
}
