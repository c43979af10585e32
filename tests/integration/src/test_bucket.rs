//! Bucket lifecycle integration tests.

#[cfg(test)]
mod tests {
    use mockstack_s3_core::error::S3ServiceError;

    use crate::{cleanup_bucket, create_test_bucket, put_text, test_bucket_name, test_engine};

    #[test]
    fn test_should_create_list_and_delete_buckets() {
        let s3 = test_engine();
        let first = create_test_bucket(&s3, "one");
        let second = create_test_bucket(&s3, "two");

        let names: Vec<String> = s3.list_buckets().into_iter().map(|b| b.name).collect();
        let mut expected = vec![first.clone(), second.clone()];
        expected.sort();
        assert_eq!(names, expected);

        s3.delete_bucket(&first)
            .unwrap_or_else(|e| panic!("delete failed: {e}"));
        assert!(!s3.bucket_exists(&first));
        cleanup_bucket(&s3, &second);
        assert!(s3.list_buckets().is_empty());
    }

    #[test]
    fn test_should_fail_to_create_existing_bucket() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "dup");
        assert!(matches!(
            s3.create_bucket(&bucket),
            Err(S3ServiceError::BucketAlreadyOwnedByYou { .. })
        ));
    }

    #[test]
    fn test_should_refuse_to_delete_non_empty_bucket_until_cleared() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "full");
        put_text(&s3, &bucket, "file.txt", "data");

        assert!(matches!(
            s3.delete_bucket(&bucket),
            Err(S3ServiceError::BucketNotEmpty { .. })
        ));

        s3.delete_object(&bucket, "file.txt")
            .unwrap_or_else(|e| panic!("delete object failed: {e}"));
        s3.delete_bucket(&bucket)
            .unwrap_or_else(|e| panic!("delete bucket failed: {e}"));
    }

    #[test]
    fn test_should_delete_versioned_bucket_holding_only_history() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "history");
        s3.put_bucket_versioning(&bucket, "Enabled")
            .unwrap_or_else(|e| panic!("enable failed: {e}"));
        put_text(&s3, &bucket, "k", "v1");
        s3.delete_object(&bucket, "k")
            .unwrap_or_else(|e| panic!("delete object failed: {e}"));

        s3.delete_bucket(&bucket)
            .unwrap_or_else(|e| panic!("delete bucket failed: {e}"));
        assert!(!s3.bucket_exists(&bucket));
    }

    #[test]
    fn test_should_fail_to_delete_missing_bucket() {
        let s3 = test_engine();
        assert!(matches!(
            s3.delete_bucket(&test_bucket_name("ghost")),
            Err(S3ServiceError::NoSuchBucket { .. })
        ));
    }

    #[test]
    fn test_should_page_buckets_by_name_token() {
        let s3 = test_engine();
        for name in ["b-1", "b-2", "b-3"] {
            s3.create_bucket(name)
                .unwrap_or_else(|e| panic!("create failed: {e}"));
        }
        let first = s3.list_buckets_page(None, Some(2));
        assert_eq!(first.next_token.as_deref(), Some("b-3"));
        let rest = s3.list_buckets_page(first.next_token.as_deref(), Some(2));
        assert_eq!(rest.items.len(), 1);
        assert!(rest.next_token.is_none());
    }

    #[test]
    fn test_should_clear_everything_on_reset() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "reset");
        put_text(&s3, &bucket, "k", "v");
        s3.reset();
        assert!(!s3.bucket_exists(&bucket));
    }
}
