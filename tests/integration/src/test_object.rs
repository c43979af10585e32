//! Object round-trip integration tests.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;
    use mockstack_s3_core::checksums::compute_etag;
    use mockstack_s3_core::error::S3ServiceError;
    use mockstack_s3_core::state::ObjectMetadata;

    use crate::{cleanup_bucket, create_test_bucket, put_text, test_engine};

    #[test]
    fn test_should_round_trip_body_and_metadata() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "rt");

        let metadata = ObjectMetadata {
            content_type: Some("application/json".to_owned()),
            cache_control: Some("no-cache".to_owned()),
            user_metadata: HashMap::from([("owner".to_owned(), "team-a".to_owned())]),
            ..ObjectMetadata::default()
        };
        let body = Bytes::from_static(br#"{"hello":"world"}"#);
        s3.put_object(&bucket, "doc.json", body.clone(), metadata.clone())
            .unwrap_or_else(|e| panic!("put failed: {e}"));

        let got = s3
            .get_object(&bucket, "doc.json")
            .unwrap_or_else(|e| panic!("get failed: {e}"));
        assert_eq!(got.body, body);
        assert_eq!(got.etag, compute_etag(&body));
        assert_eq!(got.size, body.len() as u64);
        assert_eq!(got.metadata, metadata);

        let head = s3
            .head_object(&bucket, "doc.json")
            .unwrap_or_else(|e| panic!("head failed: {e}"));
        assert_eq!(head.etag, got.etag);
        assert_eq!(head.metadata.user_metadata.get("owner").map(String::as_str), Some("team-a"));

        cleanup_bucket(&s3, &bucket);
    }

    #[test]
    fn test_should_round_trip_empty_and_binary_bodies() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "bin");
        let binary: Vec<u8> = (0..=255).collect();

        for (key, body) in [("empty", Bytes::new()), ("binary", Bytes::from(binary))] {
            s3.put_object(&bucket, key, body.clone(), ObjectMetadata::default())
                .unwrap_or_else(|e| panic!("put {key} failed: {e}"));
            let got = s3
                .get_object(&bucket, key)
                .unwrap_or_else(|e| panic!("get {key} failed: {e}"));
            assert_eq!(got.body, body);
        }

        cleanup_bucket(&s3, &bucket);
    }

    #[test]
    fn test_should_not_let_callers_mutate_stored_bytes() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "immut");
        put_text(&s3, &bucket, "k", "original");

        let copy = s3
            .get_object(&bucket, "k")
            .unwrap_or_else(|e| panic!("get failed: {e}"));
        let mut local = copy.body.to_vec();
        local.fill(b'x');

        let again = s3
            .get_object(&bucket, "k")
            .unwrap_or_else(|e| panic!("get failed: {e}"));
        assert_eq!(again.body, Bytes::from_static(b"original"));
    }

    #[test]
    fn test_should_delete_unversioned_object() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "del");
        put_text(&s3, &bucket, "k", "v");

        let deleted = s3
            .delete_object(&bucket, "k")
            .unwrap_or_else(|e| panic!("delete failed: {e}"));
        assert!(!deleted.delete_marker);
        assert!(matches!(
            s3.get_object(&bucket, "k"),
            Err(S3ServiceError::NoSuchKey { .. })
        ));
        s3.delete_bucket(&bucket)
            .unwrap_or_else(|e| panic!("delete bucket failed: {e}"));
    }

    #[test]
    fn test_should_treat_keys_as_case_sensitive() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "case");
        put_text(&s3, &bucket, "Key", "upper");
        put_text(&s3, &bucket, "key", "lower");

        let upper = s3
            .get_object(&bucket, "Key")
            .unwrap_or_else(|e| panic!("get failed: {e}"));
        assert_eq!(upper.body, Bytes::from_static(b"upper"));
        let listed = s3
            .list_objects(&bucket, None, None, None, None)
            .unwrap_or_else(|e| panic!("list failed: {e}"));
        assert_eq!(listed.objects.len(), 2);

        cleanup_bucket(&s3, &bucket);
    }
}
