//! ETag precondition helper integration tests (If-Match, If-None-Match).

#[cfg(test)]
mod tests {
    use mockstack_s3_core::utils::{is_valid_if_match, is_valid_if_none_match};

    use crate::{cleanup_bucket, create_test_bucket, put_text, test_engine};

    #[test]
    fn test_should_match_stored_etag() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "ifmatch");
        put_text(&s3, &bucket, "cond.txt", "data");
        let head = s3
            .head_object(&bucket, "cond.txt")
            .unwrap_or_else(|e| panic!("head failed: {e}"));

        assert!(is_valid_if_match(&head.etag, &head.etag));
        assert!(is_valid_if_match(&head.etag, head.etag.trim_matches('"')));
        assert!(!is_valid_if_match(&head.etag, "\"wrong-etag\""));

        cleanup_bucket(&s3, &bucket);
    }

    #[test]
    fn test_should_detect_changed_object_with_if_none_match() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "ifnone");
        put_text(&s3, &bucket, "cond.txt", "first");
        let cached = s3
            .head_object(&bucket, "cond.txt")
            .unwrap_or_else(|e| panic!("head failed: {e}"))
            .etag;

        assert!(!is_valid_if_none_match(&cached, &cached));

        put_text(&s3, &bucket, "cond.txt", "second");
        let current = s3
            .head_object(&bucket, "cond.txt")
            .unwrap_or_else(|e| panic!("head failed: {e}"))
            .etag;
        assert!(is_valid_if_none_match(&current, &cached));

        cleanup_bucket(&s3, &bucket);
    }
}
