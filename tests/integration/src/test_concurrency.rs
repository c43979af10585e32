//! Concurrent access integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use bytes::Bytes;
    use futures::future::join_all;
    use mockstack_s3_core::state::ObjectMetadata;

    use crate::{cleanup_bucket, create_test_bucket, test_engine};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_keep_every_concurrent_version() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "race");
        s3.put_bucket_versioning(&bucket, "Enabled")
            .unwrap_or_else(|e| panic!("enable failed: {e}"));

        let tasks = (0..64).map(|n| {
            let s3 = s3.clone();
            let bucket = bucket.clone();
            tokio::spawn(async move {
                s3.put_object(
                    &bucket,
                    "hot-key",
                    Bytes::from(format!("writer-{n}")),
                    ObjectMetadata::default(),
                )
                .map(|obj| obj.version_id)
            })
        });

        let ids: BTreeSet<String> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| {
                joined
                    .unwrap_or_else(|e| panic!("task panicked: {e}"))
                    .unwrap_or_else(|e| panic!("put failed: {e}"))
                    .unwrap_or_else(|| panic!("missing version id"))
            })
            .collect();
        assert_eq!(ids.len(), 64);

        let history = s3
            .list_object_versions(&bucket, None, None, None, None, None)
            .unwrap_or_else(|e| panic!("list versions failed: {e}"));
        assert_eq!(history.versions.len(), 64);
        let listed: Vec<&str> = history
            .versions
            .iter()
            .filter_map(|v| v.version.version_id())
            .collect();
        assert!(listed.windows(2).all(|w| w[0] > w[1]));

        cleanup_bucket(&s3, &bucket);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_isolate_concurrent_buckets() {
        let s3 = test_engine();

        let tasks = (0_u8..8).map(|n| {
            let s3 = s3.clone();
            tokio::spawn(async move {
                let bucket = format!("bucket-{n}");
                s3.create_bucket(&bucket)?;
                for i in 0..20 {
                    s3.put_object(
                        &bucket,
                        &format!("key-{i:02}"),
                        Bytes::from(vec![n; 8]),
                        ObjectMetadata::default(),
                    )?;
                }
                s3.list_objects(&bucket, None, None, None, None)
            })
        });

        for joined in join_all(tasks).await {
            let listed = joined
                .unwrap_or_else(|e| panic!("task panicked: {e}"))
                .unwrap_or_else(|e| panic!("bucket work failed: {e}"));
            assert_eq!(listed.objects.len(), 20);
        }
        assert_eq!(s3.list_buckets().len(), 8);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_complete_upload_exactly_once() {
        let s3 = test_engine();
        let bucket = create_test_bucket(&s3, "once");
        s3.put_bucket_versioning(&bucket, "Enabled")
            .unwrap_or_else(|e| panic!("enable failed: {e}"));
        let upload_id = s3
            .create_multipart_upload(&bucket, "k", ObjectMetadata::default())
            .unwrap_or_else(|e| panic!("initiate failed: {e}"))
            .upload_id;
        let etag = s3
            .upload_part(&bucket, "k", &upload_id, 1, Bytes::from_static(b"part"))
            .unwrap_or_else(|e| panic!("upload failed: {e}"))
            .etag;

        let tasks = (0..8).map(|_| {
            let s3 = s3.clone();
            let bucket = bucket.clone();
            let upload_id = upload_id.clone();
            let etag = etag.clone();
            tokio::spawn(async move {
                s3.complete_multipart_upload(
                    &bucket,
                    "k",
                    &upload_id,
                    &[mockstack_s3_core::CompletedPart::new(1, etag)],
                )
            })
        });

        let succeeded = join_all(tasks)
            .await
            .into_iter()
            .filter(|joined| matches!(joined, Ok(Ok(_))))
            .count();
        assert_eq!(succeeded, 1);

        let history = s3
            .list_object_versions(&bucket, None, None, None, None, None)
            .unwrap_or_else(|e| panic!("list versions failed: {e}"));
        assert_eq!(history.versions.len(), 1);

        cleanup_bucket(&s3, &bucket);
    }
}
