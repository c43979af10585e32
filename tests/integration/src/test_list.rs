//! Listing integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use mockstack_s3_core::{MockStackS3, S3Config};

    use crate::{cleanup_bucket, create_test_bucket, put_text, test_engine, test_engine_with};

    const KEYS: &[&str] = &[
        "README",
        "assets/css/site.css",
        "assets/js/app.js",
        "assets/logo.png",
        "data/2024/jan.csv",
        "data/2024/feb.csv",
        "data/2025/jan.csv",
        "data/index.json",
        "notes.txt",
    ];

    fn seed(s3: &MockStackS3, prefix: &str) -> String {
        let bucket = create_test_bucket(s3, prefix);
        for key in KEYS {
            put_text(s3, &bucket, key, key);
        }
        bucket
    }

    /// Collect every entry and common prefix by paging with `page_size`.
    fn collect_pages(
        s3: &MockStackS3,
        bucket: &str,
        prefix: Option<&str>,
        page_size: usize,
    ) -> (Vec<String>, Vec<String>) {
        let mut keys = Vec::new();
        let mut prefixes = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let page = s3
                .list_objects(bucket, prefix, Some("/"), marker.as_deref(), Some(page_size))
                .unwrap_or_else(|e| panic!("list failed: {e}"));
            keys.extend(page.objects.into_iter().map(|o| o.key));
            prefixes.extend(page.common_prefixes);
            if !page.is_truncated {
                return (keys, prefixes);
            }
            marker = page.next_marker;
        }
    }

    #[test]
    fn test_should_partition_every_key_for_any_page_size() {
        let s3 = test_engine();
        let bucket = seed(&s3, "part");

        for page_size in 1..=6 {
            let (keys, prefixes) = collect_pages(&s3, &bucket, None, page_size);
            assert_eq!(keys, vec!["README", "notes.txt"], "page size {page_size}");
            assert_eq!(prefixes, vec!["assets/", "data/"], "page size {page_size}");

            for key in KEYS {
                let as_entry = keys.iter().any(|k| k == key);
                let under_prefix = prefixes.iter().any(|p| key.starts_with(p.as_str()));
                assert!(as_entry ^ under_prefix, "{key} must appear exactly once");
            }
        }

        cleanup_bucket(&s3, &bucket);
    }

    #[test]
    fn test_should_partition_below_nested_prefix() {
        let s3 = test_engine();
        let bucket = seed(&s3, "nested");

        let (keys, prefixes) = collect_pages(&s3, &bucket, Some("data/"), 1);
        assert_eq!(keys, vec!["data/index.json"]);
        assert_eq!(prefixes, vec!["data/2024/", "data/2025/"]);
        let unique: BTreeSet<&String> = prefixes.iter().collect();
        assert_eq!(unique.len(), prefixes.len());

        cleanup_bucket(&s3, &bucket);
    }

    #[test]
    fn test_should_list_v2_with_prefix_and_tokens() {
        let s3 = test_engine();
        let bucket = seed(&s3, "v2");

        let mut listed = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = s3
                .list_objects_v2(&bucket, Some("assets/"), None, token.as_deref(), None, Some(2))
                .unwrap_or_else(|e| panic!("list v2 failed: {e}"));
            listed.extend(page.contents.into_iter().map(|o| o.key));
            token = page.next_continuation_token;
            if token.is_none() {
                break;
            }
        }
        assert_eq!(
            listed,
            vec!["assets/css/site.css", "assets/js/app.js", "assets/logo.png"]
        );

        cleanup_bucket(&s3, &bucket);
    }

    #[test]
    fn test_should_fall_back_to_configured_page_size() {
        let s3 = test_engine_with(S3Config::builder().default_max_keys(4).build());
        let bucket = seed(&s3, "cfg");

        let page = s3
            .list_objects(&bucket, None, None, None, None)
            .unwrap_or_else(|e| panic!("list failed: {e}"));
        assert_eq!(page.objects.len(), 4);
        assert!(page.is_truncated);

        cleanup_bucket(&s3, &bucket);
    }

    #[test]
    fn test_should_list_versions_grouped_by_delimiter() {
        let s3 = test_engine();
        let bucket = seed(&s3, "ver");
        s3.put_bucket_versioning(&bucket, "Enabled")
            .unwrap_or_else(|e| panic!("enable failed: {e}"));
        put_text(&s3, &bucket, "README", "second");

        let result = s3
            .list_object_versions(&bucket, None, Some("/"), None, None, None)
            .unwrap_or_else(|e| panic!("list versions failed: {e}"));
        let readme: Vec<bool> = result
            .versions
            .iter()
            .filter(|v| v.version.key() == "README")
            .map(|v| v.is_latest)
            .collect();
        assert_eq!(readme, vec![true, false]);
        assert_eq!(result.common_prefixes, vec!["assets/", "data/"]);

        cleanup_bucket(&s3, &bucket);
    }
}
