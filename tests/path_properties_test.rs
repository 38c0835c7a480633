use proptest::prelude::*;
use site_nav::path::{normalize_path, PathResolver};

const DEFAULT_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("SITE_NAV_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PROPTEST_CASES)
}

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,8}(\\.html)?"
}

fn path_strategy() -> impl Strategy<Value = String> {
    (proptest::collection::vec(segment_strategy(), 0..4), any::<bool>(), any::<bool>()).prop_map(
        |(segments, leading, trailing)| {
            let mut path = segments.join("/");
            if leading {
                path.insert(0, '/');
            }
            if trailing {
                path.push('/');
            }
            path
        },
    )
}

fn foreign_origin_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,10}\\.(net|com|de)".prop_map(|host| format!("https://{}", host)),
        Just("http://example.org".to_string()),
        (1u16..65535)
            .prop_filter("default https port", |port| *port != 443)
            .prop_map(|port| format!("https://example.org:{}", port)),
        "[a-z]{1,10}".prop_map(|sub| format!("https://{}.example.org", sub)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_cases()))]

    #[test]
    fn cross_origin_hrefs_are_not_comparable(origin in foreign_origin_strategy(), path in path_strategy()) {
        let resolver = PathResolver::new("https://example.org/chronik.html", "index.html").unwrap();
        let href = format!("{}/{}", origin, path.trim_start_matches('/'));
        prop_assert_eq!(resolver.resolve(&href), None, "href {}", href);
    }

    #[test]
    fn same_origin_hrefs_resolve_to_canonical_paths(path in path_strategy()) {
        let resolver = PathResolver::new("https://example.org/", "index.html").unwrap();
        let href = format!("/{}", path.trim_start_matches('/'));
        let resolved = resolver.resolve(&href).unwrap();
        prop_assert!(resolved.starts_with('/'));
        prop_assert!(resolved == "/" || !resolved.ends_with('/'));
        prop_assert_eq!(normalize_path(&resolved, "index.html"), resolved.clone());
    }

    #[test]
    fn normalization_is_idempotent(path in path_strategy()) {
        let once = normalize_path(&path, "index.html");
        prop_assert_eq!(normalize_path(&once, "index.html"), once);
    }

    #[test]
    fn normalization_ignores_query_and_fragment(
        path in path_strategy(),
        query in "[a-z0-9=&]{0,12}",
        fragment in "[a-z0-9-]{0,12}",
    ) {
        let decorated = format!("{}?{}#{}", path, query, fragment);
        prop_assert_eq!(normalize_path(&decorated, "index.html"), normalize_path(&path, "index.html"));
    }
}
