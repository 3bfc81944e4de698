// Result cache tests - public APIs only
// Author: kelexine (https://github.com/kelexine)

use gemconvert::cache::{CacheKey, ResultCache};
use proptest::prelude::*;

#[tokio::test]
async fn test_cache_stats_initialization() {
    let cache = ResultCache::new("conversion");
    let stats = cache.get_stats().await;

    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.stores, 0);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_hit_after_store() {
    let cache = ResultCache::new("conversion");
    let key = CacheKey::conversion("JavaScript", "Python", "console.log(1)");

    assert_eq!(cache.get(&key).await, None);
    cache.insert(key.clone(), "print(1)".to_string()).await;
    assert_eq!(cache.get(&key).await.as_deref(), Some("print(1)"));

    let stats = cache.get_stats().await;
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.stores, 1);
}

#[tokio::test]
async fn test_first_writer_wins() {
    let cache = ResultCache::new("conversion");
    let key = CacheKey::conversion("Go", "Java", "x");

    assert_eq!(cache.insert(key.clone(), "first".to_string()).await, "first");
    assert_eq!(cache.insert(key.clone(), "second".to_string()).await, "first");
    assert_eq!(cache.len().await, 1);
}

#[test]
fn test_language_names_cannot_bleed_into_each_other() {
    let a = CacheKey::conversion("A_B", "C", "x");
    let b = CacheKey::conversion("A", "B_C", "x");
    assert_ne!(a, b);
    assert_ne!(a.digest(), b.digest());

    let c = CacheKey::conversion("Go", "Java_x", "y");
    let d = CacheKey::conversion("Go", "Java", "x_y");
    assert_ne!(c, d);
    assert_ne!(c.digest(), d.digest());
}

#[test]
fn test_explanation_and_conversion_keys_differ() {
    assert_ne!(
        CacheKey::explanation("Ruby", "puts 1"),
        CacheKey::conversion("Ruby", "explanation", "puts 1")
    );
}

#[test]
fn test_display_never_leaks_code() {
    let key = CacheKey::conversion("Python", "Go", "secret = 'hunter2'");
    let shown = key.to_string();
    assert_eq!(shown.len(), 16);
    assert!(!shown.contains("hunter2"));
}

#[test]
fn test_code_is_not_normalized() {
    let a = CacheKey::conversion("Python", "Go", "print(1)");
    let b = CacheKey::conversion("Python", "Go", "print(1) ");
    let c = CacheKey::conversion("python", "Go", "print(1)");
    assert_ne!(a, b);
    assert_ne!(a, c);
}

proptest! {
    #[test]
    fn prop_conversion_key_is_deterministic(
        code in ".*",
        src in "[A-Za-z+#]{1,12}",
        tgt in "[A-Za-z+#]{1,12}",
    ) {
        prop_assert_eq!(
            CacheKey::conversion(&src, &tgt, &code),
            CacheKey::conversion(&src, &tgt, &code)
        );
    }

    #[test]
    fn prop_distinct_parts_give_distinct_keys(
        src_a in "[A-Za-z_]{1,8}",
        tgt_a in "[A-Za-z_]{1,8}",
        src_b in "[A-Za-z_]{1,8}",
        tgt_b in "[A-Za-z_]{1,8}",
        code in ".*",
    ) {
        prop_assume!((src_a.as_str(), tgt_a.as_str()) != (src_b.as_str(), tgt_b.as_str()));
        let a = CacheKey::conversion(&src_a, &tgt_a, &code);
        let b = CacheKey::conversion(&src_b, &tgt_b, &code);
        prop_assert_ne!(a.digest(), b.digest());
        prop_assert_ne!(a, b);
    }

    #[test]
    fn prop_different_code_gives_different_key(
        a in ".*",
        b in ".*",
        src in "[A-Za-z+#]{1,12}",
        tgt in "[A-Za-z+#]{1,12}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            CacheKey::conversion(&src, &tgt, &a),
            CacheKey::conversion(&src, &tgt, &b)
        );
    }
}
