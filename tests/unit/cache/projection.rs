use super::*;

fn key(n: u64) -> Fingerprint {
    Fingerprint { hi: n, lo: !n }
}

#[test]
fn computes_once_per_key() {
    let mut cache = ProjectionCache::new();
    let mut calls = 0;
    let a = cache.get_or_insert_with(key(1), || {
        calls += 1;
        vec![1, 2, 3]
    });
    let b = cache.get_or_insert_with(key(1), || {
        calls += 1;
        vec![9]
    });
    assert_eq!(calls, 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!((cache.hits(), cache.misses()), (1, 1));

    cache.get_or_insert_with(key(2), Vec::new);
    assert_eq!(cache.len(), 2);
    assert!(cache.get(&key(2)).is_some());
}

#[test]
fn clear_drops_entries() {
    let mut cache = ProjectionCache::new();
    cache.get_or_insert_with(key(7), || 7u32);
    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.get(&key(7)).is_none());
    assert_eq!(cache.misses(), 1);
}
