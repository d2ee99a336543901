use super::*;

#[test]
fn memory_store_round_trips_values() {
    let store = MemoryStore::new();
    assert_eq!(store.get("cart").expect("get"), None);

    store.set("cart", "[1,2,3]").expect("set");
    assert_eq!(store.get("cart").expect("get"), Some("[1,2,3]".into()));

    store.set("cart", "[]").expect("overwrite");
    assert_eq!(store.get("cart").expect("get"), Some("[]".into()));
}

#[test]
fn memory_store_remove_is_idempotent() {
    let store = MemoryStore::new();
    store.set("table", "203").expect("set");
    store.remove("table").expect("remove");
    store.remove("table").expect("remove again");
    assert_eq!(store.get("table").expect("get"), None);
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let store = FileStore::new(dir.path()).expect("store");
        store.set("cart", r#"[{"id":"espresso"}]"#).expect("set");
    }

    let reopened = FileStore::new(dir.path()).expect("reopen");
    assert_eq!(
        reopened.get("cart").expect("get"),
        Some(r#"[{"id":"espresso"}]"#.into())
    );
}

#[test]
fn file_store_missing_key_reads_as_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path()).expect("store");
    assert_eq!(store.get("never-written").expect("get"), None);
    store.remove("never-written").expect("remove absent");
}

#[test]
fn file_store_flattens_hostile_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path()).expect("store");
    store.set("../escape/attempt", "x").expect("set");

    // The written entry stays inside the root directory.
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .map(|e| e.expect("entry").file_name())
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(store.get("../escape/attempt").expect("get"), Some("x".into()));
}

#[test]
fn file_store_accepts_dot_only_and_empty_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path()).expect("store");

    // "." and ".." would otherwise name the root and its parent; both must
    // land in regular files inside the root instead of failing.
    store.set(".", "dot").expect("set dot");
    store.set("..", "dotdot").expect("set dotdot");
    assert_eq!(store.get(".").expect("get"), Some("dot".into()));
    assert_eq!(store.get("..").expect("get"), Some("dotdot".into()));

    store.set("", "empty").expect("set empty key");
    assert_eq!(store.get("").expect("get"), Some("empty".into()));

    for entry in std::fs::read_dir(dir.path()).expect("read dir") {
        assert!(entry.expect("entry").file_type().expect("type").is_file());
    }
}

#[test]
fn file_store_creates_nested_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("data").join("session");
    let store = FileStore::new(&nested).expect("store");
    store.set("table", "12").expect("set");
    assert!(nested.exists());
}
