use super::*;

#[test]
fn overwrites_existing_without_leaving_backup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");

    atomic_write(&path, b"one").expect("write one");
    atomic_write(&path, b"two").expect("write two");

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    assert!(!path.with_extension("bak").exists());
}

#[test]
fn creates_missing_parent_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("a/b/c.json");
    atomic_write(&path, b"{}").expect("write");
    assert_eq!(std::fs::read(&path).unwrap(), b"{}");
}

#[test]
fn leaves_no_temp_files_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("x.json");
    for i in 0..5 {
        atomic_write(&path, format!("{i}").as_bytes()).unwrap();
    }
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}
