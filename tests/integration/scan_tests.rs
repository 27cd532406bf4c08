use duplicatefile::duplicates::{DuplicateFinder, FinderConfig};
use duplicatefile::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let report = finder.find_duplicates(dir.path()).unwrap();

    assert!(report.duplicates().is_empty());
    assert_eq!(report.num_of_files(), 0);
    assert_eq!(report.summary().duplicate_groups, 0);
}

#[test]
fn test_scan_same_size_different_content() {
    // a.txt and b.txt share content; c.txt shares only the size.
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"hello");
    write_file(&dir.path().join("b.txt"), b"hello");
    write_file(&dir.path().join("c.txt"), b"world");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let duplicates = report.duplicates();

    assert_eq!(duplicates.size_count(), 1);
    let buckets = duplicates.get(5).unwrap();
    assert_eq!(buckets.len(), 1);
    let paths = buckets.values().next().unwrap();
    assert_eq!(
        paths,
        &vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
    assert!(!duplicates.contains_path(&dir.path().join("c.txt")));
    assert_eq!(report.summary().hashed_files, 3);
}

#[test]
fn test_scan_all_sizes_unique() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("ten"), &[1u8; 10]);
    write_file(&dir.path().join("twenty"), &[1u8; 20]);
    write_file(&dir.path().join("thirty"), &[1u8; 30]);

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.duplicates().is_empty());
    assert_eq!(report.num_of_files(), 3);
    assert_eq!(report.summary().eliminated_by_size, 3);
    assert_eq!(report.summary().hashed_files, 0);
}

#[test]
fn test_scan_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("empty1"), b"");
    write_file(&dir.path().join("empty2"), b"");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let buckets = report.duplicates().get(0).unwrap();
    assert_eq!(buckets.len(), 1);
    let (digest, paths) = buckets.iter().next().unwrap();
    assert_eq!(digest.to_hex(), "ef46db3751d8e999");
    assert_eq!(paths.len(), 2);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    let deeper = sub.join("deeper");
    fs::create_dir_all(&deeper).unwrap();

    write_file(&dir.path().join("a.txt"), b"nested duplicate");
    write_file(&sub.join("b.txt"), b"nested duplicate");
    write_file(&deeper.join("c.txt"), b"nested duplicate");
    write_file(&deeper.join("d.txt"), b"something else");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.num_of_files(), 4);
    assert_eq!(report.duplicates().group_count(), 1);
    assert_eq!(report.summary().duplicate_files, 2);
    assert_eq!(report.summary().reclaimable_space, 32);
}

#[test]
fn test_scan_multiple_sets_same_size() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a1"), b"aaaa");
    write_file(&dir.path().join("a2"), b"aaaa");
    write_file(&dir.path().join("b1"), b"bbbb");
    write_file(&dir.path().join("b2"), b"bbbb");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicates().size_count(), 1);
    assert_eq!(report.duplicates().get(4).unwrap().len(), 2);
}

#[test]
fn test_scan_skips_ds_store() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write_file(&dir.path().join(".DS_Store"), b"finder");
    write_file(&sub.join(".DS_Store"), b"finder");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(report.num_of_files(), 0);
    assert!(report.duplicates().is_empty());

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(false, Vec::new()));
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(report.num_of_files(), 2);
    assert_eq!(report.duplicates().group_count(), 1);
}

#[test]
fn test_scan_reported_paths_are_byte_identical() {
    let dir = tempdir().unwrap();
    let contents: [&[u8]; 4] = [b"alpha", b"bravo", b"alpha", b"delta-delta"];
    for (i, content) in contents.iter().enumerate() {
        write_file(&dir.path().join(format!("f{}", i)), content);
        write_file(&dir.path().join(format!("g{}", i)), content);
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    for (size, _, paths) in report.duplicates().iter() {
        let first = fs::read(&paths[0]).unwrap();
        assert_eq!(first.len() as u64, size);
        for path in &paths[1..] {
            assert_eq!(fs::read(path).unwrap(), first);
            assert!(report.files().contains(path));
        }
    }
    // alpha appears four times, bravo and delta twice each.
    assert_eq!(report.duplicates().group_count(), 3);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    for i in 0..20u8 {
        write_file(&dir.path().join(format!("file{}", i)), &[i % 4; 16]);
    }

    let first = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let second = DuplicateFinder::new(FinderConfig::default().with_io_threads(1))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(first.duplicates(), second.duplicates());
    assert_eq!(first.duplicates().group_count(), 4);
}

#[cfg(unix)]
#[test]
fn test_scan_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"same");
    write_file(&dir.path().join("b.txt"), b"same");

    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write_file(&locked.join("c.txt"), b"same");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to test then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.num_of_files(), 2);
    assert_eq!(report.summary().skipped(), 1);
    assert!(!report.duplicates().contains_path(&locked.join("c.txt")));
    assert_eq!(report.duplicates().group_count(), 1);
}

#[cfg(unix)]
#[test]
fn test_scan_skipped_subtree_keeps_sibling_duplicates() {
    // A looping link is refused even when running as root.
    let dir = tempdir().unwrap();
    let left = dir.path().join("left");
    let right = dir.path().join("right");
    let looped = dir.path().join("looped");
    fs::create_dir(&left).unwrap();
    fs::create_dir(&right).unwrap();
    fs::create_dir(&looped).unwrap();
    write_file(&left.join("a.txt"), b"same");
    write_file(&right.join("b.txt"), b"same");
    std::os::unix::fs::symlink(dir.path(), looped.join("up")).unwrap();

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(true, Vec::new()));
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.num_of_files(), 2);
    assert_eq!(report.summary().skipped(), 1);
    assert_eq!(report.duplicates().group_count(), 1);
    assert!(report.duplicates().contains_path(&left.join("a.txt")));
    assert!(report.duplicates().contains_path(&right.join("b.txt")));
}

#[test]
fn test_scan_with_small_block_size() {
    let dir = tempdir().unwrap();
    let data: Vec<u8> = (0..100_000u32).map(|i| (i % 253) as u8).collect();
    write_file(&dir.path().join("one.bin"), &data);
    write_file(&dir.path().join("two.bin"), &data);

    let mut altered = data.clone();
    altered[99_999] ^= 0xff;
    write_file(&dir.path().join("three.bin"), &altered);

    let report = DuplicateFinder::new(FinderConfig::default().with_block_size(1000))
        .find_duplicates(dir.path())
        .unwrap();

    let buckets = report.duplicates().get(100_000).unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets.values().next().unwrap().len(), 2);
}
