use duplicatefile::duplicates::{DuplicateFinder, FinderConfig};
use duplicatefile::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_hardlinks_are_reported_as_duplicates() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    let hardlink = dir.path().join("hardlink.txt");

    File::create(&original)
        .unwrap()
        .write_all(b"identical content")
        .unwrap();

    if let Err(e) = fs::hard_link(&original, &hardlink) {
        eprintln!("Skipping hardlink test: failed to create hardlink: {}", e);
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    // Each directory entry is an inventory item of its own.
    assert_eq!(report.num_of_files(), 2);
    assert_eq!(report.duplicates().group_count(), 1);
    assert!(report.duplicates().contains_path(&hardlink));
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_matches_its_target() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    File::create(&target)
        .unwrap()
        .write_all(b"linked content")
        .unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.num_of_files(), 2);
    assert_eq!(report.duplicates().group_count(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_followed_only_on_request() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    File::create(real.join("data.bin"))
        .unwrap()
        .write_all(b"payload")
        .unwrap();
    std::os::unix::fs::symlink(&real, dir.path().join("alias")).unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(report.num_of_files(), 1);
    assert!(report.duplicates().is_empty());

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(true, Vec::new()));
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(report.num_of_files(), 2);
    assert_eq!(report.duplicates().group_count(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_does_not_hang() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    File::create(sub.join("file.txt"))
        .unwrap()
        .write_all(b"content")
        .unwrap();
    std::os::unix::fs::symlink(dir.path(), sub.join("back")).unwrap();

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(true, Vec::new()));
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.num_of_files(), 1);
    assert_eq!(report.summary().skipped(), 1);
}
