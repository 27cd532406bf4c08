use duplicatefile::duplicates::{DuplicateFinder, FinderError};
use duplicatefile::error::ExitCode;
use duplicatefile::scanner::{FileRecord, HashError, ScanError};
use std::fs::File;
use tempfile::tempdir;

#[test]
fn test_scan_non_existent_path() {
    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(std::path::Path::new("/non/existent/path/12345"));

    match result {
        Err(FinderError::PathNotFound(path)) => {
            assert!(path.to_string_lossy().contains("non/existent/path/12345"));
        }
        _ => panic!("Expected PathNotFound error, got {:?}", result),
    }
}

#[test]
fn test_scan_file_instead_of_directory() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("file.txt");
    File::create(&file_path).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(&file_path);

    match result {
        Err(FinderError::NotADirectory(path)) => {
            assert!(path.to_string_lossy().contains("file.txt"));
        }
        _ => panic!("Expected NotADirectory error, got {:?}", result),
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_root_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    if std::fs::read_dir(&locked).is_ok() {
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = DuplicateFinder::with_defaults().find_duplicates(&locked);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(result, Err(FinderError::Unreadable { .. })));
}

#[test]
fn test_file_removed_before_hashing_is_skipped() {
    let dir = tempdir().unwrap();
    let kept_a = dir.path().join("a.bin");
    let kept_b = dir.path().join("b.bin");
    std::fs::write(&kept_a, b"12345").unwrap();
    std::fs::write(&kept_b, b"12345").unwrap();

    let records = vec![
        FileRecord::new(kept_a, 5),
        FileRecord::new(kept_b, 5),
        FileRecord::new(dir.path().join("gone.bin"), 5),
    ];

    let report = DuplicateFinder::with_defaults().find_duplicates_from_files(records);

    assert_eq!(report.num_of_files(), 3);
    assert_eq!(report.summary().skipped(), 1);
    assert!(matches!(
        report.summary().scan_errors[0],
        ScanError::HashError(HashError::NotFound(_))
    ));
    assert_eq!(report.duplicates().group_count(), 1);
}

#[test]
fn test_finder_errors_map_to_usage_exit_code() {
    let err = DuplicateFinder::with_defaults()
        .find_duplicates(std::path::Path::new("/non/existent/path/12345"))
        .unwrap_err();
    let err = anyhow::Error::new(err);

    assert_eq!(ExitCode::from_error(&err), ExitCode::Usage);
    assert_eq!(ExitCode::from_error(&err).as_i32(), 64);
}
