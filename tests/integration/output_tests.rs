use duplicatefile::duplicates::DuplicateFinder;
use duplicatefile::output::{JsonOutput, TextOutput};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_json_summary_for_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    fs::write(dir.path().join("b.txt"), b"hello").unwrap();
    fs::write(dir.path().join("c.txt"), b"world").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let json = JsonOutput::new(&report).to_json_pretty().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["path"], dir.path().to_string_lossy().as_ref());
    assert_eq!(parsed["num_of_files"], 3);
    assert_eq!(parsed["skipped"], 0);
    assert_eq!(parsed["files"].as_array().unwrap().len(), 3);

    let by_size = parsed["duplicate"].as_object().unwrap();
    assert_eq!(by_size.len(), 1);
    let by_hash = by_size["5"].as_object().unwrap();
    assert_eq!(by_hash.len(), 1);
    let (hash, paths) = by_hash.iter().next().unwrap();
    assert_eq!(hash.len(), 16);
    assert_eq!(paths.as_array().unwrap().len(), 2);
}

#[test]
fn test_dump_round_trips_through_serde() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("x"), b"same").unwrap();
    fs::write(data.join("y"), b"same").unwrap();

    let report = DuplicateFinder::with_defaults().find_duplicates(&data).unwrap();
    let dump_path = JsonOutput::new(&report).dump(dir.path()).unwrap();

    let file_name = dump_path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(file_name, format!("dump_{}.json", std::process::id()));

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&dump_path).unwrap()).unwrap();
    assert_eq!(parsed["num_of_files"], 2);
    assert_eq!(parsed["duplicate"]["4"].as_object().unwrap().len(), 1);
}

#[test]
fn test_text_report_for_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one"), b"dup").unwrap();
    fs::write(dir.path().join("two"), b"dup").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let text = TextOutput::new(&report).render();

    assert_eq!(text.matches("- Same files (").count(), 1);
    assert!(text.contains(&format!(" -> '{}'", dir.path().join("one").display())));
    assert!(text.contains(&format!(" -> '{}'", dir.path().join("two").display())));
    assert!(text.contains("Number of files: 2"));
}
