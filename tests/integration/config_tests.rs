use duplicatefile::config::{Config, ConfigError};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config = Config::from_figment(&figment).unwrap();
    assert_eq!(config.io_threads, 4);
    assert_eq!(config.block_size, 65536);
    assert_eq!(config.skip_names, vec![".DS_Store".to_string()]);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
io_threads = 8
block_size = 4096
follow_symlinks = true
skip_names = [".DS_Store", "Thumbs.db"]
dump_dir = "/tmp/dumps"
"#;
    fs::write(&config_path, toml_content).unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config = Config::from_figment(&figment).unwrap();

    assert_eq!(config.io_threads, 8);
    assert_eq!(config.block_size, 4096);
    assert!(config.follow_symlinks);
    assert_eq!(config.skip_names.len(), 2);
    assert_eq!(config.dump_dir, Some(PathBuf::from("/tmp/dumps")));
    assert_eq!(config.log_file, None);
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 2\n").unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config = Config::from_figment(&figment).unwrap();

    assert_eq!(config.io_threads, 2);
    assert_eq!(config.block_size, 65536);
}

#[test]
fn test_config_load_from_env() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("DUPLICATEFILE_IO_THREADS", "16");
        jail.set_env("DUPLICATEFILE_FOLLOW_SYMLINKS", "true");

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("DUPLICATEFILE_").split("__"));
        let config = Config::from_figment(&figment).unwrap();

        assert_eq!(config.io_threads, 16);
        assert!(config.follow_symlinks);
        Ok(())
    });
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let temp_dir = tempdir().unwrap();
    let config = Config::load_from_path(Some(&temp_dir.path().join("absent.toml")));
    assert!(config.is_ok());
}

#[test]
fn test_config_invalid_toml_rejected() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = \"many\"").unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let result = Config::from_figment(&figment);

    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn test_config_zero_threads_rejected_by_validate() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 0").unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config = Config::from_figment(&figment).unwrap();

    assert_eq!(config.io_threads, 0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_invalid_value_can_be_overridden_before_validation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 0\nblock_size = 0").unwrap();

    let mut config = Config::load_from_path(Some(&config_path)).unwrap();
    config.io_threads = 2;
    config.block_size = 4096;

    assert!(config.validate().is_ok());
}
