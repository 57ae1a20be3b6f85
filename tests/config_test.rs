use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use build_reconstructor::config::load_config;

#[test]
#[serial]
fn test_defaults_when_no_file_present() {
    // Depends on the working directory not carrying a reconstructor.toml
    let config = load_config(None).expect("Should load default config");
    assert_eq!(config.tools.tar, "tar");
    assert_eq!(config.tools.sloccount, "sloccount");
    assert!(!config.behavior.keep_files);
}

#[test]
fn test_explicit_path_overrides_tools() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[tools]
tar = "bsdtar --no-xattrs"

[behavior]
keep_files = true
"#
    )
    .unwrap();

    let config = load_config(file.path().to_str()).expect("Should load config file");
    assert_eq!(config.tools.tar, "bsdtar --no-xattrs");
    assert_eq!(
        config.tools.tar_command().unwrap(),
        vec!["bsdtar".to_string(), "--no-xattrs".to_string()]
    );
    // Unset keys keep their defaults
    assert_eq!(config.tools.sloccount, "sloccount");
    assert!(config.behavior.keep_files);
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    assert!(load_config(Some("/definitely/not/a/real/reconstructor.toml")).is_err());
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not valid toml [[[").unwrap();
    assert!(load_config(file.path().to_str()).is_err());
}
