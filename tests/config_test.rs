//! Loading `GameConfig` from disk.

use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use whisker_games::GameConfig;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_from_file_reads_every_field() {
    let file = write_config(
        r#"
mistake_chance = 0.0
computer_delay_ms = 0
report_url = "http://localhost:5000/api/result"
host = "0.0.0.0"
port = 8080
"#,
    );
    let config = GameConfig::from_file(file.path()).unwrap();

    assert_eq!(*config.mistake_chance(), 0.0);
    assert_eq!(config.computer_delay(), Duration::ZERO);
    assert_eq!(
        config.report_url().as_deref(),
        Some("http://localhost:5000/api/result")
    );
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.port(), 8080);
    assert_eq!(*config.policy().mistake_chance(), 0.0);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config("port = 4000\n");
    let config = GameConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.port(), 4000);
    assert_eq!(*config.mistake_chance(), 0.30);
    assert_eq!(config.report_url(), &None);
}

#[test]
fn test_invalid_files_rejected() {
    let file = write_config("mistake_chance = -0.1\n");
    assert!(GameConfig::from_file(file.path()).is_err());

    let file = write_config("port = \"eighty\"\n");
    let err = GameConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("parse"));

    assert!(GameConfig::from_file("/definitely/not/here.toml").is_err());
}

#[test]
fn test_cli_style_overrides() {
    let config = GameConfig::default()
        .with_address(Some("0.0.0.0".to_string()), None)
        .with_computer_delay_ms(10)
        .with_mistake_chance(1.0)
        .unwrap();
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.port(), 3000);
    assert_eq!(config.computer_delay(), Duration::from_millis(10));
    assert!(GameConfig::default().with_mistake_chance(f64::NAN).is_err());
}
