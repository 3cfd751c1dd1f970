//! Layout settings on disk

use tempfile::TempDir;
use tessera_core::config::{CONFIG_FILE_NAME, LayoutSettings};
use tessera_core::pane::SplitDirection;
use tessera_core::{ConfigError, TracingLevel};

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

    let mut settings = LayoutSettings::default();
    settings.handle_thickness = 2.5;
    settings.initial_direction = SplitDirection::Horizontal;
    settings.logging.level = TracingLevel::Debug;
    settings.save(&path).unwrap();

    assert!(path.exists());
    assert_eq!(LayoutSettings::load(&path).unwrap(), settings);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    let err = LayoutSettings::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn load_or_default_tolerates_missing_and_broken_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    assert_eq!(LayoutSettings::load_or_default(&path), LayoutSettings::default());

    std::fs::write(&path, "focus_new_pane = \"sometimes\"").unwrap();
    assert!(matches!(
        LayoutSettings::load(&path),
        Err(ConfigError::Parse(_))
    ));
    assert_eq!(LayoutSettings::load_or_default(&path), LayoutSettings::default());
}

#[test]
fn hand_written_file_is_understood() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        r#"
handle_thickness = 6.0
initial_direction = "horizontal"

[logging]
level = "trace"
filter = "tessera_core::pane=trace"
"#,
    )
    .unwrap();

    let settings = LayoutSettings::load(&path).unwrap();
    assert!((settings.handle_thickness - 6.0).abs() < f64::EPSILON);
    assert!(settings.focus_new_pane);
    assert_eq!(settings.initial_direction, SplitDirection::Horizontal);
    let tracing = settings.logging.to_tracing_config();
    assert_eq!(tracing.filter_directive(), "tessera_core::pane=trace");
}

#[test]
fn default_path_ends_with_layout_file() {
    if let Ok(path) = LayoutSettings::default_config_path() {
        assert!(path.ends_with("tessera/layout.toml"));
    }
}
