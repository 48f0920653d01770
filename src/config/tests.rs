//! Configuration tests
//!
//! The round-trip tests guard the single-source-of-truth format: whatever
//! `to_toml()` writes must load back into the same configuration.

use super::*;
use crate::app::{Direction, Vertical};
use crate::clip::TrimPolicy;
use crate::transform::CommandSpec;
use crossterm::event::KeyCode;

fn parse(src: &str) -> FileConfig {
    toml::from_str(src).unwrap()
}

fn resolve(src: &str, overrides: &Overrides) -> Config {
    Config::resolve(PathBuf::from("/tmp/clipz-test"), parse(src), overrides, None)
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::with_dir(PathBuf::from("/tmp/clipz-test"));
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let reloaded = resolve(&toml_str, &Overrides::default());
    assert_eq!(reloaded.buffer_size, config.buffer_size);
    assert_eq!(reloaded.logging, config.logging);
    assert_eq!(reloaded.key_table().sorted(), config.key_table().sorted());
    assert_eq!(reloaded.on_capture, None);
    assert_eq!(reloaded.editor, None);
}

#[test]
fn test_config_roundtrip_custom() {
    let src = r#"
buffer_size = 7
leave_crlf = true
editor = "nvim -u NONE"
poll_interval_ms = 20
persist_history = true
on_capture = { pipe = "sed 's/ *$//'", trim = false }

[keys]
x = "none"
"ctrl-q" = "quit"
p = { pipe = ["fmt -w $0", "72"] }
t = { tempfile = ["my-tool", "--in-place"], trim = false }
"?" = "toggle"

[logging]
level = "debug"
file_enabled = true
file_dir = "/var/tmp/clipz-logs"
file_rotation = "hourly"
file_prefix = "clip"
"#;
    let config = resolve(src, &Overrides::default());
    let toml_str = config.to_toml();
    let reloaded = resolve(&toml_str, &Overrides::default());

    assert_eq!(reloaded.buffer_size, 7);
    assert!(reloaded.leave_crlf);
    assert_eq!(reloaded.editor.as_deref(), Some("nvim -u NONE"));
    assert_eq!(reloaded.poll_interval_ms, 20);
    assert!(reloaded.persist_history);
    assert_eq!(reloaded.on_capture, config.on_capture);
    assert_eq!(reloaded.logging, config.logging);
    assert_eq!(reloaded.key_table().sorted(), config.key_table().sorted());
}

// ─────────────────────────────────────────────────────────────────────────────
// Layering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_gives_defaults() {
    let config = resolve("", &Overrides::default());
    assert_eq!(config, Config::with_dir(PathBuf::from("/tmp/clipz-test")));
    assert_eq!(config.buffer_size, 100);
    assert_eq!(config.poll_interval_ms, 50);
}

#[test]
fn test_cli_overrides_file() {
    let overrides = Overrides {
        buffer_size: Some(5),
        leave_crlf: true,
        ..Default::default()
    };
    let config = resolve("buffer_size = 50\nleave_crlf = false\n", &overrides);
    assert_eq!(config.buffer_size, 5);
    assert!(config.leave_crlf);
}

#[test]
fn test_buffer_size_at_least_one() {
    let config = resolve("buffer_size = 0\n", &Overrides::default());
    assert_eq!(config.buffer_size, 1);
}

#[test]
fn test_editor_file_beats_env() {
    let file = parse("editor = \"hx\"\n");
    let config = Config::resolve(
        PathBuf::from("/tmp/x"),
        file,
        &Overrides::default(),
        Some("vi".into()),
    );
    assert_eq!(config.editor.as_deref(), Some("hx"));

    let config = Config::resolve(
        PathBuf::from("/tmp/x"),
        FileConfig::default(),
        &Overrides::default(),
        Some("vi".into()),
    );
    assert_eq!(config.editor.as_deref(), Some("vi"));

    let config = Config::resolve(
        PathBuf::from("/tmp/x"),
        FileConfig::default(),
        &Overrides::default(),
        Some("  ".into()),
    );
    assert_eq!(config.editor, None);
}

#[test]
fn test_keys_layer_over_defaults() {
    let config = resolve(
        r#"
[keys]
c = "none"
j = "down"
k = "up"
s = "move_up"
"#,
        &Overrides::default(),
    );
    let table = config.key_table();

    assert_eq!(table.resolve(&KeyChord::char('c')), None);
    assert_eq!(
        table.resolve(&KeyChord::char('j')),
        Some(&Action::Navigate(Direction::Down))
    );
    assert_eq!(
        table.resolve(&KeyChord::char('s')),
        Some(&Action::Move(Vertical::Up))
    );
    // Untouched defaults survive
    assert_eq!(
        table.resolve(&KeyChord::plain(KeyCode::Up)),
        Some(&Action::Navigate(Direction::Up))
    );
}

#[test]
fn test_bad_entries_skipped() {
    let config = resolve(
        r#"
on_capture = "toggle"

[keys]
"hyper-z" = "up"
q = "quit"
"#,
        &Overrides::default(),
    );
    assert_eq!(config.on_capture, None);
    assert_eq!(config.keys, vec![(KeyChord::char('q'), Some(Action::Quit))]);
}

#[test]
fn test_on_capture_pipe() {
    let config = resolve("on_capture = { pipe = \"tr -d '\\\\t'\" }\n", &Overrides::default());
    assert_eq!(
        config.on_capture,
        Some(Transform::pipe(
            CommandSpec::Line("tr -d '\\t'".into()),
            TrimPolicy::Normalize
        ))
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_load_reads_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILENAME), "buffer_size = 3\n").unwrap();

    let config = Config::load(&Overrides {
        config_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    });
    assert_eq!(config.config_dir, dir.path());
    assert_eq!(config.buffer_size, 3);
    assert_eq!(config.logging.file_dir, dir.path().join("logs"));
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILENAME), "buffer_size = [oops\n").unwrap();

    let config = Config::load(&Overrides {
        config_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    });
    assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
}

#[test]
fn test_ensure_config_exists_writes_template_once() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("nested");
    let config = Config::with_dir(config_dir.clone());

    config.ensure_config_exists();
    let path = config_dir.join(CONFIG_FILENAME);
    let template = std::fs::read_to_string(&path).unwrap();
    assert!(template.contains("[keys]"));

    std::fs::write(&path, "buffer_size = 9\n").unwrap();
    config.ensure_config_exists();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "buffer_size = 9\n");
}

#[test]
fn test_expand_tilde() {
    assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    assert_eq!(expand_tilde("rel"), PathBuf::from("rel"));
    if let Some(home) = dirs::home_dir() {
        assert_eq!(expand_tilde("~/.clipz/logs"), home.join(".clipz/logs"));
    }
}
