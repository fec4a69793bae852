use log_sieve::{ConfigError, SieveConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn loads_levels_and_min_level_from_toml() {
    let file = write_config(
        r#"
min_level = "WARN"

[[levels]]
name = "DEBUG"

[[levels]]
name = "WARN"

[[levels]]
name = "ERROR"
"#,
    );

    let config = SieveConfig::load(file.path()).expect("config loads");
    assert_eq!(config.min_level, "WARN");

    let mut filter = config.into_filter(Vec::new()).expect("filter builds");
    for line in ["[DEBUG] baz\n", "[WARN] foo\n", "[ERROR] bar\n", "untagged\n"] {
        filter.write_all(line.as_bytes()).expect("write");
    }
    assert_eq!(
        String::from_utf8(filter.into_inner()).expect("utf-8 sink"),
        "[WARN] foo\n[ERROR] bar\nuntagged\n"
    );
}

#[test]
fn default_config_filters_below_info() {
    let filter = SieveConfig::default()
        .into_filter(Vec::<u8>::new())
        .expect("default config builds");
    assert!(!filter.check(b"[DEBUG] baz\n"));
    assert!(filter.check(b"[INFO] hello\n"));
    assert!(filter.check(b"[WARN] foo\n"));
    assert!(filter.check(b"[ERROR] bar\n"));
}

#[test]
fn partial_config_falls_back_to_defaults() {
    let file = write_config("min_level = \"ERROR\"\n");
    let config = SieveConfig::load(file.path()).expect("config loads");
    assert_eq!(config.min_level, "ERROR");
    // Levels come from the default set.
    let names: Vec<&str> = config.levels.iter().map(|spec| spec.name.as_str()).collect();
    assert_eq!(names, ["DEBUG", "INFO", "WARN", "ERROR"]);
}

#[test]
fn missing_file_is_a_read_error() {
    let err = SieveConfig::load(std::path::Path::new("/nonexistent/sieve.toml"))
        .expect_err("missing file fails");
    assert!(matches!(err, ConfigError::Read { .. }), "got: {err}");
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let file = write_config("min_level = [not toml");
    let err = SieveConfig::load(file.path()).expect_err("invalid toml fails");
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

#[test]
fn unknown_color_surfaces_when_building_the_filter() {
    let file = write_config(
        r#"
[[levels]]
name = "ERROR"
color = "chartreuse"
"#,
    );
    let config = SieveConfig::load(file.path()).expect("config loads");
    let err = config.into_filter(Vec::<u8>::new()).expect_err("unknown color fails");
    assert!(
        matches!(&err, ConfigError::UnknownColor(name) if name == "chartreuse"),
        "got: {err}"
    );
}
