//! The process-wide cache driven from a configuration file.

use std::io::Write;

use expando::cache::global;
use expando::{Error, FieldDef, FormatConfig, ParseErrorKind, ValueType};
use serial_test::serial;

const DEFS: &[FieldDef] = &[
    FieldDef::new("n", "name", 1, 0, ValueType::String),
    FieldDef::new("s", "size", 1, 1, ValueType::Number),
];

fn config_file(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_load_user_config_over_defaults() {
    global().clear();

    let file = config_file("row_format: \"%-10n %s\"\n");
    let mut config = FormatConfig::new()
        .with_default("row_format", "%n")
        .with_default("title_format", "%s");
    config.merge(&FormatConfig::from_file(file.path()).unwrap());

    let row = global().load(&config, "row_format", DEFS).unwrap();
    let title = global().load(&config, "title_format", DEFS).unwrap();
    assert_eq!(row.source(), "%-10n %s");
    assert_eq!(title.source(), "%s");
    assert_eq!(global().len(), 2);

    global().clear();
}

#[test]
#[serial]
fn test_reload_with_broken_format_keeps_previous() {
    global().clear();

    let mut config = FormatConfig::new().with_default("row_format", "%n");
    global().load(&config, "row_format", DEFS).unwrap();

    config.set("row_format", "%<n?oops");
    let err = global().load(&config, "row_format", DEFS).unwrap_err();
    match err {
        Error::Parse(e) => assert_eq!(e.kind, ParseErrorKind::UnterminatedConditional),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(global().get("row_format").unwrap().source(), "%n");

    global().clear();
}

#[test]
#[serial]
fn test_concurrent_readers_during_swap() {
    global().clear();
    global().update("row_format", "%n", DEFS).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let exp = global().get("row_format").unwrap();
                    assert!(exp.source() == "%n" || exp.source() == "%s");
                }
            });
        }
        scope.spawn(|| {
            for i in 0..100 {
                let source = if i % 2 == 0 { "%s" } else { "%n" };
                global().update("row_format", source, DEFS).unwrap();
            }
        });
    });

    global().clear();
}
