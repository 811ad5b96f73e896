//! Expansion fixtures: every `tests/fixtures/<name>.swift` must expand to
//! `<name>.expanded.swift`, compared modulo whitespace.

use std::fs;
use std::path::{Path, PathBuf};

use stubby_fmt::{expand_to_string, normalize_whitespace, FormatConfig};
use stubby_gen::MockConfig;

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn inputs() -> Vec<PathBuf> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(fixture_dir())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            let name = path.file_name().unwrap().to_string_lossy();
            name.ends_with(".swift") && !name.ends_with(".expanded.swift")
        })
        .collect();
    inputs.sort();
    inputs
}

fn expected_path(input: &Path) -> PathBuf {
    input.with_extension("expanded.swift")
}

#[test]
fn fixtures_expand_as_expected() {
    let inputs = inputs();
    assert!(!inputs.is_empty());
    for input in inputs {
        let source = fs::read_to_string(&input).unwrap();
        let expected = fs::read_to_string(expected_path(&input)).unwrap();
        let out = expand_to_string(&source, &MockConfig::default(), &FormatConfig::default());
        assert!(
            !out.has_errors(),
            "{}: {:?}",
            input.display(),
            out.diagnostics
        );
        assert_eq!(
            normalize_whitespace(&out.text),
            normalize_whitespace(&expected),
            "{}\n--- got ---\n{}",
            input.display(),
            out.text
        );
    }
}

#[test]
fn expected_outputs_are_fixed_points() {
    for input in inputs() {
        let expected = fs::read_to_string(expected_path(&input)).unwrap();
        let out = expand_to_string(&expected, &MockConfig::default(), &FormatConfig::default());
        assert!(!out.has_errors(), "{}: {:?}", input.display(), out.diagnostics);
        assert!(out.types.is_empty());
        assert_eq!(out.text, expected);
    }
}

#[test]
fn basic_fixture_is_exact() {
    let source = fs::read_to_string(fixture_dir().join("basic.swift")).unwrap();
    let expected = fs::read_to_string(fixture_dir().join("basic.expanded.swift")).unwrap();
    let out = expand_to_string(&source, &MockConfig::default(), &FormatConfig::default());
    assert_eq!(out.text, expected);
    assert_eq!(out.types, ["MyClass"]);
}
