use super::*;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_gammaqc_input_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_parse_with_header_and_comments() {
    let text = "position\ttest\treference\n# measured\n-1.0\t0.5\t0.4\n\n0.0 1.0 1.0\n1.0\t0.5\t0.45\n";
    let pair = parse_profiles(Cursor::new(text)).unwrap();
    assert_eq!(pair.test.len(), 3);
    assert!(pair.test.same_positions(&pair.reference));
    assert_eq!(pair.reference.points()[2].dose, 0.45);
}

#[test]
fn test_parse_rejects_bad_column_count() {
    let err = parse_profiles(Cursor::new("0.0 1.0\n")).unwrap_err();
    assert!(matches!(err, InputError::Parse { line: 1, .. }));
}

#[test]
fn test_parse_rejects_garbage_after_data() {
    let err = parse_profiles(Cursor::new("0.0 1.0 1.0\n1.0 x 1.0\n")).unwrap_err();
    assert!(matches!(err, InputError::Parse { line: 2, .. }));
}

#[test]
fn test_parse_rejects_unordered_positions() {
    let err = parse_profiles(Cursor::new("1.0 1.0 1.0\n0.0 1.0 1.0\n")).unwrap_err();
    assert!(matches!(err, InputError::Profile(GammaError::InvalidProfile(_))));
}

#[test]
fn test_parse_empty_is_invalid() {
    let err = parse_profiles(Cursor::new("# nothing\n")).unwrap_err();
    assert!(matches!(err, InputError::InvalidInput(_)));
}

#[test]
fn test_load_from_file() {
    let dir = make_temp_dir();
    let path = dir.join("profiles.tsv");
    std::fs::write(&path, "0.0\t1.0\t1.0\n0.5\t0.9\t0.8\n").unwrap();
    let pair = load_profiles_tsv(&path).unwrap();
    assert_eq!(pair.test.len(), 2);

    let missing = load_profiles_tsv(&dir.join("missing.tsv")).unwrap_err();
    assert!(matches!(missing, InputError::Io(_)));
}
