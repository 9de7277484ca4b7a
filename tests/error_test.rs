use std::io;

use stamp::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::InvalidSessionFileVersion {
        path: "/p/stamp.json".to_string(),
        found: "1.0.0".to_string(),
        supported: "0.3.0".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Session file '/p/stamp.json' has format version 1.0.0, this stamp supports up to 0.3.0."
    );

    let err = Error::AddedFileMustBeUnderBaseDir {
        path: "/elsewhere/a.txt".to_string(),
        base_dir: "/p".to_string(),
    };
    assert_eq!(err.to_string(), "'/elsewhere/a.txt' is not under the session base directory '/p'.");

    let err = Error::TargetPathNotSet { sources: "$STAMP_TMPLS, '_templates'".to_string() };
    assert!(err.to_string().contains("$STAMP_TMPLS"));
}

#[test]
fn test_duplicate_template_display_names_both_files() {
    let err = Error::DuplicateTemplateName {
        file_name: "a_b.txt.ejs.t".to_string(),
        first: "a/b.txt".to_string(),
        second: "a_b.txt".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "'a/b.txt' and 'a_b.txt' would both be written to template 'a_b.txt.ejs.t'."
    );
}
