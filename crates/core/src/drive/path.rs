//! Remote path and file name rules.
//!
//! Folder paths are normalized before any vendor call: surrounding and
//! repeated slashes are dropped, and traversal or control characters are
//! rejected.

use super::error::DriveError;

/// Normalizes a remote folder path.
///
/// `"/Backups//Notes/"` becomes `"Backups/Notes"`.
///
/// # Errors
///
/// Returns `DriveError::Validation` for empty paths, backslashes, control
/// characters, and `..` segments.
pub fn normalize_folder_path(path: &str) -> Result<String, DriveError> {
    if path.contains('\\') {
        return Err(DriveError::validation("folder path must not contain '\\'"));
    }
    if path.chars().any(char::is_control) {
        return Err(DriveError::validation(
            "folder path must not contain control characters",
        ));
    }

    let segments: Vec<&str> = path
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.iter().any(|segment| *segment == "..") {
        return Err(DriveError::validation("folder path must not contain '..'"));
    }
    if segments.is_empty() {
        return Err(DriveError::validation("folder path is required"));
    }

    Ok(segments.join("/"))
}

/// Validates a file name used inside a folder.
///
/// # Errors
///
/// Returns `DriveError::Validation` if the name is blank, contains a path
/// separator, `..`, or control characters.
pub fn validate_file_name(name: &str) -> Result<&str, DriveError> {
    if name.trim().is_empty() {
        return Err(DriveError::validation("file name is required"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(DriveError::validation(
            "file name must not contain path separators",
        ));
    }
    if name.contains("..") {
        return Err(DriveError::validation("file name must not contain '..'"));
    }
    if name.chars().any(char::is_control) {
        return Err(DriveError::validation(
            "file name must not contain control characters",
        ));
    }
    Ok(name)
}

/// Percent-encodes each segment of a normalized path.
#[must_use]
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Splits a normalized path into parent path and leaf name.
#[must_use]
pub fn split_parent(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('/') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, path),
    }
}

/// MIME type sent with uploaded content, chosen from the file extension.
///
/// Content is always text, so anything that is not JSON goes as plain text.
#[must_use]
pub fn content_mime(name: &str) -> &'static str {
    let is_json = name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("json"));
    if is_json {
        "application/json"
    } else {
        "text/plain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("notes.json", "application/json")]
    #[case("EXPORT.JSON", "application/json")]
    #[case("todo.txt", "text/plain")]
    #[case("README", "text/plain")]
    #[case("json", "text/plain")]
    fn test_content_mime(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(content_mime(name), expected);
    }

    #[rstest]
    #[case("Backups", "Backups")]
    #[case("/Backups/", "Backups")]
    #[case("///Backups", "Backups")]
    #[case("/a//b/c/", "a/b/c")]
    #[case(" a / b ", "a/b")]
    fn test_normalize_accepts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_folder_path(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("  //  ")]
    #[case("../etc")]
    #[case("a/../b")]
    #[case("a\\b")]
    #[case("a\nb")]
    fn test_normalize_rejects(#[case] input: &str) {
        assert!(matches!(
            normalize_folder_path(input),
            Err(DriveError::Validation(_))
        ));
    }

    #[rstest]
    #[case("notes.txt", true)]
    #[case("report 2024.json", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("a/b.txt", false)]
    #[case("a\\b.txt", false)]
    #[case("..", false)]
    #[case("x..y", false)]
    fn test_validate_file_name(#[case] name: &str, #[case] ok: bool) {
        assert_eq!(validate_file_name(name).is_ok(), ok);
    }

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(encode_path("My Docs/a&b"), "My%20Docs/a%26b");
    }

    #[test]
    fn test_split_parent() {
        assert_eq!(split_parent("a/b/c"), (Some("a/b"), "c"));
        assert_eq!(split_parent("a"), (None, "a"));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(path in "[a-zA-Z0-9 /._-]{0,40}") {
            if let Ok(once) = normalize_folder_path(&path) {
                let twice = normalize_folder_path(&once).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        #[test]
        fn prop_normalized_has_no_edge_slashes(path in "[a-z/]{0,30}") {
            if let Ok(normalized) = normalize_folder_path(&path) {
                prop_assert!(!normalized.starts_with('/'));
                prop_assert!(!normalized.ends_with('/'));
                prop_assert!(!normalized.contains("//"));
            }
        }

        #[test]
        fn prop_traversal_always_rejected(prefix in "[a-z/]{0,10}", suffix in "[a-z/]{0,10}") {
            let path = format!("{prefix}/../{suffix}");
            prop_assert!(normalize_folder_path(&path).is_err());
        }
    }
}
