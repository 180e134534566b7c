//! Path resolution beneath the store root.
//!
//! Layout: `<root>/<collection>/<resource>.json`, with in-flight writes
//! staged at `<root>/<collection>/<resource>.json.tmp`.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Extension of committed documents.
pub const DOCUMENT_EXT: &str = "json";
/// Suffix appended to the document file name while a write is staged.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Make `path` absolute and lexically clean it: `.` components are dropped
/// and `..` pops the previous component. Symlinks are not resolved.
pub fn normalize(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to remove the root, matching `/..` == `/`.
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    Ok(cleaned)
}

pub(crate) fn collection_dir(root: &Path, collection: &str) -> PathBuf {
    root.join(collection)
}

/// The bare resource path, without the document extension.
pub(crate) fn resource_path(root: &Path, collection: &str, resource: &str) -> PathBuf {
    collection_dir(root, collection).join(resource)
}

/// `<path>.json`
pub(crate) fn with_document_ext(path: &Path) -> PathBuf {
    append(path, &format!(".{DOCUMENT_EXT}"))
}

/// `<path>.json.tmp`
pub(crate) fn staging_path(document: &Path) -> PathBuf {
    append(document, TEMP_SUFFIX)
}

/// Returns `true` if a directory entry name is a staged, uncommitted write.
pub(crate) fn is_staging_file(name: &std::ffi::OsStr) -> bool {
    name.to_str()
        .is_some_and(|n| n.ends_with(&format!(".{DOCUMENT_EXT}{TEMP_SUFFIX}")))
}

fn append(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

/// Existence probe: stat `path`, falling back to `<path>.json` when the
/// literal path does not exist. Returns the path that matched and its
/// metadata, or `None` if neither exists.
pub(crate) fn probe(path: &Path) -> io::Result<Option<(PathBuf, Metadata)>> {
    match fs::metadata(path) {
        Ok(meta) => return Ok(Some((path.to_path_buf(), meta))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let fallback = with_document_ext(path);
    match fs::metadata(&fallback) {
        Ok(meta) => Ok(Some((fallback, meta))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_makes_absolute() {
        let p = normalize(Path::new("db")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("db"));
    }

    #[cfg(unix)]
    #[test]
    fn normalize_cleans_dot_segments() {
        assert_eq!(
            normalize(Path::new("/var/./lib/../data//db/")).unwrap(),
            PathBuf::from("/var/data/db")
        );
        assert_eq!(normalize(Path::new("/..")).unwrap(), PathBuf::from("/"));
    }

    #[test]
    fn resolved_layout() {
        let root = Path::new("/db");
        let bare = resource_path(root, "users", "alice");
        assert_eq!(bare, Path::new("/db/users/alice"));

        let doc = with_document_ext(&bare);
        assert_eq!(doc, Path::new("/db/users/alice.json"));
        assert_eq!(staging_path(&doc), Path::new("/db/users/alice.json.tmp"));
    }

    #[test]
    fn suffixes_append_rather_than_replace() {
        let doc = with_document_ext(Path::new("/db/users/v1.2"));
        assert_eq!(doc, Path::new("/db/users/v1.2.json"));
    }

    #[test]
    fn staging_files_are_recognized() {
        assert!(is_staging_file("alice.json.tmp".as_ref()));
        assert!(!is_staging_file("alice.json".as_ref()));
        assert!(!is_staging_file("alice.tmp".as_ref()));
    }

    #[test]
    fn probe_prefers_literal_then_json() {
        let dir = tempfile::tempdir().unwrap();
        let bare = dir.path().join("alice");

        assert!(probe(&bare).unwrap().is_none());

        fs::write(dir.path().join("alice.json"), "{}\n").unwrap();
        let (matched, meta) = probe(&bare).unwrap().unwrap();
        assert_eq!(matched, dir.path().join("alice.json"));
        assert!(meta.is_file());

        fs::create_dir(&bare).unwrap();
        let (matched, meta) = probe(&bare).unwrap().unwrap();
        assert_eq!(matched, bare);
        assert!(meta.is_dir());
    }
}
