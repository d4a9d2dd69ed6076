// Maps client-supplied relative keys onto paths below the notebook root.

use super::error::{NotebookError, NotebookResult};
use std::path::{Component, Path, PathBuf};

/// Extension of the sidecar file holding an image's annotation data.
pub const DATA_EXTENSION: &str = "json";

/// Absolute location of an image (or directory) and of its sidecar data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub absolute_path: PathBuf,
    pub data_path: PathBuf,
}

/// Joins `key` onto `root_dir` and derives the sidecar path.
///
/// The key must name an entry below the root: keys that are empty or only
/// `.` segments are rejected, since the root itself has no sidecar. See
/// [`resolve_directory`] for the escape rules. No existence check is performed.
pub fn resolve(root_dir: &Path, key: &str) -> NotebookResult<ResolvedPath> {
    let relative = normalize_key(key)?;
    if relative.as_os_str().is_empty() {
        return Err(NotebookError::Validation(format!(
            "Key {:?} does not name a file below the notebook root",
            key
        )));
    }

    // `relative` ends in a normal segment, so the sidecar stays below the root.
    let data_path = root_dir.join(data_path_for(&relative));
    let absolute_path = root_dir.join(relative);
    Ok(ResolvedPath {
        absolute_path,
        data_path,
    })
}

/// Joins `key` onto `root_dir` for directory operations; an empty key is the root.
///
/// Keys containing `..`, a leading `/` or a drive prefix are rejected, so the
/// result always lies below `root_dir` lexically. Symlinks inside the root
/// are not resolved.
pub fn resolve_directory(root_dir: &Path, key: &str) -> NotebookResult<PathBuf> {
    Ok(root_dir.join(normalize_key(key)?))
}

// Keeps the normal segments of `key`, dropping `.` segments.
fn normalize_key(key: &str) -> NotebookResult<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(key).components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(NotebookError::OutsideRoot(key.to_string()));
            }
        }
    }
    Ok(relative)
}

/// `photo.jpg` -> `photo.json`, `archive.tar.gz` -> `archive.tar.json`,
/// `README` -> `README.json`.
pub fn data_path_for(path: &Path) -> PathBuf {
    path.with_extension(DATA_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_replaces_extension() {
        let resolved = resolve(Path::new("/data"), "more_images/01.jpg").unwrap();
        assert_eq!(
            resolved.absolute_path,
            PathBuf::from("/data/more_images/01.jpg")
        );
        assert_eq!(resolved.data_path, PathBuf::from("/data/more_images/01.json"));
    }

    #[test]
    fn test_resolve_only_last_extension_is_replaced() {
        let resolved = resolve(Path::new("/data"), "scan.v2.png").unwrap();
        assert_eq!(resolved.data_path, PathBuf::from("/data/scan.v2.json"));
    }

    #[test]
    fn test_resolve_without_extension_appends_json() {
        let resolved = resolve(Path::new("/data"), "notes").unwrap();
        assert_eq!(resolved.data_path, PathBuf::from("/data/notes.json"));
    }

    #[test]
    fn test_resolve_dot_in_directory_name_is_not_an_extension() {
        let resolved = resolve(Path::new("/data"), "set.v1/image").unwrap();
        assert_eq!(resolved.data_path, PathBuf::from("/data/set.v1/image.json"));
    }

    #[test]
    fn test_resolve_rejects_keys_naming_the_root() {
        for key in ["", ".", "./", "./."] {
            let err = resolve(Path::new("/data/root"), key).unwrap_err();
            assert!(matches!(err, NotebookError::Validation(_)), "{key:?}");
        }
    }

    #[test]
    fn test_resolve_sidecar_never_leaves_root() {
        let root = Path::new("/data/root");
        for key in ["a.jpg", "./a.jpg", "dir/./a", "dir/", "./dir/b.png"] {
            let resolved = resolve(root, key).unwrap();
            assert!(resolved.data_path.starts_with(root), "{key:?}");
            assert_ne!(resolved.data_path, PathBuf::from("/data/root.json"));
        }
    }

    #[test]
    fn test_resolve_directory_empty_key_is_root() {
        assert_eq!(
            resolve_directory(Path::new("/data"), "").unwrap(),
            PathBuf::from("/data")
        );
        assert_eq!(
            resolve_directory(Path::new("/data"), "./").unwrap(),
            PathBuf::from("/data")
        );
        assert_eq!(
            resolve_directory(Path::new("/data"), "more_images/").unwrap(),
            PathBuf::from("/data/more_images")
        );
    }

    #[test]
    fn test_resolve_directory_rejects_parent_segments() {
        let err = resolve_directory(Path::new("/data"), "a/../..").unwrap_err();
        assert!(matches!(err, NotebookError::OutsideRoot(_)));
    }

    #[test]
    fn test_resolve_does_not_check_existence() {
        assert!(resolve(Path::new("/definitely/missing"), "x.jpg").is_ok());
    }

    #[test]
    fn test_resolve_rejects_parent_segments() {
        for key in ["../secret.jpg", "a/../../b.png", "a/.."] {
            let err = resolve(Path::new("/data"), key).unwrap_err();
            assert!(matches!(err, NotebookError::OutsideRoot(_)), "{key}");
        }
    }

    #[test]
    fn test_resolve_rejects_absolute_keys() {
        let err = resolve(Path::new("/data"), "/etc/passwd").unwrap_err();
        assert!(matches!(err, NotebookError::OutsideRoot(_)));
    }

    #[test]
    fn test_resolve_allows_current_dir_segments() {
        let resolved = resolve(Path::new("/data"), "./image.jpg").unwrap();
        assert_eq!(resolved.absolute_path, PathBuf::from("/data/image.jpg"));
        assert_eq!(resolved.data_path, PathBuf::from("/data/image.json"));
    }
}
