// Walks a directory subtree and produces the flat listing returned by
// GET /api/files.

use super::error::{NotebookError, NotebookResult};
use super::path_resolver::resolve_directory;
use crate::models::FileEntry;
use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Extensions listed as images. Matching is case-sensitive.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
}

/// Lists every image and non-hidden directory below `root_dir/key`.
///
/// Each directory's files come before its subdirectories, and a subdirectory
/// is walked completely before its next sibling. A directory whose name starts
/// with '.' is skipped along with everything beneath it. The listing root
/// itself produces no entry.
pub fn list_directory(root_dir: &Path, key: &str) -> NotebookResult<Vec<FileEntry>> {
    let listing_root = resolve_directory(root_dir, key)?;

    if !listing_root.is_dir() {
        return Err(NotebookError::DirectoryNotFound(key.to_string()));
    }

    let walker = WalkDir::new(&listing_root)
        .min_depth(1)
        .sort_by(files_before_directories)
        .into_iter()
        .filter_entry(|entry| !is_hidden_directory(entry));

    let mut entries = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry while listing {:?}: {}", key, err);
                continue;
            }
        };

        let Some(relative_key) = relative_key(&listing_root, entry.path()) else {
            continue;
        };

        if entry.file_type().is_dir() {
            entries.push(FileEntry::Directory {
                key: format!("{}/", relative_key),
            });
            continue;
        }

        if !is_image_path(entry.path()) {
            continue;
        }

        // Follows symlinks so linked images are listed with their target's size.
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(err) => {
                warn!("Failed to read metadata of {:?}: {}", entry.path(), err);
                continue;
            }
        };

        let modified_millis = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|duration| duration.as_millis() as u64)
            .unwrap_or_default();

        entries.push(FileEntry::Image {
            key: relative_key,
            size: metadata.len(),
            modified_millis,
        });
    }

    debug!("Listed {} entries under {:?}", entries.len(), key);
    Ok(entries)
}

fn files_before_directories(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

// Pruning at every depth means any hidden segment in a directory's relative
// path excludes it.
fn is_hidden_directory(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

// Builds a '/'-separated key relative to the listing root.
fn relative_key(listing_root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(listing_root).ok()?;
    let segments: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect();
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn example_tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "image.jpg", b"jpg");
        write(dir.path(), "image_annotated.jpg", b"jpg");
        write(
            dir.path(),
            "image_annotated.json",
            br#"{"annotations": [], "tags": []}"#,
        );
        write(dir.path(), "more_images/01.jpg", b"jpg");
        write(dir.path(), "more_images/02.png", b"png");
        dir
    }

    fn keys(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(FileEntry::key).collect()
    }

    #[test]
    fn test_list_example_directory() {
        let dir = example_tree();
        let entries = list_directory(dir.path(), "").unwrap();

        assert_eq!(
            keys(&entries),
            vec![
                "image.jpg",
                "image_annotated.jpg",
                "more_images/",
                "more_images/01.jpg",
                "more_images/02.png",
            ]
        );
        assert_eq!(entries.iter().filter(|e| e.is_directory()).count(), 1);
    }

    #[test]
    fn test_list_nested_directory() {
        let dir = example_tree();
        let entries = list_directory(dir.path(), "more_images").unwrap();
        assert_eq!(keys(&entries), vec!["01.jpg", "02.png"]);
    }

    #[test]
    fn test_list_reports_size_and_modified_time() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.png", b"12345");

        let entries = list_directory(dir.path(), "").unwrap();
        match &entries[..] {
            [FileEntry::Image {
                key,
                size,
                modified_millis,
            }] => {
                assert_eq!(key, "a.png");
                assert_eq!(*size, 5);
                assert!(*modified_millis > 0);
            }
            other => panic!("unexpected listing: {:?}", other),
        }
    }

    #[test]
    fn test_list_excludes_hidden_directories_and_their_contents() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "visible/a.jpg", b"");
        write(dir.path(), ".cache/b.jpg", b"");
        write(dir.path(), ".cache/deeper/c.jpg", b"");
        write(dir.path(), "visible/.thumbs/d.jpg", b"");
        write(dir.path(), "visible/inner/e.png", b"");

        let entries = list_directory(dir.path(), "").unwrap();
        assert_eq!(
            keys(&entries),
            vec!["visible/", "visible/a.jpg", "visible/inner/", "visible/inner/e.png"]
        );
    }

    #[test]
    fn test_list_hidden_directory_as_root_lists_its_contents() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".cache/b.jpg", b"");

        let entries = list_directory(dir.path(), ".cache").unwrap();
        assert_eq!(keys(&entries), vec!["b.jpg"]);
    }

    #[test]
    fn test_list_current_dir_key_is_the_root() {
        let dir = example_tree();
        let from_empty = list_directory(dir.path(), "").unwrap();
        assert_eq!(list_directory(dir.path(), ".").unwrap(), from_empty);
        assert_eq!(list_directory(dir.path(), "./").unwrap(), from_empty);
    }

    #[test]
    fn test_list_hidden_files_are_not_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".preview.png", b"");

        let entries = list_directory(dir.path(), "").unwrap();
        assert_eq!(keys(&entries), vec![".preview.png"]);
    }

    #[test]
    fn test_list_only_whitelisted_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "a.jpg", "b.jpeg", "c.png", "d.json", "e.gif", "f.JPG", "g.txt", "noext",
        ] {
            write(dir.path(), name, b"");
        }

        let entries = list_directory(dir.path(), "").unwrap();
        let listed: BTreeSet<_> = keys(&entries).into_iter().collect();
        assert_eq!(listed, BTreeSet::from(["a.jpg", "b.jpeg", "c.png"]));
    }

    #[test]
    fn test_list_empty_directories_are_emitted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();

        let entries = list_directory(dir.path(), "").unwrap();
        assert_eq!(keys(&entries), vec!["empty/", "empty/nested/"]);
    }

    #[test]
    fn test_list_missing_directory() {
        let dir = example_tree();
        let err = list_directory(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, NotebookError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_list_file_is_not_a_directory() {
        let dir = example_tree();
        let err = list_directory(dir.path(), "image.jpg").unwrap_err();
        assert!(matches!(err, NotebookError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_list_rejects_escaping_key() {
        let dir = example_tree();
        let err = list_directory(&dir.path().join("more_images"), "..").unwrap_err();
        assert!(matches!(err, NotebookError::OutsideRoot(_)));
    }
}
