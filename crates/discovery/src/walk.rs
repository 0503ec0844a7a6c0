use crate::cancel::CancellationToken;
use pagemap_core::{Error, RawPageEntry, Result};
use std::fs;
use std::io;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Collect every leaf page file under `root`.
///
/// Entries are visited depth-first with siblings sorted by name, so the
/// result is stable across runs on the same tree. Symlinked directories
/// are followed; one that leads back to its own ancestor aborts the scan.
pub fn walk(
    root: &Path,
    leaf_file: &str,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<RawPageEntry>> {
    ensure_readable_dir(root)?;

    let mut pages = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            tracing::debug!(root = %root.display(), "scan cancelled");
            return Err(Error::Cancelled);
        }

        let entry = entry.map_err(classify_walk_error)?;

        if entry.file_type().is_dir() || entry.file_name() != leaf_file {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| Error::scan(entry.path(), io::Error::other("entry outside content root")))?;

        let page = RawPageEntry::new(path_segments(relative, entry.path())?);
        tracing::debug!(page = %page, "found page");
        pages.push(page);
    }

    Ok(pages)
}

fn ensure_readable_dir(root: &Path) -> Result<()> {
    let not_found = || Error::NotFound {
        path: root.to_path_buf(),
    };

    let metadata = fs::metadata(root).map_err(|_| not_found())?;
    if !metadata.is_dir() {
        return Err(not_found());
    }
    fs::read_dir(root).map_err(|_| not_found())?;

    Ok(())
}

/// Split a relative path into UTF-8 segments; URL paths cannot carry anything else
fn path_segments(relative: &Path, full: &Path) -> Result<Vec<String>> {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .map(|name| {
            name.to_str().map(str::to_string).ok_or_else(|| {
                Error::scan(
                    full,
                    io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
                )
            })
        })
        .collect()
}

fn classify_walk_error(err: walkdir::Error) -> Error {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();

    if let Some(ancestor) = err.loop_ancestor() {
        return Error::CycleDetected {
            path,
            ancestor: ancestor.to_path_buf(),
        };
    }

    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("directory walk failed"));
    Error::scan(path, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Helper to create a content tree with the given files (empty contents)
    fn create_tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"export default function Page() {}").unwrap();
        }
        dir
    }

    fn relative_paths(pages: &[RawPageEntry]) -> Vec<String> {
        pages.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_walk_finds_leaf_files_only() {
        let dir = create_tree(&[
            "page.tsx",
            "layout.tsx",
            "about/page.tsx",
            "about/components/Hero.tsx",
            "contact/page.ts",
        ]);

        let pages = walk(dir.path(), "page.tsx", None).unwrap();
        assert_eq!(relative_paths(&pages), vec!["about/page.tsx", "page.tsx"]);
    }

    #[test]
    fn test_walk_is_sorted_and_depth_first() {
        let dir = create_tree(&[
            "zeta/page.tsx",
            "alpha/page.tsx",
            "alpha/nested/page.tsx",
            "beta/page.tsx",
            "page.tsx",
        ]);

        let pages = walk(dir.path(), "page.tsx", None).unwrap();
        assert_eq!(
            relative_paths(&pages),
            vec![
                "alpha/nested/page.tsx",
                "alpha/page.tsx",
                "beta/page.tsx",
                "page.tsx",
                "zeta/page.tsx",
            ]
        );
    }

    #[test]
    fn test_walk_ignores_directory_named_like_leaf() {
        let dir = create_tree(&["page.tsx/inner.tsx"]);
        let pages = walk(dir.path(), "page.tsx", None).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_walk_empty_tree() {
        let dir = TempDir::new().unwrap();
        let pages = walk(dir.path(), "page.tsx", None).unwrap();
        assert!(pages.is_empty(), "Empty directory should contain no pages");
    }

    #[test]
    fn test_walk_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = walk(&missing, "page.tsx", None);
        match result {
            Err(Error::NotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_walk_root_is_a_file() {
        let dir = create_tree(&["page.tsx"]);
        let result = walk(&dir.path().join("page.tsx"), "page.tsx", None);
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_walk_honors_cancellation() {
        let dir = create_tree(&["page.tsx", "about/page.tsx"]);
        let token = CancellationToken::new();
        token.cancel();

        let result = walk(dir.path(), "page.tsx", Some(&token));
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_detects_symlink_cycle() {
        let dir = create_tree(&["page.tsx", "docs/page.tsx"]);
        std::os::unix::fs::symlink(dir.path(), dir.path().join("docs/loop")).unwrap();

        let result = walk(dir.path(), "page.tsx", None);
        match result {
            Err(Error::CycleDetected { path, .. }) => {
                assert!(path.ends_with("docs/loop"));
            }
            other => panic!("expected CycleDetected, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_follows_symlinked_directory() {
        let dir = create_tree(&["shared/pricing/page.tsx"]);
        let root = dir.path().join("app");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(dir.path().join("shared/pricing"), root.join("pricing"))
            .unwrap();

        let pages = walk(&root, "page.tsx", None).unwrap();
        assert_eq!(relative_paths(&pages), vec!["pricing/page.tsx"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_dangling_symlink_is_scan_error() {
        let dir = create_tree(&["page.tsx"]);
        let dangling = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("gone"), &dangling).unwrap();

        let result = walk(dir.path(), "page.tsx", None);
        match result {
            Err(Error::Scan { path, source }) => {
                assert_eq!(path, dangling);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Scan, got {:?}", other),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_walk_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let bad = dir.path().join(OsStr::from_bytes(b"bad\xff"));
        fs::create_dir(&bad).unwrap();
        fs::write(bad.join("page.tsx"), b"").unwrap();

        let result = walk(dir.path(), "page.tsx", None);
        match result {
            Err(Error::Scan { path, source }) => {
                assert_eq!(path, bad.join("page.tsx"));
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("expected Scan, got {:?}", other),
        }
    }

    #[test]
    fn test_path_segments_skips_non_normal_components() {
        let segments = path_segments(Path::new("./about/page.tsx"), Path::new("x")).unwrap();
        assert_eq!(segments, vec!["about", "page.tsx"]);
    }
}
