use crate::error::{PackagerError, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every regular file under `root`, sorted by path. Symlinks are not followed.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// `path` relative to `base`, joined with `/` on every platform.
pub fn relative_slash_path(base: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(base)
        .map_err(|_| PackagerError::OutsideBase {
            path: path.to_path_buf(),
            base: base.to_path_buf(),
        })?;
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Hex digest and byte length of a file.
pub fn hash_file(path: &Path) -> Result<(String, u64)> {
    let bytes = std::fs::read(path)?;
    Ok((sha256_hex(&bytes), bytes.len() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn collects_nested_files_in_path_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("b/inner")).unwrap();
        std::fs::write(root.join("b/inner/z.txt"), "z").unwrap();
        std::fs::write(root.join("a.txt"), "a").unwrap();
        std::fs::write(root.join("b/c.txt"), "c").unwrap();

        let files = collect_files(root).unwrap();
        let relative: Vec<String> = files
            .iter()
            .map(|path| relative_slash_path(root, path).unwrap())
            .collect();
        assert_eq!(relative, vec!["a.txt", "b/c.txt", "b/inner/z.txt"]);
    }

    #[test]
    fn relative_path_outside_base_is_an_error() {
        let err = relative_slash_path(Path::new("/a/b"), Path::new("/c/d")).unwrap_err();
        assert!(matches!(err, PackagerError::OutsideBase { .. }));
    }

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
