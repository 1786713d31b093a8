use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

use crate::scanner::ignore::IgnoreRules;
use crate::utils::error::CritiqError;

/// A file discovered during repository scanning.
///
/// `path` is relative to the scan root and uses forward-slash separators
/// regardless of host conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Root-relative path of the file
    pub path: String,
    /// File content, read as UTF-8 text
    pub content: String,
}

/// Walk a directory tree and collect the contents of non-ignored files.
///
/// The traversal is depth-first with an explicit stack of pending directory
/// readers, so a directory's entries are processed before its later
/// siblings and recursion depth is not a concern on deep trees. Sibling
/// order is whatever the OS directory listing returns.
///
/// Every entry's root-relative path is tested against `rules` before any
/// further processing; a matching directory is pruned whole. Files that
/// cannot be read (permissions, non-UTF-8 content) are skipped with a
/// warning. A failure listing a directory's entries aborts the scan, since
/// the file set would otherwise be silently incomplete.
///
/// Symbolic links are classified by their resolved target; directories are
/// tracked by canonical path so symlink cycles terminate.
pub async fn scan_repository(
    root: &Path,
    rules: &IgnoreRules,
) -> Result<Vec<FileEntry>, CritiqError> {
    let mut entries = Vec::new();
    let mut visited_dirs = HashSet::new();

    if let Ok(canonical) = fs::canonicalize(root).await {
        visited_dirs.insert(canonical);
    }

    let mut stack = vec![fs::read_dir(root).await?];

    loop {
        let Some(reader) = stack.last_mut() else {
            break;
        };
        let Some(entry) = reader.next_entry().await? else {
            stack.pop();
            continue;
        };

        let path = entry.path();
        let Some(relative) = relative_slash_path(root, &path) else {
            continue;
        };

        if rules.is_match(&relative) {
            tracing::debug!("Ignoring {}", relative);
            continue;
        }

        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", relative, e);
                continue;
            }
        };

        // Classify symlinks by what they point at.
        let (is_dir, is_file) = if file_type.is_symlink() {
            match fs::metadata(&path).await {
                Ok(metadata) => (metadata.is_dir(), metadata.is_file()),
                Err(e) => {
                    tracing::warn!("Skipping unresolvable symlink {}: {}", relative, e);
                    continue;
                }
            }
        } else {
            (file_type.is_dir(), file_type.is_file())
        };

        if is_dir {
            match fs::canonicalize(&path).await {
                Ok(canonical) => {
                    if !visited_dirs.insert(canonical) {
                        tracing::warn!("Skipping already-visited directory {}", relative);
                        continue;
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", relative, e);
                    continue;
                }
            }
            stack.push(fs::read_dir(&path).await?);
        } else if is_file {
            match fs::read_to_string(&path).await {
                Ok(content) => entries.push(FileEntry {
                    path: relative,
                    content,
                }),
                Err(e) => {
                    tracing::warn!("Skipping unreadable file {}: {}", relative, e);
                }
            }
        }
    }

    tracing::info!("Scanned {} files", entries.len());
    Ok(entries)
}

/// Compute a root-relative path in forward-slash form.
fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_slash_path() {
        let root = Path::new("/repo");
        let path = Path::new("/repo/src/main.rs");
        assert_eq!(
            relative_slash_path(root, path),
            Some("src/main.rs".to_string())
        );
    }

    #[test]
    fn test_relative_slash_path_outside_root() {
        let root = Path::new("/repo");
        let path = Path::new("/elsewhere/main.rs");
        assert_eq!(relative_slash_path(root, path), None);
    }
}
