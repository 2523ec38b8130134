use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::table::{FileTable, SourceFile};
use crate::parsers::script_extension;

/// Directory names never descended into
pub const EXCLUDED_DIRS: [&str; 6] = ["node_modules", ".next", "dist", "build", "public", ".git"];

/// Multi-segment directory paths never descended into
pub const EXCLUDED_PATHS: [&str; 1] = ["prisma/migrations"];

/// Whether a relative, forward-slash path lies under an excluded directory
pub fn is_excluded(path: &str) -> bool {
    let segments: Vec<&str> = path.split('/').collect();
    let dirs = &segments[..segments.len().saturating_sub(1)];

    if dirs.iter().any(|dir| EXCLUDED_DIRS.contains(dir)) {
        return true;
    }
    EXCLUDED_PATHS.iter().any(|excluded| {
        let parts: Vec<&str> = excluded.split('/').collect();
        dirs.windows(parts.len()).any(|window| window == parts.as_slice())
    })
}

/// Walks a local directory and reads every script file it finds
pub struct FileScanner;

impl FileScanner {
    pub fn new() -> Self {
        Self
    }

    /// Keys are `<root dir name>/<relative path>` with forward slashes.
    /// Unreadable or non-UTF-8 files are skipped.
    pub fn scan_directory(&self, root_path: &Path) -> Result<Vec<SourceFile>> {
        if !root_path.is_dir() {
            anyhow::bail!("not a directory: {}", root_path.display());
        }

        let root = root_path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", root_path.display()))?;
        let prefix = root_name(&root);

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded_dir(entry, &root));

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(relative) = relative_key(entry.path(), &root) else {
                continue;
            };
            if script_extension(&relative).is_none() {
                continue;
            }

            match fs::read_to_string(entry.path()) {
                Ok(content) => {
                    let key = if prefix.is_empty() {
                        relative
                    } else {
                        format!("{prefix}/{relative}")
                    };
                    debug!(path = %key, bytes = content.len(), "collected local file");
                    files.push(SourceFile::new(key, content));
                }
                Err(err) => {
                    warn!("Failed to read {}: {}", entry.path().display(), err);
                }
            }
        }

        Ok(files)
    }

    /// Scan into a table that knows its keys start with the root's name
    pub fn scan_table(&self, root_path: &Path) -> Result<FileTable> {
        let files = self.scan_directory(root_path)?;
        let root = root_path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", root_path.display()))?;
        Ok(files
            .into_iter()
            .collect::<FileTable>()
            .with_root(root_name(&root)))
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn is_excluded_dir(entry: &DirEntry, root: &Path) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    match relative_key(entry.path(), root) {
        // a trailing placeholder turns the directory itself into a parent segment
        Some(relative) => is_excluded(&format!("{relative}/_")),
        None => false,
    }
}
