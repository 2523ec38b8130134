use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A collected source file keyed by its canonical path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: normalize_key(&path.into()),
            content: content.into(),
        }
    }
}

/// Canonical path key -> content, iterated in first-insertion order.
///
/// Tables gathered from a local directory remember the directory's name,
/// which every key starts with; it is part of the key but not of the
/// project layout.
#[derive(Debug, Clone, Default)]
pub struct FileTable {
    files: Vec<SourceFile>,
    index: HashMap<String, usize>,
    root: Option<String>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        let root = root.into();
        self.root = (!root.is_empty()).then_some(root);
        self
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// `key` with the leading root directory removed
    pub fn project_path<'k>(&self, key: &'k str) -> &'k str {
        strip_root(key, self.root())
    }

    /// Insert a file. Re-inserting a key replaces its content in place.
    pub fn insert(&mut self, file: SourceFile) {
        match self.index.get(&file.path) {
            Some(&slot) => self.files[slot].content = file.content,
            None => {
                self.index.insert(file.path.clone(), self.files.len());
                self.files.push(file);
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&slot| self.files[slot].content.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<SourceFile> for FileTable {
    fn from_iter<I: IntoIterator<Item = SourceFile>>(iter: I) -> Self {
        let mut table = FileTable::new();
        for file in iter {
            table.insert(file);
        }
        table
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for FileTable {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(path, content)| SourceFile::new(path, content))
            .collect()
    }
}

/// `key` without its leading `<root>/` segment, when it has one
pub fn strip_root<'k>(key: &'k str, root: Option<&str>) -> &'k str {
    root.and_then(|root| key.strip_prefix(root))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(key)
}

/// Forward slashes, no leading `/` or `./`
pub fn normalize_key(path: &str) -> String {
    let forward = path.replace('\\', "/");
    let mut key = forward.as_str();
    loop {
        if let Some(rest) = key.strip_prefix("./") {
            key = rest;
        } else if let Some(rest) = key.strip_prefix('/') {
            key = rest;
        } else {
            break;
        }
    }
    key.to_string()
}
