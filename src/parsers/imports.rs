//! Import specifier extraction for JavaScript and TypeScript sources.
//!
//! Extraction is pattern based: only string-literal specifiers are seen.
//! Specifiers assembled from concatenation, template interpolation or
//! variables are missed, which callers accept as a false negative.

use regex::Regex;
use std::sync::LazyLock;

/// `import x from './a'`, `import { a, b } from "./a"`, `import './side-effect'`
static STATIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s+(?:[^'"`;()]*?\s*from\s*)?['"]([^'"\n]+)['"]"#)
        .expect("static import pattern")
});

/// `require('./a')`
static REQUIRE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("require pattern")
});

/// `import('./a')`
static DYNAMIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("dynamic import pattern")
});

/// `export { a } from './a'`, `export * from './a'`
static RE_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bexport\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"]([^'"\n]+)['"]"#)
        .expect("re-export pattern")
});

/// The syntactic shapes recognised, in scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportShape {
    Static,
    Require,
    Dynamic,
    ReExport,
}

impl ImportShape {
    pub const ALL: [ImportShape; 4] = [
        ImportShape::Static,
        ImportShape::Require,
        ImportShape::Dynamic,
        ImportShape::ReExport,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            ImportShape::Static => &*STATIC_IMPORT,
            ImportShape::Require => &*REQUIRE_CALL,
            ImportShape::Dynamic => &*DYNAMIC_IMPORT,
            ImportShape::ReExport => &*RE_EXPORT,
        }
    }
}

/// Scans source text for import specifiers.
///
/// The compiled patterns are immutable and shared; every call to
/// [`ImportScanner::scan`] builds fresh match iterators starting at offset
/// zero, so nothing carries over from one file to the next.
#[derive(Debug, Clone)]
pub struct ImportScanner {
    shapes: Vec<ImportShape>,
}

impl ImportScanner {
    pub fn new() -> Self {
        Self {
            shapes: ImportShape::ALL.to_vec(),
        }
    }

    /// Restrict scanning to the given shapes (kept in the given order)
    pub fn with_shapes(shapes: &[ImportShape]) -> Self {
        Self {
            shapes: shapes.to_vec(),
        }
    }

    /// Lazily yield specifiers: every match of the first shape, then the
    /// next shape, and so on.
    pub fn scan<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.shapes.iter().flat_map(move |shape| {
            shape
                .pattern()
                .captures_iter(content)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
                .filter(|specifier| !specifier.is_empty())
        })
    }
}

impl Default for ImportScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect every import specifier in `content`, in scan order
pub fn extract_imports(content: &str) -> Vec<String> {
    ImportScanner::new()
        .scan(content)
        .map(str::to_string)
        .collect()
}
