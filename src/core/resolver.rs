use super::table::FileTable;
use crate::parsers::SCRIPT_EXTENSIONS;

/// Maps relative import specifiers onto keys of a [`FileTable`].
///
/// Resolution is a pure lookup; it never touches the filesystem or network.
/// Bare specifiers (packages, aliases) are always unresolved so external
/// dependencies stay out of the graph.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    table: &'a FileTable,
}

impl<'a> PathResolver<'a> {
    pub fn new(table: &'a FileTable) -> Self {
        Self { table }
    }

    /// Resolve `specifier` as written in the file keyed `importer`
    pub fn resolve(&self, specifier: &str, importer: &str) -> Option<String> {
        if !specifier.starts_with('.') {
            return None;
        }

        let joined = join_posix(dirname(importer), specifier);
        if self.table.contains(&joined) {
            return Some(joined);
        }

        if has_extension(&joined) {
            return None;
        }

        let found = candidates(&joined).find(|candidate| self.table.contains(candidate));
        found
    }
}

/// `<p>.ext` for each script extension, then `<p>/index.ext`
fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    let direct = SCRIPT_EXTENSIONS
        .iter()
        .map(move |ext| format!("{base}.{ext}"));
    let index = SCRIPT_EXTENSIONS
        .iter()
        .map(move |ext| format!("{base}/index.{ext}"));
    direct.chain(index)
}

/// Posix dirname; `""` for a bare file name
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Posix basename
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Whether the last path segment carries an extension (`.hidden` does not)
pub fn has_extension(path: &str) -> bool {
    let name = basename(path);
    matches!(name.rfind('.'), Some(pos) if pos > 0 && pos + 1 < name.len())
}

/// Join `specifier` onto `base` and collapse `.` and `..` segments.
///
/// Leading `..` segments that climb above `base` are kept, matching posix
/// join semantics; such keys never exist in a table.
pub fn join_posix(base: &str, specifier: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(specifier.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}
