pub mod imports;

pub use imports::{extract_imports, ImportScanner, ImportShape};

/// Script extensions collected, resolved and stripped from labels, in
/// resolution order
pub const SCRIPT_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// Returns the script extension of `path` when it is one we analyze
pub fn script_extension(path: &str) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    SCRIPT_EXTENSIONS
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(ext))
}
