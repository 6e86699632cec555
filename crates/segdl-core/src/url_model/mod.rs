//! Output naming: filename derivation from the URL and collision handling.
//!
//! Derives a safe local filename from the URL path when the caller did not
//! supply one, then picks a path that does not clobber an existing file.

mod collision;
mod path;
mod sanitize;

pub use collision::resolve_output_path;
pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Default filename when the URL path yields nothing usable.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe filename for saving `url`.
///
/// Uses the last path segment with any query string or fragment removed,
/// sanitized for the local filesystem.
///
/// # Examples
///
/// - `derive_filename("http://www.yahoo.com/index.html")` → `"index.html"`
/// - `derive_filename("http://movie.com/a/k1.mkv?auth=1")` → `"k1.mkv"`
pub fn derive_filename(url: &str) -> String {
    let raw = match filename_from_url_path(url) {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
