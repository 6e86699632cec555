//! Filename sanitization.

/// Longest name most filesystems accept for one path component (NAME_MAX).
const NAME_MAX: usize = 255;

/// Makes a URL-derived name safe to use as a single path component.
///
/// Path separators, NUL and control characters become `_`, runs of `_`
/// collapse to one, surrounding dots, spaces and underscores are trimmed and
/// the result is cut to `NAME_MAX` bytes on a char boundary.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for c in name.chars() {
        let unsafe_char = matches!(c, '\0' | '/' | '\\') || c.is_control();
        if unsafe_char || c == '_' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
