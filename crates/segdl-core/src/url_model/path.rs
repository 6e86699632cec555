//! Filename extraction from the URL path.

/// Extracts the last path segment of `url` for use as a filename hint.
///
/// Query strings and fragments never become part of the name. Strings that
/// do not parse as absolute URLs are split on `/` as plain paths.
/// Returns `None` when the path is empty or root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => last_segment(parsed.path())?.to_string(),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or("");
            last_segment(path)?.to_string()
        }
    };
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}

fn last_segment(path: &str) -> Option<&str> {
    path.split('/').filter(|s| !s.is_empty()).last()
}
