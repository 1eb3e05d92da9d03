//! Unix-style path helpers
//!
//! The cartridge only understands forward slashes. Everything that ends up on
//! the wire goes through these helpers first.

use alloc::string::{String, ToString};

/// Replace Windows separators with forward slashes
pub fn to_unix_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Collapse any run of slashes into a single one
pub fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_was_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !last_was_slash {
                out.push(c);
            }
            last_was_slash = true;
        } else {
            out.push(c);
            last_was_slash = false;
        }
    }
    out
}

/// Join path segments with `/` and normalize the result
///
/// ```
/// use tr_model::path::unix_path_combine;
/// assert_eq!(unix_path_combine("/", &["music/", "/a.sid"]), "/music/a.sid");
/// ```
pub fn unix_path_combine(base: &str, parts: &[&str]) -> String {
    let mut combined = to_unix_path(base);
    for part in parts {
        combined.push('/');
        combined.push_str(&to_unix_path(part));
    }
    collapse_slashes(&combined)
}

/// Ensure the path ends with exactly one `/`
pub fn ensure_unix_path_ending(path: &str) -> String {
    let mut path = collapse_slashes(&to_unix_path(path));
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}

/// Last segment of the path (empty for a directory path ending in `/`)
pub fn file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

/// Extension of the last segment, without the dot
pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx + 1..]),
    }
}

/// Parent directory, always absolute and ending in `/`
pub fn parent(path: &str) -> String {
    let path = collapse_slashes(&to_unix_path(path));
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) if idx > 0 => ensure_unix_path_ending(&trimmed[..idx]),
        Some(_) => "/".to_string(),
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_unix_path() {
        assert_eq!(to_unix_path(r"games\c64\a.prg"), "games/c64/a.prg");
    }

    #[test]
    fn test_combine_collapses_double_slashes() {
        assert_eq!(unix_path_combine("/", &["music"]), "/music");
        assert_eq!(unix_path_combine("/root/", &["/music/", "a.sid"]), "/root/music/a.sid");
        assert_eq!(unix_path_combine(r"\usb", &["games"]), "/usb/games");
    }

    #[test]
    fn test_ensure_unix_path_ending() {
        assert_eq!(ensure_unix_path_ending("/music"), "/music/");
        assert_eq!(ensure_unix_path_ending("/music//"), "/music/");
        assert_eq!(ensure_unix_path_ending(""), "/");
    }

    #[test]
    fn test_file_name_and_extension() {
        assert_eq!(file_name("/music/a.sid"), "a.sid");
        assert_eq!(file_name("/music/"), "");
        assert_eq!(extension("/music/A.SID"), Some("SID"));
        assert_eq!(extension("/music/.hidden"), None);
        assert_eq!(extension("/music/readme"), None);
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("/music/a.sid"), "/music/");
        assert_eq!(parent("/music/"), "/");
        assert_eq!(parent("/a.sid"), "/");
        assert_eq!(parent("/"), "/");
    }
}
