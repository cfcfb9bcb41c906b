//! Slug and filename validation.
//!
//! Every client-supplied identifier passes through here before it is joined
//! onto a content root, so nothing can resolve outside that root.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;

/// Characters never allowed in a slug segment or filename.
const FORBIDDEN_CHARS: &[char] = &['\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Longest accepted segment.
const MAX_SEGMENT_LEN: usize = 100;

fn check_segment(segment: &str, what: &str, full: &str) -> Result<(), AppError> {
    if segment.is_empty() {
        return Err(AppError::Validation(format!("{} {:?} has an empty segment", what, full)));
    }
    if segment.starts_with('.') {
        return Err(AppError::Validation(format!(
            "{} {:?} may not contain segments starting with '.'",
            what, full
        )));
    }
    if segment.chars().count() > MAX_SEGMENT_LEN {
        return Err(AppError::Validation(format!(
            "{} {:?} has a segment longer than {} characters",
            what, full, MAX_SEGMENT_LEN
        )));
    }
    if segment
        .chars()
        .any(|c| c.is_control() || FORBIDDEN_CHARS.contains(&c))
    {
        return Err(AppError::Validation(format!(
            "{} {:?} contains forbidden characters",
            what, full
        )));
    }
    Ok(())
}

/// Validate a post slug (`a/b/c` style) and return it normalized.
pub fn validate_slug(slug: &str) -> Result<String, AppError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(AppError::Validation("Slug is required".to_string()));
    }
    if slug.starts_with('/') {
        return Err(AppError::Validation(format!("Slug {:?} must be relative", slug)));
    }
    for segment in slug.split('/') {
        check_segment(segment, "Slug", slug)?;
    }
    Ok(slug.to_string())
}

/// Validate a single filename (no directory components).
pub fn validate_filename(name: &str) -> Result<String, AppError> {
    if name.contains('/') {
        return Err(AppError::Validation(format!(
            "Filename {:?} may not contain '/'",
            name
        )));
    }
    check_segment(name, "Filename", name)?;
    Ok(name.to_string())
}

/// Resolve a slug to its markdown file under `root`.
pub fn slug_path(root: &Path, slug: &str, extension: &str) -> Result<PathBuf, AppError> {
    let slug = validate_slug(slug)?;
    let mut path = root.to_path_buf();
    for segment in slug.split('/') {
        path.push(segment);
    }
    let file_name = path
        .file_name()
        .map(|n| format!("{}.{}", n.to_string_lossy(), extension))
        .ok_or_else(|| AppError::Validation(format!("Slug {:?} has no file name", slug)))?;
    path.set_file_name(file_name);
    Ok(path)
}

/// Resolve a filename to its path directly under `root`.
pub fn file_path(root: &Path, name: &str) -> Result<PathBuf, AppError> {
    Ok(root.join(validate_filename(name)?))
}

/// Derive a slug from a post title: lowercase, drop punctuation, collapse
/// whitespace and dash runs into single dashes.
pub fn slugify_title(title: &str) -> String {
    static PUNCT: OnceLock<Regex> = OnceLock::new();
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();

    let punct = PUNCT.get_or_init(|| Regex::new(r"[^\w\s-]").unwrap());
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[-\s]+").unwrap());

    let stripped = punct.replace_all(title.trim(), "");
    let dashed = separators.replace_all(&stripped, "-");
    dashed.trim_matches('-').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_slug_resolves_under_root() {
        let path = slug_path(Path::new("/posts"), "a/b/c", "md").unwrap();
        assert_eq!(path, PathBuf::from("/posts/a/b/c.md"));
    }

    #[test]
    fn test_slug_with_dots_in_name_keeps_them() {
        let path = slug_path(Path::new("/posts"), "notes/v1.2", "md").unwrap();
        assert_eq!(path, PathBuf::from("/posts/notes/v1.2.md"));
    }

    #[test]
    fn test_traversal_is_rejected() {
        for bad in ["../etc/passwd", "a/../../b", "/abs", "a//b", "a\\b", ".hidden", ""] {
            assert!(
                matches!(validate_slug(bad), Err(AppError::Validation(_))),
                "slug {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_filename_rules() {
        assert_eq!(validate_filename("cover.png").unwrap(), "cover.png");
        assert!(validate_filename("../cover.png").is_err());
        assert!(validate_filename("dir/cover.png").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("a:b.png").is_err());
    }

    #[test]
    fn test_long_segment_is_rejected() {
        let long = "x".repeat(MAX_SEGMENT_LEN + 1);
        assert!(validate_slug(&long).is_err());
        assert!(validate_slug(&"x".repeat(MAX_SEGMENT_LEN)).is_ok());
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Hello, World!"), "hello-world");
        assert_eq!(slugify_title("  Rust  --  and   Astro "), "rust-and-astro");
        assert_eq!(slugify_title("我的 第一篇"), "我的-第一篇");
        assert_eq!(slugify_title("???"), "");
    }
}
