//! YAML front matter codec.
//!
//! A post file is `---\n<yaml>---\n<body>`. Parsing splits the block off and
//! deserializes it; serialization emits the block and then unquotes
//! `published`/`updated` dates so the site generator types them as dates.

use std::sync::OnceLock;

use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppError;

const DELIMITER: &str = "---";

/// Split `text` into its raw YAML block and body.
///
/// Returns `None` when the text has no complete front matter block.
pub fn split(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(|c| c == '\r' || c == '\n') == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse only the metadata of a post file.
pub fn parse_metadata<T>(text: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    match split(text) {
        Some((yaml, _)) => decode(yaml),
        None => Ok(T::default()),
    }
}

/// Parse a post file into its metadata and body.
pub fn parse<T>(text: &str) -> Result<(T, String), AppError>
where
    T: DeserializeOwned + Default,
{
    match split(text) {
        Some((yaml, body)) => Ok((decode(yaml)?, body.to_string())),
        None => Ok((T::default(), text.to_string())),
    }
}

/// Render metadata and body back into a post file.
pub fn serialize<T: Serialize>(body: &str, metadata: &T) -> Result<String, AppError> {
    let mut yaml = serde_yaml::to_string(metadata)?;
    if yaml.trim() == "{}" {
        yaml.clear();
    }
    if !yaml.is_empty() && !yaml.ends_with('\n') {
        yaml.push('\n');
    }

    let yaml = unquote_dates(&yaml);
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{body}"))
}

/// Strip the quotes an emitter may put around top-level `published`/`updated`
/// dates. Only meant for the YAML block, never the body.
pub fn unquote_dates(text: &str) -> String {
    static QUOTED_DATE: OnceLock<Regex> = OnceLock::new();
    let re = QUOTED_DATE.get_or_init(|| {
        Regex::new(r#"(?m)^(published|updated):[ \t]*['"](\d{4}-\d{2}-\d{2})['"][ \t]*$"#).unwrap()
    });
    re.replace_all(text, "$1: $2").into_owned()
}

fn decode<T>(yaml: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    if yaml.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostMetadata;

    fn sample_metadata() -> PostMetadata {
        PostMetadata {
            title: Some("Hello: a post".to_string()),
            description: Some("first".to_string()),
            published: Some("2024-01-01".to_string()),
            updated: Some("2024-02-03".to_string()),
            draft: Some(false),
            tags: Some(vec!["rust".to_string(), "astro".to_string()]),
            category: Some("notes".to_string()),
            pinned: Some(true),
            image: Some("/assets/cover.png".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_round_trip_preserves_metadata_and_body() {
        let metadata = sample_metadata();
        let body = "# Title\n\nSome *markdown*.\n\n---\n\nMore after a rule.";

        let text = serialize(body, &metadata).unwrap();
        let (parsed, parsed_body): (PostMetadata, String) = parse(&text).unwrap();

        assert_eq!(parsed, metadata);
        assert_eq!(parsed_body, body);
    }

    #[test]
    fn test_dates_are_written_bare() {
        let text = serialize("hi", &sample_metadata()).unwrap();

        assert!(text.contains("\npublished: 2024-01-01\n"));
        assert!(text.contains("\nupdated: 2024-02-03\n"));
        assert!(!text.contains("'2024-01-01'"));
        assert!(!text.contains("\"2024-01-01\""));
    }

    #[test]
    fn test_unquote_dates_only_touches_date_keys() {
        let text = "published: '2024-01-01'\nupdated: \"2024-05-06\"\ntitle: '2024-01-01'\n";
        assert_eq!(
            unquote_dates(text),
            "published: 2024-01-01\nupdated: 2024-05-06\ntitle: '2024-01-01'\n"
        );
    }

    #[test]
    fn test_body_date_lines_are_left_alone() {
        let body = "Changelog\npublished: '2024-01-01'\n";

        let text = serialize(body, &PostMetadata::default()).unwrap();
        let (_, parsed_body): (PostMetadata, String) = parse(&text).unwrap();
        assert_eq!(parsed_body, body);

        let text = serialize(body, &sample_metadata()).unwrap();
        let (parsed, parsed_body): (PostMetadata, String) = parse(&text).unwrap();
        assert_eq!(parsed.published.as_deref(), Some("2024-01-01"));
        assert_eq!(parsed_body, body);
    }

    #[test]
    fn test_unquote_dates_ignores_nested_keys() {
        let text = "series:\n  published: '2024-01-01'\n";
        assert_eq!(unquote_dates(text), text);
    }

    #[test]
    fn test_unquote_dates_ignores_non_dates() {
        let text = "published: 'soon'\n";
        assert_eq!(unquote_dates(text), text);
    }

    #[test]
    fn test_text_without_front_matter_is_all_body() {
        let (metadata, body): (PostMetadata, String) = parse("just text\n---\n").unwrap();
        assert_eq!(metadata, PostMetadata::default());
        assert_eq!(body, "just text\n---\n");
    }

    #[test]
    fn test_unterminated_block_is_all_body() {
        let text = "---\ntitle: x\nno closing";
        let (metadata, body): (PostMetadata, String) = parse(text).unwrap();
        assert_eq!(metadata, PostMetadata::default());
        assert_eq!(body, text);
    }

    #[test]
    fn test_crlf_and_empty_block() {
        assert_eq!(split("---\r\ntitle: x\r\n---\r\nbody"), Some(("title: x\r\n", "body")));
        assert_eq!(split("---\n---\nbody"), Some(("", "body")));

        let (metadata, body): (PostMetadata, String) = parse("---\n---\nbody").unwrap();
        assert_eq!(metadata, PostMetadata::default());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_unknown_keys_survive() {
        let text = "---\ntitle: T\nlang: ja\nseries:\n  name: s1\n---\nbody";
        let (metadata, body): (PostMetadata, String) = parse(text).unwrap();

        assert_eq!(metadata.title.as_deref(), Some("T"));
        assert_eq!(metadata.extra["lang"], serde_json::json!("ja"));
        assert_eq!(metadata.extra["series"]["name"], serde_json::json!("s1"));

        let again = serialize(&body, &metadata).unwrap();
        let (reparsed, _): (PostMetadata, String) = parse(&again).unwrap();
        assert_eq!(reparsed, metadata);
    }

    #[test]
    fn test_empty_metadata_serializes_empty_block() {
        let text = serialize("body", &PostMetadata::default()).unwrap();
        assert_eq!(text, "---\n---\nbody");
    }

    #[test]
    fn test_parse_metadata_skips_body() {
        let metadata: PostMetadata =
            parse_metadata("---\ntitle: T\ndraft: true\n---\nbody").unwrap();
        assert_eq!(metadata.title.as_deref(), Some("T"));
        assert_eq!(metadata.draft, Some(true));
    }
}
