use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use spdlog::warn;

use crate::content::{PostHeader, Status};
use crate::error::ParseError;
use crate::text_utils::parse_date_time;

/// Separates the header block from the markdown body.
pub const CONTENT_DELIMITER: &str = "\n\n### Content\n\n";

/// Category assigned by the old blog export when nothing was chosen. Never stored.
pub const UNCATEGORIZED: &str = "Uncategorized";

lazy_static! {
    static ref TITLE_REGEX: Regex = Regex::new(r"(?m)^# (?P<value>.*)$").unwrap();
    static ref CATEGORIES_REGEX: Regex = field_regex("Categories");
    static ref TAGS_REGEX: Regex = field_regex("Tags");
    static ref CREATION_DATE_REGEX: Regex = field_regex("Creation Date");
    static ref MODIFICATION_DATE_REGEX: Regex = field_regex("Modification Date");
    static ref SLUG_REGEX: Regex = field_regex("Slug");
    static ref STATUS_REGEX: Regex = field_regex("Status");
}

fn field_regex(name: &str) -> Regex {
    let pattern = format!(r"(?m)^\* {}:(?P<value>.*)$", regex::escape(name));
    Regex::new(&pattern).unwrap()
}

/// Splits the raw text of a post file in (header, content).
/// Expects line endings already normalized to `\n`.
pub fn split_header(raw: &str) -> Result<(&str, &str), ParseError> {
    raw.split_once(CONTENT_DELIMITER)
        .ok_or(ParseError::MissingDelimiter)
}

/// Example of header
/// # What I learned after 20+ years of software development
///
/// * Categories: Programming, Career
/// * Tags: rust, career
/// * Creation Date: 2022-04-02T12:05:00
/// * Status: publish
///
/// Every field is matched on its own, so the order of the lines does not matter
/// and the optional ones can simply be left out.
pub fn parse_post_header(header: &str) -> Result<PostHeader, ParseError> {
    let title = extract_field(header, &TITLE_REGEX)
        .ok_or(ParseError::MissingField("Title"))?
        .to_string();

    let categories: BTreeSet<String> = extract_list(extract_field(header, &CATEGORIES_REGEX))
        .into_iter()
        .filter(|c| c != UNCATEGORIZED)
        .collect();
    let tags = extract_list(extract_field(header, &TAGS_REGEX));

    let creation_date = extract_field(header, &CREATION_DATE_REGEX)
        .ok_or(ParseError::MissingField("Creation Date"))?;
    let creation_date = parse_date_field("Creation Date", creation_date)?;

    let modification_date = match extract_field(header, &MODIFICATION_DATE_REGEX) {
        Some(date) => parse_date_field("Modification Date", date)?,
        None => creation_date,
    };

    let slug = extract_field(header, &SLUG_REGEX).map(|s| s.to_string());

    let status = match extract_field(header, &STATUS_REGEX) {
        Some(status) => status.parse::<Status>().unwrap_or_else(|unknown| {
            warn!("Unknown status '{}' in post '{}', using {}", unknown, title, Status::default());
            Status::default()
        }),
        None => Status::default(),
    };

    Ok(PostHeader {
        title,
        categories,
        tags,
        creation_date,
        modification_date,
        slug,
        status,
    })
}

/// First line matching the regex, trimmed. Empty values count as absent.
fn extract_field<'a>(header: &'a str, field_regex: &Regex) -> Option<&'a str> {
    field_regex.captures(header)
        .and_then(|cap| cap.name("value"))
        .map(|value| value.as_str().trim())
        .filter(|value| !value.is_empty())
}

fn extract_list(value: Option<&str>) -> Vec<String> {
    match value {
        None => vec![],
        Some(list) => list.split(',')
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(|item| item.to_string())
            .collect(),
    }
}

fn parse_date_field(field: &'static str, value: &str) -> Result<chrono::NaiveDateTime, ParseError> {
    parse_date_time(value).map_err(|reason| ParseError::InvalidDate {
        field,
        value: value.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::test_data::{POST_DATA, POST_DATA_REORDERED};

    use super::*;

    fn date_time(y: i32, m: u32, d: u32, h: u32, mn: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, mn, s).unwrap()
    }

    #[test]
    fn test_extract_field() {
        let header = "# Title\n* Tags: one, two\n* Slug:   \n";
        assert_eq!(extract_field(header, &TITLE_REGEX), Some("Title"));
        assert_eq!(extract_field(header, &TAGS_REGEX), Some("one, two"));
        assert_eq!(extract_field(header, &SLUG_REGEX), None);
        assert_eq!(extract_field(header, &STATUS_REGEX), None);

        // Prefix has to be at the beginning of the line
        let header = "# Title\n  * Tags: one\n";
        assert_eq!(extract_field(header, &TAGS_REGEX), None);
    }

    #[test]
    fn test_extract_list() {
        assert_eq!(extract_list(Some("one, two,three ,  four")), ["one", "two", "three", "four"]);
        assert!(extract_list(Some(", ,")).is_empty());
        assert!(extract_list(None).is_empty());
    }

    #[test]
    fn test_split_header() {
        let (header, content) = split_header(POST_DATA).unwrap();
        assert!(header.starts_with("# What I learned"));
        assert!(content.starts_with("How to be a great software engineer?"));

        assert_eq!(split_header("# Title\n* Tags: a\n\nbody"), Err(ParseError::MissingDelimiter));
    }

    #[test]
    fn test_parse_post_header() {
        let (header, _) = split_header(POST_DATA).unwrap();
        let header = parse_post_header(header).unwrap();

        let expected = PostHeader {
            title: "What I learned after 20+ years of software development".to_string(),
            categories: BTreeSet::from(["Career".to_string(), "Programming".to_string()]),
            tags: vec!["career".to_string(), "software".to_string()],
            creation_date: date_time(2022, 4, 2, 12, 5, 0),
            modification_date: date_time(2022, 4, 3, 9, 0, 0),
            slug: Some("what-i-learned".to_string()),
            status: Status::Publish,
        };
        assert_eq!(header, expected);
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let (header, _) = split_header(POST_DATA_REORDERED).unwrap();
        let header = parse_post_header(header).unwrap();
        assert_eq!(header.title, "Reordered header");
        assert_eq!(header.tags, ["b", "a"]);
        assert_eq!(header.status, Status::Private);
        assert_eq!(header.creation_date, date_time(2021, 3, 3, 10, 0, 0));
    }

    #[test]
    fn test_optional_fields_default() {
        let header = "# Minimal\n\n* Creation Date: 2020-01-01T00:00:00";
        let header = parse_post_header(header).unwrap();
        assert!(header.categories.is_empty());
        assert!(header.tags.is_empty());
        assert_eq!(header.modification_date, header.creation_date);
        assert_eq!(header.slug, None);
        assert_eq!(header.status, Status::Draft);
    }

    #[test]
    fn test_uncategorized_is_dropped() {
        let header = "# T\n* Categories: Uncategorized, Rust, Rust\n* Creation Date: 2020-01-01T00:00:00";
        let header = parse_post_header(header).unwrap();
        assert_eq!(header.categories, BTreeSet::from(["Rust".to_string()]));
    }

    #[test]
    fn test_missing_required_fields() {
        let header = "* Creation Date: 2020-01-01T00:00:00";
        assert_eq!(parse_post_header(header), Err(ParseError::MissingField("Title")));

        let header = "# Title\n* Tags: x";
        assert_eq!(parse_post_header(header), Err(ParseError::MissingField("Creation Date")));
    }

    #[test]
    fn test_invalid_values() {
        let header = "# Title\n* Creation Date: 02/04/2022";
        assert!(matches!(parse_post_header(header), Err(ParseError::InvalidDate { field: "Creation Date", .. })));

        let header = "# Title\n* Creation Date: 2020-01-01T00:00:00\n* Modification Date: soon";
        assert!(matches!(parse_post_header(header), Err(ParseError::InvalidDate { field: "Modification Date", .. })));
    }

    #[test]
    fn test_unknown_status_is_draft() {
        for status in ["pending", "future", "inherit"] {
            let header = format!("# Title\n* Creation Date: 2020-01-01T00:00:00\n* Status: {}", status);
            assert_eq!(parse_post_header(&header).map(|h| h.status), Ok(Status::Draft));
        }
    }
}
