use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

use chrono::NaiveDateTime;

pub mod content_renderer;
pub mod highlight;
pub mod html_utils;
pub mod markdown_converter;
pub mod parsing_utils;

/// Lifecycle stage of a post. Only [`Status::Publish`] posts get an address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    #[default]
    Draft,
    Private,
    Publish,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Private => "private",
            Status::Publish => "publish",
        }
    }

    pub fn is_published(&self) -> bool {
        *self == Status::Publish
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Status::Draft),
            "private" => Ok(Status::Private),
            "publish" => Ok(Status::Publish),
            other => Err(other.to_string()),
        }
    }
}

/// Fields extracted from the header block of a post file.
#[derive(Debug, Clone, PartialEq)]
pub struct PostHeader {
    pub title: String,
    pub categories: BTreeSet<String>,
    pub tags: Vec<String>,
    pub creation_date: NaiveDateTime,
    pub modification_date: NaiveDateTime,
    pub slug: Option<String>,
    pub status: Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!("draft".parse::<Status>(), Ok(Status::Draft));
        assert_eq!(" Private ".parse::<Status>(), Ok(Status::Private));
        assert_eq!("PUBLISH".parse::<Status>(), Ok(Status::Publish));
        assert_eq!("trash".parse::<Status>(), Err("trash".to_string()));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Publish.to_string(), "publish");
        assert_eq!(Status::default(), Status::Draft);
        assert!(Status::Publish.is_published());
        assert!(!Status::Private.is_published());
    }
}
