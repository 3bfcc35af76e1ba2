//! One-time import of posts written by the old export tool.
//!
//! Old files carry their status in the file name prefix (`p_`, `pr_`, `d_`,
//! `publish_`, `private_`, `draft_`) and their address in a `* Link: <url>`
//! header. The repository only understands the `* Status:` and `* Slug:`
//! headers, so old files are rewritten once instead of being read both ways.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

use crate::content::parsing_utils::CONTENT_DELIMITER;
use crate::content::Status;
use crate::error::ParseError;

lazy_static! {
    static ref LINK_REGEX: Regex = Regex::new(r"^\* Link: <(?P<link>.*)>\s*$").unwrap();
    static ref STATUS_LINE_REGEX: Regex = Regex::new(r"(?m)^\* Status:").unwrap();
    static ref SLUG_LINE_REGEX: Regex = Regex::new(r"(?m)^\* Slug:").unwrap();
}

const STATUS_PREFIXES: [(&str, Status); 6] = [
    ("publish_", Status::Publish),
    ("private_", Status::Private),
    ("draft_", Status::Draft),
    ("pr_", Status::Private),
    ("p_", Status::Publish),
    ("d_", Status::Draft),
];

/// Status encoded in an old file name. Draft when there is no known prefix.
pub fn status_from_file_name(file_name: &str) -> Status {
    STATUS_PREFIXES.iter()
        .find(|(prefix, _)| file_name.starts_with(prefix))
        .map(|(_, status)| *status)
        .unwrap_or_default()
}

/// Slug from an upstream link like `http://yourblog.com/2014/01/the-slug/`.
/// Links to query style addresses (`/?p=12`) have no slug.
pub fn slug_from_link(link: &str, baselink: &str) -> Option<String> {
    let address = link.replace(baselink.trim_end_matches('/'), "");
    if address.is_empty() || address.starts_with("/?") {
        return None;
    }
    address.split('/')
        .nth(3)
        .filter(|slug| !slug.is_empty())
        .map(|slug| slug.to_string())
}

/// Rewrites an old post file into the current header format. Returns `None`
/// when the file needs no change. Rewritten files use `\n` line endings.
pub fn migrate_legacy(file_name: &str, text: &str, baselink: &str) -> Result<Option<String>, ParseError> {
    let normalized: Cow<str> = if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    };

    let (header, content) = normalized.split_once(CONTENT_DELIMITER)
        .ok_or(ParseError::MissingDelimiter)?;

    let has_status = STATUS_LINE_REGEX.is_match(header);
    let has_slug = SLUG_LINE_REGEX.is_match(header);
    let has_link = header.lines().any(|line| LINK_REGEX.is_match(line));
    let replace_link = has_link && !has_slug;
    if has_status && !replace_link {
        return Ok(None);
    }

    let mut lines: Vec<String> = vec![];
    for line in header.lines() {
        match LINK_REGEX.captures(line) {
            Some(caps) if replace_link => {
                if let Some(slug) = slug_from_link(&caps["link"], baselink) {
                    lines.push(format!("* Slug: {}", slug));
                }
            }
            _ => lines.push(line.to_string()),
        }
    }

    if !has_status {
        lines.push(format!("* Status: {}", status_from_file_name(file_name)));
    }

    Ok(Some(format!("{}{}{}", lines.join("\n"), CONTENT_DELIMITER, content)))
}

#[cfg(test)]
mod tests {
    use crate::post::Post;

    use super::*;

    const LEGACY_POST: &str = "# Old post

* Categories: Uncategorized
* Tags: linux, python
* Creation Date: 2014-01-12T10:00:00
* Modification Date: 2014-01-13T10:00:00
* Link: <http://philipp.wordpress.com/2014/01/12/old-post/>

### Content

Body
";

    #[test]
    fn test_status_from_file_name() {
        assert_eq!(status_from_file_name("p_old.mdtxt"), Status::Publish);
        assert_eq!(status_from_file_name("publish_old.mdtxt"), Status::Publish);
        assert_eq!(status_from_file_name("pr_old.mdtxt"), Status::Private);
        assert_eq!(status_from_file_name("private_old.mdtxt"), Status::Private);
        assert_eq!(status_from_file_name("d_old.mdtxt"), Status::Draft);
        assert_eq!(status_from_file_name("draft_old.mdtxt"), Status::Draft);
        assert_eq!(status_from_file_name("old.mdtxt"), Status::Draft);
    }

    #[test]
    fn test_slug_from_link() {
        let baselink = "http://philipp.wordpress.com";
        assert_eq!(slug_from_link("http://philipp.wordpress.com/2014/01/old-post/", baselink), Some("old-post".to_string()));
        // Only year/month/slug addresses are understood
        assert_eq!(slug_from_link("http://philipp.wordpress.com/2014/01/12/old-post/", baselink), Some("12".to_string()));
        assert_eq!(slug_from_link("http://philipp.wordpress.com/?p=123", baselink), None);
        assert_eq!(slug_from_link("http://philipp.wordpress.com", baselink), None);
    }

    #[test]
    fn test_migrate_legacy() {
        let text = LEGACY_POST.replace("/2014/01/12/old-post/", "/2014/01/old-post/");
        let migrated = migrate_legacy("p_old.mdtxt", &text, "http://philipp.wordpress.com/").unwrap().unwrap();
        assert_eq!(migrated, "# Old post

* Categories: Uncategorized
* Tags: linux, python
* Creation Date: 2014-01-12T10:00:00
* Modification Date: 2014-01-13T10:00:00
* Slug: old-post
* Status: publish

### Content

Body
");

        let post = Post::from_string("p_old.mdtxt", &migrated).unwrap();
        assert_eq!(post.address(), Some("/2014/01/old-post".to_string()));

        // Running it again changes nothing
        assert_eq!(migrate_legacy("p_old.mdtxt", &migrated, "http://philipp.wordpress.com/").unwrap(), None);
    }

    #[test]
    fn test_migrate_query_link() {
        let text = LEGACY_POST.replace("/2014/01/12/old-post/", "/?p=12");
        let migrated = migrate_legacy("d_old.mdtxt", &text, "http://philipp.wordpress.com").unwrap().unwrap();
        assert!(!migrated.contains("* Link:"));
        assert!(!migrated.contains("* Slug:"));
        assert!(migrated.contains("* Status: draft\n\n### Content"));
    }

    #[test]
    fn test_link_kept_when_slug_exists() {
        let text = LEGACY_POST.replace("* Link:", "* Slug: kept\n* Link:");
        let migrated = migrate_legacy("pr_old.mdtxt", &text, "http://philipp.wordpress.com").unwrap().unwrap();
        assert!(migrated.contains("* Slug: kept\n* Link: <http://philipp.wordpress.com/2014/01/12/old-post/>\n* Status: private\n"));

        assert_eq!(migrate_legacy("pr_old.mdtxt", &migrated, "http://philipp.wordpress.com").unwrap(), None);
    }

    #[test]
    fn test_migrate_crlf() {
        let text = LEGACY_POST.replace("/2014/01/12/old-post/", "/2014/01/old-post/").replace('\n', "\r\n");
        assert!(Post::from_string("p_old.mdtxt", &text).is_ok());

        let migrated = migrate_legacy("p_old.mdtxt", &text, "http://philipp.wordpress.com").unwrap().unwrap();
        assert!(!migrated.contains('\r'));
        assert!(migrated.contains("* Slug: old-post\n* Status: publish\n\n### Content\n\nBody\n"));

        let post = Post::from_string("p_old.mdtxt", &migrated).unwrap();
        assert_eq!(post.address(), Some("/2014/01/old-post".to_string()));
    }

    #[test]
    fn test_migrate_without_delimiter() {
        assert_eq!(migrate_legacy("p_x.mdtxt", "# Title", ""), Err(ParseError::MissingDelimiter));
    }
}
