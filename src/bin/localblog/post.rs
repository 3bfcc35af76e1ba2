use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::{Local, NaiveDateTime};

use localblog::content::Status;
use localblog::post_list::POST_FILE_EXTENSION;
use localblog::text_utils::{slugify, DATE_TIME_FORMAT};

fn render_header(title: &str, slug: &str, date: &NaiveDateTime) -> String {
    let date = date.format(DATE_TIME_FORMAT);
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "# {}", title);
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "* Categories: ");
    let _ = writeln!(&mut buf, "* Tags: ");
    let _ = writeln!(&mut buf, "* Creation Date: {}", date);
    let _ = writeln!(&mut buf, "* Modification Date: {}", date);
    let _ = writeln!(&mut buf, "* Slug: {}", slug);
    let _ = writeln!(&mut buf, "* Status: {}", Status::Draft);
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "### Content");
    let _ = writeln!(&mut buf);
    buf
}

fn render_body() -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "This is a body example");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content");
    buf
}

fn post_file_name(slug: &str, date: &NaiveDateTime) -> String {
    format!("{}_{}.{}", date.format("%Y%m%d"), slug, POST_FILE_EXTENSION)
}

/// Creates a draft post skeleton and returns its path.
pub(crate) fn new_post(title: &str, output_dir: &Path) -> Result<PathBuf> {
    let slug = slugify(title);
    if slug.is_empty() {
        bail!("Title '{}' has no characters usable in an address", title);
    }

    let date = Local::now().naive_local();
    let full_path = output_dir.join(post_file_name(&slug, &date));
    if full_path.exists() {
        bail!("{} already exists", full_path.display());
    }

    fs::write(&full_path, render_header(title, &slug, &date) + &render_body())?;
    Ok(full_path)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use localblog::post::Post;

    use super::*;

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(6, 20, 53).unwrap();
        let slug = slugify("Post title of mine Ábaco - dir2");
        assert_eq!(post_file_name(&slug, &date), "20240229_post-title-of-mine-abaco-dir2.mdtxt");
    }

    #[test]
    fn test_skeleton_is_a_draft_post() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(6, 20, 53).unwrap();
        let text = render_header("A new post", "a-new-post", &date) + &render_body();

        let post = Post::from_string("20240229_a-new-post.mdtxt", &text).unwrap();
        assert_eq!(post.header.title, "A new post");
        assert_eq!(post.status(), Status::Draft);
        assert_eq!(post.header.creation_date, date);
        assert_eq!(post.header.slug.as_deref(), Some("a-new-post"));
        assert!(post.header.tags.is_empty());
        assert!(post.address().is_none());
    }

    #[test]
    fn test_new_post_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_post("Hello World", dir.path()).unwrap();
        assert!(path.to_string_lossy().ends_with("_hello-world.mdtxt"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Hello World\n"));

        assert!(new_post("???", dir.path()).is_err());
    }
}
