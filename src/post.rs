use std::borrow::Cow;
use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::Datelike;
use once_cell::sync::OnceCell;

use crate::content::content_renderer::{MarkdownConverter, PostRenderer, Rendered};
use crate::content::parsing_utils::{parse_post_header, split_header};
use crate::content::{PostHeader, Status};
use crate::error::{ParseError, RenderError};

/// Whether the rendered html of a post was computed already.
#[derive(Debug, PartialEq)]
pub enum RenderState<'a> {
    Unrendered,
    Rendered(&'a Rendered),
}

/// One blog entry, built from one source file.
#[derive(Debug, Clone)]
pub struct Post {
    /// File name inside the repository folder. Unique per repository.
    pub file: String,
    pub header: PostHeader,
    /// Markdown body, everything after the content delimiter.
    pub content: String,
    /// The whole source text, used by search.
    pub filecontent: String,
    rendered: OnceCell<Rendered>,
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "file={}, date={}, status={}\ntitle={}\ncontent:\n{}",
               self.file,
               self.header.creation_date,
               self.header.status,
               self.header.title,
               self.content
        )
    }
}

impl Post {
    pub fn from_string(file: &str, filecontent: &str) -> Result<Post, ParseError> {
        let normalized: Cow<str> = if filecontent.contains('\r') {
            Cow::Owned(filecontent.replace("\r\n", "\n"))
        } else {
            Cow::Borrowed(filecontent)
        };

        let (header, content) = split_header(&normalized)?;
        let header = parse_post_header(header)?;

        Ok(Post {
            file: file.to_string(),
            header,
            content: content.to_string(),
            filecontent: filecontent.to_string(),
            rendered: OnceCell::new(),
        })
    }

    pub fn year(&self) -> i32 {
        self.header.creation_date.year()
    }

    pub fn month(&self) -> u32 {
        self.header.creation_date.month()
    }

    pub fn status(&self) -> Status {
        self.header.status
    }

    /// `/{year}/{month}/{slug}`, only for published posts with a slug.
    pub fn address(&self) -> Option<String> {
        if !self.header.status.is_published() {
            return None;
        }
        self.header.slug.as_ref()
            .map(|slug| format!("/{:04}/{:02}/{}", self.year(), self.month(), slug))
    }

    /// Where a link to this post should point: its address when it has one,
    /// otherwise the status/file based location.
    pub fn permalink(&self) -> String {
        self.address()
            .unwrap_or_else(|| format!("/post/{}/{}", self.header.status, self.file))
    }

    /// Renders the post the first time it is called; later calls return the
    /// cached result without touching the renderer.
    pub fn render<C: MarkdownConverter>(&self, renderer: &PostRenderer<C>) -> Result<&Rendered, RenderError> {
        self.rendered.get_or_try_init(|| renderer.render(&self.content))
    }

    pub fn render_state(&self) -> RenderState<'_> {
        match self.rendered.get() {
            None => RenderState::Unrendered,
            Some(rendered) => RenderState::Rendered(rendered),
        }
    }

    pub fn rendered_content(&self) -> Option<&str> {
        self.rendered.get().map(|r| r.content.as_str())
    }

    pub fn rendered_preview(&self) -> Option<&str> {
        self.rendered.get().map(|r| r.preview.as_str())
    }

    pub(crate) fn clear_rendered(&mut self) {
        self.rendered.take();
    }
}

#[cfg(test)]
mod tests {
    use crate::content::content_renderer::tests::CountingConverter;
    use crate::test_data::{post_text, POST_DATA};

    use super::*;

    #[test]
    fn test_from_string() {
        let post = Post::from_string("what_i_learned.mdtxt", POST_DATA).unwrap();
        println!("{}", post);
        assert_eq!(post.file, "what_i_learned.mdtxt");
        assert_eq!(post.year(), 2022);
        assert_eq!(post.month(), 4);
        assert_eq!(post.filecontent, POST_DATA);
        assert!(post.content.starts_with("How to be a great software engineer?\n\nSomeone asked me"));
        assert_eq!(post.render_state(), RenderState::Unrendered);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = POST_DATA.replace('\n', "\r\n");
        let post = Post::from_string("crlf.mdtxt", &text).unwrap();
        assert_eq!(post.header.title, "What I learned after 20+ years of software development");
        assert!(!post.content.contains('\r'));
        assert_eq!(post.filecontent, text);
    }

    #[test]
    fn test_address() {
        let post = Post::from_string("a.mdtxt", POST_DATA).unwrap();
        assert_eq!(post.address(), Some("/2022/04/what-i-learned".to_string()));
        assert_eq!(post.permalink(), "/2022/04/what-i-learned");

        let text = post_text("Private", "2020-01-05T00:00:00", "private", "* Slug: private-one\n", "body");
        let post = Post::from_string("b.mdtxt", &text).unwrap();
        assert_eq!(post.address(), None);
        assert_eq!(post.permalink(), "/post/private/b.mdtxt");

        let text = post_text("No slug", "2020-01-05T00:00:00", "publish", "", "body");
        let post = Post::from_string("c.mdtxt", &text).unwrap();
        assert_eq!(post.address(), None);
    }

    #[test]
    fn test_render_is_memoized() {
        let post = Post::from_string("a.mdtxt", POST_DATA).unwrap();
        let renderer = PostRenderer::with_converter(CountingConverter::default());

        let first = post.render(&renderer).unwrap().clone();
        let second = post.render(&renderer).unwrap().clone();

        assert_eq!(first.content, second.content);
        assert_eq!(renderer.converter().calls(), 1);
        assert_eq!(post.rendered_content(), Some(first.content.as_str()));
        assert_eq!(post.rendered_preview(), Some(first.preview.as_str()));
        assert!(matches!(post.render_state(), RenderState::Rendered(_)));
    }

    #[test]
    fn test_clear_rendered() {
        let mut post = Post::from_string("a.mdtxt", POST_DATA).unwrap();
        let renderer = PostRenderer::new();
        post.render(&renderer).unwrap();
        post.clear_rendered();
        assert_eq!(post.rendered_content(), None);
    }
}
