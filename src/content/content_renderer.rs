use crate::content::html_utils::{mark_scrollable_pre, mark_striped_tables, truncate_preview};
use crate::content::markdown_converter::MarkdownRs;
use crate::error::RenderError;

/// Number of whitespace separated tokens of rendered html kept in a preview.
pub const PREVIEW_WORD_COUNT: usize = 50;

/// Output of rendering the markdown body of a post.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub content: String,
    pub preview: String,
}

/// Converts the markdown dialect used by posts into html.
pub trait MarkdownConverter {
    fn to_html(&self, md_text: &str) -> Result<String, RenderError>;
}

/// Renders post bodies into display-ready html. Rendering is pure, the caching
/// of the result is done by the post holding it.
pub struct PostRenderer<C: MarkdownConverter = MarkdownRs> {
    converter: C,
}

impl PostRenderer<MarkdownRs> {
    pub fn new() -> Self {
        PostRenderer { converter: MarkdownRs {} }
    }
}

impl Default for PostRenderer<MarkdownRs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: MarkdownConverter> PostRenderer<C> {
    pub fn with_converter(converter: C) -> Self {
        PostRenderer { converter }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn render(&self, md_text: &str) -> Result<Rendered, RenderError> {
        let html = self.converter.to_html(md_text)?;
        let html = mark_scrollable_pre(&html);
        let content = mark_striped_tables(&html);
        let preview = truncate_preview(&content, PREVIEW_WORD_COUNT);

        Ok(Rendered {
            content,
            preview,
        })
    }
}
