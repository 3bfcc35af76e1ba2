use lazy_static::lazy_static;
use regex::Regex;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::content::html_utils::unescape_html;
use crate::error::RenderError;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref CODE_BLOCK_REGEX: Regex = Regex::new(
        r#"(?s)<pre><code(?: class="language-(?P<lang>[^"]*)")?>(?P<code>.*?)</code></pre>"#
    ).unwrap();
}

/// Highlights the code blocks of converted markdown. Token colors come from
/// css classes (no inline styles) and no line numbers are added.
/// Every block ends up wrapped by `<div class="codehilite">`.
pub fn highlight_code_blocks(html: &str) -> Result<String, RenderError> {
    let mut res = String::with_capacity(html.len());
    let mut last = 0;

    for caps in CODE_BLOCK_REGEX.captures_iter(html) {
        let Some(block) = caps.get(0) else { continue };
        let lang = caps.name("lang").map(|l| l.as_str());
        let code = caps.name("code").map(|c| unescape_html(c.as_str())).unwrap_or_default();

        res.push_str(&html[last..block.start()]);
        res.push_str(r#"<div class="codehilite"><pre>"#);
        match lang {
            Some(lang) => res.push_str(&format!(r#"<code class="language-{}">"#, lang)),
            None => res.push_str("<code>"),
        }
        res.push_str(&highlight_code(&code, lang)?);
        res.push_str("</code></pre></div>");
        last = block.end();
    }
    res.push_str(&html[last..]);

    Ok(res)
}

pub fn highlight_code(code: &str, lang: Option<&str>) -> Result<String, RenderError> {
    let syntax = lang
        .and_then(|lang| SYNTAX_SET.find_syntax_by_token(lang))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)
            .map_err(|e| RenderError::Highlight(e.to_string()))?;
    }
    Ok(generator.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_fenced_block() {
        let html = "<p>before</p>\n<pre><code class=\"language-rust\">fn main() {\n    println!(&quot;&lt;hello&gt;&quot;);\n}\n</code></pre>\n<p>after</p>";
        let res = highlight_code_blocks(html).unwrap();
        assert!(res.starts_with("<p>before</p>\n<div class=\"codehilite\"><pre><code class=\"language-rust\">"));
        assert!(res.ends_with("</code></pre></div>\n<p>after</p>"));
        assert!(res.contains("<span class=\""));
        assert!(res.contains("&lt;hello&gt;"));
        assert!(!res.contains("<hello>"));
    }

    #[test]
    fn test_highlight_indented_block() {
        let html = "<pre><code>plain &amp; simple\n</code></pre>";
        let res = highlight_code_blocks(html).unwrap();
        assert!(res.starts_with("<div class=\"codehilite\"><pre><code>"));
        assert!(res.contains("plain &amp; simple"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let res = highlight_code("some words\n", Some("no-such-language")).unwrap();
        assert!(res.contains("some words"));
    }

    #[test]
    fn test_no_code_blocks() {
        let html = "<p>nothing to see</p>";
        assert_eq!(highlight_code_blocks(html).unwrap(), html);
    }
}
