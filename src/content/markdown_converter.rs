use markdown::Options;

use crate::content::content_renderer::MarkdownConverter;
use crate::content::highlight::highlight_code_blocks;
use crate::content::html_utils::{apply_abbreviations, extract_abbreviations};
use crate::error::RenderError;

/// GFM markdown (tables, fenced and indented code) plus `*[ABBR]: Expansion`
/// abbreviations and highlighted code blocks. Raw html in the post is escaped.
#[derive(Debug, Default, Clone)]
pub struct MarkdownRs {}

impl MarkdownConverter for MarkdownRs {
    fn to_html(&self, md_text: &str) -> Result<String, RenderError> {
        let buf = remove_comments(md_text);
        let (buf, abbreviations) = extract_abbreviations(&buf);

        let html = match markdown::to_html_with_options(buf.as_str(), &Options::gfm()) {
            Ok(x) => x,
            Err(e) => return Err(RenderError::Markdown(e.reason)),
        };

        let html = highlight_code_blocks(&html)?;
        Ok(apply_abbreviations(&html, &abbreviations))
    }
}

/// Strips html comments (`<!-- more -->` and friends) before rendering.
/// Code blocks and code spans are kept verbatim. An unterminated comment hides
/// the rest of the text, as a browser would.
pub fn remove_comments(md_post: &str) -> String {
    let mut res = String::with_capacity(md_post.len());
    let mut in_comment = false;

    for (is_code, block) in split_code_blocks(md_post) {
        if is_code && !in_comment {
            res.push_str(block);
        } else {
            strip_comments(block, &mut in_comment, &mut res);
        }
    }

    res
}

const START_COMMENT: &str = "<!--";
const END_COMMENT: &str = "-->";

fn strip_comments(text: &str, in_comment: &mut bool, res: &mut String) {
    let mut rest = text;

    while !rest.is_empty() {
        if *in_comment {
            let Some(end) = rest.find(END_COMMENT) else { return };
            rest = &rest[(end + END_COMMENT.len())..];
            *in_comment = false;
            continue;
        }

        let next_tick = rest.find('`');
        let next_comment = rest.find(START_COMMENT);
        match (next_tick, next_comment) {
            (Some(tick), comment) if comment.map_or(true, |c| tick < c) => {
                let run = rest[tick..].bytes().take_while(|b| *b == b'`').count();
                let after = &rest[(tick + run)..];
                // Code spans do not cross paragraphs
                let limit = after.find("\n\n").unwrap_or(after.len());
                let span_end = match find_backtick_run(&after[..limit], run) {
                    Some(close) => tick + run + close + run,
                    None => tick + run,
                };
                res.push_str(&rest[..span_end]);
                rest = &rest[span_end..];
            }
            (_, Some(comment)) => {
                res.push_str(&rest[..comment]);
                rest = &rest[(comment + START_COMMENT.len())..];
                *in_comment = true;
            }
            _ => {
                res.push_str(rest);
                return;
            }
        }
    }
}

/// Start of the first run of exactly `len` backticks.
fn find_backtick_run(text: &str, len: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i] == b'`' {
            i += 1;
        }
        if i - start == len {
            return Some(start);
        }
    }
    None
}

/// Splits markdown in runs of whole lines, `(true, text)` for code. Fenced
/// blocks and indented blocks not continuing a paragraph are code.
pub(crate) fn split_code_blocks(md_text: &str) -> Vec<(bool, &str)> {
    let mut blocks: Vec<(bool, &str)> = vec![];
    let mut fence: Option<(char, usize)> = None;
    let mut prev_blank = true;
    let mut prev_indented_code = false;
    let mut current_is_code = false;
    let mut start = 0;
    let mut offset = 0;

    for line in md_text.split_inclusive('\n') {
        let content = line.trim_end_matches(|c| c == '\n' || c == '\r');
        let in_fence_before = fence.is_some();

        let is_code = match fence {
            Some((fence_char, fence_len)) => {
                if is_fence_close(content, fence_char, fence_len) {
                    fence = None;
                }
                true
            }
            None => match fence_open(content) {
                Some(open) => {
                    fence = Some(open);
                    true
                }
                None => is_indented(content) && (prev_blank || prev_indented_code),
            },
        };

        prev_indented_code = is_code && !in_fence_before && fence.is_none();
        prev_blank = content.trim().is_empty();

        if is_code != current_is_code && offset > start {
            blocks.push((current_is_code, &md_text[start..offset]));
            start = offset;
        }
        current_is_code = is_code;
        offset += line.len();
    }

    if offset > start {
        blocks.push((current_is_code, &md_text[start..offset]));
    }
    blocks
}

fn fence_open(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let fence_char = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == fence_char).count();
    if len < 3 {
        return None;
    }
    // The info string of a backtick fence cannot hold backticks
    if fence_char == '`' && trimmed[len..].contains('`') {
        return None;
    }
    Some((fence_char, len))
}

fn is_fence_close(line: &str, fence_char: char, fence_len: usize) -> bool {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return false;
    }
    let len = trimmed.chars().take_while(|c| *c == fence_char).count();
    len >= fence_len && trimmed[len..].trim().is_empty()
}

fn is_indented(line: &str) -> bool {
    (line.starts_with("    ") || line.starts_with('\t')) && !line.trim().is_empty()
}
