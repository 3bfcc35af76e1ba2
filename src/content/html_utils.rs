use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::content::markdown_converter::split_code_blocks;

pub const SCROLLABLE_PRE_CLASS: &str = "pre-x-scrollable";
pub const STRIPED_TABLE_CLASS: &str = "table table-striped";
pub const ELLIPSIS: &str = " ...";

lazy_static! {
    static ref CODEHILITE_PRE_REGEX: Regex = Regex::new(
        r#"(?P<div><div class="codehilite">\s*)<pre(?: class="(?P<class>[^"]*)")?>"#
    ).unwrap();
    static ref TABLE_REGEX: Regex = Regex::new(r#"<table(?: class="(?P<class>[^"]*)")?>"#).unwrap();
    static ref ABBR_DEFINITION_REGEX: Regex = Regex::new(
        r"(?m)^\*\[(?P<abbr>[^\]]+)\]:[ \t]*(?P<title>.*)$\n?"
    ).unwrap();
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

fn add_class(existing: Option<&str>, class: &str) -> String {
    match existing {
        Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
        _ => class.to_string(),
    }
}

/// Every `<pre>` of a highlighted code block becomes horizontally scrollable.
pub fn mark_scrollable_pre(html: &str) -> String {
    CODEHILITE_PRE_REGEX.replace_all(html, |caps: &Captures| {
        let class = add_class(caps.name("class").map(|c| c.as_str()), SCROLLABLE_PRE_CLASS);
        format!(r#"{}<pre class="{}">"#, &caps["div"], class)
    }).to_string()
}

pub fn mark_striped_tables(html: &str) -> String {
    TABLE_REGEX.replace_all(html, |caps: &Captures| {
        let class = add_class(caps.name("class").map(|c| c.as_str()), STRIPED_TABLE_CLASS);
        format!(r#"<table class="{}">"#, class)
    }).to_string()
}

/// First `max_words` whitespace separated tokens of the rendered html.
/// It knows nothing about tags, so the preview can end in the middle of one.
pub fn truncate_preview(html: &str, max_words: usize) -> String {
    let mut words = html.split_whitespace();
    let preview: Vec<&str> = words.by_ref().take(max_words).collect();
    let mut preview = preview.join(" ");
    if words.next().is_some() {
        preview.push_str(ELLIPSIS);
    }
    preview
}

/// Removes `*[ABBR]: Expansion` definition lines from the markdown text,
/// returning the remaining text and the definitions found. Lines inside code
/// blocks are not definitions.
pub fn extract_abbreviations(md_text: &str) -> (String, Vec<(String, String)>) {
    let mut abbreviations: Vec<(String, String)> = vec![];
    let mut remaining = String::with_capacity(md_text.len());

    for (is_code, block) in split_code_blocks(md_text) {
        if is_code {
            remaining.push_str(block);
            continue;
        }
        abbreviations.extend(ABBR_DEFINITION_REGEX.captures_iter(block)
            .map(|caps| (caps["abbr"].trim().to_string(), caps["title"].trim().to_string()))
            .filter(|(abbr, _)| !abbr.is_empty()));
        remaining.push_str(&ABBR_DEFINITION_REGEX.replace_all(block, ""));
    }

    (remaining, abbreviations)
}

/// Wraps every whole-word occurrence of an abbreviation found in text nodes with
/// an `<abbr>` element. Text inside `<pre>` and `<code>` is left alone.
pub fn apply_abbreviations(html: &str, abbreviations: &[(String, String)]) -> String {
    if abbreviations.is_empty() {
        return html.to_string();
    }

    // Longest first, so "HTML5" wins over "HTML"
    let mut keys: Vec<(String, String)> = abbreviations.iter()
        .map(|(abbr, title)| (escape_html(abbr), escape_html(title)))
        .collect();
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let alternatives: Vec<String> = keys.iter().map(|(abbr, _)| regex::escape(abbr)).collect();
    let Ok(abbr_regex) = Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|"))) else {
        return html.to_string();
    };

    let mut res = String::with_capacity(html.len());
    let mut code_depth: usize = 0;
    let mut remaining = html;

    while !remaining.is_empty() {
        let text_end = remaining.find('<').unwrap_or(remaining.len());
        let text = &remaining[..text_end];
        if code_depth == 0 {
            let replaced = abbr_regex.replace_all(text, |caps: &Captures| {
                let abbr = &caps[0];
                let title = keys.iter()
                    .find(|(key, _)| key == abbr)
                    .map(|(_, title)| title.as_str())
                    .unwrap_or_default();
                format!(r#"<abbr title="{}">{}</abbr>"#, title, abbr)
            });
            res.push_str(&replaced);
        } else {
            res.push_str(text);
        }
        remaining = &remaining[text_end..];

        if remaining.is_empty() {
            break;
        }

        let tag_end = remaining.find('>').map(|i| i + 1).unwrap_or(remaining.len());
        let tag = &remaining[..tag_end];
        let lower = tag.to_ascii_lowercase();
        if is_tag(&lower, "<pre") || is_tag(&lower, "<code") {
            code_depth += 1;
        } else if is_tag(&lower, "</pre") || is_tag(&lower, "</code") {
            code_depth = code_depth.saturating_sub(1);
        }
        res.push_str(tag);
        remaining = &remaining[tag_end..];
    }

    res
}

fn is_tag(tag: &str, name: &str) -> bool {
    tag.strip_prefix(name)
        .and_then(|rest| rest.chars().next())
        .map(|c| c == '>' || c.is_whitespace())
        .unwrap_or(false)
}
