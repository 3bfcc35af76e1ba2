#[cfg(test)]
pub const POST_DATA: &str = "# What I learned after 20+ years of software development

* Categories: Programming, Career
* Tags: career, software
* Creation Date: 2022-04-02T12:05:00
* Modification Date: 2022-04-03T09:00:00
* Slug: what-i-learned
* Status: publish

### Content

How to be a great software engineer?

Someone asked me this question today and I didn’t have an answer. After thinking for a while, I came up with a list of what I try to do myself.

## Non technical

### Have a honest image of yourself

You finished university and learned a lot. You solved many hard problems.
__The earlier you find that, the better.__
";

#[cfg(test)]
pub const POST_DATA_REORDERED: &str = "* Status: private
* Creation Date: 2021-03-03T10:00:00
# Reordered header
* Tags: b, a

### Content

Some text
";

#[cfg(test)]
pub const POST_DATA_CODE: &str = "Some text with HTML inside.

```rust
fn main() {
    println!(\"<hello>\");
}
```

| Name | Value |
|------|-------|
| a    | 1     |

*[HTML]: Hyper Text Markup Language
";

/// Builds the text of a post file. Used by tests creating repositories on disk.
#[cfg(test)]
pub fn post_text(title: &str, creation_date: &str, status: &str, extra_header: &str, content: &str) -> String {
    format!("# {}\n\n* Creation Date: {}\n* Status: {}\n{}\n### Content\n\n{}",
            title, creation_date, status, extra_header, content)
}
