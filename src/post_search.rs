//! Full text search over the raw source of posts.
//!
//! Ranking has two tiers: posts containing the phrase literally come first,
//! followed by posts containing every word of the phrase in any order. Both
//! checks ignore case and each tier keeps the order of the given posts.

use crate::post::Post;

/// Posts whose source contains `phrase` literally, ignoring case.
pub fn search_literally<'a>(posts: &'a [Post], phrase: &str) -> Vec<&'a Post> {
    if phrase.trim().is_empty() {
        return vec![];
    }
    let phrase = phrase.to_lowercase();

    posts.iter()
        .filter(|post| post.filecontent.to_lowercase().contains(&phrase))
        .collect()
}

/// Literal matches first, then the posts containing all the words of the phrase.
pub fn search<'a>(posts: &'a [Post], phrase: &str) -> Vec<&'a Post> {
    if phrase.trim().is_empty() {
        return vec![];
    }
    let phrase = phrase.to_lowercase();
    let words: Vec<&str> = phrase.split_whitespace().collect();

    let mut literal = vec![];
    let mut all_words = vec![];
    for post in posts {
        let text = post.filecontent.to_lowercase();
        if text.contains(&phrase) {
            literal.push(post);
        } else if words.iter().all(|word| text.contains(word)) {
            all_words.push(post);
        }
    }

    literal.extend(all_words);
    literal
}
