//! `@[display](id)` mention markup inside notes.
//!
//! The id is the article title. One level of balanced parentheses is allowed
//! inside it so titles like `Mercury (planet)` survive.

use std::sync::LazyLock;

use regex::Regex;

static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\[([^\]]+)\]\(((?:[^()]|\([^()]*\))+)\)").expect("mention pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub display: String,
    pub id: String,
}

/// All mentions in `text`, in order of appearance.
pub fn parse_mentions(text: &str) -> Vec<Mention> {
    MENTION
        .captures_iter(text)
        .map(|caps| Mention {
            display: caps[1].to_string(),
            id: caps[2].to_string(),
        })
        .collect()
}

/// Mentions present in `new` that were not in `old`, counting duplicates.
pub fn added_mentions(old: &str, new: &str) -> Vec<Mention> {
    let mut previous = parse_mentions(old);
    parse_mentions(new)
        .into_iter()
        .filter(|m| match previous.iter().position(|p| p == m) {
            Some(i) => {
                previous.remove(i);
                false
            }
            None => true,
        })
        .collect()
}

/// Replace mention markup with its display text.
pub fn display_text(text: &str) -> String {
    MENTION.replace_all(text, "$1").into_owned()
}
