//! Word counting over HTML markup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Any `<...>` tag, attributes and line breaks included.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Replace every tag with a single space.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, " ").into_owned()
}

/// Count the words in an HTML fragment.
///
/// Tags count as whitespace; entities such as `&amp;` stay part of the
/// word they sit in. Returns 0 for empty or markup-only input.
pub fn count_words(html: &str) -> usize {
    strip_tags(html).split_whitespace().count()
}
