//! Discovery and removal of `[[...]]` link tokens.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

static LINK_REGEX: OnceLock<Regex> = OnceLock::new();

fn link_regex() -> &'static Regex {
    LINK_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\[\[(.+?)((->|\|)(.+?))?\]\]").expect("LINK_REGEX pattern is invalid")
    })
}

/// A link token found in processed passage text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Text shown to the player.
    pub label: String,
    /// Name of the passage the link leads to.
    pub target: String,
    /// Byte range of the whole token.
    pub span: Range<usize>,
}

/// Find every link token, in order of appearance.
///
/// `[[name]]` uses the name as both label and target. `[[label->name]]` and
/// `[[label|name]]` are equivalent.
pub fn find_links(text: &str) -> Vec<Link> {
    link_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps.get(1)?.as_str();
            let target = caps.get(4).map_or(label, |m| m.as_str());
            Some(Link {
                label: label.to_string(),
                target: target.to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Remove every link token from the text.
pub fn strip_links(text: &str) -> String {
    link_regex().replace_all(text, "").into_owned()
}
