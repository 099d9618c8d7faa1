//! The fixed set of panel and button themes.
//!
//! Passages pick their panel theme with a `theme-<name>` tag and the buttons
//! leading to them with a `button-<name>` tag. Unknown names fall back to the
//! configured default.

/// Every theme name the presentation layer knows how to draw.
pub const THEMES: &[&str] = &[
    "rock",
    "rock-beige",
    "rock-light",
    "rock-dark",
    "frame-bronze",
    "frame-light",
    "frame-gold",
    "frame-dark",
    "parchment",
    "metal-blue",
    "metal-red",
    "metal-green",
    "metal-yellow",
    "blue",
    "red",
    "green",
    "yellow",
    "black",
    "chest",
];

/// Tag prefix selecting a passage's panel theme.
pub const PANEL_PREFIX: &str = "theme-";

/// Tag prefix selecting the theme of buttons leading to a passage.
pub const BUTTON_PREFIX: &str = "button-";

/// Returns true if `name` belongs to the theme set.
pub fn is_theme(name: &str) -> bool {
    THEMES.contains(&name)
}

/// Find the first tag of the form `<prefix><theme>` naming a known theme.
pub fn from_tags<'a, I>(tags: I, prefix: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    tags.into_iter()
        .filter_map(|tag| tag.strip_prefix(prefix))
        .find(|name| is_theme(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_themes() {
        assert!(is_theme("parchment"));
        assert!(is_theme("metal-red"));
        assert!(!is_theme("purple"));
    }

    #[test]
    fn first_valid_tag_wins() {
        let tags = vec![
            "theme-purple".to_string(),
            "button-red".to_string(),
            "theme-rock-dark".to_string(),
            "theme-blue".to_string(),
        ];
        assert_eq!(from_tags(&tags, PANEL_PREFIX), Some("rock-dark"));
        assert_eq!(from_tags(&tags, BUTTON_PREFIX), Some("red"));
    }

    #[test]
    fn no_matching_tag() {
        let tags = vec!["intro".to_string()];
        assert_eq!(from_tags(&tags, PANEL_PREFIX), None);
    }
}
