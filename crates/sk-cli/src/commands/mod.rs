pub mod check;
pub mod list;
pub mod play;
pub mod show;

use std::path::Path;
use std::sync::OnceLock;

use colored::Colorize;
use regex::Regex;
use sk_core::{Inventory, Shop, StoryData};
use sk_story::Story;
use strsim::jaro_winkler;

/// Minimum similarity score for "did you mean" suggestions (0.0-1.0).
const SUGGESTION_THRESHOLD: f64 = 0.8;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Read and decode a story file.
fn load_data(path: &Path) -> Result<StoryData, String> {
    tracing::debug!(path = %path.display(), "loading story");
    StoryData::from_path(path).map_err(|e| format!("{}: {e}", path.display()))
}

/// Build a ready-to-start story from decoded data.
fn build_story(data: StoryData) -> Result<Story, String> {
    Story::new(data).map_err(|e| format!("invalid story: {e}"))
}

/// The candidate closest to `name`, if any is close enough.
fn suggest<'a, I>(name: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let name_lower = name.to_lowercase();
    candidates
        .into_iter()
        .map(|candidate| (candidate, jaro_winkler(&name_lower, &candidate.to_lowercase())))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(candidate, _)| candidate)
}

/// Format a " (did you mean ...?)" hint.
fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion
        .map(|s| format!(" (did you mean \"{s}\"?)"))
        .unwrap_or_default()
}

/// Turn rendered passage HTML into plain terminal text.
fn html_to_text(html: &str) -> String {
    let tags = TAG_REGEX
        .get_or_init(|| Regex::new(r"<[^>]*>").expect("TAG_REGEX pattern is invalid"));
    let text = html.replace("<br />", "\n");
    tags.replace_all(&text, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim_end()
        .to_string()
}

/// Print the current passage, its panels, and its choices.
///
/// While a fatal error is active the published passage is stale, so only
/// the error is shown.
fn print_state(story: &Story) {
    if let Some(message) = story.fatal_error() {
        println!("  {} {message}", "error:".red().bold());
        println!("  The story cannot continue until this passage is fixed.");
        return;
    }

    let config = story.config();

    if let Some(passage) = story.current_passage() {
        println!(
            "  {} [{}]",
            passage.name.bold(),
            passage.theme(&config.passage_theme).dimmed()
        );
        println!();
    }

    let text = html_to_text(story.rendered_text());
    if !text.is_empty() {
        for line in text.lines() {
            println!("  {line}");
        }
        println!();
    }

    if let Some(loot) = story.lootable_inventory() {
        println!("  {}", "Loot".bold().underline());
        print_inventory(loot);
        println!();
    }

    if let Some(shop) = story.shop() {
        print_shop(story, shop);
        println!();
    }

    if config.display_character_panel {
        println!("  {}", "Character".bold().underline());
        print_stats(story);
        print_inventory(&story.character().inventory);
        println!();
    }

    for (index, choice) in story.choices().iter().enumerate() {
        let text = html_to_text(choice.text());
        if choice.is_death() {
            println!("  [{}] {}", index + 1, text.trim().red().bold());
        } else {
            println!("  [{}] {}", index + 1, text.trim());
        }
    }

    if story.finished() {
        println!("  {}", "The End".bold());
    }
}

/// Print the shop entries with their availability.
fn print_shop(story: &Story, shop: &Shop) {
    println!("  {}", "Shop".bold().underline());
    for (index, entry) in shop.entries().iter().enumerate() {
        let status = if entry.is_bought() {
            "sold".dimmed().to_string()
        } else if shop.can_buy(index, story.character()) {
            "available".green().to_string()
        } else {
            "too expensive".yellow().to_string()
        };
        println!(
            "  [{}] {} for {} {} ({status})",
            index + 1,
            entry.item().name,
            entry.price(),
            story.config().currency_stat
        );
    }
}

/// Print the occupied slots of an inventory.
fn print_inventory(inventory: &Inventory) {
    if inventory.is_empty() {
        println!("  (empty, {} slots)", inventory.capacity());
        return;
    }
    for (index, slot) in inventory.slots().iter().enumerate() {
        if let Some(item) = slot {
            println!("  [{}] {}", index + 1, item.name);
        }
    }
}

/// Print the character's stats.
fn print_stats(story: &Story) {
    let character = story.character();
    for (name, value) in character.stats() {
        println!("  {name:<12} {value}");
    }
    if character.is_dead() {
        println!("  {}", "dead".red());
    }
}
