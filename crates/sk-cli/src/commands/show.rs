use std::path::Path;

use colored::Colorize;

pub fn run(path: &Path, passage: Option<&str>) -> Result<(), String> {
    let data = super::load_data(path)?;
    let mut story = super::build_story(data)?;
    story.start();

    if let Some(name) = passage {
        if let Err(e) = story.show(name) {
            let names = story.passages().iter().map(|p| p.name.as_str());
            return Err(format!("{e}{}", super::did_you_mean(super::suggest(name, names))));
        }
    }

    if let Some(message) = story.fatal_error() {
        return Err(message.to_string());
    }

    super::print_state(&story);

    if let Some(error) = story.error() {
        println!();
        println!("  {} {error}", "warning:".yellow().bold());
    }

    Ok(())
}
