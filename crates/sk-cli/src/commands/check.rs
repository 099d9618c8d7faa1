use std::collections::HashSet;
use std::path::Path;

use colored::Colorize;
use sk_script::ScriptError;
use sk_script::diagnostics::render_syntax_errors;
use sk_story::link::find_links;

pub fn run(path: &Path) -> Result<(), String> {
    let data = super::load_data(path)?;
    let mut errors = 0;
    let mut warnings = 0;

    if let Err(e) = data.validate() {
        println!("  {} {e}", "error:".red().bold());
        errors += 1;
    }

    let names: HashSet<&str> = data.passages.iter().map(|p| p.name.as_str()).collect();

    if let Some(death) = &data.config.death_passage {
        if !names.contains(death.as_str()) {
            println!(
                "  {} death passage \"{death}\" does not exist{}",
                "error:".red().bold(),
                super::did_you_mean(super::suggest(death, names.iter().copied()))
            );
            errors += 1;
        }
    }

    for passage in &data.passages {
        match sk_script::compile(&passage.content) {
            Ok(_) => {}
            Err(ScriptError::Syntax(syntax)) => {
                eprint!("{}", render_syntax_errors(&passage.content, &passage.name, &syntax));
                errors += syntax.len();
            }
            Err(other) => {
                println!("  {} {}: {other}", "error:".red().bold(), passage.name);
                errors += 1;
            }
        }

        for link in find_links(&passage.content) {
            // Targets computed by a template can only be checked at runtime.
            if names.contains(link.target.as_str()) || link.target.contains("<%") {
                continue;
            }
            println!(
                "  {} {}: link to missing passage \"{}\"{}",
                "warning:".yellow().bold(),
                passage.name,
                link.target,
                super::did_you_mean(super::suggest(&link.target, names.iter().copied()))
            );
            warnings += 1;
        }
    }

    if errors > 0 {
        return Err(format!(
            "{errors} error{}, {warnings} warning{}",
            if errors == 1 { "" } else { "s" },
            if warnings == 1 { "" } else { "s" },
        ));
    }

    println!("  All checks passed for '{}'.", data.name);
    println!(
        "  {} passages, {} items, {} stats",
        data.passages.len(),
        data.config.items.len(),
        data.config.stats.len()
    );
    if warnings > 0 {
        println!(
            "  {warnings} warning{}",
            if warnings == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
