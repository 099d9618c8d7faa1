use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use sk_story::Story;

/// A line of player input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    /// Follow a choice (1-based).
    Choose(usize),
    Inventory,
    Stats,
    Loot,
    /// Take a loot item (1-based).
    Take(usize),
    Shop,
    /// Buy a shop entry (1-based).
    Buy(usize),
    Look,
    Restart,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(input: &str) -> Input {
    let mut words = input.split_whitespace();
    let verb = words.next().unwrap_or_default().to_lowercase();
    if let Ok(n) = verb.parse::<usize>() {
        return Input::Choose(n);
    }
    let number = words.next().and_then(|w| w.parse::<usize>().ok());

    match (verb.as_str(), number) {
        ("inv" | "inventory" | "i", _) => Input::Inventory,
        ("stats", _) => Input::Stats,
        ("loot", _) => Input::Loot,
        ("take", Some(n)) => Input::Take(n),
        ("shop", _) => Input::Shop,
        ("buy", Some(n)) => Input::Buy(n),
        ("look" | "l", _) => Input::Look,
        ("restart", _) => Input::Restart,
        ("help" | "h" | "?", _) => Input::Help,
        ("quit" | "q" | "exit", _) => Input::Quit,
        _ => Input::Unknown(input.to_string()),
    }
}

const HELP: &str = "  <number>   follow a choice
  inv        show your inventory
  stats      show your stats
  loot       show the loot here
  take <n>   take a loot item
  shop       show the shop here
  buy <n>    buy a shop item
  look       show the passage again
  restart    start over
  quit       leave the story";

pub fn run(path: &Path, seed: Option<u64>) -> Result<(), String> {
    let mut data = super::load_data(path)?;
    if let Some(seed) = seed {
        data.config.seed = seed;
    }
    let mut story = super::build_story(data)?;
    story.start();

    println!("  {} {}", "Playing".bold(), story.name());
    println!("  Type a choice number, 'help' for commands, 'quit' to exit.\n");
    super::print_state(&story);
    if story.fatal_error().is_some() {
        return Ok(());
    }
    let mut last_error = report_error(&story, None);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        println!();

        match parse_input(input) {
            Input::Choose(n) => {
                let id = n
                    .checked_sub(1)
                    .and_then(|index| story.choices().get(index))
                    .map(|c| c.id());
                match id {
                    Some(id) => {
                        story.choose(id);
                        super::print_state(&story);
                    }
                    None => println!("{}", "  There is no such choice.".yellow()),
                }
            }
            Input::Inventory => super::print_inventory(&story.character().inventory),
            Input::Stats => super::print_stats(&story),
            Input::Loot => match story.lootable_inventory() {
                Some(loot) => super::print_inventory(loot),
                None => println!("  There is nothing to loot here."),
            },
            Input::Take(n) => {
                let taken = n.checked_sub(1).is_some_and(|index| story.take_loot(index));
                if taken {
                    println!("  Taken.");
                } else {
                    println!("{}", "  You can't take that.".yellow());
                }
            }
            Input::Shop => match story.shop() {
                Some(shop) => super::print_shop(&story, shop),
                None => println!("  There is no shop here."),
            },
            Input::Buy(n) => {
                let bought = n.checked_sub(1).is_some_and(|index| story.buy(index));
                if bought {
                    println!("  Bought.");
                } else {
                    println!("{}", "  You can't buy that.".yellow());
                }
            }
            Input::Look => super::print_state(&story),
            Input::Restart => {
                story.start();
                last_error = None;
                super::print_state(&story);
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
            Input::Unknown(text) => {
                println!("{}", format!("  Unknown command: {text}. Type 'help'.").yellow());
            }
        }

        last_error = report_error(&story, last_error);
        println!();

        if story.finished() || story.fatal_error().is_some() {
            break;
        }
    }

    Ok(())
}

/// Print a link warning if it changed since the last report. Fatal errors
/// are shown by the state printer instead.
fn report_error(story: &Story, last: Option<String>) -> Option<String> {
    let current = story.error().map(str::to_string);
    match &current {
        Some(message) if current != last && story.fatal_error().is_none() => {
            println!("  {} {message}", "warning:".yellow().bold());
        }
        _ => {}
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_choose() {
        assert_eq!(parse_input("2"), Input::Choose(2));
        assert_eq!(parse_input(" 10 "), Input::Choose(10));
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(parse_input("take 1"), Input::Take(1));
        assert_eq!(parse_input("BUY 3"), Input::Buy(3));
        assert_eq!(parse_input("take"), Input::Unknown("take".into()));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_input("inv"), Input::Inventory);
        assert_eq!(parse_input("stats"), Input::Stats);
        assert_eq!(parse_input("loot"), Input::Loot);
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("help"), Input::Help);
        assert_eq!(parse_input("dance"), Input::Unknown("dance".into()));
    }
}
