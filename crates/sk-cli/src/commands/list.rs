use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use sk_story::link::find_links;

pub fn run(path: &Path, tag: Option<&str>) -> Result<(), String> {
    let data = super::load_data(path)?;

    let mut passages: Vec<_> = data
        .passages
        .iter()
        .filter(|p| tag.is_none_or(|t| p.has_tag(t)))
        .collect();
    passages.sort_by_key(|p| p.pid);

    if passages.is_empty() {
        println!("  No passages found.");
        return Ok(());
    }

    let start = data.start_passage().map(|p| p.pid);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Pid", "Name", "Tags", "Links"]);

    for passage in &passages {
        let name = if Some(passage.pid) == start {
            format!("{} (start)", passage.name)
        } else {
            passage.name.clone()
        };
        let tags = if passage.tags.is_empty() {
            "-".to_string()
        } else {
            passage.tags.join(", ")
        };
        let links: Vec<String> = find_links(&passage.content)
            .into_iter()
            .map(|link| link.target)
            .collect();
        let links = if links.is_empty() {
            "-".to_string()
        } else {
            links.join(", ")
        };

        table.add_row(vec![passage.pid.0.to_string(), name, tags, links]);
    }

    println!("{table}");
    println!();
    println!("  {} passages", passages.len());

    Ok(())
}
