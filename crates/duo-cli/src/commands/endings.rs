use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use duo_story::{SaveBook, endings_gallery};

pub fn run(paths: &[PathBuf], saves: &Path) -> Result<(), String> {
    let story = super::load_story(paths)?;
    let book = SaveBook::load(saves).map_err(|e| e.to_string())?;
    let gallery = endings_gallery(story.graph(), &book);

    if gallery.is_empty() {
        println!("  This story has no endings.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Level", "Ending", "Status"]);

    for (i, entry) in gallery.iter().enumerate() {
        let status = if entry.unlocked { "unlocked" } else { "locked" };
        table.add_row(vec![
            (i + 1).to_string(),
            entry.level.to_string(),
            entry.display_title().to_string(),
            status.to_string(),
        ]);
    }

    let unlocked = gallery.iter().filter(|e| e.unlocked).count();
    println!("{table}");
    println!();
    let summary = format!("{unlocked}/{} endings unlocked", gallery.len());
    if unlocked == gallery.len() {
        println!("  {}", summary.green().bold());
    } else {
        println!("  {summary}");
    }

    Ok(())
}
