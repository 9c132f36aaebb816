use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(paths: &[PathBuf], start: Option<&str>) -> Result<(), String> {
    let mut story = super::load_story(paths)?;
    if let Some(start) = start {
        let config = story.config().clone().with_start(start);
        story = story.with_config(config);
    }

    let graph = story.graph();
    let levels = graph.levels();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Level", "Nodes", "Endings", "Intro"]);
    for level in &levels {
        let nodes = graph.nodes().filter(|n| n.level == *level).count();
        let endings = graph
            .nodes()
            .filter(|n| n.level == *level && n.is_ending)
            .count();
        let intro = match graph.level_intro(*level) {
            Some(text) if text.chars().count() > 40 => {
                format!("{}...", text.chars().take(37).collect::<String>())
            }
            Some(text) => text.to_string(),
            None => "-".to_string(),
        };
        table.add_row(vec![
            level.to_string(),
            nodes.to_string(),
            endings.to_string(),
            intro,
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} nodes, {} levels, {} endings, {} characters",
        graph.len(),
        levels.len(),
        graph.endings().len(),
        story.characters().len()
    );

    let issues = story.validate();
    if issues.is_empty() {
        println!("  {}", "All checks passed.".green());
        return Ok(());
    }

    for issue in &issues {
        eprintln!("  {} {issue}", "issue:".red().bold());
    }
    Err(format!("{} issue(s) found", issues.len()))
}
