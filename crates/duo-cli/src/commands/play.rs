//! Line-driven game loop.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use log::debug;

use duo_core::{CoreError, Direction, GameSession, Step, StepOutcome};
use duo_story::SaveBook;

const HELP: &str = "  l/left, r/right   take a branch
  inv               show inventories
  save <slot> [name]
  load <slot>
  help              show this list
  quit              leave the game";

pub fn run(
    paths: &[PathBuf],
    saves: &Path,
    turns: Option<&str>,
    start: Option<&str>,
) -> Result<(), String> {
    let mut story = super::load_story(paths)?;
    let mut config = story.config().clone();
    if let Some(turns) = turns {
        config = config.with_turn_policy(super::parse_turn_policy(turns)?);
    }
    if let Some(start) = start {
        config = config.with_start(start);
    }
    story = story.with_config(config);

    let session = story.new_session().map_err(|e| e.to_string())?;
    let book = SaveBook::load(saves).map_err(|e| e.to_string())?;

    let mut game = Game {
        session,
        book,
        saves,
    };
    let stdin = io::stdin();
    game.run(stdin.lock())
}

struct Game<'a> {
    session: GameSession,
    book: SaveBook,
    saves: &'a Path,
}

enum Flow {
    Continue,
    Redraw,
    Stop,
}

impl Game<'_> {
    fn run(&mut self, mut input: impl BufRead) -> Result<(), String> {
        if let Some(level) = self.session.observe_level().map_err(|e| e.to_string())? {
            self.announce_level(level);
        }
        self.show_node()?;

        let mut line = String::new();
        loop {
            if self.is_over()? {
                break;
            }

            print!("{} ", ">".bold());
            io::stdout().flush().map_err(|e| e.to_string())?;

            line.clear();
            let read = input.read_line(&mut line).map_err(|e| e.to_string())?;
            if read == 0 {
                println!();
                break;
            }

            match self.handle(line.trim())? {
                Flow::Continue => {}
                Flow::Redraw => self.show_node()?,
                Flow::Stop => break,
            }
        }

        println!("  Goodbye.");
        Ok(())
    }

    fn handle(&mut self, line: &str) -> Result<Flow, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Flow::Continue);
        };
        let rest: Vec<&str> = words.collect();

        match command.to_lowercase().as_str() {
            "quit" | "q" | "exit" => Ok(Flow::Stop),
            "help" | "?" => {
                println!("{HELP}");
                Ok(Flow::Continue)
            }
            "inv" | "inventory" => {
                self.show_inventories();
                Ok(Flow::Continue)
            }
            "save" => self.save(&rest),
            "load" => self.load(&rest),
            other => match other.parse::<Direction>() {
                Ok(direction) => self.choose(direction),
                Err(_) => {
                    println!("  Unknown command '{other}'. Type 'help' for a list.");
                    Ok(Flow::Continue)
                }
            },
        }
    }

    fn choose(&mut self, direction: Direction) -> Result<Flow, String> {
        let node = self.session.current_node().map_err(|e| e.to_string())?;
        if !node.branch(direction).is_offered() {
            println!("  There is no way {direction} here.");
            return Ok(Flow::Continue);
        }

        match self.session.choose(direction) {
            Ok(step) => {
                self.report(&step)?;
                Ok(if self.session.is_finished() {
                    Flow::Continue
                } else {
                    Flow::Redraw
                })
            }
            Err(CoreError::NoAvailablePath { .. }) => {
                println!("  {}", "You cannot go that way yet.".yellow());
                Ok(Flow::Continue)
            }
            Err(e) => Err(e.to_string()),
        }
    }

    fn report(&mut self, step: &Step) -> Result<(), String> {
        let actor = &self.session.characters()[step.actor].nickname;
        debug!("{actor} went {} -> {:?}", step.direction, step.outcome);
        for item in &step.granted {
            println!("  {actor} obtained {}.", item.cyan());
        }
        if let Some(level) = step.entered_level {
            self.announce_level(level);
        }
        if let Some(ending) = &step.ending
            && self.book.unlock_ending(&ending.key)
        {
            let title = ending.title.as_deref().unwrap_or(ending.key.as_str());
            println!("  {} {}", "Ending unlocked:".magenta().bold(), title);
            self.book.save(self.saves).map_err(|e| e.to_string())?;
        }
        if step.outcome == StepOutcome::Exited {
            println!("  {}", "You leave the story behind.".dimmed());
        }
        Ok(())
    }

    fn save(&mut self, args: &[&str]) -> Result<Flow, String> {
        let Some(slot) = args.first().and_then(|s| s.parse::<u32>().ok()) else {
            println!("  Usage: save <slot> [name]");
            return Ok(Flow::Continue);
        };
        let name = if args.len() > 1 {
            args[1..].join(" ")
        } else {
            format!("Slot {slot}")
        };

        self.book.store(slot, name.as_str(), self.session.snapshot());
        self.book.save(self.saves).map_err(|e| e.to_string())?;
        println!("  Saved \"{name}\" to slot {slot}.");
        Ok(Flow::Continue)
    }

    fn load(&mut self, args: &[&str]) -> Result<Flow, String> {
        let Some(slot) = args.first().and_then(|s| s.parse::<u32>().ok()) else {
            println!("  Usage: load <slot>");
            return Ok(Flow::Continue);
        };

        let state = match self.book.slot(slot) {
            Ok(saved) => {
                println!("  Loading \"{}\".", saved.name);
                saved.state.clone()
            }
            Err(e) => {
                println!("  {e}");
                return Ok(Flow::Continue);
            }
        };

        match self.session.restore(&state) {
            Ok(()) => Ok(Flow::Redraw),
            Err(e) => {
                println!("  {} {e}", "Cannot load this slot:".red());
                Ok(Flow::Continue)
            }
        }
    }

    fn is_over(&self) -> Result<bool, String> {
        if self.session.is_finished() {
            return Ok(true);
        }
        let pending = self
            .session
            .has_pending_choices()
            .map_err(|e| e.to_string())?;
        if !pending {
            println!("  {}", "The End.".bold());
        }
        Ok(!pending)
    }

    fn announce_level(&self, level: u32) {
        println!();
        println!("  {}", format!("Level {level}").bold().underline());
        if let Some(intro) = self.session.graph().level_intro(level) {
            println!("  {}", intro.italic());
        }
    }

    fn show_node(&self) -> Result<(), String> {
        let node = self.session.current_node().map_err(|e| e.to_string())?;
        let player = self.session.current_player();

        println!();
        println!("  {}", node.text);
        if node.has_transitions() {
            println!();
            println!("  {}'s turn", player.nickname.bold());
            for direction in node.available_directions() {
                let key = &direction.name()[..1];
                println!("    {}) {}", key.bold(), node.branch(direction).label);
            }
        }
        Ok(())
    }

    fn show_inventories(&self) {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Player", "Items"]);

        for (i, character) in self.session.characters().iter().enumerate() {
            let mut name = character.nickname.clone();
            if i == self.session.current_player_index() {
                name.push_str(" *");
            }
            let items = if character.inventory.is_empty() {
                "-".to_string()
            } else {
                character.inventory.iter().collect::<Vec<_>>().join(", ")
            };
            table.add_row(vec![name, items]);
        }

        println!("{table}");
    }
}
