pub mod check;
pub mod endings;
pub mod play;

use std::path::Path;

use duo_core::TurnPolicy;
use duo_story::Story;

/// Load a story from its base file and parts.
fn load_story(paths: &[impl AsRef<Path>]) -> Result<Story, String> {
    Story::load_parts(paths).map_err(|e| e.to_string())
}

/// Parse the `--turns` option.
fn parse_turn_policy(s: &str) -> Result<TurnPolicy, String> {
    match s.trim().to_lowercase().as_str() {
        "node" | "node-owned" => Ok(TurnPolicy::NodeOwned),
        "round-robin" | "rr" => Ok(TurnPolicy::RoundRobin),
        other => Err(format!(
            "unknown turn policy '{other}' (expected: node, round-robin)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_policy_names() {
        assert_eq!(parse_turn_policy("node"), Ok(TurnPolicy::NodeOwned));
        assert_eq!(parse_turn_policy(" Round-Robin "), Ok(TurnPolicy::RoundRobin));
        assert!(parse_turn_policy("random").is_err());
    }
}
