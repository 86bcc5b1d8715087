//! List commands - available games and agent types

use std::fmt::Write;

use crate::catalog::{AgentKind, GameKind};

pub fn list_games() {
    println!("{}", games_table());
}

pub fn list_agents() {
    println!("{}", agents_table());
}

fn games_table() -> String {
    let mut out = String::from("Available Games\n");
    let _ = writeln!(out, "{:<12} {}", "Name", "Description");
    let _ = writeln!(out, "{}", "-".repeat(56));
    for game in GameKind::ALL {
        let _ = writeln!(out, "{:<12} {}", game.name(), game.description());
    }
    out
}

fn agents_table() -> String {
    let mut out = String::from("Available Agents\n");
    let _ = writeln!(out, "{:<18} {:<74} {}", "Name", "Description", "Requirements");
    let _ = writeln!(out, "{}", "-".repeat(106));
    for agent in AgentKind::ALL {
        let _ = writeln!(
            out,
            "{:<18} {:<74} {}",
            agent.name(),
            agent.description(),
            agent.requirements()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_games_table() {
        let table = games_table();
        assert!(table.contains("gomoku"));
        assert!(table.contains("Connect 4 pieces in a row in a 6x7 grid"));
    }

    #[test]
    fn test_agents_table() {
        let table = agents_table();
        assert!(table.contains("enforced-random"));
        assert!(table.contains("API key"));
        assert_eq!(table.lines().count(), 2 + AgentKind::ALL.len() + 1);
    }
}
