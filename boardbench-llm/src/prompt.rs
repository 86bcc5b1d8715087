//! Prompt construction and reply parsing

use std::fmt::Write;

use boardbench_core::{Board, Game, PlayerIndex};

const MOVE_MARKER: &str = "move:";

/// Mark shown next to the seat in the prompt
fn seat_mark(player: PlayerIndex) -> char {
    if player == 0 {
        'X'
    } else {
        'O'
    }
}

/// Render the user prompt for one decision
pub fn build_prompt<G: Game>(
    game: &G,
    state: &Board,
    legal_moves: &[G::Move],
    player: PlayerIndex,
) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Game: {}", game.name());
    let _ = writeln!(prompt, "Player: {} ({})", player, seat_mark(player));
    prompt.push('\n');
    prompt.push_str("Current Board:\n");
    prompt.push_str(&game.display_state(state));
    prompt.push_str("\n\n");
    prompt.push_str("Legal Moves (pick one by index):\n");
    for (i, mv) in legal_moves.iter().enumerate() {
        let _ = writeln!(prompt, "- Move {}: {}", i, game.move_to_string(mv));
    }
    prompt.push('\n');
    prompt.push_str(
        "Analyze the board position and choose the best move. \
         Provide a brief explanation of your reasoning.\n",
    );
    prompt.push_str(
        "Then, clearly indicate your chosen move by writing \"MOVE: \" \
         followed by the index of the chosen move.\n",
    );
    prompt.push_str("For example: \"MOVE: 2\"");
    prompt
}

/// Index from the first `MOVE:` marker that is followed by digits
///
/// Matching is case-insensitive and allows whitespace after the colon.
/// Markers with no digits after them are skipped.
pub fn parse_move_index(text: &str) -> Option<usize> {
    let lower = text.to_ascii_lowercase();
    let mut from = 0;
    while let Some(found) = lower[from..].find(MOVE_MARKER) {
        let start = from + found + MOVE_MARKER.len();
        let rest = text[start..].trim_start();
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if end > 0 {
            return rest[..end].parse().ok();
        }
        from = start;
    }
    None
}
