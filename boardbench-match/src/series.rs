//! Series play - several matches between the same two agents
//!
//! Level 2 - Phase-level implementation

use rayon::prelude::*;
use tracing::info;

use boardbench_core::{Agent, Game};

use crate::config::SeriesConfig;
use crate::logger::MatchLogger;
use crate::record::MatchResult;
use crate::runner::{MatchError, MatchRunner};

/// Builds a fresh agent for one match from that match's seed
pub type AgentFactory<'f, G> = dyn Fn(Option<u64>) -> Box<dyn Agent<G>> + Sync + 'f;

/// Result of a series (multiple matches)
#[derive(Clone, Debug, Default)]
pub struct SeriesResult {
    /// Wins for the first agent, whatever its seat
    pub first_wins: u32,
    /// Wins for the second agent
    pub second_wins: u32,
    /// Matches that ended without a winner
    pub draws: u32,
    /// Total matches played
    pub games_played: u32,
    /// Average accepted moves per match
    pub avg_moves: f32,
    /// Individual match results, in play order
    pub results: Vec<MatchResult>,
}

impl SeriesResult {
    /// Create empty result
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn first_win_rate(&self) -> f32 {
        self.rate(self.first_wins)
    }

    pub fn second_win_rate(&self) -> f32 {
        self.rate(self.second_wins)
    }

    pub fn draw_rate(&self) -> f32 {
        self.rate(self.draws)
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn score_for_second(&self) -> f32 {
        self.second_wins as f32 + 0.5 * self.draws as f32
    }

    fn rate(&self, count: u32) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            count as f32 / self.games_played as f32
        }
    }
}

/// Play a series between two agents (Level 2 phase)
///
/// Seats alternate each match for fairness. Every match gets its own runner
/// and freshly built agents, so matches may run in parallel when
/// `config.parallel` is set.
pub fn play_series<G>(
    game: &G,
    make_first: &AgentFactory<'_, G>,
    make_second: &AgentFactory<'_, G>,
    logger: &dyn MatchLogger,
    config: &SeriesConfig,
) -> Result<SeriesResult, MatchError>
where
    G: Game + Sync,
{
    if config.games == 0 {
        return Ok(SeriesResult::empty());
    }

    let plans = prepare_seat_plans(config.games);
    let play = |plan: &SeatPlan| play_single(game, make_first, make_second, logger, config, *plan);

    let outcomes = if config.parallel {
        plans.par_iter().map(play).collect::<Result<Vec<_>, _>>()?
    } else {
        plans.iter().map(play).collect::<Result<Vec<_>, _>>()?
    };

    let result = aggregate_results(outcomes);
    info!(
        games = result.games_played,
        first_wins = result.first_wins,
        second_wins = result.second_wins,
        draws = result.draws,
        "Series finished"
    );
    Ok(result)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Seating for a single match in a series
#[derive(Clone, Copy, Debug)]
struct SeatPlan {
    /// Whether the first agent takes seat 0 this match
    first_in_seat_zero: bool,
    /// Match index (for seeding)
    index: usize,
}

/// Result with context about who sat where
struct SeriesGame {
    result: MatchResult,
    first_in_seat_zero: bool,
}

fn prepare_seat_plans(games: usize) -> Vec<SeatPlan> {
    (0..games)
        .map(|i| SeatPlan {
            first_in_seat_zero: i % 2 == 0,
            index: i,
        })
        .collect()
}

fn play_single<G: Game>(
    game: &G,
    make_first: &AgentFactory<'_, G>,
    make_second: &AgentFactory<'_, G>,
    logger: &dyn MatchLogger,
    config: &SeriesConfig,
    plan: SeatPlan,
) -> Result<SeriesGame, MatchError> {
    let seed = config.seed_for(plan.index);
    let mut first = make_first(seed);
    let mut second = make_second(seed);

    let agents: Vec<&mut dyn Agent<G>> = if plan.first_in_seat_zero {
        vec![first.as_mut(), second.as_mut()]
    } else {
        vec![second.as_mut(), first.as_mut()]
    };

    let mut match_config = config.match_config.clone();
    match_config.seed = seed;

    let mut runner = MatchRunner::new(game, agents, logger, match_config)?;
    let report = runner.run()?;

    Ok(SeriesGame {
        result: report.result,
        first_in_seat_zero: plan.first_in_seat_zero,
    })
}

/// Attribute wins to agents rather than seats
fn aggregate_results(outcomes: Vec<SeriesGame>) -> SeriesResult {
    let mut first_wins = 0u32;
    let mut second_wins = 0u32;
    let mut draws = 0u32;
    let mut total_moves = 0usize;
    let mut results = Vec::with_capacity(outcomes.len());

    for game in outcomes {
        total_moves += game.result.moves;
        match game.result.winner {
            Some(seat) if (seat == 0) == game.first_in_seat_zero => first_wins += 1,
            Some(_) => second_wins += 1,
            None => draws += 1,
        }
        results.push(game.result);
    }

    let games_played = results.len() as u32;
    let avg_moves = if games_played > 0 {
        total_moves as f32 / games_played as f32
    } else {
        0.0
    };

    SeriesResult {
        first_wins,
        second_wins,
        draws,
        games_played,
        avg_moves,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::logger::MemoryLogger;
    use boardbench_core::{Connect4, Gomoku, RandomAgent, ValidatedRandomAgent};

    fn result_with(winner: Option<usize>, moves: usize) -> MatchResult {
        MatchResult {
            match_id: String::new(),
            game: "Connect4".to_string(),
            date: String::new(),
            agents: vec!["First".to_string(), "Second".to_string()],
            moves,
            winner,
            avg_move_time: 0.0,
            max_move_time: 0.0,
            turns: moves,
            rejected_moves: 0,
        }
    }

    #[test]
    fn test_series_result_empty() {
        let result = SeriesResult::empty();
        assert_eq!(result.games_played, 0);
        assert_eq!(result.first_win_rate(), 0.0);
    }

    #[test]
    fn test_series_result_rates_and_scores() {
        let result = SeriesResult {
            first_wins: 3,
            second_wins: 2,
            draws: 2,
            games_played: 7,
            avg_moves: 25.0,
            results: vec![],
        };

        assert!((result.first_win_rate() - 3.0 / 7.0).abs() < 1e-6);
        assert!((result.draw_rate() - 2.0 / 7.0).abs() < 1e-6);
        // First: 3 wins + 0.5 * 2 draws = 4.0
        assert_eq!(result.score_for_first(), 4.0);
        assert_eq!(result.score_for_second(), 3.0);
    }

    #[test]
    fn test_prepare_seat_plans() {
        let plans = prepare_seat_plans(4);
        assert_eq!(plans.len(), 4);
        assert!(plans[0].first_in_seat_zero);
        assert!(!plans[1].first_in_seat_zero);
        assert!(plans[2].first_in_seat_zero);
        assert_eq!(plans[3].index, 3);
    }

    #[test]
    fn test_wins_follow_agent_not_seat() {
        let outcomes = vec![
            // First agent in seat 0 and wins
            SeriesGame {
                result: result_with(Some(0), 10),
                first_in_seat_zero: true,
            },
            // First agent in seat 1 and wins
            SeriesGame {
                result: result_with(Some(1), 20),
                first_in_seat_zero: false,
            },
            // Second agent in seat 0 and wins
            SeriesGame {
                result: result_with(Some(0), 30),
                first_in_seat_zero: false,
            },
            SeriesGame {
                result: result_with(None, 40),
                first_in_seat_zero: true,
            },
        ];

        let result = aggregate_results(outcomes);
        assert_eq!(result.first_wins, 2);
        assert_eq!(result.second_wins, 1);
        assert_eq!(result.draws, 1);
        assert_eq!(result.games_played, 4);
        assert!((result.avg_moves - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_play_series_alternates_seats() {
        let game = Connect4::default();
        let logger = MemoryLogger::new();
        let first = |seed: Option<u64>| -> Box<dyn Agent<Connect4>> {
            Box::new(RandomAgent::with_seed("First", seed.unwrap_or(0)))
        };
        let second = |seed: Option<u64>| -> Box<dyn Agent<Connect4>> {
            Box::new(ValidatedRandomAgent::with_seed("Second", seed.unwrap_or(0) + 100))
        };
        let config = SeriesConfig::new(4).with_match_config(MatchConfig::default().with_seed(42));

        let result = play_series(&game, &first, &second, &logger, &config).unwrap();

        assert_eq!(result.games_played, 4);
        assert_eq!(result.first_wins + result.second_wins + result.draws, 4);
        assert_eq!(result.results[0].agents, vec!["First", "Second"]);
        assert_eq!(result.results[1].agents, vec!["Second", "First"]);
        assert_eq!(logger.len(), 4);
    }

    #[test]
    fn test_parallel_series_matches_sequential() {
        let game = Gomoku::new(7, 4).unwrap();
        let first = |seed: Option<u64>| -> Box<dyn Agent<Gomoku>> {
            Box::new(RandomAgent::with_seed("First", seed.unwrap_or(0)))
        };
        let second = |seed: Option<u64>| -> Box<dyn Agent<Gomoku>> {
            Box::new(RandomAgent::with_seed("Second", seed.unwrap_or(0) + 100))
        };
        let config = SeriesConfig::new(6).with_match_config(MatchConfig::default().with_seed(7));

        let sequential =
            play_series(&game, &first, &second, &MemoryLogger::new(), &config).unwrap();
        let parallel = play_series(
            &game,
            &first,
            &second,
            &MemoryLogger::new(),
            &config.clone().with_parallel(true),
        )
        .unwrap();

        assert_eq!(sequential.first_wins, parallel.first_wins);
        assert_eq!(sequential.second_wins, parallel.second_wins);
        assert_eq!(sequential.draws, parallel.draws);
        let winners = |r: &SeriesResult| r.results.iter().map(|m| m.winner).collect::<Vec<_>>();
        assert_eq!(winners(&sequential), winners(&parallel));
    }

    #[test]
    fn test_zero_games() {
        let game = Connect4::default();
        let make = |_: Option<u64>| -> Box<dyn Agent<Connect4>> { Box::new(RandomAgent::new("R")) };
        let result =
            play_series(&game, &make, &make, &MemoryLogger::new(), &SeriesConfig::new(0)).unwrap();
        assert_eq!(result.games_played, 0);
    }
}
