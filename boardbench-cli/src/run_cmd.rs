//! Run command - play matches between two agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: resolve_agent(), play_single_match(), play_many(), report results
//! - Level 3: AgentSpec::build()
//! - Level 4: seeding and formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use boardbench_core::{Agent, Connect4, Game, Gomoku, RandomAgent, ValidatedRandomAgent};
use boardbench_llm::{LlmAgent, LlmConfig, OpenAiClient, DEFAULT_MODEL};
use boardbench_match::{
    play_series, JsonFileLogger, MatchConfig, MatchReport, MatchResult, MatchRunner,
    SeriesConfig, SeriesResult, DEFAULT_MAX_MOVES,
};

use crate::catalog::{AgentKind, GameKind};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Game to play
    #[arg(short, long, value_enum, default_value = "gomoku")]
    pub game: GameKind,

    /// Agent in the first seat
    #[arg(long, value_enum, default_value = "random")]
    pub agent1: AgentKind,

    /// Agent in the second seat
    #[arg(long, value_enum, default_value = "random")]
    pub agent2: AgentKind,

    /// Model for LLM agents
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// API key for LLM agents (defaults to OPENAI_API_KEY)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Maximum turns per match
    #[arg(long, default_value_t = DEFAULT_MAX_MOVES)]
    pub max_moves: usize,

    /// Log every move (default)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Random seed for reproducible matches
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of matches to play (seats alternate)
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Play multiple matches in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Directory for match logs
    #[arg(long, default_value = "boardbench/logs")]
    pub log_dir: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Default tracing filter for these flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// A resolved agent choice, ready to be instantiated per match
enum AgentSpec {
    Random,
    EnforcedRandom,
    Llm {
        config: LlmConfig,
        client: OpenAiClient,
    },
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run command
///
/// 1. Resolve both agents (LLM agents need an API key)
/// 2. Play one match, or a series when `--games` is above 1
/// 3. Report results
pub fn run(args: RunArgs) -> Result<()> {
    match args.game {
        GameKind::Gomoku => run_game(&Gomoku::default(), &args),
        GameKind::Connect4 => run_game(&Connect4::default(), &args),
    }
}

fn run_game<G: Game + Sync>(game: &G, args: &RunArgs) -> Result<()> {
    let first = resolve_agent(args.agent1, args)?;
    let second = resolve_agent(args.agent2, args)?;
    let logger = JsonFileLogger::new(&args.log_dir)
        .with_context(|| format!("Failed to prepare log directory: {}", args.log_dir.display()))?;

    tracing::info!(
        "Starting {}: {} vs {} ({} game(s), max {} moves)",
        game.name(),
        args.agent1.display_name(1),
        args.agent2.display_name(2),
        args.games,
        args.max_moves
    );

    if args.games <= 1 {
        let report = play_single_match(game, &first, &second, &logger, args)?;
        report_match(&report, args)
    } else {
        let series = play_many(game, &first, &second, &logger, args)?;
        report_series(&series, args)
    }
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Turn a CLI agent name into something that can build agents
fn resolve_agent(kind: AgentKind, args: &RunArgs) -> Result<AgentSpec> {
    Ok(match kind {
        AgentKind::Random => AgentSpec::Random,
        AgentKind::EnforcedRandom => AgentSpec::EnforcedRandom,
        AgentKind::Llm => {
            let mut config = LlmConfig::new(&args.model);
            if let Some(key) = &args.api_key {
                config = config.with_api_key(key);
            }
            let client = OpenAiClient::new(&config)
                .context("LLM agent requires an API key (--api-key or OPENAI_API_KEY)")?;
            AgentSpec::Llm { config, client }
        }
    })
}

fn play_single_match<G: Game>(
    game: &G,
    first: &AgentSpec,
    second: &AgentSpec,
    logger: &JsonFileLogger,
    args: &RunArgs,
) -> Result<MatchReport> {
    let mut agent1 = first.build::<G>(1, derive_seed(args.seed, 1));
    let mut agent2 = second.build::<G>(2, derive_seed(args.seed, 2));
    let agents: Vec<&mut dyn Agent<G>> = vec![agent1.as_mut(), agent2.as_mut()];

    let mut runner = MatchRunner::new(game, agents, logger, match_config(args))?;
    let report = runner.run().context("Match failed")?;
    Ok(report)
}

fn play_many<G: Game + Sync>(
    game: &G,
    first: &AgentSpec,
    second: &AgentSpec,
    logger: &JsonFileLogger,
    args: &RunArgs,
) -> Result<SeriesResult> {
    let make_first = |seed: Option<u64>| first.build::<G>(1, derive_seed(seed, 1));
    let make_second = |seed: Option<u64>| second.build::<G>(2, derive_seed(seed, 2));
    let config = SeriesConfig::new(args.games)
        .with_match_config(match_config(args))
        .with_parallel(args.parallel);

    let series = play_series(game, &make_first, &make_second, logger, &config)
        .context("Series failed")?;
    Ok(series)
}

/// Report a single match
fn report_match(report: &MatchReport, args: &RunArgs) -> Result<()> {
    if args.json {
        print_json_match(report)
    } else {
        print_text_match(report);
        Ok(())
    }
}

/// Report a series
fn report_series(series: &SeriesResult, args: &RunArgs) -> Result<()> {
    if args.json {
        print_json_series(series, args)
    } else {
        print_text_series(series, args);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

impl AgentSpec {
    /// Fresh agent for `--agent{number}`
    fn build<G: Game>(&self, number: usize, seed: Option<u64>) -> Box<dyn Agent<G>> {
        match self {
            AgentSpec::Random => {
                let name = AgentKind::Random.display_name(number);
                match seed {
                    Some(s) => Box::new(RandomAgent::with_seed(name, s)),
                    None => Box::new(RandomAgent::new(name)),
                }
            }
            AgentSpec::EnforcedRandom => {
                let name = AgentKind::EnforcedRandom.display_name(number);
                match seed {
                    Some(s) => Box::new(ValidatedRandomAgent::with_seed(name, s)),
                    None => Box::new(ValidatedRandomAgent::new(name)),
                }
            }
            AgentSpec::Llm { config, client } => {
                let config = match seed {
                    Some(s) => config.clone().with_seed(s),
                    None => config.clone(),
                };
                Box::new(LlmAgent::with_client(
                    AgentKind::Llm.display_name(number),
                    client.clone(),
                    &config,
                ))
            }
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn match_config(args: &RunArgs) -> MatchConfig {
    let config = MatchConfig::default().with_max_moves(args.max_moves);
    match args.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}

/// Distinct per-agent seed derived from a match seed
fn derive_seed(seed: Option<u64>, number: usize) -> Option<u64> {
    seed.map(|s| s.wrapping_add((number as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

/// Print a single match as JSON
fn print_json_match(report: &MatchReport) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        #[serde(flatten)]
        result: &'a MatchResult,
        log_location: String,
    }

    let output = JsonOutput {
        result: &report.result,
        log_location: report.log_location.display().to_string(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print a single match as a table
fn print_text_match(report: &MatchReport) {
    println!("\n=== Match Results ===");
    for (label, value) in match_rows(&report.result) {
        println!("{:<20} {}", label, value);
    }
    println!("{:<20} {}", "Log File", report.log_location.display());
}

/// Label/value rows of the results table
fn match_rows(result: &MatchResult) -> Vec<(String, String)> {
    let mut rows = vec![
        ("Game".to_string(), result.game.clone()),
        ("Match ID".to_string(), result.match_id.clone()),
        ("Date".to_string(), result.date.clone()),
    ];
    for (seat, name) in result.agents.iter().enumerate() {
        rows.push((format!("Player {}", seat + 1), name.clone()));
    }
    rows.push(("Total Moves".to_string(), result.moves.to_string()));
    if result.rejected_moves > 0 {
        rows.push(("Rejected Moves".to_string(), result.rejected_moves.to_string()));
    }
    rows.push(("Winner".to_string(), result.winner_label()));
    rows.push((
        "Average Move Time".to_string(),
        format!("{:.3}s", result.avg_move_time),
    ));
    rows.push((
        "Maximum Move Time".to_string(),
        format!("{:.3}s", result.max_move_time),
    ));
    rows
}

/// Print series results as JSON
fn print_json_series(series: &SeriesResult, args: &RunArgs) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        total_games: u32,
        agent1: String,
        agent2: String,
        agent1_wins: u32,
        agent2_wins: u32,
        draws: u32,
        avg_moves: f32,
        agent1_win_rate: f32,
        agent1_score: f32,
        agent2_score: f32,
        matches: &'a [MatchResult],
    }

    let output = JsonOutput {
        total_games: series.games_played,
        agent1: args.agent1.display_name(1),
        agent2: args.agent2.display_name(2),
        agent1_wins: series.first_wins,
        agent2_wins: series.second_wins,
        draws: series.draws,
        avg_moves: series.avg_moves,
        agent1_win_rate: series.first_win_rate(),
        agent1_score: series.score_for_first(),
        agent2_score: series.score_for_second(),
        matches: &series.results,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print series results as text
fn print_text_series(series: &SeriesResult, args: &RunArgs) {
    println!("\n=== Series Results ===");
    println!("Total games: {}", series.games_played);
    println!(
        "{} wins: {} ({:.1}%)",
        args.agent1.display_name(1),
        series.first_wins,
        series.first_win_rate() * 100.0
    );
    println!(
        "{} wins: {} ({:.1}%)",
        args.agent2.display_name(2),
        series.second_wins,
        series.second_win_rate() * 100.0
    );
    println!(
        "Draws: {} ({:.1}%)",
        series.draws,
        series.draw_rate() * 100.0
    );
    println!("Avg moves: {:.1}", series.avg_moves);
    println!("{}", score_line(series, args));

    println!("\nGame details:");
    for (i, result) in series.results.iter().enumerate() {
        println!(
            "  Game {}: {} in {} moves ({})",
            i + 1,
            result.winner_label(),
            result.moves,
            result.match_id
        );
    }
}

/// Points per agent, a draw counting half
fn score_line(series: &SeriesResult, args: &RunArgs) -> String {
    format!(
        "Score: {} {:.1} - {:.1} {}",
        args.agent1.display_name(1),
        series.score_for_first(),
        series.score_for_second(),
        args.agent2.display_name(2)
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(game: GameKind, log_dir: PathBuf) -> RunArgs {
        RunArgs {
            game,
            agent1: AgentKind::Random,
            agent2: AgentKind::EnforcedRandom,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            max_moves: DEFAULT_MAX_MOVES,
            verbose: false,
            quiet: true,
            seed: Some(42),
            games: 1,
            parallel: false,
            log_dir,
            json: false,
        }
    }

    #[derive(clap::Parser)]
    struct RunCli {
        #[command(flatten)]
        args: RunArgs,
    }

    fn parse(argv: &[&str]) -> RunArgs {
        use clap::Parser;
        RunCli::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_bare_run_uses_defaults() {
        let args = parse(&["run"]);
        assert_eq!(args.game, GameKind::Gomoku);
        assert_eq!(args.agent1, AgentKind::Random);
        assert_eq!(args.agent2, AgentKind::Random);
        assert_eq!(args.model, DEFAULT_MODEL);
        assert_eq!(args.max_moves, DEFAULT_MAX_MOVES);
        assert_eq!(args.games, 1);
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["run", "-g", "connect4", "-m", "gpt-4o", "-k", "sk-test"]);
        assert_eq!(args.game, GameKind::Connect4);
        assert_eq!(args.model, "gpt-4o");
        assert_eq!(args.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_score_line() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_for(GameKind::Gomoku, dir.path().to_path_buf());
        let series = SeriesResult {
            first_wins: 2,
            second_wins: 1,
            draws: 1,
            games_played: 4,
            avg_moves: 30.0,
            results: vec![],
        };
        assert_eq!(
            score_line(&series, &args),
            "Score: Random Player 1 2.5 - 1.5 EnforcedRandom Player 2"
        );
    }

    #[test]
    fn test_derive_seed() {
        assert_eq!(derive_seed(None, 1), None);
        let a = derive_seed(Some(42), 1);
        let b = derive_seed(Some(42), 2);
        assert!(a.is_some());
        assert_ne!(a, b);
        assert_eq!(a, derive_seed(Some(42), 1));
    }

    #[test]
    fn test_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_for(GameKind::Connect4, dir.path().to_path_buf());
        assert_eq!(args.log_level(), "warn");
        args.quiet = false;
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_built_agent_names() {
        let a: Box<dyn Agent<Connect4>> = AgentSpec::Random.build(1, Some(1));
        let b: Box<dyn Agent<Connect4>> = AgentSpec::EnforcedRandom.build(2, None);
        assert_eq!(a.name(), "Random Player 1");
        assert_eq!(b.name(), "EnforcedRandom Player 2");
    }

    #[test]
    fn test_llm_agent_with_explicit_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_for(GameKind::Gomoku, dir.path().to_path_buf());
        args.api_key = Some("sk-test".to_string());

        let spec = resolve_agent(AgentKind::Llm, &args).unwrap();
        let agent: Box<dyn Agent<Gomoku>> = spec.build(2, Some(3));
        assert_eq!(agent.name(), "LLM Player 2");
    }

    #[test]
    fn test_run_single_match_writes_log() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_for(GameKind::Connect4, dir.path().join("logs"));

        run(args).unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path().join("logs")).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_run_series_writes_one_log_per_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_for(GameKind::Gomoku, dir.path().to_path_buf());
        args.games = 3;
        args.parallel = true;
        args.json = true;

        run(args).unwrap();

        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 3);
    }

    #[test]
    fn test_match_rows() {
        let result = MatchResult {
            match_id: "id".to_string(),
            game: "Connect4".to_string(),
            date: "2024-01-01T00:00:00+00:00".to_string(),
            agents: vec!["Random Player 1".to_string(), "LLM Player 2".to_string()],
            moves: 12,
            winner: Some(1),
            avg_move_time: 0.25,
            max_move_time: 1.5,
            turns: 12,
            rejected_moves: 0,
        };
        let rows = match_rows(&result);
        let find = |label: &str| {
            rows.iter()
                .find(|(l, _)| l == label)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(find("Player 2").as_deref(), Some("LLM Player 2"));
        assert_eq!(find("Winner").as_deref(), Some("Player 2 (LLM Player 2)"));
        assert_eq!(find("Average Move Time").as_deref(), Some("0.250s"));
        assert_eq!(find("Rejected Moves"), None);
    }
}
