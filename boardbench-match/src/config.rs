//! Configuration types for match play
//!
//! Level 4 - Utilities and configuration

/// Default cap on consumed turns per match
pub const DEFAULT_MAX_MOVES: usize = 1000;

/// Configuration for a single match
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    /// Maximum consumed turns (accepted + fallback moves)
    pub max_moves: usize,
    /// Seed for the runner's fallback choices (None = random)
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_moves: DEFAULT_MAX_MOVES,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Set the turn cap
    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Configuration for a series of matches between two agents
#[derive(Clone, Debug)]
pub struct SeriesConfig {
    /// Number of matches (should be even for seat alternation)
    pub games: usize,
    /// Per-match settings; its seed is the series base seed
    pub match_config: MatchConfig,
    /// Whether to run matches in parallel
    pub parallel: bool,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            games: 2,
            match_config: MatchConfig::default(),
            parallel: false,
        }
    }
}

impl SeriesConfig {
    /// Create config with the given number of matches
    pub fn new(games: usize) -> Self {
        Self {
            games,
            ..Default::default()
        }
    }

    pub fn with_match_config(mut self, match_config: MatchConfig) -> Self {
        self.match_config = match_config;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Seed for match `index`, derived from the base seed
    pub fn seed_for(&self, index: usize) -> Option<u64> {
        self.match_config
            .seed
            .map(|base| base.wrapping_add(index as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.max_moves, 1000);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_match_config_builders() {
        let config = MatchConfig::default().with_max_moves(20).with_seed(7);
        assert_eq!(config.max_moves, 20);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_series_config_defaults() {
        let config = SeriesConfig::default();
        assert_eq!(config.games, 2);
        assert!(!config.parallel);
    }

    #[test]
    fn test_series_seeds() {
        let config = SeriesConfig::new(4).with_match_config(MatchConfig::default().with_seed(42));
        assert_eq!(config.seed_for(0), Some(42));
        assert_eq!(config.seed_for(3), Some(45));
        assert_eq!(SeriesConfig::new(4).seed_for(1), None);
    }
}
