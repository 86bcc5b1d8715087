//! Match log persistence

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::record::MatchLog;

/// Errors while writing or reading match logs
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("match log not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid match log JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for finished match logs
///
/// Shared across parallel matches, so implementations must be `Sync`.
pub trait MatchLogger: Send + Sync {
    /// Persist a log, returning where it went
    fn log_match(&self, log: &MatchLog) -> Result<PathBuf, LogError>;
}

// ============================================================================
// JSON FILE LOGGER
// ============================================================================

/// Writes one pretty-printed JSON file per match
#[derive(Clone, Debug)]
pub struct JsonFileLogger {
    dir: PathBuf,
}

impl JsonFileLogger {
    /// Logger rooted at `dir`, created if missing
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, LogError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| LogError::Io {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "Match log directory ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{timestamp}_{game}_{match_id}.json`
    pub fn file_name(log: &MatchLog) -> String {
        format!(
            "{}_{}_{}.json",
            chrono::Local::now().format("%Y%m%d_%H%M%S"),
            log.result.game,
            log.result.match_id
        )
    }

    /// Read a log back as a JSON mapping
    pub fn read_match(path: impl AsRef<Path>) -> Result<serde_json::Value, LogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LogError::NotFound(path.to_path_buf())
            } else {
                LogError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl MatchLogger for JsonFileLogger {
    fn log_match(&self, log: &MatchLog) -> Result<PathBuf, LogError> {
        let path = self.dir.join(Self::file_name(log));
        let json = serde_json::to_string_pretty(log)?;
        fs::write(&path, json).map_err(|source| LogError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Match log saved");
        Ok(path)
    }
}

// ============================================================================
// MEMORY LOGGER
// ============================================================================

/// Keeps logs in memory; locations are synthetic `memory://{match_id}` paths
#[derive(Debug, Default)]
pub struct MemoryLogger {
    logs: Mutex<Vec<MatchLog>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of every log received so far
    pub fn logs(&self) -> Vec<MatchLog> {
        self.logs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.logs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MatchLogger for MemoryLogger {
    fn log_match(&self, log: &MatchLog) -> Result<PathBuf, LogError> {
        self.logs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(log.clone());
        Ok(PathBuf::from(format!("memory://{}", log.result.match_id)))
    }
}
