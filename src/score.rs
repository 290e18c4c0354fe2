use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "grid-snake";
const SCORE_FILE_NAME: &str = "scores.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    best: u32,
}

/// Best score across runs, backed by a JSON file.
///
/// Only the best score is kept; game state itself is never persisted.
#[derive(Debug, Clone)]
pub struct HighScore {
    path: PathBuf,
    best: u32,
}

impl HighScore {
    /// Loads the best score stored at `path`, starting from 0 when the file
    /// is missing or unreadable.
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let best = match load_best_from_path(&path) {
            Ok(best) => best,
            Err(error) => {
                log::warn!("ignoring unreadable high score {}: {error}", path.display());
                0
            }
        };

        Self { path, best }
    }

    #[must_use]
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Records a finished game's score, saving it when it beats the best.
    /// Returns true on a new best.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        self.best = score;
        if let Err(error) = save_best_to_path(&self.path, score) {
            log::error!("failed to save high score to {}: {error}", self.path.display());
        }
        true
    }
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

fn load_best_from_path(path: &Path) -> io::Result<u32> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    serde_json::from_str::<ScoreFile>(&raw)
        .map(|file| file.best)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn save_best_to_path(path: &Path, best: u32) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&ScoreFile { best })
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

    fs::write(path, json)
}
