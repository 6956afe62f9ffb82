use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key under which the high score is kept
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Durable home of the single high-score integer
pub trait ScoreStore {
    /// Read the stored high score. Nothing stored yet reads as 0.
    fn load(&self) -> Result<u32>;

    /// Replace the stored high score
    fn save(&mut self, high_score: u32) -> Result<()>;
}

/// Key-value store backed by a JSON object in a local file
///
/// The file may hold other keys of any JSON type; they are left untouched on
/// save. The high score itself is stored as a decimal string under
/// [`HIGH_SCORE_KEY`].
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.grid_snake/store.json`, or `./.grid_snake/store.json` when
    /// `HOME` is unset
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".grid_snake")
            .join("store.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read score store {:?}", self.path))?;
        if json.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse score store {:?}", self.path))
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json =
            serde_json::to_string_pretty(entries).context("Failed to serialize score store")?;

        // Write beside the target and rename so a crash never leaves half a file
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write score store {:?}", tmp_path))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace score store {:?}", self.path))?;

        Ok(())
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Result<u32> {
        let entries = self.read_entries()?;

        match entries.get(HIGH_SCORE_KEY) {
            None => Ok(0),
            Some(Value::String(value)) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("Invalid high score value {:?}", value)),
            Some(other) => bail!("Invalid high score value {}", other),
        }
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Discarding unreadable score store: {:#}", err);
                Map::new()
            }
        };

        entries.insert(
            HIGH_SCORE_KEY.to_string(),
            Value::String(high_score.to_string()),
        );
        self.write_entries(&entries)
    }
}

/// In-process store, for tests and runs that should not touch the disk
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    value: Option<u32>,
    saves: usize,
    fail_writes: bool,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a high score already stored
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            value: Some(high_score),
            ..Default::default()
        }
    }

    /// A store whose every save fails
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }

    pub fn stored(&self) -> Option<u32> {
        self.value
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u32> {
        Ok(self.value.unwrap_or(0))
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        if self.fail_writes {
            bail!("score store is read-only");
        }
        self.value = Some(high_score);
        self.saves += 1;
        Ok(())
    }
}
