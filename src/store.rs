//! Persisted bubble position
//!
//! Positions live in a small JSON preferences file under the platform data
//! directory. Keys written by other tools are kept when the file is rewritten.

use crate::geometry::Position;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Position used when nothing has been saved yet
pub const DEFAULT_POSITION: Position = Position { x: 0, y: 100 };

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Could not determine a data directory")]
    NoDataDir,
}

pub trait PositionStore {
    fn load(&self) -> Result<Position, StoreError>;

    fn save(&mut self, position: Position) -> Result<(), StoreError>;
}

impl<S: PositionStore + ?Sized> PositionStore for Box<S> {
    fn load(&self) -> Result<Position, StoreError> {
        (**self).load()
    }

    fn save(&mut self, position: Position) -> Result<(), StoreError> {
        (**self).save(position)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Prefs {
    #[serde(default = "default_bubble_x")]
    bubble_x: i32,
    #[serde(default = "default_bubble_y")]
    bubble_y: i32,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

fn default_bubble_x() -> i32 {
    DEFAULT_POSITION.x
}
fn default_bubble_y() -> i32 {
    DEFAULT_POSITION.y
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            bubble_x: default_bubble_x(),
            bubble_y: default_bubble_y(),
            other: serde_json::Map::new(),
        }
    }
}

/// JSON preferences file
#[derive(Debug, Clone)]
pub struct PrefsFile {
    path: PathBuf,
}

impl PrefsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `prefs.json` in the platform data directory
    pub fn default_location() -> Result<Self, StoreError> {
        let dirs = ProjectDirs::from("com", "floatmate", "floatmate").ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join("prefs.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Prefs, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Prefs::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, prefs: &Prefs) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Readers never observe a partially written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(prefs)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PositionStore for PrefsFile {
    fn load(&self) -> Result<Position, StoreError> {
        let prefs = self.read()?;
        Ok(Position::new(prefs.bubble_x, prefs.bubble_y))
    }

    fn save(&mut self, position: Position) -> Result<(), StoreError> {
        // Unreadable file: start over rather than refuse to save
        let mut prefs = self.read().unwrap_or_default();
        prefs.bubble_x = position.x;
        prefs.bubble_y = position.y;
        self.write(&prefs)
    }
}

/// In-memory store, nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    position: Option<Position>,
    saves: usize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_position(position: Position) -> Self {
        Self {
            position: Some(position),
            saves: 0,
        }
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl PositionStore for MemoryStore {
    fn load(&self) -> Result<Position, StoreError> {
        Ok(self.position.unwrap_or(DEFAULT_POSITION))
    }

    fn save(&mut self, position: Position) -> Result<(), StoreError> {
        self.position = Some(position);
        self.saves += 1;
        debug!("Kept bubble position {:?} in memory (save #{})", position, self.saves);
        Ok(())
    }
}
