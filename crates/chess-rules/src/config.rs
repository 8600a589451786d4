//! Configuration file loading for the rules engine.
//!
//! The engine reads `chess.toml` from the working directory: board pixel
//! geometry for click mapping, an optional start position, and the
//! thresholds of the automatic draw rules.

use crate::board::{Board, BoardError};
use crate::coords::BoardLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// The file is not valid TOML or has fields of the wrong type.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid board layout: {0}")]
    InvalidLayout(String),
    /// `start_fen` does not describe a playable board.
    #[error("invalid start position: {0}")]
    Board(#[from] BoardError),
}

/// Thresholds for the draw rules the engine applies automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Halfmove clock value that ends the game. Zero disables the rule.
    pub fifty_move_halfmoves: u32,
    /// Occurrences of one position that end the game. Zero disables the rule.
    pub repetition_limit: usize,
    /// End the game when neither side can possibly mate.
    pub insufficient_material: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            fifty_move_halfmoves: 100,
            repetition_limit: 3,
            insufficient_material: true,
        }
    }
}

/// Main engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Position a new game starts from, in FEN. Defaults to the standard setup.
    #[serde(default)]
    pub start_fen: Option<String>,
    #[serde(default)]
    pub layout: BoardLayout,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl EngineConfig {
    /// Loads the configuration from [`Self::config_path()`].
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be read,
    /// [`ConfigError::Parse`] for invalid TOML, and the validation errors of
    /// [`Self::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads and validates the configuration at `path`, or the default if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the path to the configuration file.
    ///
    /// Currently returns `chess.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }

    /// Checks the layout geometry and that `start_fen`, if set, loads.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.layout.is_valid() {
            return Err(ConfigError::InvalidLayout(format!(
                "squares must have positive finite size, got {}x{} at ({}, {})",
                self.layout.square_width,
                self.layout.square_height,
                self.layout.origin_x,
                self.layout.origin_y
            )));
        }
        self.start_board()?;
        Ok(())
    }

    /// The board a new game starts from.
    pub fn start_board(&self) -> Result<Board, BoardError> {
        match &self.start_fen {
            Some(fen) => Board::from_fen(fen),
            None => Ok(Board::startpos()),
        }
    }
}
