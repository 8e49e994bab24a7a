//! Start-up configuration merged from an optional TOML file and CLI flags.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use neon_snake_core::{
    validate_layout, BoundaryMode, ConfigurationError, GridSize, TailRule,
    DEFAULT_BASE_TICK_RATE, DEFAULT_GRID_SIZE, DEFAULT_INITIAL_LENGTH,
};
use neon_snake_rendering::{GridPresentation, RenderingError, DEFAULT_LOGICAL_SIZE};
use neon_snake_session::SessionConfig;
use serde::Deserialize;
use thiserror::Error;

/// File the high score is persisted to when no path is configured.
pub(crate) const DEFAULT_STORAGE_PATH: &str = "neon_snake_store.json";

/// Errors that abort start-up before a window is opened.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid world configuration: {0}")]
    World(#[from] ConfigurationError),
    #[error("invalid logical size: {0}")]
    Layout(#[from] RenderingError),
}

/// Game settings as read from disk, every field optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) grid_size: Option<u32>,
    pub(crate) initial_snake_length: Option<u32>,
    pub(crate) base_tick_rate: Option<u32>,
    pub(crate) mode: Option<BoundaryMode>,
    pub(crate) tail_rule: Option<TailRule>,
    pub(crate) logical_size: Option<f32>,
    pub(crate) seed: Option<u64>,
    pub(crate) storage_path: Option<PathBuf>,
}

impl GameConfig {
    /// Reads and parses a TOML config file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns `self` with every value set in `overrides` replaced.
    #[must_use]
    pub(crate) fn merge(self, overrides: GameConfig) -> Self {
        Self {
            grid_size: overrides.grid_size.or(self.grid_size),
            initial_snake_length: overrides
                .initial_snake_length
                .or(self.initial_snake_length),
            base_tick_rate: overrides.base_tick_rate.or(self.base_tick_rate),
            mode: overrides.mode.or(self.mode),
            tail_rule: overrides.tail_rule.or(self.tail_rule),
            logical_size: overrides.logical_size.or(self.logical_size),
            seed: overrides.seed.or(self.seed),
            storage_path: overrides.storage_path.or(self.storage_path),
        }
    }

    /// Fills unset values with defaults and checks the result.
    pub(crate) fn validate(self) -> Result<ResolvedConfig, ConfigError> {
        let grid_size = self.grid_size.map_or(DEFAULT_GRID_SIZE, GridSize::new);
        let initial_length = self.initial_snake_length.unwrap_or(DEFAULT_INITIAL_LENGTH);
        validate_layout(grid_size, initial_length)?;

        let base_tick_rate = self.base_tick_rate.unwrap_or(DEFAULT_BASE_TICK_RATE);
        if base_tick_rate == 0 {
            return Err(ConfigurationError::ZeroTickRate.into());
        }

        let logical_size = self.logical_size.unwrap_or(DEFAULT_LOGICAL_SIZE);
        let _ = GridPresentation::new(
            grid_size.get(),
            logical_size,
            neon_snake_rendering::Color::new(0.0, 0.0, 0.0, 0.0),
        )?;

        Ok(ResolvedConfig {
            grid_size,
            initial_length,
            base_tick_rate,
            mode: self.mode.unwrap_or(BoundaryMode::Classic),
            tail_rule: self.tail_rule.unwrap_or(TailRule::Strict),
            logical_size,
            seed: self.seed,
            storage_path: self
                .storage_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH)),
        })
    }
}

/// Validated configuration with every default applied.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ResolvedConfig {
    pub(crate) grid_size: GridSize,
    pub(crate) initial_length: u32,
    pub(crate) base_tick_rate: u32,
    pub(crate) mode: BoundaryMode,
    pub(crate) tail_rule: TailRule,
    pub(crate) logical_size: f32,
    /// Food placement seed; a random one is drawn when unset.
    pub(crate) seed: Option<u64>,
    pub(crate) storage_path: PathBuf,
}

impl ResolvedConfig {
    pub(crate) fn session_config(&self, seed: u64) -> SessionConfig {
        SessionConfig {
            grid_size: self.grid_size,
            initial_length: self.initial_length,
            base_tick_rate: self.base_tick_rate,
            mode: self.mode,
            tail_rule: self.tail_rule,
            seed,
        }
    }
}
