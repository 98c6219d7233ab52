use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use anyhow::{Context, anyhow};
use binsort_core::GameConfig;
use tracing::{info, warn};

/// Runner settings, read from the environment.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// JSON game config; built-in defaults when unset.
    pub game_config: Option<PathBuf>,
    /// JSON-lines landmark replay; synthetic hand when unset.
    pub replay: Option<PathBuf>,
    pub fps: u32,
    pub landmark_hz: u32,
}

impl RunnerConfig {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            game_config: optional_path("BINSORT_CONFIG"),
            replay: optional_path("BINSORT_REPLAY"),
            fps: try_load("BINSORT_FPS", "60")?,
            landmark_hz: try_load("BINSORT_LANDMARK_HZ", "30")?,
        })
    }

    pub fn load_game_config(&self) -> anyhow::Result<GameConfig> {
        let Some(path) = &self.game_config else {
            return Ok(GameConfig::default());
        };
        let json = read_to_string(path)
            .with_context(|| format!("failed to read game config {}", path.display()))?;
        let config = GameConfig::from_json_str(&json)
            .with_context(|| format!("invalid game config {}", path.display()))?;
        info!(path = %path.display(), "loaded game config");
        Ok(config)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn optional_path(key: &str) -> Option<PathBuf> {
    let value = var(key);
    if value.is_none() {
        info!("{key} not set");
    }
    value.map(PathBuf::from)
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("invalid {key} value {raw:?}: {e}")
    })
}
