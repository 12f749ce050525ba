//! Level loading for the command-line adapter.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ninja_defense_core::LevelData;

/// Level bundled into the binary.
const DEFAULT_LEVEL: &str = include_str!("../assets/default_level.toml");

/// Reads the level at `path`, or the bundled level when `path` is `None`.
///
/// Structural problems are fatal. Dangling catalog references are logged and
/// tolerated.
pub(crate) fn load(path: Option<&Path>) -> Result<LevelData> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read level file {}", path.display()))?;
            parse(&text).with_context(|| format!("invalid level file {}", path.display()))
        }
        None => parse(DEFAULT_LEVEL).context("bundled level is invalid"),
    }
}

/// Directory that sprite sheet paths in the level are resolved against.
pub(crate) fn asset_root(path: Option<&Path>) -> PathBuf {
    path.and_then(Path::parent)
        .map_or_else(|| PathBuf::from("assets"), Path::to_path_buf)
}

fn parse(text: &str) -> Result<LevelData> {
    let level: LevelData = toml::from_str(text).context("failed to parse level toml")?;
    level.validate()?;
    for warning in level.dangling_references() {
        tracing::warn!(level = %level.name, "{warning}");
    }
    tracing::debug!(
        level = %level.name,
        columns = level.map.columns(),
        rows = level.map.rows(),
        waves = level.waves.len(),
        "level loaded"
    );
    Ok(level)
}
