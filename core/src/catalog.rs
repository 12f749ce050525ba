//! Level catalogs: the grid map, enemy and tower types, and wave scripts.
//!
//! Catalog records are loaded once per session and never mutated by the
//! simulation. Identifiers are free-form strings chosen by level authors.

use std::{collections::BTreeSet, fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{economy::DEFAULT_KILL_REWARD, CellCoord, PlacementError};

/// Terrain classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Open ground that accepts towers.
    Empty,
    /// Impassable scenery.
    Wall,
    /// Ground traversed by enemies.
    Path,
}

/// Maps raw grid codes onto terrain kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLegend {
    /// Code that marks buildable ground.
    pub empty: u8,
    /// Code that marks walls.
    pub wall: u8,
    /// Code that marks enemy paths.
    pub path: u8,
}

impl Default for GridLegend {
    fn default() -> Self {
        Self {
            empty: 0,
            wall: 1,
            path: 2,
        }
    }
}

impl GridLegend {
    /// Classifies a raw grid code. Unknown codes count as empty ground.
    #[must_use]
    pub fn kind_of(&self, code: u8) -> CellKind {
        if code == self.wall {
            CellKind::Wall
        } else if code == self.path {
            CellKind::Path
        } else {
            CellKind::Empty
        }
    }
}

/// Fractional grid position used for waypoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Column coordinate.
    pub x: f32,
    /// Row coordinate.
    pub y: f32,
}

impl GridPoint {
    /// Creates a new grid point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rectangular terrain grid plus the waypoint route enemies follow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridMap {
    /// Legend that interprets the raw grid codes.
    #[serde(default)]
    pub legend: GridLegend,
    /// Row-major grid of raw codes.
    pub grid: Vec<Vec<u8>>,
    /// Ordered route from spawn to exit.
    pub waypoints: Vec<GridPoint>,
}

impl GridMap {
    /// Number of rows contained in the grid.
    #[must_use]
    pub fn rows(&self) -> u32 {
        u32::try_from(self.grid.len()).unwrap_or(u32::MAX)
    }

    /// Number of columns contained in the grid, taken from the first row.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.grid
            .first()
            .map_or(0, |row| u32::try_from(row.len()).unwrap_or(u32::MAX))
    }

    /// Terrain at the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn cell_kind(&self, cell: CellCoord) -> Option<CellKind> {
        let row = self.grid.get(usize::try_from(cell.row()).ok()?)?;
        let code = row.get(usize::try_from(cell.column()).ok()?)?;
        Some(self.legend.kind_of(*code))
    }

    /// Confirms that the terrain at `cell` accepts a tower.
    pub fn check_buildable(&self, cell: CellCoord) -> Result<(), PlacementError> {
        match self.cell_kind(cell) {
            None => Err(PlacementError::OutOfBounds),
            Some(CellKind::Empty) => Ok(()),
            Some(kind) => Err(PlacementError::Blocked { kind }),
        }
    }
}

/// Identifier of an enemy type within a level catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyTypeId(String);

impl EnemyTypeId {
    /// Creates a new enemy type identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed string form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnemyTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a tower type within a level catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TowerTypeId(String);

impl TowerTypeId {
    /// Creates a new tower type identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed string form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TowerTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sprite sheet laid out as rows of equally sized animation frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Path of the sheet image relative to the level's asset root.
    pub src: String,
    /// Side length of a single square frame in texels.
    pub frame_size: u32,
    /// Number of frame columns.
    pub cols: u32,
    /// Number of frame rows.
    pub rows: u32,
    /// Animation playback rate in frames per second.
    pub fps: f32,
}

impl SpriteSheet {
    /// Column of the frame shown after `anim_time` seconds of animation.
    #[must_use]
    pub fn frame_column(&self, anim_time: f32) -> u32 {
        if self.cols == 0 {
            return 0;
        }
        let frame = (anim_time.max(0.0) * self.fps.max(0.0)).floor();
        (frame as u64 % u64::from(self.cols)) as u32
    }
}

/// Catalog entry describing an enemy archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    /// Identifier referenced by wave scripts.
    pub id: EnemyTypeId,
    /// Hit points at spawn.
    pub hp: f32,
    /// Travel speed in pixels per second.
    pub speed: f32,
    /// Fallback fill colour as a `#rrggbb` string.
    #[serde(default = "default_enemy_color")]
    pub color: String,
    /// Body radius expressed as a share of the tile size.
    #[serde(default = "default_radius_scale")]
    pub radius_scale: f32,
    /// Money credited when the enemy is killed.
    #[serde(default = "default_reward")]
    pub reward: u32,
    /// Optional walk-cycle sprite sheet.
    #[serde(default)]
    pub sprite: Option<SpriteSheet>,
}

fn default_enemy_color() -> String {
    String::from("#c0392b")
}

fn default_radius_scale() -> f32 {
    0.3
}

fn default_reward() -> u32 {
    DEFAULT_KILL_REWARD
}

/// Ammunition style a tower launches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Spinning throwing star.
    Shuriken,
    /// Fast pellet.
    Bullet,
    /// Poisoned dart.
    Blowdart,
    /// Lobbed smoke bomb.
    Smokebomb,
}

impl ProjectileKind {
    /// Drawn size of the projectile in pixels.
    #[must_use]
    pub const fn draw_size(self) -> f32 {
        match self {
            Self::Shuriken => 16.0,
            Self::Bullet => 12.0,
            Self::Blowdart => 14.0,
            Self::Smokebomb => 18.0,
        }
    }
}

/// Catalog entry describing a purchasable tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerType {
    /// Identifier used by placement commands.
    pub id: TowerTypeId,
    /// Human readable name shown in the panel.
    pub name: String,
    /// Purchase price.
    pub cost: u32,
    /// Attack range in tiles.
    pub range: f32,
    /// Damage dealt per shot.
    pub damage: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Fallback fill colour as a `#rrggbb` string.
    #[serde(default = "default_tower_color")]
    pub color: String,
    /// Optional attack animation sprite sheet.
    #[serde(default)]
    pub sprite: Option<SpriteSheet>,
    /// Projectile launched per shot; instant hits when absent.
    #[serde(default)]
    pub projectile: Option<ProjectileKind>,
}

fn default_tower_color() -> String {
    String::from("#2c3e50")
}

impl TowerType {
    /// Nominal damage per second ignoring travel time.
    #[must_use]
    pub fn damage_per_second(&self) -> f32 {
        self.damage * self.fire_rate
    }
}

/// One homogeneous batch of enemies inside a wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveGroup {
    /// Enemy type spawned by the group.
    pub enemy_id: EnemyTypeId,
    /// Number of enemies in the group.
    pub count: u32,
}

/// Spawn script for a single wave.
///
/// Levels may either describe a single enemy type or an ordered list of
/// groups; both forms share one spawn interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaveDefinition {
    /// Ordered groups spawned one after another.
    Groups {
        /// Groups in spawn order.
        groups: Vec<WaveGroup>,
        /// Seconds between consecutive spawns.
        interval_sec: f32,
    },
    /// A single batch of one enemy type.
    Single {
        /// Enemy type spawned by the wave.
        enemy_id: EnemyTypeId,
        /// Number of enemies spawned.
        count: u32,
        /// Seconds between consecutive spawns.
        interval_sec: f32,
    },
}

impl WaveDefinition {
    /// Seconds between consecutive spawns.
    #[must_use]
    pub fn interval_sec(&self) -> f32 {
        match self {
            Self::Groups { interval_sec, .. } | Self::Single { interval_sec, .. } => *interval_sec,
        }
    }

    /// Number of groups in the wave.
    #[must_use]
    pub fn group_count(&self) -> usize {
        match self {
            Self::Groups { groups, .. } => groups.len(),
            Self::Single { .. } => 1,
        }
    }

    /// Enemy type and size of the group at `index`.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<(&EnemyTypeId, u32)> {
        match self {
            Self::Groups { groups, .. } => groups
                .get(index)
                .map(|group| (&group.enemy_id, group.count)),
            Self::Single {
                enemy_id, count, ..
            } => (index == 0).then_some((enemy_id, *count)),
        }
    }

    /// Total number of enemies the wave spawns.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        (0..self.group_count())
            .filter_map(|index| self.group(index))
            .fold(0_u32, |total, (_, count)| total.saturating_add(count))
    }

    fn enemy_ids(&self) -> impl Iterator<Item = &EnemyTypeId> + '_ {
        (0..self.group_count()).filter_map(|index| self.group(index).map(|(id, _)| id))
    }
}

/// Economy and pacing rules applied to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Money available when the session starts.
    pub starting_money: u32,
    /// Lives available when the session starts.
    pub starting_lives: u32,
    /// Money credited whenever a wave is cleared and another remains.
    pub wave_clear_bonus: u32,
    /// Upper bound applied to a single frame delta, in milliseconds.
    pub max_frame_dt_ms: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_money: 420,
            starting_lives: 20,
            wave_clear_bonus: 20,
            max_frame_dt_ms: 50,
        }
    }
}

impl RulesConfig {
    /// Upper bound applied to a single frame delta.
    #[must_use]
    pub const fn max_frame_dt(&self) -> Duration {
        Duration::from_millis(self.max_frame_dt_ms)
    }
}

/// Complete description of a playable level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Display name of the level.
    #[serde(default = "default_level_name")]
    pub name: String,
    /// Terrain and enemy route.
    pub map: GridMap,
    /// Enemy catalog.
    pub enemies: Vec<EnemyType>,
    /// Tower catalog in shop order.
    pub towers: Vec<TowerType>,
    /// Wave scripts in play order.
    pub waves: Vec<WaveDefinition>,
    /// Economy and pacing rules.
    #[serde(default)]
    pub rules: RulesConfig,
}

fn default_level_name() -> String {
    String::from("Untitled")
}

impl LevelData {
    /// Looks up an enemy type by identifier.
    #[must_use]
    pub fn enemy_type(&self, id: &EnemyTypeId) -> Option<&EnemyType> {
        self.enemies.iter().find(|enemy| &enemy.id == id)
    }

    /// Looks up a tower type by identifier.
    #[must_use]
    pub fn tower_type(&self, id: &TowerTypeId) -> Option<&TowerType> {
        self.towers.iter().find(|tower| &tower.id == id)
    }

    /// Rejects levels whose structure cannot be simulated at all.
    pub fn validate(&self) -> Result<(), LevelError> {
        let columns = self.map.grid.first().map_or(0, Vec::len);
        if columns == 0 {
            return Err(LevelError::EmptyGrid);
        }
        for (row, cells) in self.map.grid.iter().enumerate() {
            if cells.len() != columns {
                return Err(LevelError::RaggedGrid {
                    row,
                    expected: columns,
                    found: cells.len(),
                });
            }
        }

        let mut enemy_ids = BTreeSet::new();
        for enemy in &self.enemies {
            if !enemy_ids.insert(&enemy.id) {
                return Err(LevelError::DuplicateEnemyType(enemy.id.clone()));
            }
        }
        let mut tower_ids = BTreeSet::new();
        for tower in &self.towers {
            if !tower_ids.insert(&tower.id) {
                return Err(LevelError::DuplicateTowerType(tower.id.clone()));
            }
        }

        for (wave, definition) in self.waves.iter().enumerate() {
            if !(definition.interval_sec() >= 0.0) {
                return Err(LevelError::InvalidWaveInterval { wave });
            }
        }

        Ok(())
    }

    /// Lists references the simulation tolerates but that indicate authoring
    /// mistakes.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<LevelWarning> {
        let mut warnings = Vec::new();
        if self.map.waypoints.len() < 2 {
            warnings.push(LevelWarning::ShortRoute {
                waypoints: self.map.waypoints.len(),
            });
        }
        for (wave, definition) in self.waves.iter().enumerate() {
            for enemy in definition.enemy_ids() {
                if self.enemy_type(enemy).is_none() {
                    warnings.push(LevelWarning::UnknownEnemy {
                        wave,
                        enemy: enemy.clone(),
                    });
                }
            }
        }
        warnings
    }
}

/// Structural problems that make a level unusable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The grid has no cells.
    #[error("level grid is empty")]
    EmptyGrid,
    /// A grid row differs in width from the first row.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// Two enemy types share an identifier.
    #[error("enemy type `{0}` is defined more than once")]
    DuplicateEnemyType(EnemyTypeId),
    /// Two tower types share an identifier.
    #[error("tower type `{0}` is defined more than once")]
    DuplicateTowerType(TowerTypeId),
    /// A wave declares a negative or non-numeric spawn interval.
    #[error("wave {wave} has an invalid spawn interval")]
    InvalidWaveInterval {
        /// Zero-based index of the offending wave.
        wave: usize,
    },
}

/// Authoring mistakes the simulation tolerates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelWarning {
    /// The route is too short for enemies to travel; spawns are skipped.
    ShortRoute {
        /// Number of waypoints declared.
        waypoints: usize,
    },
    /// A wave references an enemy type missing from the catalog.
    UnknownEnemy {
        /// Zero-based index of the wave.
        wave: usize,
        /// Identifier that failed to resolve.
        enemy: EnemyTypeId,
    },
}

impl fmt::Display for LevelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortRoute { waypoints } => {
                write!(f, "route has {waypoints} waypoint(s); enemies will not spawn")
            }
            Self::UnknownEnemy { wave, enemy } => {
                write!(f, "wave {wave} references unknown enemy type `{enemy}`")
            }
        }
    }
}
