#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ninja Defense engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the pure simulation systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what happened. Level catalogs, board layout math, the upgrade
//! economy, and the live entity records are shared from here so that every
//! system agrees on a single vocabulary.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod economy;
pub mod entities;
pub mod geometry;
pub mod layout;

pub use catalog::{
    CellKind, EnemyType, EnemyTypeId, GridLegend, GridMap, GridPoint, LevelData, LevelError,
    LevelWarning, ProjectileKind, RulesConfig, SpriteSheet, TowerType, TowerTypeId,
    WaveDefinition, WaveGroup,
};
pub use economy::{sell_value, upgrade_cost, StatMultipliers, UpgradePath, MAX_UPGRADE_LEVEL};
pub use entities::{
    DamageEvent, EnemyInstance, EnemyTarget, ProjectileInstance, TowerInstance, TowerStats,
};
pub use geometry::{Direction, Facing, Vec2};
pub use layout::BoardLayout;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Fits the board into a drawing surface of the provided pixel size.
    ConfigureBoard {
        /// Width of the available surface in pixels.
        width: f32,
        /// Height of the available surface in pixels.
        height: f32,
    },
    /// Advances the simulation clock by the provided real frame delta.
    Tick {
        /// Wall-clock time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Switches the simulation to an explicit speed mode.
    SetSpeedMode {
        /// Speed mode the world should adopt.
        mode: SpeedMode,
    },
    /// Steps the speed mode through paused, normal, and fast in turn.
    CycleSpeedMode,
    /// Chooses the tower type used by subsequent placements.
    SelectTowerType {
        /// Catalog identifier of the tower type to arm.
        kind: TowerTypeId,
    },
    /// Requests construction of the armed tower type on a grid cell.
    PlaceTower {
        /// Cell that should host the new tower.
        cell: CellCoord,
    },
    /// Focuses or clears the tower shown in the upgrade panel.
    SelectTower {
        /// Tower to focus, or `None` to clear the selection.
        tower: Option<TowerId>,
    },
    /// Requests an upgrade of a placed tower along a path.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
        /// Upgrade path to advance.
        path: UpgradePath,
    },
    /// Requests the sale of a placed tower.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Resets the session to its initial state using the loaded level.
    Restart,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Scaled simulation time consumed by the tick.
        dt: Duration,
    },
    /// Confirms that the board was fitted to a new drawing surface.
    BoardConfigured {
        /// Side length of a single tile in pixels after fitting.
        tile_size: f32,
    },
    /// Announces that the speed mode changed.
    SpeedModeChanged {
        /// Speed mode that became active.
        mode: SpeedMode,
    },
    /// Announces that the externally visible game state changed.
    GameStateChanged {
        /// Game state after the transition.
        state: GameState,
    },
    /// Confirms that an enemy entered the board at the first waypoint.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Catalog type of the enemy.
        kind: EnemyTypeId,
    },
    /// Reports that an enemy was killed by tower fire.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Catalog type of the enemy.
        kind: EnemyTypeId,
        /// Money credited for the kill.
        reward: u32,
    },
    /// Reports that an enemy reached the final waypoint.
    EnemyEscaped {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the escape was charged.
        lives_remaining: u32,
    },
    /// Confirms that a tower type was armed for placement.
    TowerTypeSelected {
        /// Catalog identifier of the armed tower type.
        kind: TowerTypeId,
    },
    /// Confirms that the focused tower changed.
    TowerSelected {
        /// Tower now in focus, if any.
        tower: Option<TowerId>,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Catalog type of the placed tower.
        kind: TowerTypeId,
        /// Cell that hosts the tower.
        cell: CellCoord,
        /// Money debited for the purchase.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a tower fired an instant shot at an enemy.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy that received the shot.
        enemy: EnemyId,
    },
    /// Reports that a tower launched a travelling projectile.
    ProjectileLaunched {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that launched the projectile.
        tower: TowerId,
        /// Enemy the projectile homes on.
        enemy: EnemyId,
    },
    /// Confirms that a tower advanced one upgrade level.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Path the tower is locked to.
        path: UpgradePath,
        /// Level reached after the upgrade.
        level: u8,
        /// Money debited for the upgrade.
        cost: u32,
    },
    /// Reports that a tower upgrade request was rejected.
    TowerUpgradeRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold and removed.
    TowerSold {
        /// Tower that was removed.
        tower: TowerId,
        /// Money credited for the sale.
        refund: u32,
    },
    /// Reports that a tower sale request was rejected.
    TowerSaleRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Reports that a wave finished and the next one became active.
    WaveCleared {
        /// Zero-based index of the wave that finished.
        wave_index: usize,
        /// Money credited for clearing the wave.
        bonus: u32,
    },
    /// Confirms that the session was reset.
    GameRestarted,
}

/// Player-selected simulation speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedMode {
    /// Simulation is frozen; building and upgrading remain available.
    #[default]
    Paused,
    /// Simulation advances at real time.
    Normal,
    /// Simulation advances at twice real time.
    Fast,
}

impl SpeedMode {
    /// Factor applied to frame time while this mode is active.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::Paused => 0,
            Self::Normal => 1,
            Self::Fast => 2,
        }
    }

    /// Mode that follows this one in the speed toggle cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Paused => Self::Normal,
            Self::Normal => Self::Fast,
            Self::Fast => Self::Paused,
        }
    }
}

/// Terminal result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Lives ran out.
    Defeat,
    /// Every wave was cleared with lives remaining.
    Victory,
}

/// Externally visible state of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Simulation frozen by the player.
    Paused,
    /// Simulation running at real time.
    Running,
    /// Simulation running at double speed.
    FastForward,
    /// Session ended after lives ran out.
    Defeat,
    /// Session ended after every wave was cleared.
    Victory,
}

impl GameState {
    /// Derives the visible state from the speed mode and terminal outcome.
    #[must_use]
    pub const fn from_parts(speed: SpeedMode, outcome: Option<Outcome>) -> Self {
        match (outcome, speed) {
            (Some(Outcome::Defeat), _) => Self::Defeat,
            (Some(Outcome::Victory), _) => Self::Victory,
            (None, SpeedMode::Paused) => Self::Paused,
            (None, SpeedMode::Normal) => Self::Running,
            (None, SpeedMode::Fast) => Self::FastForward,
        }
    }

    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Defeat | Self::Victory)
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// The session has ended.
    #[error("the game is over")]
    GameOver,
    /// No tower type has been armed for placement.
    #[error("no tower type is selected")]
    NoTowerTypeSelected,
    /// The armed tower type is missing from the level catalog.
    #[error("the selected tower type is not in the catalog")]
    UnknownTowerType,
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell is not buildable terrain.
    #[error("cell is {kind:?} terrain")]
    Blocked {
        /// Terrain found at the requested cell.
        kind: CellKind,
    },
    /// Another tower already stands on the requested cell.
    #[error("cell is occupied by tower {}", .tower.get())]
    Occupied {
        /// Tower already standing on the cell.
        tower: TowerId,
    },
    /// The player cannot afford the armed tower type.
    #[error("placement costs {required} but only {available} is available")]
    InsufficientFunds {
        /// Cost of the armed tower type.
        required: u32,
        /// Money available when the request was made.
        available: u32,
    },
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum UpgradeError {
    /// The session has ended.
    #[error("the game is over")]
    GameOver,
    /// No tower with the provided identifier exists.
    #[error("tower does not exist")]
    MissingTower,
    /// The tower already reached the highest upgrade level.
    #[error("tower is already at level {level}")]
    MaxLevel {
        /// Level the tower currently holds.
        level: u8,
    },
    /// The tower is committed to a different path.
    #[error("tower is locked to the {locked:?} path")]
    PathLocked {
        /// Path the tower was first upgraded along.
        locked: UpgradePath,
    },
    /// The player cannot afford the next upgrade level.
    #[error("upgrade costs {required} but only {available} is available")]
    InsufficientFunds {
        /// Cost of the next upgrade level.
        required: u32,
        /// Money available when the request was made.
        available: u32,
    },
}

/// Reasons a tower sale request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum SaleError {
    /// The session has ended.
    #[error("the game is over")]
    GameOver,
    /// No tower with the provided identifier exists.
    #[error("tower does not exist")]
    MissingTower,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_cycle_visits_every_mode() {
        let mut mode = SpeedMode::Paused;
        let mut visited = Vec::new();
        for _ in 0..3 {
            mode = mode.next();
            visited.push(mode);
        }
        assert_eq!(
            visited,
            vec![SpeedMode::Normal, SpeedMode::Fast, SpeedMode::Paused]
        );
    }

    #[test]
    fn outcome_overrides_speed_mode() {
        assert_eq!(
            GameState::from_parts(SpeedMode::Fast, Some(Outcome::Defeat)),
            GameState::Defeat
        );
        assert_eq!(
            GameState::from_parts(SpeedMode::Paused, Some(Outcome::Victory)),
            GameState::Victory
        );
        assert_eq!(
            GameState::from_parts(SpeedMode::Normal, None),
            GameState::Running
        );
        assert!(!GameState::FastForward.is_terminal());
    }

    #[test]
    fn placement_errors_describe_themselves() {
        let error = PlacementError::InsufficientFunds {
            required: 150,
            available: 40,
        };
        assert_eq!(
            error.to_string(),
            "placement costs 150 but only 40 is available"
        );
        assert_eq!(
            PlacementError::Occupied {
                tower: TowerId::new(3)
            }
            .to_string(),
            "cell is occupied by tower 3"
        );
    }
}
