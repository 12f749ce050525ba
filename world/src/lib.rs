#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Ninja Defense.
//!
//! The world owns the level, the economy, and every live entity. Adapters
//! mutate it exclusively through [`apply`], which reports what happened as
//! [`Event`] values, and observe it through the read-only [`query`] module.
//! A [`Command::Tick`] runs the simulation systems in a fixed order so that
//! two runs fed the same commands produce the same state.

mod tick;
mod towers;

use ninja_defense_core::{
    BoardLayout, CellCoord, Command, EnemyInstance, Event, GameState, LevelData, Outcome,
    ProjectileInstance, SaleError, SpeedMode, TowerId, TowerTypeId, UpgradeError, UpgradePath,
    Vec2,
};
use ninja_defense_system_enemies as enemies;
use ninja_defense_system_spawning::WaveDirector;
use ninja_defense_system_tower_combat::TowerCombat;
use ninja_defense_system_tower_targeting::TowerTargeting;

use towers::TowerRegistry;

/// Tile size used until an adapter fits the board to a drawing surface.
const DEFAULT_TILE_SIZE: f32 = 40.0;

/// Represents the authoritative Ninja Defense world state.
#[derive(Debug)]
pub struct World {
    level: LevelData,
    layout: BoardLayout,
    waypoints: Vec<Vec2>,
    money: u32,
    lives: u32,
    speed: SpeedMode,
    outcome: Option<Outcome>,
    director: WaveDirector,
    enemies: Vec<EnemyInstance>,
    towers: TowerRegistry,
    projectiles: Vec<ProjectileInstance>,
    next_enemy_id: u32,
    next_projectile_id: u32,
    selected_tower_type: Option<TowerTypeId>,
    selected_tower: Option<TowerId>,
    targeting: TowerTargeting,
    combat: TowerCombat,
    tick_index: u64,
}

impl World {
    /// Creates a paused world at the start of the first wave of `level`.
    #[must_use]
    pub fn new(level: LevelData) -> Self {
        let layout =
            BoardLayout::with_tile_size(DEFAULT_TILE_SIZE, level.map.columns(), level.map.rows());
        let mut world = Self {
            waypoints: Vec::new(),
            money: level.rules.starting_money,
            lives: level.rules.starting_lives,
            speed: SpeedMode::Paused,
            outcome: None,
            director: WaveDirector::new(),
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            next_enemy_id: 0,
            next_projectile_id: 0,
            selected_tower_type: level.towers.first().map(|tower| tower.id.clone()),
            selected_tower: None,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            tick_index: 0,
            layout,
            level,
        };
        world.rebuild_waypoints();
        world
    }

    fn reset(&mut self) {
        let rules = self.level.rules;
        self.money = rules.starting_money;
        self.lives = rules.starting_lives;
        self.speed = SpeedMode::Paused;
        self.outcome = None;
        self.director = WaveDirector::new();
        self.enemies.clear();
        self.towers = TowerRegistry::new();
        self.projectiles.clear();
        self.next_enemy_id = 0;
        self.next_projectile_id = 0;
        self.selected_tower_type = self.level.towers.first().map(|tower| tower.id.clone());
        self.selected_tower = None;
        self.tick_index = 0;
    }

    fn game_state(&self) -> GameState {
        GameState::from_parts(self.speed, self.outcome)
    }

    fn rebuild_waypoints(&mut self) {
        let layout = self.layout;
        self.waypoints = self
            .level
            .map
            .waypoints
            .iter()
            .map(|point| layout.grid_point_to_pixel(*point))
            .collect();
    }

    fn configure_board(&mut self, width: f32, height: f32, out_events: &mut Vec<Event>) {
        let next = BoardLayout::fit(
            width,
            height,
            self.level.map.columns(),
            self.level.map.rows(),
        );
        if !next.has_area() {
            tracing::debug!("ignoring board fit to an empty {width}x{height} surface");
            return;
        }
        if next == self.layout {
            return;
        }

        let previous = std::mem::replace(&mut self.layout, next);
        let remap = |pixel: Vec2| {
            previous
                .pixel_to_grid(pixel)
                .map_or(pixel, |grid| next.grid_to_pixel(grid))
        };

        for enemy in &mut self.enemies {
            enemy.position = remap(enemy.position);
            if let Some(enemy_type) = self.level.enemy_type(&enemy.kind) {
                enemy.radius = enemies::enemy_radius(enemy_type, next.tile_size());
            }
        }
        for projectile in &mut self.projectiles {
            projectile.position = remap(projectile.position);
            projectile.target_position = remap(projectile.target_position);
        }
        self.towers.relayout(&next);
        self.rebuild_waypoints();

        out_events.push(Event::BoardConfigured {
            tile_size: next.tile_size(),
        });
    }

    fn set_speed_mode(&mut self, mode: SpeedMode, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            tracing::debug!(?mode, "speed change ignored after the game ended");
            return;
        }
        if mode == self.speed {
            return;
        }

        self.speed = mode;
        out_events.push(Event::SpeedModeChanged { mode });
        out_events.push(Event::GameStateChanged {
            state: self.game_state(),
        });
    }

    fn place_tower(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let tower_type = match query::placement_check(self, cell) {
            Ok(tower_type) => tower_type.clone(),
            Err(reason) => {
                tracing::debug!(?cell, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { cell, reason });
                return;
            }
        };

        self.money -= tower_type.cost;
        let tower = self.towers.place(&tower_type, cell, &self.layout);
        tracing::info!(
            tower = tower.get(),
            kind = %tower_type.id,
            ?cell,
            "tower placed"
        );
        out_events.push(Event::TowerPlaced {
            tower,
            kind: tower_type.id,
            cell,
            cost: tower_type.cost,
        });
    }

    fn upgrade_tower(&mut self, tower: TowerId, path: UpgradePath, out_events: &mut Vec<Event>) {
        let result = query::upgrade_quote(self, tower, path).and_then(|cost| {
            if cost > self.money {
                Err(UpgradeError::InsufficientFunds {
                    required: cost,
                    available: self.money,
                })
            } else {
                Ok(cost)
            }
        });

        let cost = match result {
            Ok(cost) => cost,
            Err(reason) => {
                tracing::debug!(tower = tower.get(), %reason, "tower upgrade rejected");
                out_events.push(Event::TowerUpgradeRejected { tower, reason });
                return;
            }
        };

        let tile_size = self.layout.tile_size();
        let Some(instance) = self.towers.get_mut(tower) else {
            return;
        };
        instance.apply_upgrade(path, cost, tile_size);
        let level = instance.level;
        self.money -= cost;
        out_events.push(Event::TowerUpgraded {
            tower,
            path,
            level,
            cost,
        });
    }

    fn sell_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            out_events.push(Event::TowerSaleRejected {
                tower,
                reason: SaleError::GameOver,
            });
            return;
        }
        let Some(instance) = self.towers.remove(tower) else {
            out_events.push(Event::TowerSaleRejected {
                tower,
                reason: SaleError::MissingTower,
            });
            return;
        };

        let refund = instance.sell_value();
        self.money = self.money.saturating_add(refund);
        out_events.push(Event::TowerSold { tower, refund });
        if self.selected_tower == Some(tower) {
            self.selected_tower = None;
            out_events.push(Event::TowerSelected { tower: None });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard { width, height } => {
            world.configure_board(width, height, out_events);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetSpeedMode { mode } => world.set_speed_mode(mode, out_events),
        Command::CycleSpeedMode => {
            let mode = world.speed.next();
            world.set_speed_mode(mode, out_events);
        }
        Command::SelectTowerType { kind } => {
            if world.level.tower_type(&kind).is_none() {
                tracing::debug!(%kind, "ignoring selection of unknown tower type");
                return;
            }
            world.selected_tower_type = Some(kind.clone());
            out_events.push(Event::TowerTypeSelected { kind });
        }
        Command::PlaceTower { cell } => world.place_tower(cell, out_events),
        Command::SelectTower { tower } => {
            let tower = tower.filter(|id| world.towers.get(*id).is_some());
            if tower != world.selected_tower {
                world.selected_tower = tower;
                out_events.push(Event::TowerSelected { tower });
            }
        }
        Command::UpgradeTower { tower, path } => world.upgrade_tower(tower, path, out_events),
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::Restart => {
            world.reset();
            tracing::info!(level = %world.level.name, "session restarted");
            out_events.push(Event::GameRestarted);
            out_events.push(Event::GameStateChanged {
                state: world.game_state(),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use ninja_defense_core::{
        economy::DEFAULT_KILL_REWARD, BoardLayout, CellCoord, EnemyInstance, EnemyType,
        EnemyTypeId, GameState, GridMap, LevelData, PlacementError, ProjectileInstance, SpeedMode,
        TowerId, TowerInstance, TowerType, UpgradeError, UpgradePath, Vec2,
    };

    /// Level the world was created from.
    #[must_use]
    pub fn level(world: &World) -> &LevelData {
        &world.level
    }

    /// Terrain grid and route of the level.
    #[must_use]
    pub fn map(world: &World) -> &GridMap {
        &world.level.map
    }

    /// Current mapping between grid cells and surface pixels.
    #[must_use]
    pub fn layout(world: &World) -> &BoardLayout {
        &world.layout
    }

    /// Route waypoints converted to pixel positions.
    #[must_use]
    pub fn waypoints(world: &World) -> &[Vec2] {
        &world.waypoints
    }

    /// Money available for purchases.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.money
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Zero-based index of the active wave.
    #[must_use]
    pub fn wave_index(world: &World) -> usize {
        world.director.wave_index()
    }

    /// One-based wave number for display, capped at the wave count.
    #[must_use]
    pub fn wave_number(world: &World) -> usize {
        (world.director.wave_index() + 1).min(wave_count(world))
    }

    /// Number of waves in the level.
    #[must_use]
    pub fn wave_count(world: &World) -> usize {
        world.level.waves.len()
    }

    /// Externally visible game state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.game_state()
    }

    /// Speed mode chosen by the player.
    #[must_use]
    pub fn speed_mode(world: &World) -> SpeedMode {
        world.speed
    }

    /// Number of ticks that advanced the simulation.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Enemies on the board in spawn order.
    #[must_use]
    pub fn enemies(world: &World) -> &[EnemyInstance] {
        &world.enemies
    }

    /// Towers on the board in identifier order.
    #[must_use]
    pub fn towers(world: &World) -> &[TowerInstance] {
        world.towers.as_slice()
    }

    /// Projectiles in flight in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> &[ProjectileInstance] {
        &world.projectiles
    }

    /// Looks up a placed tower.
    #[must_use]
    pub fn tower(world: &World, tower: TowerId) -> Option<&TowerInstance> {
        world.towers.get(tower)
    }

    /// Identifier of the tower standing on `cell`, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.tower_at(cell).map(|tower| tower.id)
    }

    /// Tower currently focused in the upgrade panel.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<&TowerInstance> {
        world.selected_tower.and_then(|tower| world.towers.get(tower))
    }

    /// Tower type armed for placement.
    #[must_use]
    pub fn selected_tower_type(world: &World) -> Option<&TowerType> {
        world
            .selected_tower_type
            .as_ref()
            .and_then(|kind| world.level.tower_type(kind))
    }

    /// Looks up an enemy type in the level catalog.
    #[must_use]
    pub fn enemy_type<'a>(world: &'a World, kind: &EnemyTypeId) -> Option<&'a EnemyType> {
        world.level.enemy_type(kind)
    }

    /// Money credited for killing an enemy of `kind`.
    #[must_use]
    pub fn kill_reward(world: &World, kind: &EnemyTypeId) -> u32 {
        enemy_type(world, kind).map_or(DEFAULT_KILL_REWARD, |enemy| enemy.reward)
    }

    /// Validates placing the armed tower type on `cell`.
    ///
    /// Returns the tower type that would be built. Checks run in a fixed
    /// order so the first failing condition is reported.
    pub fn placement_check(world: &World, cell: CellCoord) -> Result<&TowerType, PlacementError> {
        if world.outcome.is_some() {
            return Err(PlacementError::GameOver);
        }
        let kind = world
            .selected_tower_type
            .as_ref()
            .ok_or(PlacementError::NoTowerTypeSelected)?;
        let tower_type = world
            .level
            .tower_type(kind)
            .ok_or(PlacementError::UnknownTowerType)?;
        world.level.map.check_buildable(cell)?;
        if let Some(tower) = world.towers.tower_at(cell) {
            return Err(PlacementError::Occupied { tower: tower.id });
        }
        if tower_type.cost > world.money {
            return Err(PlacementError::InsufficientFunds {
                required: tower_type.cost,
                available: world.money,
            });
        }
        Ok(tower_type)
    }

    /// Price of the next upgrade of `tower` along `path`, ignoring funds.
    pub fn upgrade_quote(
        world: &World,
        tower: TowerId,
        path: UpgradePath,
    ) -> Result<u32, UpgradeError> {
        if world.outcome.is_some() {
            return Err(UpgradeError::GameOver);
        }
        world
            .towers
            .get(tower)
            .ok_or(UpgradeError::MissingTower)?
            .upgrade_quote(path)
    }

    /// Refund paid if `tower` were sold now.
    #[must_use]
    pub fn sell_value(world: &World, tower: TowerId) -> Option<u32> {
        world.towers.get(tower).map(TowerInstance::sell_value)
    }
}
