//! Live simulation records for enemies, towers, and projectiles.

use glam::Vec2;

use crate::{
    catalog::{EnemyTypeId, ProjectileKind, TowerType, TowerTypeId},
    economy::{self, StatMultipliers, UpgradePath, MAX_UPGRADE_LEVEL},
    geometry::{clamp01, Direction, Facing},
    CellCoord, EnemyId, ProjectileId, TowerId, UpgradeError,
};

/// Enemy walking the waypoint route.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyInstance {
    /// Identifier assigned at spawn.
    pub id: EnemyId,
    /// Catalog type the enemy was spawned from.
    pub kind: EnemyTypeId,
    /// Current position in pixels.
    pub position: Vec2,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// Travel speed in pixels per second.
    pub speed: f32,
    /// Index of the waypoint the enemy is walking toward.
    pub waypoint_index: usize,
    /// Body radius in pixels.
    pub radius: f32,
    /// Last direction of travel.
    pub direction: Direction,
    /// Seconds of walk animation played so far.
    pub anim_time: f32,
}

impl EnemyInstance {
    /// Remaining health as a share of maximum health.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        clamp01(self.hp / self.max_hp)
    }

    /// Reports whether the enemy still has hit points.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Position snapshot consumed by targeting and projectile systems.
    #[must_use]
    pub fn target(&self) -> EnemyTarget {
        EnemyTarget {
            id: self.id,
            position: self.position,
        }
    }
}

/// Read-only view of an enemy used when choosing or chasing targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyTarget {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Position of the enemy in pixels.
    pub position: Vec2,
}

/// Damage to be applied to an enemy at the end of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageEvent {
    /// Enemy that receives the damage.
    pub enemy: EnemyId,
    /// Hit points removed.
    pub amount: f32,
}

/// Unscaled tower statistics copied from the catalog at placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Range in tiles.
    pub range_tiles: f32,
    /// Damage per shot.
    pub damage: f32,
    /// Shots per second.
    pub fire_rate: f32,
}

/// Tower standing on a grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerInstance {
    /// Identifier assigned at placement.
    pub id: TowerId,
    /// Catalog type the tower was built from.
    pub kind: TowerTypeId,
    /// Cell hosting the tower.
    pub cell: CellCoord,
    /// Pixel centre of the hosting cell.
    pub position: Vec2,
    /// Effective range in pixels.
    pub range_px: f32,
    /// Effective damage per shot.
    pub damage: f32,
    /// Effective shots per second.
    pub fire_rate: f32,
    /// Seconds until the tower may fire again.
    pub cooldown: f32,
    /// Facing toward the last target.
    pub facing: Facing,
    /// Seconds of attack animation played so far.
    pub anim_time: f32,
    /// Upgrade level reached, from zero to [`MAX_UPGRADE_LEVEL`].
    pub level: u8,
    /// Path the tower committed to with its first upgrade.
    pub upgrade_path: Option<UpgradePath>,
    /// Purchase price of the tower type.
    pub base_cost: u32,
    /// Money spent on the purchase and every upgrade.
    pub total_invested: u32,
    /// Catalog statistics before upgrades.
    pub base: TowerStats,
    /// Projectile launched per shot; instant hits when absent.
    pub projectile: Option<ProjectileKind>,
}

impl TowerInstance {
    /// Builds a freshly purchased tower ready to fire.
    #[must_use]
    pub fn from_type(
        id: TowerId,
        tower_type: &TowerType,
        cell: CellCoord,
        position: Vec2,
        tile_size: f32,
    ) -> Self {
        let mut tower = Self {
            id,
            kind: tower_type.id.clone(),
            cell,
            position,
            range_px: 0.0,
            damage: 0.0,
            fire_rate: 0.0,
            cooldown: 0.0,
            facing: Facing::default(),
            anim_time: 0.0,
            level: 0,
            upgrade_path: None,
            base_cost: tower_type.cost,
            total_invested: tower_type.cost,
            base: TowerStats {
                range_tiles: tower_type.range,
                damage: tower_type.damage,
                fire_rate: tower_type.fire_rate,
            },
            projectile: tower_type.projectile,
        };
        tower.recompute_stats(tile_size);
        tower
    }

    /// Multipliers granted by the current upgrade state.
    #[must_use]
    pub fn multipliers(&self) -> StatMultipliers {
        self.upgrade_path
            .map_or_else(StatMultipliers::default, |path| {
                path.multipliers(self.level)
            })
    }

    /// Recomputes effective statistics from base values and upgrades.
    pub fn recompute_stats(&mut self, tile_size: f32) {
        let multipliers = self.multipliers();
        self.range_px = self.base.range_tiles * multipliers.range * tile_size;
        self.damage = self.base.damage * multipliers.damage;
        self.fire_rate = self.base.fire_rate * multipliers.fire_rate;
    }

    /// Seconds between shots at the current fire rate.
    #[must_use]
    pub fn reload_seconds(&self) -> f32 {
        1.0 / self.fire_rate.max(0.1)
    }

    /// Price of the next upgrade along `path`, if the tower may take it.
    pub fn upgrade_quote(&self, path: UpgradePath) -> Result<u32, UpgradeError> {
        if self.level >= MAX_UPGRADE_LEVEL {
            return Err(UpgradeError::MaxLevel { level: self.level });
        }
        if let Some(locked) = self.upgrade_path {
            if locked != path {
                return Err(UpgradeError::PathLocked { locked });
            }
        }
        Ok(economy::upgrade_cost(self.base_cost, self.level))
    }

    /// Advances one level along `path` after `cost` has been paid.
    pub fn apply_upgrade(&mut self, path: UpgradePath, cost: u32, tile_size: f32) {
        self.level = self.level.saturating_add(1).min(MAX_UPGRADE_LEVEL);
        self.upgrade_path = Some(path);
        self.total_invested = self.total_invested.saturating_add(cost);
        self.recompute_stats(tile_size);
    }

    /// Refund paid if the tower were sold now.
    #[must_use]
    pub fn sell_value(&self) -> u32 {
        economy::sell_value(self.total_invested)
    }
}

/// Projectile homing on an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileInstance {
    /// Identifier assigned at launch.
    pub id: ProjectileId,
    /// Visual style.
    pub kind: ProjectileKind,
    /// Current position in pixels.
    pub position: Vec2,
    /// Enemy the projectile chases.
    pub target: EnemyId,
    /// Last known position of the target.
    pub target_position: Vec2,
    /// Damage applied on contact.
    pub damage: f32,
    /// Travel speed in pixels per second.
    pub speed: f32,
    /// Spin or heading angle in radians.
    pub rotation: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ninja() -> TowerType {
        TowerType {
            id: TowerTypeId::new("ninja"),
            name: String::from("Ninja"),
            cost: 100,
            range: 3.0,
            damage: 10.0,
            fire_rate: 2.0,
            color: String::from("#000000"),
            sprite: None,
            projectile: None,
        }
    }

    fn tower() -> TowerInstance {
        TowerInstance::from_type(
            TowerId::new(0),
            &ninja(),
            CellCoord::new(1, 1),
            Vec2::new(60.0, 60.0),
            40.0,
        )
    }

    #[test]
    fn placement_scales_range_by_tile_size() {
        let tower = tower();
        assert_eq!(tower.range_px, 120.0);
        assert_eq!(tower.cooldown, 0.0);
        assert_eq!(tower.total_invested, 100);
        assert_eq!(tower.reload_seconds(), 0.5);
    }

    #[test]
    fn first_upgrade_locks_the_path() {
        let mut tower = tower();
        let cost = tower.upgrade_quote(UpgradePath::Reach).expect("quote");
        assert_eq!(cost, 150);
        tower.apply_upgrade(UpgradePath::Reach, cost, 40.0);
        assert_eq!(tower.level, 1);
        assert_eq!(tower.total_invested, 250);
        assert!((tower.range_px - 144.0).abs() < 1e-3);
        assert_eq!(
            tower.upgrade_quote(UpgradePath::Power),
            Err(UpgradeError::PathLocked {
                locked: UpgradePath::Reach
            })
        );
        assert_eq!(tower.sell_value(), 175);
    }

    #[test]
    fn upgrades_stop_at_max_level() {
        let mut tower = tower();
        for _ in 0..MAX_UPGRADE_LEVEL {
            let cost = tower.upgrade_quote(UpgradePath::Power).expect("quote");
            tower.apply_upgrade(UpgradePath::Power, cost, 40.0);
        }
        assert_eq!(
            tower.upgrade_quote(UpgradePath::Power),
            Err(UpgradeError::MaxLevel {
                level: MAX_UPGRADE_LEVEL
            })
        );
    }

    #[test]
    fn reload_is_bounded_for_tiny_fire_rates() {
        let mut tower = tower();
        tower.fire_rate = 0.0;
        assert_eq!(tower.reload_seconds(), 10.0);
    }
}
