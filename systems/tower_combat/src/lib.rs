#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that ticks tower cooldowns and fires at acquired targets.

use ninja_defense_core::{
    DamageEvent, EnemyId, Facing, ProjectileKind, TowerId, TowerInstance, Vec2,
};
use ninja_defense_system_tower_targeting::TowerTarget;

/// How a shot reaches its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Damage lands in the same tick.
    Instant,
    /// A homing projectile of the given kind is launched.
    Projectile(ProjectileKind),
}

/// Shot fired by a tower during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Tower that fired.
    pub tower: TowerId,
    /// Enemy the shot is aimed at.
    pub enemy: EnemyId,
    /// Pixel position the shot leaves from.
    pub origin: Vec2,
    /// Pixel position of the enemy when the shot was fired.
    pub target_position: Vec2,
    /// Damage carried by the shot.
    pub damage: f32,
    /// Delivery model of the shot.
    pub delivery: Delivery,
}

impl Shot {
    /// Damage event for shots that land instantly.
    #[must_use]
    pub fn damage_event(&self) -> Option<DamageEvent> {
        match self.delivery {
            Delivery::Instant => Some(DamageEvent {
                enemy: self.enemy,
                amount: self.damage,
            }),
            Delivery::Projectile(_) => None,
        }
    }
}

/// Tower combat system that queues shots for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Shot>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances cooldowns and animation by `dt` and fires every ready tower
    /// that holds a target.
    ///
    /// `towers` must be sorted by identifier, as is `targets` when produced
    /// by the targeting system from the same slice.
    pub fn handle(
        &mut self,
        towers: &mut [TowerInstance],
        targets: &[TowerTarget],
        dt: f32,
        out: &mut Vec<Shot>,
    ) {
        self.scratch.clear();

        for tower in towers.iter_mut() {
            tower.cooldown = (tower.cooldown - dt).max(0.0);
            tower.anim_time += dt;

            let Some(target) = find_target(targets, tower.id) else {
                continue;
            };

            tower.facing = Facing::from_vector(target.enemy_position - tower.position);
            if tower.cooldown > 0.0 {
                continue;
            }

            self.scratch.push(Shot {
                tower: tower.id,
                enemy: target.enemy,
                origin: tower.position,
                target_position: target.enemy_position,
                damage: tower.damage,
                delivery: tower
                    .projectile
                    .map_or(Delivery::Instant, Delivery::Projectile),
            });
            tower.cooldown = tower.reload_seconds();
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_target(targets: &[TowerTarget], tower: TowerId) -> Option<&TowerTarget> {
    targets
        .binary_search_by_key(&tower, |target| target.tower)
        .ok()
        .map(|index| &targets[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_position: Vec2::ZERO,
            enemy_position: Vec2::new(0.0, 10.0),
        }
    }

    #[test]
    fn lookup_finds_targets_by_tower() {
        let targets = vec![target(2, 4), target(5, 1)];
        assert_eq!(
            find_target(&targets, TowerId::new(5)).map(|target| target.enemy),
            Some(EnemyId::new(1))
        );
        assert!(find_target(&targets, TowerId::new(3)).is_none());
    }

    #[test]
    fn projectile_shots_carry_no_immediate_damage() {
        let shot = Shot {
            tower: TowerId::new(0),
            enemy: EnemyId::new(0),
            origin: Vec2::ZERO,
            target_position: Vec2::ZERO,
            damage: 3.0,
            delivery: Delivery::Projectile(ProjectileKind::Bullet),
        };
        assert_eq!(shot.damage_event(), None);
    }
}
