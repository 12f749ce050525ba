#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy subsystem: spawning onto the route, walking waypoints, and absorbing
//! damage.
//!
//! Every function operates on the caller's enemy list in place. Enemies that
//! leave the board are reported through caller-owned buffers so the world
//! can settle rewards and lives in a single place.

use std::collections::BTreeMap;

use ninja_defense_core::{
    geometry::step_towards, DamageEvent, Direction, EnemyId, EnemyInstance, EnemyType, Vec2,
};

/// Lowest hit points an enemy may spawn with.
pub const MIN_HP: f32 = 1.0;
/// Lowest travel speed an enemy may spawn with, in pixels per second.
pub const MIN_SPEED: f32 = 10.0;
/// Lowest body radius an enemy may spawn with, in pixels.
pub const MIN_RADIUS: f32 = 5.0;
/// Lowest radius scale honoured from the catalog.
pub const MIN_RADIUS_SCALE: f32 = 0.05;

/// Body radius of an enemy of `enemy_type` drawn on tiles of `tile_size`.
#[must_use]
pub fn enemy_radius(enemy_type: &EnemyType, tile_size: f32) -> f32 {
    (tile_size * enemy_type.radius_scale.max(MIN_RADIUS_SCALE)).max(MIN_RADIUS)
}

/// Appends a new enemy standing on `start` and walking toward the second
/// waypoint.
pub fn spawn_enemy(
    enemies: &mut Vec<EnemyInstance>,
    id: EnemyId,
    enemy_type: &EnemyType,
    start: Vec2,
    tile_size: f32,
) {
    let hp = enemy_type.hp.max(MIN_HP);
    enemies.push(EnemyInstance {
        id,
        kind: enemy_type.id.clone(),
        position: start,
        hp,
        max_hp: hp,
        speed: enemy_type.speed.max(MIN_SPEED),
        waypoint_index: 1,
        radius: enemy_radius(enemy_type, tile_size),
        direction: Direction::default(),
        anim_time: 0.0,
    });
}

/// Advances every enemy along the route by `dt` seconds.
///
/// An enemy that lands on the last waypoint is removed and its identifier is
/// pushed into `escaped`. Does nothing when the route has fewer than two
/// waypoints.
pub fn update_enemies(
    enemies: &mut Vec<EnemyInstance>,
    dt: f32,
    waypoints: &[Vec2],
    escaped: &mut Vec<EnemyId>,
) {
    if waypoints.len() < 2 {
        return;
    }

    enemies.retain_mut(|enemy| {
        enemy.anim_time += dt;

        let Some(target) = waypoints.get(enemy.waypoint_index).copied() else {
            escaped.push(enemy.id);
            return false;
        };

        let delta = target - enemy.position;
        if delta != Vec2::ZERO {
            enemy.direction = Direction::from_vector(delta);
        }

        let step = step_towards(enemy.position, target, enemy.speed * dt);
        enemy.position = step.position;
        if step.arrived {
            enemy.waypoint_index += 1;
            if enemy.waypoint_index >= waypoints.len() {
                escaped.push(enemy.id);
                return false;
            }
        }
        true
    });
}

/// Applies a batch of damage events and removes the fallen.
///
/// Amounts aimed at the same enemy are summed before they are subtracted.
/// Every enemy left with no hit points is moved into `killed`, preserving
/// list order.
pub fn apply_enemy_damage(
    enemies: &mut Vec<EnemyInstance>,
    events: &[DamageEvent],
    killed: &mut Vec<EnemyInstance>,
) {
    let mut totals: BTreeMap<EnemyId, f32> = BTreeMap::new();
    for event in events {
        *totals.entry(event.enemy).or_insert(0.0) += event.amount;
    }

    let mut survivors = Vec::with_capacity(enemies.len());
    for mut enemy in std::mem::take(enemies) {
        if let Some(total) = totals.get(&enemy.id) {
            enemy.hp -= total;
        }
        if enemy.is_alive() {
            survivors.push(enemy);
        } else {
            killed.push(enemy);
        }
    }
    *enemies = survivors;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ninja_defense_core::EnemyTypeId;

    fn grunt(hp: f32, speed: f32) -> EnemyType {
        EnemyType {
            id: EnemyTypeId::new("grunt"),
            hp,
            speed,
            color: String::from("#ff0000"),
            radius_scale: 0.3,
            reward: 5,
            sprite: None,
        }
    }

    #[test]
    fn spawn_clamps_catalog_values() {
        let mut enemies = Vec::new();
        let mut weak = grunt(0.0, 1.0);
        weak.radius_scale = 0.0;
        spawn_enemy(&mut enemies, EnemyId::new(7), &weak, Vec2::new(1.0, 2.0), 40.0);

        let enemy = &enemies[0];
        assert_eq!(enemy.id, EnemyId::new(7));
        assert_eq!(enemy.hp, MIN_HP);
        assert_eq!(enemy.max_hp, MIN_HP);
        assert_eq!(enemy.speed, MIN_SPEED);
        assert_eq!(enemy.radius, MIN_RADIUS);
        assert_eq!(enemy.waypoint_index, 1);
        assert_eq!(enemy.position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn radius_scales_with_tile_size() {
        let mut enemies = Vec::new();
        spawn_enemy(&mut enemies, EnemyId::new(0), &grunt(10.0, 50.0), Vec2::ZERO, 100.0);
        assert!((enemies[0].radius - 30.0).abs() < 1e-4);
    }

    #[test]
    fn short_routes_freeze_enemies() {
        let mut enemies = Vec::new();
        spawn_enemy(&mut enemies, EnemyId::new(0), &grunt(10.0, 50.0), Vec2::ZERO, 40.0);
        let before = enemies.clone();
        let mut escaped = Vec::new();
        update_enemies(&mut enemies, 1.0, &[Vec2::ZERO], &mut escaped);
        assert_eq!(enemies, before);
        assert!(escaped.is_empty());
    }

    #[test]
    fn damage_is_summed_per_enemy() {
        let mut enemies = Vec::new();
        spawn_enemy(&mut enemies, EnemyId::new(0), &grunt(10.0, 50.0), Vec2::ZERO, 40.0);
        spawn_enemy(&mut enemies, EnemyId::new(1), &grunt(10.0, 50.0), Vec2::ZERO, 40.0);

        let events = [
            DamageEvent {
                enemy: EnemyId::new(0),
                amount: 4.0,
            },
            DamageEvent {
                enemy: EnemyId::new(0),
                amount: 6.0,
            },
            DamageEvent {
                enemy: EnemyId::new(1),
                amount: 3.0,
            },
        ];
        let mut killed = Vec::new();
        apply_enemy_damage(&mut enemies, &events, &mut killed);

        assert_eq!(killed.len(), 1);
        assert_eq!(killed[0].id, EnemyId::new(0));
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].hp, 7.0);
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let mut enemies = Vec::new();
        spawn_enemy(&mut enemies, EnemyId::new(0), &grunt(10.0, 50.0), Vec2::ZERO, 40.0);
        let before = enemies.clone();
        let mut killed = Vec::new();
        apply_enemy_damage(
            &mut enemies,
            &[DamageEvent {
                enemy: EnemyId::new(42),
                amount: 100.0,
            }],
            &mut killed,
        );
        assert_eq!(enemies, before);
        assert!(killed.is_empty());
    }
}
