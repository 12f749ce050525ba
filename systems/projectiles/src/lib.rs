#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Homing projectiles launched by towers.
//!
//! A projectile chases the current position of the enemy it was fired at.
//! It resolves once it is within [`HIT_RADIUS`] of that position, dealing
//! damage only if the enemy still exists. Projectiles never pick a new
//! target.

use ninja_defense_core::{
    geometry::{distance, move_towards},
    DamageEvent, EnemyId, EnemyTarget, ProjectileId, ProjectileInstance, ProjectileKind, Vec2,
};

/// Travel speed of every projectile in pixels per second.
pub const PROJECTILE_SPEED: f32 = 400.0;

/// Distance at which a projectile counts as having reached its target.
pub const HIT_RADIUS: f32 = 10.0;

/// Angle in radians of the vector from `from` to `to`.
fn heading(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Launches a projectile from `start` toward `target`.
pub fn spawn_projectile(
    projectiles: &mut Vec<ProjectileInstance>,
    id: ProjectileId,
    kind: ProjectileKind,
    start: Vec2,
    target_position: Vec2,
    target: EnemyId,
    damage: f32,
) {
    projectiles.push(ProjectileInstance {
        id,
        kind,
        position: start,
        target,
        target_position,
        damage,
        speed: PROJECTILE_SPEED,
        rotation: heading(start, target_position),
    });
}

/// Moves every projectile toward its target and resolves arrivals.
///
/// Hits against living enemies are pushed into `hits`. A projectile whose
/// target vanished keeps flying toward the last known position and then
/// disappears without effect.
pub fn update_projectiles(
    projectiles: &mut Vec<ProjectileInstance>,
    enemies: &[EnemyTarget],
    dt: f32,
    hits: &mut Vec<DamageEvent>,
) {
    projectiles.retain_mut(|projectile| {
        let living = enemies
            .iter()
            .find(|enemy| enemy.id == projectile.target)
            .map(|enemy| enemy.position);
        let target_position = living.unwrap_or(projectile.target_position);

        if distance(projectile.position, target_position) < HIT_RADIUS {
            if living.is_some() {
                hits.push(DamageEvent {
                    enemy: projectile.target,
                    amount: projectile.damage,
                });
            }
            return false;
        }

        projectile.position = move_towards(
            projectile.position,
            target_position,
            projectile.speed * dt,
        );
        projectile.target_position = target_position;
        projectile.rotation = heading(projectile.position, target_position);
        true
    });
}
