use ninja_defense_core::{
    DamageEvent, EnemyId, EnemyTarget, ProjectileId, ProjectileInstance, ProjectileKind, Vec2,
};
use ninja_defense_system_projectiles::{spawn_projectile, update_projectiles, HIT_RADIUS};
use proptest::prelude::*;

fn launch(target: Vec2, enemy: u32) -> Vec<ProjectileInstance> {
    let mut projectiles = Vec::new();
    spawn_projectile(
        &mut projectiles,
        ProjectileId::new(0),
        ProjectileKind::Shuriken,
        Vec2::ZERO,
        target,
        EnemyId::new(enemy),
        6.0,
    );
    projectiles
}

fn enemy_at(id: u32, position: Vec2) -> EnemyTarget {
    EnemyTarget {
        id: EnemyId::new(id),
        position,
    }
}

#[test]
fn projectile_hits_living_target_exactly_once() {
    let mut projectiles = launch(Vec2::new(100.0, 0.0), 1);
    let enemies = [enemy_at(1, Vec2::new(100.0, 0.0))];
    let mut hits = Vec::new();

    for _ in 0..10 {
        update_projectiles(&mut projectiles, &enemies, 0.1, &mut hits);
    }

    assert!(projectiles.is_empty());
    assert_eq!(
        hits,
        vec![DamageEvent {
            enemy: EnemyId::new(1),
            amount: 6.0,
        }]
    );
}

#[test]
fn projectile_homes_on_moving_target() {
    let mut projectiles = launch(Vec2::new(100.0, 0.0), 1);
    let mut hits = Vec::new();

    update_projectiles(
        &mut projectiles,
        &[enemy_at(1, Vec2::new(0.0, 200.0))],
        0.1,
        &mut hits,
    );

    assert_eq!(projectiles[0].position, Vec2::new(0.0, 40.0));
    assert_eq!(projectiles[0].target_position, Vec2::new(0.0, 200.0));
    assert!(hits.is_empty());
}

#[test]
fn projectile_fizzles_when_target_is_gone() {
    let mut projectiles = launch(Vec2::new(3.0 * HIT_RADIUS, 0.0), 1);
    let mut hits = Vec::new();

    for _ in 0..5 {
        update_projectiles(
            &mut projectiles,
            &[enemy_at(2, Vec2::new(31.0, 0.0))],
            0.1,
            &mut hits,
        );
    }

    assert!(projectiles.is_empty());
    assert!(hits.is_empty(), "projectiles never retarget");
}

proptest! {
    #[test]
    fn hits_are_never_duplicated(
        x in -500.0f32..500.0,
        y in -500.0f32..500.0,
        dt in 0.001f32..0.05,
    ) {
        let target = Vec2::new(x, y);
        let mut projectiles = launch(target, 1);
        let enemies = [enemy_at(1, target)];
        let mut hits = Vec::new();

        for _ in 0..2_000 {
            update_projectiles(&mut projectiles, &enemies, dt, &mut hits);
        }

        prop_assert!(projectiles.is_empty());
        prop_assert_eq!(hits.len(), 1);
    }
}
