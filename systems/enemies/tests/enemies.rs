use ninja_defense_core::{DamageEvent, EnemyId, EnemyType, EnemyTypeId, Vec2};
use ninja_defense_system_enemies::{apply_enemy_damage, spawn_enemy, update_enemies};
use proptest::prelude::*;

fn enemy_type(hp: f32, speed: f32) -> EnemyType {
    EnemyType {
        id: EnemyTypeId::new("runner"),
        hp,
        speed,
        color: String::from("#00ff00"),
        radius_scale: 0.25,
        reward: 1,
        sprite: None,
    }
}

#[test]
fn enemy_covers_speed_times_dt_per_tick() {
    let tile = 40.0;
    let waypoints = [
        Vec2::new(0.5 * tile, 0.5 * tile),
        Vec2::new(5.5 * tile, 0.5 * tile),
        Vec2::new(5.5 * tile, 5.5 * tile),
    ];
    let mut enemies = Vec::new();
    spawn_enemy(
        &mut enemies,
        EnemyId::new(0),
        &enemy_type(10.0, 200.0),
        waypoints[0],
        tile,
    );

    let mut escaped = Vec::new();
    update_enemies(&mut enemies, 0.1, &waypoints, &mut escaped);
    assert_eq!(enemies[0].position, Vec2::new(40.0, 20.0));
    assert_eq!(enemies[0].waypoint_index, 1);

    for tick in 2..=10 {
        let before = enemies[0].position;
        let step = enemies[0].speed * 0.1;
        let arrives = before.distance(waypoints[1]) <= step;
        update_enemies(&mut enemies, 0.1, &waypoints, &mut escaped);

        let expected_x = 20.0 + 20.0 * tick as f32;
        assert!(
            (enemies[0].position.x - expected_x).abs() < 1e-3,
            "tick {tick}: x = {}",
            enemies[0].position.x
        );
        assert_eq!(enemies[0].position.y, 20.0);
        assert_eq!(enemies[0].waypoint_index, if arrives { 2 } else { 1 });
        if arrives {
            break;
        }
    }
    if enemies[0].waypoint_index == 1 {
        let remaining = enemies[0].position.distance(waypoints[1]);
        assert!(remaining < 1e-3, "only rounding error may remain: {remaining}");
        update_enemies(&mut enemies, 0.1, &waypoints, &mut escaped);
    }
    assert_eq!(enemies[0].position, waypoints[1]);
    assert_eq!(
        enemies[0].waypoint_index, 2,
        "index should advance exactly once on arrival"
    );
    assert!(escaped.is_empty());
}

#[test]
fn enemy_reaching_last_waypoint_escapes_in_same_update() {
    let waypoints = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
    let mut enemies = Vec::new();
    spawn_enemy(
        &mut enemies,
        EnemyId::new(3),
        &enemy_type(10.0, 100.0),
        waypoints[0],
        40.0,
    );

    let mut escaped = Vec::new();
    update_enemies(&mut enemies, 0.5, &waypoints, &mut escaped);
    assert!(enemies.is_empty());
    assert_eq!(escaped, vec![EnemyId::new(3)]);
}

#[test]
fn animation_clock_advances_with_time() {
    let waypoints = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1000.0)];
    let mut enemies = Vec::new();
    spawn_enemy(
        &mut enemies,
        EnemyId::new(0),
        &enemy_type(10.0, 10.0),
        waypoints[0],
        40.0,
    );
    let mut escaped = Vec::new();
    update_enemies(&mut enemies, 0.25, &waypoints, &mut escaped);
    update_enemies(&mut enemies, 0.25, &waypoints, &mut escaped);
    assert!((enemies[0].anim_time - 0.5).abs() < 1e-6);
}

proptest! {
    #[test]
    fn movement_never_overshoots(
        speed in 10.0f32..500.0,
        dt in 0.0f32..0.05,
        ticks in 1usize..200,
        length in 1.0f32..2000.0,
    ) {
        let waypoints = [Vec2::ZERO, Vec2::new(length, 0.0), Vec2::new(length, length)];
        let mut enemies = Vec::new();
        spawn_enemy(&mut enemies, EnemyId::new(0), &enemy_type(5.0, speed), waypoints[0], 40.0);
        let mut escaped = Vec::new();

        for _ in 0..ticks {
            let before = enemies.first().map(|enemy| enemy.position);
            update_enemies(&mut enemies, dt, &waypoints, &mut escaped);
            if let (Some(before), Some(enemy)) = (before, enemies.first()) {
                prop_assert!(enemy.position.distance(before) <= speed * dt + 1e-3);
                prop_assert!(enemy.position.x <= length + 1e-3);
                prop_assert!(enemy.position.y <= length + 1e-3);
            }
        }
    }

    #[test]
    fn hit_points_never_increase(amounts in proptest::collection::vec(0.0f32..20.0, 0..12)) {
        let mut enemies = Vec::new();
        spawn_enemy(&mut enemies, EnemyId::new(0), &enemy_type(50.0, 20.0), Vec2::ZERO, 40.0);
        let mut killed = Vec::new();
        let mut last = 50.0;

        for amount in amounts {
            apply_enemy_damage(
                &mut enemies,
                &[DamageEvent { enemy: EnemyId::new(0), amount }],
                &mut killed,
            );
            match enemies.first() {
                Some(enemy) => {
                    prop_assert!(enemy.hp <= last);
                    prop_assert!(enemy.hp > 0.0);
                    last = enemy.hp;
                }
                None => {
                    prop_assert_eq!(killed.len(), 1);
                    prop_assert!(killed[0].hp <= 0.0);
                }
            }
        }
    }
}
