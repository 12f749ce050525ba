use std::time::Duration;

use ninja_defense_core::{EnemyTypeId, WaveDefinition, WaveGroup};
use ninja_defense_system_spawning::{Advance, SpawnOrder, WaveDirector};

fn single(enemy: &str, count: u32, interval_sec: f32) -> WaveDefinition {
    WaveDefinition::Single {
        enemy_id: EnemyTypeId::new(enemy),
        count,
        interval_sec,
    }
}

fn names(orders: &[SpawnOrder]) -> Vec<&str> {
    orders.iter().map(|order| order.enemy.as_str()).collect()
}

#[test]
fn first_spawn_waits_for_a_full_interval() {
    let waves = vec![single("grunt", 3, 1.0)];
    let mut director = WaveDirector::new();
    let mut orders = Vec::new();

    director.handle(&waves, Duration::from_millis(600), &mut orders);
    assert!(orders.is_empty(), "no spawn before full interval");

    director.handle(&waves, Duration::from_millis(600), &mut orders);
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].wave_index, 0);
}

#[test]
fn emits_multiple_spawn_orders_for_large_dt() {
    let waves = vec![single("grunt", 10, 0.5)];
    let mut director = WaveDirector::new();
    let mut orders = Vec::new();

    director.handle(&waves, Duration::from_secs(2), &mut orders);
    assert_eq!(orders.len(), 4, "expected one spawn per interval");
}

#[test]
fn never_spawns_more_than_the_wave_count() {
    let waves = vec![single("grunt", 3, 0.1)];
    let mut director = WaveDirector::new();
    let mut orders = Vec::new();

    director.handle(&waves, Duration::from_secs(60), &mut orders);
    director.handle(&waves, Duration::from_secs(60), &mut orders);
    assert_eq!(orders.len(), 3);
    assert!(director.done_spawning(&waves));
}

#[test]
fn zero_interval_releases_the_whole_wave() {
    let waves = vec![single("grunt", 5, 0.0)];
    let mut director = WaveDirector::new();
    let mut orders = Vec::new();

    director.handle(&waves, Duration::ZERO, &mut orders);
    assert_eq!(orders.len(), 5);
}

#[test]
fn groups_spawn_in_declaration_order() {
    let waves = vec![WaveDefinition::Groups {
        groups: vec![
            WaveGroup {
                enemy_id: EnemyTypeId::new("grunt"),
                count: 2,
            },
            WaveGroup {
                enemy_id: EnemyTypeId::new("ghost"),
                count: 0,
            },
            WaveGroup {
                enemy_id: EnemyTypeId::new("brute"),
                count: 1,
            },
        ],
        interval_sec: 1.0,
    }];
    let mut director = WaveDirector::new();
    let mut orders = Vec::new();

    director.handle(&waves, Duration::from_secs(5), &mut orders);
    assert_eq!(names(&orders), vec!["grunt", "grunt", "brute"]);
}

#[test]
fn advance_requires_an_empty_board() {
    let waves = vec![single("grunt", 1, 0.0), single("runner", 1, 0.0)];
    let mut director = WaveDirector::new();
    let mut orders = Vec::new();

    assert_eq!(director.try_advance(&waves, true), Advance::Holding);

    director.handle(&waves, Duration::ZERO, &mut orders);
    assert_eq!(director.try_advance(&waves, false), Advance::Holding);
    assert_eq!(
        director.try_advance(&waves, true),
        Advance::NextWave { cleared: 0 }
    );
    assert_eq!(director.wave_index(), 1);
    assert_eq!(director.spawned_in_wave(), 0);

    director.handle(&waves, Duration::ZERO, &mut orders);
    assert_eq!(names(&orders), vec!["grunt", "runner"]);
    assert_eq!(
        director.try_advance(&waves, true),
        Advance::Finished { cleared: 1 }
    );
    assert!(director.is_finished(&waves));
    assert_eq!(director.try_advance(&waves, true), Advance::Holding);
}

#[test]
fn finished_director_ignores_time() {
    let waves: Vec<WaveDefinition> = Vec::new();
    let mut director = WaveDirector::new();
    let mut orders = Vec::new();
    director.handle(&waves, Duration::from_secs(3), &mut orders);
    assert!(orders.is_empty());
    assert!(director.is_finished(&waves));
}
