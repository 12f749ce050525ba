#![allow(dead_code)]

use std::time::Duration;

use ninja_defense_core::{
    CellCoord, Command, EnemyType, EnemyTypeId, Event, GridLegend, GridMap, GridPoint, LevelData,
    ProjectileKind, RulesConfig, SpeedMode, TowerType, TowerTypeId, WaveDefinition,
};
use ninja_defense_world::{self as world, World};

/// Five columns by three rows. Row 1 is the enemy path, (0, 2) is a wall.
pub fn level() -> LevelData {
    LevelData {
        name: String::from("Test Corridor"),
        map: GridMap {
            legend: GridLegend::default(),
            grid: vec![
                vec![0, 0, 0, 0, 0],
                vec![2, 2, 2, 2, 2],
                vec![1, 0, 0, 0, 0],
            ],
            waypoints: vec![GridPoint::new(0.0, 1.0), GridPoint::new(4.0, 1.0)],
        },
        enemies: vec![
            enemy("grunt", 10.0, 100.0, 3),
            enemy("dasher", 10.0, 400.0, 1),
            enemy("tank", 1_000.0, 20.0, 50),
        ],
        towers: vec![
            tower("ninja", 100, None),
            tower("thrower", 100, Some(ProjectileKind::Shuriken)),
        ],
        waves: vec![single("grunt", 1, 0.0)],
        rules: RulesConfig::default(),
    }
}

pub fn enemy(id: &str, hp: f32, speed: f32, reward: u32) -> EnemyType {
    EnemyType {
        id: EnemyTypeId::new(id),
        hp,
        speed,
        color: String::from("#aa0000"),
        radius_scale: 0.3,
        reward,
        sprite: None,
    }
}

pub fn tower(id: &str, cost: u32, projectile: Option<ProjectileKind>) -> TowerType {
    TowerType {
        id: TowerTypeId::new(id),
        name: id.to_uppercase(),
        cost,
        range: 2.0,
        damage: 100.0,
        fire_rate: 1.0,
        color: String::from("#222222"),
        sprite: None,
        projectile,
    }
}

pub fn single(enemy: &str, count: u32, interval_sec: f32) -> WaveDefinition {
    WaveDefinition::Single {
        enemy_id: EnemyTypeId::new(enemy),
        count,
        interval_sec,
    }
}

pub fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

pub fn start(world: &mut World) -> Vec<Event> {
    run(
        world,
        Command::SetSpeedMode {
            mode: SpeedMode::Normal,
        },
    )
}

pub fn place(world: &mut World, column: u32, row: u32) -> Vec<Event> {
    run(
        world,
        Command::PlaceTower {
            cell: CellCoord::new(column, row),
        },
    )
}

/// Ticks in 50 ms frames until `done` holds or `limit` frames elapse,
/// returning every event produced.
pub fn tick_until(
    world: &mut World,
    limit: usize,
    mut done: impl FnMut(&World) -> bool,
) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..limit {
        if done(world) {
            break;
        }
        world::apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
            &mut events,
        );
    }
    events
}
