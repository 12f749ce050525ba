use ninja_defense_core::{
    CellCoord, EnemyId, EnemyTarget, TowerId, TowerInstance, TowerType, TowerTypeId, Vec2,
};
use ninja_defense_system_tower_targeting::{TowerTarget, TowerTargeting};

fn tower(id: u32, x: f32, y: f32, range_tiles: f32) -> TowerInstance {
    let tower_type = TowerType {
        id: TowerTypeId::new("ninja"),
        name: String::from("Ninja"),
        cost: 50,
        range: range_tiles,
        damage: 5.0,
        fire_rate: 1.0,
        color: String::from("#111111"),
        sprite: None,
        projectile: None,
    };
    TowerInstance::from_type(
        TowerId::new(id),
        &tower_type,
        CellCoord::new(0, 0),
        Vec2::new(x, y),
        40.0,
    )
}

fn enemy(id: u32, x: f32, y: f32) -> EnemyTarget {
    EnemyTarget {
        id: EnemyId::new(id),
        position: Vec2::new(x, y),
    }
}

#[test]
fn each_tower_picks_its_own_nearest_enemy() {
    let mut system = TowerTargeting::new();
    let towers = [tower(1, 0.0, 0.0, 2.0), tower(2, 400.0, 0.0, 2.0)];
    let enemies = [enemy(7, 30.0, 0.0), enemy(8, 380.0, 0.0)];

    let mut out = Vec::new();
    system.handle(&towers, &enemies, &mut out);

    assert_eq!(
        out,
        vec![
            TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(7),
                tower_position: Vec2::new(0.0, 0.0),
                enemy_position: Vec2::new(30.0, 0.0),
            },
            TowerTarget {
                tower: TowerId::new(2),
                enemy: EnemyId::new(8),
                tower_position: Vec2::new(400.0, 0.0),
                enemy_position: Vec2::new(380.0, 0.0),
            },
        ]
    );
}

#[test]
fn towers_without_enemies_in_range_are_skipped() {
    let mut system = TowerTargeting::new();
    let towers = [tower(1, 0.0, 0.0, 1.0)];
    let enemies = [enemy(7, 200.0, 0.0)];

    let mut out = vec![TowerTarget {
        tower: TowerId::new(99),
        enemy: EnemyId::new(99),
        tower_position: Vec2::ZERO,
        enemy_position: Vec2::ZERO,
    }];
    system.handle(&towers, &enemies, &mut out);
    assert!(out.is_empty(), "stale targets must be cleared");
}

#[test]
fn targets_follow_enemy_movement() {
    let mut system = TowerTargeting::new();
    let towers = [tower(1, 0.0, 0.0, 3.0)];
    let mut out = Vec::new();

    system.handle(&towers, &[enemy(1, 50.0, 0.0), enemy(2, 100.0, 0.0)], &mut out);
    assert_eq!(out[0].enemy, EnemyId::new(1));

    system.handle(&towers, &[enemy(1, 150.0, 0.0), enemy(2, 60.0, 0.0)], &mut out);
    assert_eq!(out[0].enemy, EnemyId::new(2), "no lock-on across ticks");
}
