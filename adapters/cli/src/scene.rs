//! Translates world queries into the scene description drawn by the backend.

use glam::Vec2;
use ninja_defense_core::{CellCoord, GameState, LevelData, Outcome, SpeedMode, UpgradePath};
use ninja_defense_rendering::{
    Color, EndScreen, HealthBar, Hud, PlacementHighlight, Scene, SceneEnemy, SceneProjectile,
    SceneTile, SceneTower, ShopEntry, SpriteFrame, TowerPanel, TOWER_SPRITE_TILES,
};
use ninja_defense_system_builder::placement_preview;
use ninja_defense_world::{query, World};

const FALLBACK_ENEMY_COLOR: Color = Color::from_rgb_u8(0xc0, 0x39, 0x2b);
const FALLBACK_TOWER_COLOR: Color = Color::from_rgb_u8(0x22, 0x22, 0x22);

/// Sprite sheet paths referenced by the level catalogs, without duplicates.
pub(crate) fn sprite_sheets(level: &LevelData) -> Vec<String> {
    let mut sheets: Vec<String> = level
        .enemies
        .iter()
        .filter_map(|enemy| enemy.sprite.as_ref())
        .chain(level.towers.iter().filter_map(|tower| tower.sprite.as_ref()))
        .map(|sheet| sheet.src.clone())
        .collect();
    sheets.sort();
    sheets.dedup();
    sheets
}

/// Builds a fresh scene for the current world state.
pub(crate) fn build(world: &World, cursor: Option<Vec2>) -> Scene {
    let mut scene = Scene::new(*query::layout(world), hud(world));
    populate(world, cursor, &mut scene);
    scene
}

/// Rewrites `scene` in place so it mirrors the world.
pub(crate) fn populate(world: &World, cursor: Option<Vec2>, scene: &mut Scene) {
    let layout = *query::layout(world);
    scene.layout = layout;
    scene.hud = hud(world);

    scene.tiles.clear();
    let map = query::map(world);
    for row in 0..map.rows() {
        for column in 0..map.columns() {
            let cell = CellCoord::new(column, row);
            if let Some(kind) = map.cell_kind(cell) {
                scene.tiles.push(SceneTile { cell, kind });
            }
        }
    }

    scene.path.clear();
    scene.path.extend_from_slice(query::waypoints(world));

    let hovered = cursor.and_then(|cursor| layout.pixel_to_cell(cursor));
    let selected = query::selected_tower(world).map(|tower| tower.id);
    let draw_size = layout.tile_size() * TOWER_SPRITE_TILES;
    let paused = query::speed_mode(world) == SpeedMode::Paused;

    scene.towers.clear();
    for tower in query::towers(world) {
        let tower_type = query::level(world).tower_type(&tower.kind);
        let color = tower_type.map_or(FALLBACK_TOWER_COLOR, |kind| {
            Color::from_hex_or(&kind.color, FALLBACK_TOWER_COLOR)
        });
        let sprite = tower_type
            .and_then(|kind| kind.sprite.as_ref())
            .map(|sheet| SpriteFrame::select(sheet, tower.anim_time, tower.facing.sprite_row()));
        scene.towers.push(SceneTower {
            id: tower.id,
            position: tower.position,
            range_px: tower.range_px,
            color,
            facing: tower.facing,
            sprite,
            draw_size,
            level: tower.level,
            show_range: paused || hovered == Some(tower.cell),
            selected: selected == Some(tower.id),
        });
    }

    scene.enemies.clear();
    for enemy in query::enemies(world) {
        let enemy_type = query::enemy_type(world, &enemy.kind);
        let color = enemy_type.map_or(FALLBACK_ENEMY_COLOR, |kind| {
            Color::from_hex_or(&kind.color, FALLBACK_ENEMY_COLOR)
        });
        let sprite = enemy_type
            .and_then(|kind| kind.sprite.as_ref())
            .map(|sheet| {
                SpriteFrame::select(sheet, enemy.anim_time, enemy.direction.sprite_row())
            });
        scene.enemies.push(SceneEnemy {
            position: enemy.position,
            radius: enemy.radius,
            color,
            sprite,
            health_bar: HealthBar::above(enemy.position, enemy.radius, enemy.health_ratio()),
        });
    }

    scene.projectiles.clear();
    scene
        .projectiles
        .extend(query::projectiles(world).iter().map(|projectile| SceneProjectile {
            position: projectile.position,
            rotation: projectile.rotation,
            kind: projectile.kind,
        }));

    scene.highlight = highlight(world, cursor);
    scene.end_screen = end_screen(world);
}

fn hud(world: &World) -> Hud {
    let money = query::money(world);
    let armed = query::selected_tower_type(world).map(|kind| ShopEntry {
        name: kind.name.clone(),
        cost: kind.cost,
        range: kind.range,
        dps: kind.damage_per_second(),
        affordable: kind.cost <= money,
    });
    let selection = query::selected_tower(world).map(|tower| {
        let quote = |path: UpgradePath| query::upgrade_quote(world, tower.id, path).ok();
        TowerPanel {
            tower: tower.id,
            level: tower.level,
            path: tower.upgrade_path,
            upgrade_prices: [quote(UpgradePath::Power), quote(UpgradePath::Reach)],
            sell_value: query::sell_value(world, tower.id).unwrap_or_default(),
        }
    });

    Hud {
        money,
        lives: query::lives(world),
        wave_number: query::wave_number(world),
        wave_count: query::wave_count(world),
        speed: query::speed_mode(world),
        armed,
        selection,
    }
}

fn highlight(world: &World, cursor: Option<Vec2>) -> Option<PlacementHighlight> {
    if query::game_state(world).is_terminal() {
        return None;
    }
    let layout = query::layout(world);
    let preview = placement_preview(layout, cursor?, |cell| {
        query::placement_check(world, cell).map(|_| ())
    })?;
    let range_tiles = query::selected_tower_type(world).map_or(0.0, |kind| kind.range);
    Some(PlacementHighlight {
        cell: preview.cell,
        placeable: preview.placeable(),
        range_px: range_tiles * layout.tile_size(),
    })
}

fn end_screen(world: &World) -> Option<EndScreen> {
    let outcome = match query::game_state(world) {
        GameState::Defeat => Outcome::Defeat,
        GameState::Victory => Outcome::Victory,
        _ => return None,
    };
    Some(EndScreen {
        outcome,
        wave_reached: query::wave_number(world),
        score: query::money(world),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level;
    use ninja_defense_core::{Command, SpriteSheet};
    use ninja_defense_world as world;
    use std::time::Duration;

    fn configured_world() -> World {
        let mut world = World::new(level::load(None).expect("bundled level"));
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureBoard {
                width: 800.0,
                height: 480.0,
            },
            &mut events,
        );
        world
    }

    #[test]
    fn tiles_and_route_cover_the_board() {
        let world = configured_world();
        let scene = build(&world, None);

        assert_eq!(scene.tiles.len(), 20 * 12);
        assert_eq!(scene.path.len(), 6);
        assert_eq!(scene.path[0], Vec2::new(20.0, 100.0));
        assert!(scene.is_drawable());
        assert!(scene.end_screen.is_none());
        assert_eq!(
            scene.hud.status_line(),
            "Money: $420  Lives: 20  Wave 1/5  Mode: Paused (x0)"
        );
    }

    #[test]
    fn hovering_reports_placeability_and_range() {
        let world = configured_world();
        let layout = *query::layout(&world);

        let open = build(&world, Some(layout.cell_center(CellCoord::new(4, 1))));
        let highlight = open.highlight.expect("cursor is over the board");
        assert!(highlight.placeable);
        assert_eq!(highlight.range_px, 2.5 * 40.0);

        let path = build(&world, Some(layout.cell_center(CellCoord::new(4, 2))));
        assert!(!path.highlight.expect("cursor is over the board").placeable);

        let outside = build(&world, Some(Vec2::new(-5.0, -5.0)));
        assert!(outside.highlight.is_none());
    }

    #[test]
    fn selected_towers_expose_their_panel() {
        let mut world = configured_world();
        let mut events = Vec::new();
        let cell = CellCoord::new(4, 1);
        world::apply(&mut world, Command::PlaceTower { cell }, &mut events);
        let tower = query::tower_at(&world, cell).expect("placed");
        world::apply(
            &mut world,
            Command::SelectTower { tower: Some(tower) },
            &mut events,
        );

        let centre = query::layout(&world).cell_center(cell);
        let scene = build(&world, Some(centre));
        let panel = scene.hud.selection.expect("panel shown");
        assert_eq!(panel.upgrade_prices, [Some(150), Some(150)]);
        assert_eq!(panel.sell_value, 70);
        assert_eq!(scene.towers.len(), 1);
        assert!(scene.towers[0].selected);
        assert!(scene.towers[0].show_range);
        assert_eq!(scene.towers[0].draw_size, 40.0 * TOWER_SPRITE_TILES);
    }

    #[test]
    fn paused_boards_show_every_tower_range() {
        let mut world = configured_world();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceTower {
                cell: CellCoord::new(4, 1),
            },
            &mut events,
        );

        let paused = build(&world, None);
        assert_eq!(paused.towers.len(), 1);
        assert!(paused.towers[0].show_range);
        assert!(!paused.towers[0].selected);

        world::apply(
            &mut world,
            Command::SetSpeedMode {
                mode: SpeedMode::Normal,
            },
            &mut events,
        );
        let running = build(&world, None);
        assert!(!running.towers[0].show_range);

        let hovered = query::layout(&world).cell_center(CellCoord::new(4, 1));
        assert!(build(&world, Some(hovered)).towers[0].show_range);
    }

    #[test]
    fn finished_sessions_show_the_end_screen() {
        let mut level = level::load(None).expect("bundled level");
        level.waves.clear();
        let mut world = World::new(level);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SetSpeedMode {
                mode: SpeedMode::Normal,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        let scene = build(&world, Some(Vec2::new(100.0, 100.0)));
        let end_screen = scene.end_screen.expect("session ended");
        assert_eq!(end_screen.outcome, Outcome::Victory);
        assert_eq!(end_screen.score, 420);
        assert!(scene.highlight.is_none());
    }

    #[test]
    fn sprite_sheets_are_deduplicated() {
        let mut level = level::load(None).expect("bundled level");
        let sheet = SpriteSheet {
            src: String::from("/sprites/ninja.png"),
            frame_size: 32,
            cols: 4,
            rows: 6,
            fps: 8.0,
        };
        level.towers[0].sprite = Some(sheet.clone());
        level.towers[1].sprite = Some(sheet);
        assert_eq!(sprite_sheets(&level), vec![String::from("/sprites/ninja.png")]);
    }
}
