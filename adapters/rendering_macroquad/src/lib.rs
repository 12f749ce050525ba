#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Ninja Defense.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the crate depends on macroquad without its default `audio`
//! feature.
//!
//! The selected-tower panel uses Macroquad's immediate-mode UI module. All
//! UI-specific calls live inside the local `ui` module.

mod sprites;
mod ui;

use self::sprites::SpriteAtlas;
use self::ui::{draw_end_screen, draw_hud, draw_tower_panel, tower_panel_rect, TowerPanelUiResult};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use ninja_defense_core::{CellKind, ProjectileKind, UpgradePath};
use ninja_defense_rendering::{
    Color, FrameInput, LoopControl, Presentation, RenderingBackend, Scene, SceneEnemy,
    SceneProjectile, SceneTower, ScreenRect,
};
use std::{path::PathBuf, time::Duration};

const PATH_COLOR: Color = Color::from_rgb_u8(0xc2, 0xa2, 0x6b);
const WALL_COLOR: Color = Color::from_rgb_u8(0x3b, 0x3b, 0x44);
const EMPTY_COLOR: Color = Color::from_rgb_u8(0x4f, 0x7a, 0x3a);
const GRID_LINE_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.15);

/// Latches panel button presses so they can be merged with keyboard input on
/// the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PanelInputState {
    upgrade_latched: Option<UpgradePath>,
    sell_latched: bool,
}

impl PanelInputState {
    /// Returns the latched upgrade request, clearing it so the action fires once.
    pub fn take_upgrade(&mut self) -> Option<UpgradePath> {
        self.upgrade_latched.take()
    }

    /// Records that a panel button requested an upgrade this frame.
    pub fn register_upgrade(&mut self, path: UpgradePath) {
        self.upgrade_latched = Some(path);
    }

    /// Returns whether the panel requested a sale and clears the latch.
    pub fn take_sell(&mut self) -> bool {
        std::mem::take(&mut self.sell_latched)
    }

    /// Records that the sell button was pressed this frame.
    pub fn register_sell(&mut self) {
        self.sell_latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` leaves the game loop.
    quit_requested: bool,
    /// `Space` cycles paused, normal and fast.
    cycle_speed: bool,
    /// `1` to `9` arm a tower type from the shop.
    tower_slot: Option<usize>,
    /// `U` upgrades along path A, `I` along path B.
    upgrade: Option<UpgradePath>,
    /// `S` or `Delete` sells the selected tower.
    sell: bool,
    /// `R` restarts the session.
    restart: bool,
}

const SLOT_KEYS: [KeyCode; 9] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
];

impl KeyboardShortcuts {
    fn poll() -> Self {
        let upgrade = if is_key_pressed(KeyCode::U) {
            Some(UpgradePath::Power)
        } else if is_key_pressed(KeyCode::I) {
            Some(UpgradePath::Reach)
        } else {
            None
        };

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            cycle_speed: is_key_pressed(KeyCode::Space),
            tower_slot: SLOT_KEYS.iter().position(|key| is_key_pressed(*key)),
            upgrade,
            sell: is_key_pressed(KeyCode::S) || is_key_pressed(KeyCode::Delete),
            restart: is_key_pressed(KeyCode::R),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    asset_root: PathBuf,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Directory that sprite sheet paths are resolved against.
    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second
    /// has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> LoopControl + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            asset_root,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
            sprite_sheets,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1280,
            window_height: 800,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let atlas = SpriteAtlas::load(&asset_root, sprite_sheets);
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut panel_input = PanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let surface = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let (cursor_x, cursor_y) = mouse_position();
                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let frame_input = frame_input_from_observations(
                    surface,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                    keyboard,
                    &mut panel_input,
                    panel_blocker(&scene, surface),
                );

                if update_scene(frame_dt, frame_input, &mut scene) == LoopControl::Exit {
                    break;
                }

                if scene.is_drawable() {
                    draw_board(&scene);
                    draw_path(&scene.path, scene.layout.tile_size());
                    draw_ranges(&scene.towers);
                    draw_highlight(&scene);
                    draw_towers(&scene.towers, &atlas);
                    draw_enemies(&scene.enemies, &atlas);
                    draw_projectiles(&scene.projectiles);
                    draw_hud(&scene.hud);

                    if let Some(end_screen) = scene.end_screen {
                        draw_end_screen(&end_screen, surface);
                    } else if let Some(panel) = scene.hud.selection {
                        let mut root = macroquad::ui::root_ui();
                        let TowerPanelUiResult { upgrade, sell } =
                            draw_tower_panel(&mut root, &panel, surface);
                        if let Some(path) = upgrade {
                            panel_input.register_upgrade(path);
                        }
                        if sell {
                            panel_input.register_sell();
                        }
                    }
                }

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        tracing::info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Region whose clicks belong to the tower panel rather than the board.
fn panel_blocker(scene: &Scene, surface: Vec2) -> Option<ScreenRect> {
    if scene.end_screen.is_some() {
        return None;
    }
    scene.hud.selection.map(|_| tower_panel_rect(surface))
}

fn frame_input_from_observations(
    surface: Vec2,
    cursor: Vec2,
    clicked: bool,
    keyboard: KeyboardShortcuts,
    panel: &mut PanelInputState,
    blocker: Option<ScreenRect>,
) -> FrameInput {
    let over_panel = blocker.is_some_and(|rect| rect.contains(cursor));
    let inside_surface =
        cursor.x >= 0.0 && cursor.y >= 0.0 && cursor.x < surface.x && cursor.y < surface.y;

    FrameInput {
        surface,
        cursor: inside_surface.then_some(cursor),
        click: (clicked && !over_panel).then_some(cursor),
        cycle_speed: keyboard.cycle_speed,
        tower_slot: keyboard.tower_slot,
        upgrade: panel.take_upgrade().or(keyboard.upgrade),
        sell: panel.take_sell() || keyboard.sell,
        restart: keyboard.restart,
    }
}

fn draw_board(scene: &Scene) {
    let tile = scene.layout.tile_size();
    for scene_tile in &scene.tiles {
        let origin = scene.layout.grid_to_pixel(Vec2::new(
            scene_tile.cell.column() as f32,
            scene_tile.cell.row() as f32,
        ));
        let color = match scene_tile.kind {
            CellKind::Empty => EMPTY_COLOR,
            CellKind::Wall => WALL_COLOR,
            CellKind::Path => PATH_COLOR,
        };
        macroquad::shapes::draw_rectangle(origin.x, origin.y, tile, tile, to_macroquad_color(color));
    }

    let grid_color = to_macroquad_color(GRID_LINE_COLOR);
    let offset = scene.layout.offset();
    let size = scene.layout.grid_size();
    for column in 0..=scene.layout.columns() {
        let x = offset.x + column as f32 * tile;
        macroquad::shapes::draw_line(x, offset.y, x, offset.y + size.y, 1.0, grid_color);
    }
    for row in 0..=scene.layout.rows() {
        let y = offset.y + row as f32 * tile;
        macroquad::shapes::draw_line(offset.x, y, offset.x + size.x, y, 1.0, grid_color);
    }
}

fn draw_path(path: &[Vec2], tile: f32) {
    let color = to_macroquad_color(PATH_COLOR.lighten(0.35).with_alpha(0.6));
    let thickness = (tile * 0.1).max(1.0);
    for segment in path.windows(2) {
        macroquad::shapes::draw_line(
            segment[0].x,
            segment[0].y,
            segment[1].x,
            segment[1].y,
            thickness,
            color,
        );
    }
}

fn draw_ranges(towers: &[SceneTower]) {
    for tower in towers.iter().filter(|tower| tower.show_range || tower.selected) {
        let alpha = if tower.selected { 0.6 } else { 0.25 };
        macroquad::shapes::draw_circle_lines(
            tower.position.x,
            tower.position.y,
            tower.range_px,
            2.0,
            to_macroquad_color(Color::new(1.0, 1.0, 1.0, alpha)),
        );
    }
}

fn draw_highlight(scene: &Scene) {
    let Some(highlight) = scene.highlight else {
        return;
    };
    if scene.end_screen.is_some() {
        return;
    }

    let tile = scene.layout.tile_size();
    let origin = scene.layout.grid_to_pixel(Vec2::new(
        highlight.cell.column() as f32,
        highlight.cell.row() as f32,
    ));
    let color = if highlight.placeable {
        Color::from_rgb_u8(0x2e, 0xcc, 0x71)
    } else {
        Color::from_rgb_u8(0xe7, 0x4c, 0x3c)
    };
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        tile,
        tile,
        to_macroquad_color(color.with_alpha(0.35)),
    );
    if highlight.placeable {
        let centre = scene.layout.cell_center(highlight.cell);
        macroquad::shapes::draw_circle_lines(
            centre.x,
            centre.y,
            highlight.range_px,
            1.5,
            to_macroquad_color(color.with_alpha(0.6)),
        );
    }
}

fn draw_towers(towers: &[SceneTower], atlas: &SpriteAtlas) {
    for tower in towers {
        let drawn = tower
            .sprite
            .as_ref()
            .is_some_and(|frame| atlas.draw_frame(frame, tower.position, tower.draw_size));
        if !drawn {
            let half = tower.draw_size * 0.3;
            macroquad::shapes::draw_rectangle(
                tower.position.x - half,
                tower.position.y - half,
                half * 2.0,
                half * 2.0,
                to_macroquad_color(tower.color),
            );
        }

        for pip in 0..tower.level {
            macroquad::shapes::draw_circle(
                tower.position.x - tower.draw_size * 0.3 + f32::from(pip) * 7.0,
                tower.position.y + tower.draw_size * 0.35,
                2.5,
                macroquad::color::GOLD,
            );
        }
        if tower.selected {
            let half = tower.draw_size * 0.5;
            macroquad::shapes::draw_rectangle_lines(
                tower.position.x - half,
                tower.position.y - half,
                half * 2.0,
                half * 2.0,
                2.0,
                macroquad::color::YELLOW,
            );
        }
    }
}

fn draw_enemies(enemies: &[SceneEnemy], atlas: &SpriteAtlas) {
    for enemy in enemies {
        let drawn = enemy
            .sprite
            .as_ref()
            .is_some_and(|frame| atlas.draw_frame(frame, enemy.position, enemy.radius * 2.6));
        if !drawn {
            macroquad::shapes::draw_circle(
                enemy.position.x,
                enemy.position.y,
                enemy.radius,
                to_macroquad_color(enemy.color),
            );
        }

        let bar = enemy.health_bar;
        macroquad::shapes::draw_rectangle(
            bar.origin.x,
            bar.origin.y,
            bar.width,
            bar.height,
            macroquad::color::Color::new(0.0, 0.0, 0.0, 0.6),
        );
        macroquad::shapes::draw_rectangle(
            bar.origin.x,
            bar.origin.y,
            bar.fill_width,
            bar.height,
            to_macroquad_color(bar.color),
        );
    }
}

fn draw_projectiles(projectiles: &[SceneProjectile]) {
    for projectile in projectiles {
        let size = projectile.kind.draw_size();
        let Vec2 { x, y } = projectile.position;
        match projectile.kind {
            ProjectileKind::Shuriken => macroquad::shapes::draw_poly(
                x,
                y,
                4,
                size * 0.5,
                projectile.rotation.to_degrees() + 45.0,
                macroquad::color::LIGHTGRAY,
            ),
            ProjectileKind::Bullet => {
                macroquad::shapes::draw_circle(x, y, size * 0.25, macroquad::color::ORANGE);
            }
            ProjectileKind::Blowdart => {
                let tail = Vec2::from_angle(projectile.rotation) * size * 0.5;
                macroquad::shapes::draw_line(
                    x - tail.x,
                    y - tail.y,
                    x + tail.x,
                    y + tail.y,
                    2.0,
                    macroquad::color::LIME,
                );
            }
            ProjectileKind::Smokebomb => {
                macroquad::shapes::draw_circle(
                    x,
                    y,
                    size * 0.5,
                    macroquad::color::Color::new(0.6, 0.6, 0.65, 0.8),
                );
            }
        }
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard() -> KeyboardShortcuts {
        KeyboardShortcuts::default()
    }

    #[test]
    fn clicks_over_the_panel_do_not_reach_the_board() {
        let mut panel = PanelInputState::default();
        let blocker = ScreenRect {
            origin: Vec2::new(500.0, 300.0),
            size: Vec2::new(200.0, 100.0),
        };
        let surface = Vec2::new(800.0, 600.0);

        let input = frame_input_from_observations(
            surface,
            Vec2::new(550.0, 350.0),
            true,
            keyboard(),
            &mut panel,
            Some(blocker),
        );
        assert_eq!(input.click, None);
        assert_eq!(input.cursor, Some(Vec2::new(550.0, 350.0)));

        let input = frame_input_from_observations(
            surface,
            Vec2::new(50.0, 50.0),
            true,
            keyboard(),
            &mut panel,
            Some(blocker),
        );
        assert_eq!(input.click, Some(Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn cursor_outside_the_surface_is_dropped() {
        let mut panel = PanelInputState::default();
        let input = frame_input_from_observations(
            Vec2::new(800.0, 600.0),
            Vec2::new(-5.0, 20.0),
            false,
            keyboard(),
            &mut panel,
            None,
        );
        assert_eq!(input.cursor, None);
        assert_eq!(input.surface, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn latched_panel_presses_merge_with_keyboard_input() {
        let mut panel = PanelInputState::default();
        panel.register_upgrade(UpgradePath::Reach);
        panel.register_sell();

        let keys = KeyboardShortcuts {
            upgrade: Some(UpgradePath::Power),
            tower_slot: Some(2),
            ..keyboard()
        };
        let input = frame_input_from_observations(
            Vec2::new(800.0, 600.0),
            Vec2::ZERO,
            false,
            keys,
            &mut panel,
            None,
        );
        assert_eq!(input.upgrade, Some(UpgradePath::Reach), "panel wins over keys");
        assert!(input.sell);
        assert_eq!(input.tower_slot, Some(2));

        let input = frame_input_from_observations(
            Vec2::new(800.0, 600.0),
            Vec2::ZERO,
            false,
            keyboard(),
            &mut panel,
            None,
        );
        assert_eq!(input.upgrade, None, "latches fire once");
        assert!(!input.sell);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..59 {
            assert!(counter.record_frame(Duration::from_millis(16)).is_none());
        }
        let rate = counter
            .record_frame(Duration::from_millis(60))
            .expect("a second has elapsed");
        assert!((rate - 60.0).abs() < 1.0, "rate was {rate}");
    }
}
