#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Ninja Defense adapters.
//!
//! Scenes are expressed in surface pixels. The world fits its board to the
//! drawing surface, so positions reported by world queries can be copied into
//! a [`Scene`] without further conversion.

use anyhow::Result as AnyResult;
use glam::Vec2;
use ninja_defense_core::{
    BoardLayout, CellCoord, CellKind, Facing, Outcome, ProjectileKind, SpeedMode, SpriteSheet,
    TowerId, UpgradePath,
};
use std::time::Duration;
use thiserror::Error;

/// Footprint of a tower sprite measured in tiles.
pub const TOWER_SPRITE_TILES: f32 = 1.35;

/// Size of each end-of-game button in pixels.
pub const END_SCREEN_BUTTON_SIZE: Vec2 = Vec2::new(240.0, 60.0);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Parses a `#rrggbb` or `#rgb` color string as used by level catalogs.
    pub fn from_hex(text: &str) -> Result<Self, RenderingError> {
        let invalid = || RenderingError::InvalidColor {
            text: text.to_owned(),
        };
        let digits = text.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        match digits.len() {
            6 => Ok(Self::from_rgb_u8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            3 => {
                let widen = |value: u8| value * 17;
                Ok(Self::from_rgb_u8(
                    widen(channel(0..1)?),
                    widen(channel(1..2)?),
                    widen(channel(2..3)?),
                ))
            }
            _ => Err(invalid()),
        }
    }

    /// Parses `text`, falling back to `fallback` when it is malformed.
    #[must_use]
    pub fn from_hex_or(text: &str, fallback: Self) -> Self {
        Self::from_hex(text).unwrap_or(fallback)
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a replaced alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Drawing surface size in pixels for this frame.
    pub surface: Vec2,
    /// Cursor position in surface pixels, when the cursor is over the window.
    pub cursor: Option<Vec2>,
    /// Position of a primary click made on this frame.
    pub click: Option<Vec2>,
    /// Whether the speed mode should advance to the next mode.
    pub cycle_speed: bool,
    /// Zero-based shop slot chosen with the number keys.
    pub tower_slot: Option<usize>,
    /// Upgrade requested for the selected tower.
    pub upgrade: Option<UpgradePath>,
    /// Whether the selected tower should be sold.
    pub sell: bool,
    /// Whether a restart was requested from the keyboard.
    pub restart: bool,
}

/// Decision returned by the per-frame update closure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopControl {
    /// Keep presenting frames.
    #[default]
    Continue,
    /// Leave the game loop.
    Exit,
}

/// Background tile drawn for a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneTile {
    /// Cell covered by the tile.
    pub cell: CellCoord,
    /// Terrain of the cell.
    pub kind: CellKind,
}

/// Frame of a sprite sheet to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteFrame {
    /// Path of the sheet image.
    pub source: String,
    /// Side length of a square frame in texels.
    pub frame_size: u32,
    /// Column of the frame within the sheet.
    pub column: u32,
    /// Row of the frame within the sheet.
    pub row: u32,
}

impl SpriteFrame {
    /// Selects the frame of `sheet` for an animation clock and a facing row.
    ///
    /// The row is clamped to the rows the sheet actually has.
    #[must_use]
    pub fn select(sheet: &SpriteSheet, anim_time: f32, row: u32) -> Self {
        Self {
            source: sheet.src.clone(),
            frame_size: sheet.frame_size,
            column: sheet.frame_column(anim_time),
            row: row.min(sheet.rows.saturating_sub(1)),
        }
    }

    /// Texel rectangle of the frame as `(origin, size)`.
    #[must_use]
    pub fn source_rect(&self) -> (Vec2, Vec2) {
        let size = self.frame_size as f32;
        (
            Vec2::new(self.column as f32 * size, self.row as f32 * size),
            Vec2::splat(size),
        )
    }
}

/// Tower snapshot ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneTower {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Centre of the tower in pixels.
    pub position: Vec2,
    /// Attack radius in pixels.
    pub range_px: f32,
    /// Fill color used when no sprite is available.
    pub color: Color,
    /// Direction the tower faces.
    pub facing: Facing,
    /// Current animation frame, if the tower type has a sprite sheet.
    pub sprite: Option<SpriteFrame>,
    /// Edge length of the drawn sprite in pixels.
    pub draw_size: f32,
    /// Upgrade level, shown as pips.
    pub level: u8,
    /// Whether the range circle should be drawn.
    pub show_range: bool,
    /// Whether the tower is the current selection.
    pub selected: bool,
}

/// Health bar geometry drawn above an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBar {
    /// Top-left corner of the bar background.
    pub origin: Vec2,
    /// Full width of the bar.
    pub width: f32,
    /// Height of the bar.
    pub height: f32,
    /// Width of the filled portion.
    pub fill_width: f32,
    /// Fill color chosen from the remaining health.
    pub color: Color,
}

impl HealthBar {
    /// Builds the bar for an enemy centred at `position` with `radius`.
    ///
    /// The bar is twice the radius wide and sits four pixels above the body.
    #[must_use]
    pub fn above(position: Vec2, radius: f32, health_ratio: f32) -> Self {
        let ratio = health_ratio.clamp(0.0, 1.0);
        let width = radius * 2.0;
        let height = (radius * 0.35).max(3.0);
        Self {
            origin: Vec2::new(position.x - radius, position.y - radius - height - 4.0),
            width,
            height,
            fill_width: width * ratio,
            color: health_color(ratio),
        }
    }
}

/// Green above half health, amber above a quarter, red otherwise.
#[must_use]
pub fn health_color(ratio: f32) -> Color {
    if ratio > 0.5 {
        Color::from_rgb_u8(0x2e, 0xcc, 0x71)
    } else if ratio > 0.25 {
        Color::from_rgb_u8(0xf3, 0x9c, 0x12)
    } else {
        Color::from_rgb_u8(0xe7, 0x4c, 0x3c)
    }
}

/// Enemy snapshot ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Centre of the enemy in pixels.
    pub position: Vec2,
    /// Body radius in pixels.
    pub radius: f32,
    /// Fill color used when no sprite is available.
    pub color: Color,
    /// Current animation frame, if the enemy type has a sprite sheet.
    pub sprite: Option<SpriteFrame>,
    /// Bar showing the remaining health.
    pub health_bar: HealthBar,
}

/// Projectile snapshot ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneProjectile {
    /// Centre of the projectile in pixels.
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Visual model.
    pub kind: ProjectileKind,
}

/// Highlight drawn on the hovered cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementHighlight {
    /// Cell under the cursor.
    pub cell: CellCoord,
    /// Whether the armed tower could be built there.
    pub placeable: bool,
    /// Range of the armed tower in pixels.
    pub range_px: f32,
}

/// Shop entry describing the armed tower type.
#[derive(Clone, Debug, PartialEq)]
pub struct ShopEntry {
    /// Display name of the tower type.
    pub name: String,
    /// Purchase price.
    pub cost: u32,
    /// Range in tiles.
    pub range: f32,
    /// Damage dealt per second at base level.
    pub dps: f32,
    /// Whether the player can currently afford the tower.
    pub affordable: bool,
}

/// Panel describing the selected tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPanel {
    /// Tower being described.
    pub tower: TowerId,
    /// Current upgrade level.
    pub level: u8,
    /// Path chosen by the first upgrade.
    pub path: Option<UpgradePath>,
    /// Price of the next upgrade on each path, `None` when unavailable.
    pub upgrade_prices: [Option<u32>; 2],
    /// Refund the tower would fetch when sold.
    pub sell_value: u32,
}

impl TowerPanel {
    /// Price of the next upgrade along `path`.
    #[must_use]
    pub fn upgrade_price(&self, path: UpgradePath) -> Option<u32> {
        match path {
            UpgradePath::Power => self.upgrade_prices[0],
            UpgradePath::Reach => self.upgrade_prices[1],
        }
    }
}

/// Heads-up display values.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    /// Money available for building.
    pub money: u32,
    /// Lives remaining.
    pub lives: u32,
    /// One-based wave number for display.
    pub wave_number: usize,
    /// Number of waves in the level.
    pub wave_count: usize,
    /// Active speed mode.
    pub speed: SpeedMode,
    /// Tower type armed for placement.
    pub armed: Option<ShopEntry>,
    /// Details of the selected tower.
    pub selection: Option<TowerPanel>,
}

impl Hud {
    /// Status line shown in the top-left corner.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "Money: ${}  Lives: {}  Wave {}/{}  Mode: {} (x{})",
            self.money,
            self.lives,
            self.wave_number,
            self.wave_count,
            speed_label(self.speed),
            self.speed.multiplier(),
        )
    }
}

fn speed_label(mode: SpeedMode) -> &'static str {
    match mode {
        SpeedMode::Paused => "Paused",
        SpeedMode::Normal => "Normal",
        SpeedMode::Fast => "Fast",
    }
}

/// Buttons shown on the end-of-game overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndScreenButton {
    /// Starts a new session on the same level.
    Replay,
    /// Leaves the game.
    Exit,
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl ScreenRect {
    /// Whether `point` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let end = self.origin + self.size;
        point.x >= self.origin.x && point.x <= end.x && point.y >= self.origin.y && point.y <= end.y
    }

    /// Centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }
}

/// Placement of the end-of-game buttons for a surface size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EndScreenLayout {
    /// Replay button bounds.
    pub replay: ScreenRect,
    /// Exit button bounds.
    pub exit: ScreenRect,
}

impl EndScreenLayout {
    /// Lays the buttons out side by side below the centre of the surface.
    #[must_use]
    pub fn new(surface: Vec2) -> Self {
        let top = surface.y / 2.0 + 150.0;
        let centre = surface.x / 2.0;
        Self {
            replay: ScreenRect {
                origin: Vec2::new(centre - 260.0, top),
                size: END_SCREEN_BUTTON_SIZE,
            },
            exit: ScreenRect {
                origin: Vec2::new(centre + 20.0, top),
                size: END_SCREEN_BUTTON_SIZE,
            },
        }
    }

    /// Button under `point`, if any.
    #[must_use]
    pub fn hit_test(&self, point: Vec2) -> Option<EndScreenButton> {
        if self.replay.contains(point) {
            Some(EndScreenButton::Replay)
        } else if self.exit.contains(point) {
            Some(EndScreenButton::Exit)
        } else {
            None
        }
    }
}

/// Overlay shown once the session has ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EndScreen {
    /// How the session ended.
    pub outcome: Outcome,
    /// Last wave the player reached, one-based.
    pub wave_reached: usize,
    /// Final score, equal to the money left.
    pub score: u32,
}

impl EndScreen {
    /// Headline text.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.outcome {
            Outcome::Defeat => "GAME OVER",
            Outcome::Victory => "VICTORY!",
        }
    }

    /// Line under the headline.
    #[must_use]
    pub const fn subtitle(&self) -> &'static str {
        match self.outcome {
            Outcome::Defeat => "The enemies broke through",
            Outcome::Victory => "Every wave defeated!",
        }
    }

    /// Summary lines with the wave reached and the score.
    #[must_use]
    pub fn summary(&self) -> [String; 2] {
        [
            format!("Wave {} reached", self.wave_reached),
            format!("Final score: ${}", self.score),
        ]
    }
}

/// Scene description combining the board, its inhabitants and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board placement on the surface.
    pub layout: BoardLayout,
    /// Background tiles in row-major order.
    pub tiles: Vec<SceneTile>,
    /// Enemy route in pixels.
    pub path: Vec<Vec2>,
    /// Towers currently standing.
    pub towers: Vec<SceneTower>,
    /// Enemies currently on the board.
    pub enemies: Vec<SceneEnemy>,
    /// Projectiles in flight.
    pub projectiles: Vec<SceneProjectile>,
    /// Hover feedback for the armed tower.
    pub highlight: Option<PlacementHighlight>,
    /// Heads-up display values.
    pub hud: Hud,
    /// End-of-game overlay, present once the session has ended.
    pub end_screen: Option<EndScreen>,
}

impl Scene {
    /// Creates an empty scene for a board layout.
    #[must_use]
    pub fn new(layout: BoardLayout, hud: Hud) -> Self {
        Self {
            layout,
            tiles: Vec::new(),
            path: Vec::new(),
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            highlight: None,
            hud,
            end_screen: None,
        }
    }

    /// Whether the scene has anything to draw on.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.layout.has_area()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
    /// Sprite sheet paths the backend should load before the first frame.
    pub sprite_sheets: Vec<String>,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
            sprite_sheets: Vec::new(),
        }
    }

    /// Lists the sprite sheets referenced by the level catalogs.
    #[must_use]
    pub fn with_sprite_sheets(mut self, sheets: Vec<String>) -> Self {
        self.sprite_sheets = sheets;
        self
    }
}

/// Rendering backend capable of presenting Ninja Defense scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and rebuilds the scene before it is
    /// drawn. Returning [`LoopControl::Exit`] ends the loop.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> LoopControl + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// Catalog color that is not a `#rgb` or `#rrggbb` string.
    #[error("invalid color {text:?}, expected #rgb or #rrggbb")]
    InvalidColor {
        /// Text that failed to parse.
        text: String,
    },
}
