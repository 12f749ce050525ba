//! HUD text, the selected-tower panel and the end-of-game overlay.
//!
//! This module hosts all uses of `macroquad::ui` and `macroquad::text` so the
//! rest of the adapter can remain agnostic of Macroquad's UI types.

use glam::Vec2;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2 as MacroquadVec2},
    ui::{hash, Ui},
};
use ninja_defense_core::{economy::MAX_UPGRADE_LEVEL, Outcome, UpgradePath};
use ninja_defense_rendering::{EndScreen, EndScreenLayout, Hud, ScreenRect, TowerPanel};

const PANEL_SIZE: Vec2 = Vec2::new(230.0, 170.0);
const PANEL_MARGIN: f32 = 12.0;

/// Panel button presses observed this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TowerPanelUiResult {
    /// Upgrade button pressed, if any.
    pub upgrade: Option<UpgradePath>,
    /// Whether the sell button was pressed.
    pub sell: bool,
}

/// Bounds of the selected-tower panel in the bottom-right corner.
pub(crate) fn tower_panel_rect(surface: Vec2) -> ScreenRect {
    ScreenRect {
        origin: (surface - PANEL_SIZE - Vec2::splat(PANEL_MARGIN)).max(Vec2::ZERO),
        size: PANEL_SIZE,
    }
}

fn label(text: &str, position: Vec2, size: f32, color: Color) {
    let _ = macroquad::text::draw_text(text, position.x, position.y, size, color);
}

fn centred_label(text: &str, centre: Vec2, size: f32, color: Color) {
    let dimensions = macroquad::text::measure_text(text, None, size as u16, 1.0);
    label(
        text,
        Vec2::new(
            centre.x - dimensions.width * 0.5,
            centre.y + dimensions.height * 0.5,
        ),
        size,
        color,
    );
}

pub(crate) fn draw_hud(hud: &Hud) {
    let status = hud.status_line();
    let armed = match &hud.armed {
        Some(entry) => format!(
            "Selected: {} ${} | Range: {} | DPS: {:.1}",
            entry.name, entry.cost, entry.range, entry.dps
        ),
        None => String::from("Selected: none"),
    };

    macroquad::shapes::draw_rectangle(0.0, 0.0, 520.0, 46.0, Color::new(0.0, 0.0, 0.0, 0.55));
    label(&status, Vec2::new(10.0, 20.0), 20.0, WHITE);
    let armed_color = match &hud.armed {
        Some(entry) if !entry.affordable => Color::from_rgba(0xe7, 0x4c, 0x3c, 255),
        _ => WHITE,
    };
    label(&armed, Vec2::new(10.0, 38.0), 18.0, armed_color);
}

fn upgrade_caption(panel: &TowerPanel, path: UpgradePath) -> String {
    if panel.path.is_some_and(|locked| locked != path) {
        return format!("{} (locked)", path.label());
    }
    match panel.upgrade_price(path) {
        Some(price) => format!("{} ${price}", path.label()),
        None if panel.level >= MAX_UPGRADE_LEVEL => format!("{} (max)", path.label()),
        None => path.label().to_owned(),
    }
}

/// Renders the selected-tower panel and reports its button presses.
pub(crate) fn draw_tower_panel(ui: &mut Ui, panel: &TowerPanel, surface: Vec2) -> TowerPanelUiResult {
    let rect = tower_panel_rect(surface);
    let background = Color::from_rgba(30, 30, 36, 230);

    let mut skin = ui.default_skin();
    skin.margin = 0.0;
    skin.window_style = ui
        .style_builder()
        .color(background)
        .color_hovered(background)
        .color_clicked(background)
        .text_color(WHITE)
        .margin(RectOffset::new(10.0, 10.0, 10.0, 10.0))
        .build();
    skin.label_style = ui
        .style_builder()
        .text_color(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 2.0, 2.0))
        .build();
    skin.button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .margin(RectOffset::new(4.0, 4.0, 6.0, 6.0))
        .build();
    ui.push_skin(&skin);

    let mut result = TowerPanelUiResult::default();
    let _ = ui.window(
        hash!("tower_panel"),
        MacroquadVec2::new(rect.origin.x, rect.origin.y),
        MacroquadVec2::new(rect.size.x, rect.size.y),
        |ui| {
            ui.label(
                None,
                &format!("Tower #{}  level {}", panel.tower.get(), panel.level),
            );
            for path in [UpgradePath::Power, UpgradePath::Reach] {
                if ui.button(None, upgrade_caption(panel, path).as_str())
                    && panel.upgrade_price(path).is_some()
                {
                    result.upgrade = Some(path);
                }
            }
            if ui.button(None, format!("Sell ${}", panel.sell_value).as_str()) {
                result.sell = true;
            }
        },
    );

    ui.pop_skin();
    result
}

/// Draws the full-screen overlay shown once the session has ended.
pub(crate) fn draw_end_screen(end_screen: &EndScreen, surface: Vec2) {
    let (fill, accent, replay_color) = match end_screen.outcome {
        Outcome::Defeat => (
            Color::from_rgba(110, 0, 0, 242),
            Color::from_rgba(0xff, 0x66, 0x66, 255),
            Color::from_rgba(0xff, 0x44, 0x44, 255),
        ),
        Outcome::Victory => (
            Color::from_rgba(220, 175, 5, 242),
            Color::from_rgba(0xff, 0xeb, 0x3b, 255),
            Color::from_rgba(0x4c, 0xaf, 0x50, 255),
        ),
    };
    macroquad::shapes::draw_rectangle(0.0, 0.0, surface.x, surface.y, fill);
    macroquad::shapes::draw_rectangle_lines(
        20.0,
        20.0,
        (surface.x - 40.0).max(0.0),
        (surface.y - 40.0).max(0.0),
        8.0,
        accent,
    );

    let centre = surface * 0.5;
    centred_label(end_screen.title(), centre - Vec2::new(0.0, 80.0), 72.0, accent);
    centred_label(end_screen.subtitle(), centre - Vec2::new(0.0, 20.0), 32.0, WHITE);
    let [wave, score] = end_screen.summary();
    centred_label(&wave, centre + Vec2::new(0.0, 50.0), 24.0, WHITE);
    centred_label(&score, centre + Vec2::new(0.0, 90.0), 24.0, WHITE);

    let layout = EndScreenLayout::new(surface);
    let exit_color = Color::from_rgba(0x4a, 0x90, 0xe2, 255);
    for (rect, color, caption) in [
        (layout.replay, replay_color, "PLAY AGAIN"),
        (layout.exit, exit_color, "EXIT"),
    ] {
        macroquad::shapes::draw_rectangle(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y, color);
        macroquad::shapes::draw_rectangle_lines(
            rect.origin.x,
            rect.origin.y,
            rect.size.x,
            rect.size.y,
            3.0,
            WHITE,
        );
        centred_label(caption, rect.center(), 22.0, WHITE);
    }
}
