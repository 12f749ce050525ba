//! Frame-by-frame driver that turns adapter input into world commands.

use std::time::Duration;

use glam::Vec2;
use ninja_defense_core::{Command, Event, GameState, LevelData, SpeedMode};
use ninja_defense_rendering::{EndScreenButton, EndScreenLayout, FrameInput, LoopControl};
use ninja_defense_system_builder::{Builder, BuilderInput};
use ninja_defense_world::{self as world, query, World};
use serde::Serialize;

/// Fixed frame delta used when running without a window.
pub(crate) const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

/// Tile size of the virtual surface used when running without a window.
const HEADLESS_TILE_SIZE: f32 = 40.0;

/// Owns the world together with the systems that feed it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    builder: Builder,
    events: Vec<Event>,
    commands: Vec<Command>,
    surface: Vec2,
}

impl Session {
    pub(crate) fn new(level: LevelData) -> Self {
        Self {
            world: World::new(level),
            builder: Builder::new(),
            events: Vec::new(),
            commands: Vec::new(),
            surface: Vec2::ZERO,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent frame.
    #[cfg(test)]
    pub(crate) fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn set_speed(&mut self, mode: SpeedMode) {
        self.commands.push(Command::SetSpeedMode { mode });
        self.flush();
    }

    /// Processes one frame of input and advances the clock by `dt`.
    pub(crate) fn frame(&mut self, dt: Duration, input: FrameInput) -> LoopControl {
        let previous = std::mem::take(&mut self.events);

        if input.surface != self.surface {
            self.surface = input.surface;
            self.commands.push(Command::ConfigureBoard {
                width: input.surface.x,
                height: input.surface.y,
            });
        }

        if query::game_state(&self.world).is_terminal() {
            let button = input
                .click
                .and_then(|click| EndScreenLayout::new(input.surface).hit_test(click));
            match button {
                Some(EndScreenButton::Exit) => {
                    tracing::info!("exit requested from end screen");
                    return LoopControl::Exit;
                }
                Some(EndScreenButton::Replay) => self.commands.push(Command::Restart),
                None if input.restart => self.commands.push(Command::Restart),
                None => {}
            }
        } else {
            self.queue_shortcuts(input);
            let world = &self.world;
            self.builder.handle(
                &previous,
                query::layout(world),
                BuilderInput::new(input.click),
                |cell| query::tower_at(world, cell),
                &mut self.commands,
            );
        }

        self.commands.push(Command::Tick { dt });
        self.flush();
        LoopControl::Continue
    }

    fn queue_shortcuts(&mut self, input: FrameInput) {
        if input.restart {
            self.commands.push(Command::Restart);
            return;
        }
        if input.cycle_speed {
            self.commands.push(Command::CycleSpeedMode);
        }
        if let Some(slot) = input.tower_slot {
            if let Some(tower_type) = query::level(&self.world).towers.get(slot) {
                self.commands.push(Command::SelectTowerType {
                    kind: tower_type.id.clone(),
                });
            }
        }
        if let Some(tower) = query::selected_tower(&self.world).map(|tower| tower.id) {
            if let Some(path) = input.upgrade {
                self.commands.push(Command::UpgradeTower { tower, path });
            }
            if input.sell {
                self.commands.push(Command::SellTower { tower });
            }
        }
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        for event in &self.events {
            log_event(event);
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::TowerPlaced { tower, kind, cost, .. } => {
            tracing::info!(tower = tower.get(), kind = %kind, cost, "tower placed");
        }
        Event::TowerPlacementRejected { cell, reason } => {
            tracing::debug!(column = cell.column(), row = cell.row(), %reason, "placement rejected");
        }
        Event::TowerUpgraded { tower, path, level, cost } => {
            tracing::info!(tower = tower.get(), ?path, level, cost, "tower upgraded");
        }
        Event::TowerUpgradeRejected { tower, reason } => {
            tracing::debug!(tower = tower.get(), %reason, "upgrade rejected");
        }
        Event::TowerSold { tower, refund } => {
            tracing::info!(tower = tower.get(), refund, "tower sold");
        }
        Event::WaveCleared { wave_index, bonus } => {
            tracing::info!(wave = wave_index + 1, bonus, "wave cleared");
        }
        Event::GameStateChanged { state } => {
            tracing::info!(?state, "game state changed");
        }
        Event::GameRestarted => tracing::info!("session restarted"),
        _ => {}
    }
}

/// Outcome of a session simulated without a window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct HeadlessSummary {
    pub(crate) level: String,
    pub(crate) ticks: u64,
    pub(crate) state: String,
    pub(crate) wave_reached: usize,
    pub(crate) wave_count: usize,
    pub(crate) money: u32,
    pub(crate) lives: u32,
    pub(crate) enemies_spawned: u64,
    pub(crate) enemies_killed: u64,
    pub(crate) enemies_escaped: u64,
}

/// Simulates up to `ticks` fixed frames on a virtual surface.
///
/// The run stops early once the session ends. Nothing is built, so the
/// summary shows how the level plays out against an undefended route.
pub(crate) fn run_headless(level: LevelData, ticks: u64, speed: SpeedMode) -> HeadlessSummary {
    let surface = Vec2::new(
        level.map.columns() as f32 * HEADLESS_TILE_SIZE,
        level.map.rows() as f32 * HEADLESS_TILE_SIZE,
    );
    let mut session = Session::new(level);
    session.set_speed(speed);

    let mut summary = HeadlessSummary {
        level: query::level(session.world()).name.clone(),
        ticks: 0,
        state: String::new(),
        wave_reached: 0,
        wave_count: query::wave_count(session.world()),
        money: 0,
        lives: 0,
        enemies_spawned: 0,
        enemies_killed: 0,
        enemies_escaped: 0,
    };

    let input = FrameInput {
        surface,
        ..FrameInput::default()
    };
    while summary.ticks < ticks && !query::game_state(session.world()).is_terminal() {
        let _ = session.frame(HEADLESS_FRAME, input);
        summary.ticks += 1;
        for event in &session.events {
            match event {
                Event::EnemySpawned { .. } => summary.enemies_spawned += 1,
                Event::EnemyKilled { .. } => summary.enemies_killed += 1,
                Event::EnemyEscaped { .. } => summary.enemies_escaped += 1,
                _ => {}
            }
        }
    }

    let world = session.world();
    summary.state = state_label(query::game_state(world)).to_owned();
    summary.wave_reached = query::wave_number(world);
    summary.money = query::money(world);
    summary.lives = query::lives(world);
    tracing::info!(
        ticks = summary.ticks,
        state = %summary.state,
        "headless run finished"
    );
    summary
}

fn state_label(state: GameState) -> &'static str {
    match state {
        GameState::Paused => "paused",
        GameState::Running => "running",
        GameState::FastForward => "fast_forward",
        GameState::Defeat => "defeat",
        GameState::Victory => "victory",
    }
}
