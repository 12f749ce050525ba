#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Ninja Defense experience.

mod level;
mod scene;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ninja_defense_core::SpeedMode;
use ninja_defense_rendering::{Color, Presentation, RenderingBackend};
use ninja_defense_rendering_macroquad::MacroquadBackend;
use ninja_defense_world::query;

use session::Session;

/// Ninja Defense: hold the bamboo pass against waves of intruders.
#[derive(Parser, Debug)]
#[command(name = "ninja-defense", version)]
struct Args {
    /// Level file in TOML format. The bundled level is used when omitted.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,

    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,

    /// Run this many fixed 1/60 s ticks without a window, then print a summary.
    #[arg(long)]
    headless_ticks: Option<u64>,

    /// Speed mode the session starts in. Windowed sessions start paused and
    /// headless runs start at normal speed unless this is given.
    #[arg(long, value_enum)]
    speed: Option<StartSpeed>,

    /// Log filter directive, overriding `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StartSpeed {
    Paused,
    Normal,
    Fast,
}

impl From<StartSpeed> for SpeedMode {
    fn from(speed: StartSpeed) -> Self {
        match speed {
            StartSpeed::Paused => Self::Paused,
            StartSpeed::Normal => Self::Normal,
            StartSpeed::Fast => Self::Fast,
        }
    }
}

fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => tracing_subscriber::EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ninja_defense=info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Entry point for the Ninja Defense command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    let level = level::load(args.level.as_deref())?;
    let asset_root = level::asset_root(args.level.as_deref());

    if let Some(ticks) = args.headless_ticks {
        let speed = args.speed.map_or(SpeedMode::Normal, SpeedMode::from);
        let summary = session::run_headless(level, ticks, speed);
        let report = toml::to_string(&summary).context("failed to format headless summary")?;
        print!("{report}");
        return Ok(());
    }

    let sprite_sheets = scene::sprite_sheets(&level);
    let mut session = Session::new(level);
    if let Some(speed) = args.speed {
        session.set_speed(speed.into());
    }
    tracing::info!(
        level = %query::level(session.world()).name,
        "welcome to Ninja Defense"
    );

    let presentation = Presentation::new(
        "Ninja Defense",
        Color::from_rgb_u8(0x11, 0x11, 0x11),
        scene::build(session.world(), None),
    )
    .with_sprite_sheets(sprite_sheets);

    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_asset_root(asset_root)
        .run(presentation, move |dt, input, scene| {
            let control = session.frame(dt, input);
            scene::populate(session.world(), input.cursor, scene);
            control
        })
}
