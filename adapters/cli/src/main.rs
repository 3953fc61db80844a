#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Tilebreaker experience.

mod settings;
mod simulation;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tilebreaker_core::InputSnapshot;
use tilebreaker_rendering::{Color, Presentation, RenderingBackend, WindowConfig};
use tilebreaker_rendering_macroquad::MacroquadBackend;
use tilebreaker_world::{query, SpriteCatalog, World, DEFAULT_LEVEL};
use tracing::info;

use self::{
    settings::{Resolution, VideoSettings},
    simulation::{RunSummary, Simulation},
};

/// Fixed step used by headless runs.
const HEADLESS_STEP: Duration = Duration::from_micros(16_667);

#[derive(Debug, Parser)]
#[command(name = "tilebreaker", about = "Run a Tilebreaker level")]
struct Args {
    /// Level description to load instead of the built-in level.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Run the given number of fixed ticks without a window and print a summary.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Video settings file.
    #[arg(long, default_value = "tilebreaker.toml")]
    settings: PathBuf,

    /// Write the effective video settings back to the settings file.
    #[arg(long)]
    save_settings: bool,

    /// Cover the whole display.
    #[arg(long)]
    fullscreen: bool,

    /// Window size, one of 800x600, 1024x768, 1280x1024, 1920x1080.
    #[arg(long, value_name = "WxH")]
    resolution: Option<Resolution>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,

    /// Render as fast as possible.
    #[arg(long = "no-vsync")]
    no_vsync: bool,

    /// Log frame timings once per second.
    #[arg(long)]
    show_fps: bool,

    /// Outline entity bounding boxes (toggle with `B`).
    #[arg(long)]
    debug_bounds: bool,

    /// Sprite manifest used instead of flat shapes.
    #[arg(long, value_name = "PATH")]
    sprites: Option<PathBuf>,

    /// Seed for the particle effects.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl Args {
    fn video_settings(&self) -> Result<VideoSettings> {
        let mut settings = VideoSettings::load(&self.settings)?;
        if let Some(resolution) = self.resolution {
            settings.resolution = resolution;
        }
        settings.fullscreen |= self.fullscreen;
        Ok(settings)
    }

    fn vsync(&self) -> bool {
        self.vsync || !self.no_vsync
    }
}

/// Entry point for the Tilebreaker command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();
    let world = load_world(&args)?;
    println!("{}", query::welcome_banner(&world));

    let settings = args.video_settings()?;
    if args.save_settings {
        settings.save(&args.settings)?;
    }

    match args.headless {
        Some(ticks) => run_headless(world, settings, args.seed, ticks),
        None => run_interactive(world, settings, &args),
    }
}

fn load_world(args: &Args) -> Result<World> {
    let source = match &args.level {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read level at {}", path.display()))?,
        None => DEFAULT_LEVEL.to_owned(),
    };
    World::from_level(&source, &SpriteCatalog::builtin()).context("failed to load level")
}

fn run_headless(world: World, settings: VideoSettings, seed: u64, ticks: u64) -> Result<()> {
    let mut simulation = Simulation::new(world, settings.resolution.dimensions(), seed);
    let mut log = Vec::new();
    let input = InputSnapshot::default();
    for _ in 0..ticks {
        simulation.advance(HEADLESS_STEP, &input, &mut log);
    }

    let summary = RunSummary::collect(simulation.world(), &log);
    info!(ticks, events = log.len(), "headless run finished");
    print!("{summary}");
    Ok(())
}

fn run_interactive(world: World, settings: VideoSettings, args: &Args) -> Result<()> {
    let (width, height) = settings.resolution.dimensions();
    let mut simulation = Simulation::new(world, (width, height), args.seed);
    let window = WindowConfig::new(width, height, settings.fullscreen)?;
    let presentation = Presentation::new(
        "Tilebreaker",
        Color::from_rgb_u8(24, 26, 36),
        window,
        simulation.scene(),
    );

    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync())
        .with_show_fps(args.show_fps)
        .with_debug_bounds(args.debug_bounds)
        .with_sprite_manifest(args.sprites.clone());

    let mut log = Vec::new();
    backend.run(presentation, move |dt, frame, scene| {
        log.clear();
        simulation.advance(dt, &frame.input, &mut log);
        simulation.populate(scene);
    })
}
