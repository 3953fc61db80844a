#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Tilebreaker.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the crate is pulled in without its default `audio` feature.
//!
//! Entities are drawn from the sprite manifest when one is configured and as
//! flat rectangles otherwise.

mod sprites;

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, mouse_position, KeyCode};
use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::mpsc,
    time::{Duration, Instant},
};
use tilebreaker_core::{EntityKind, Facing, InputSnapshot, Key, Rect, SpriteKey};
use tilebreaker_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, SceneEntity, TileVisual,
};
use tracing::{info, warn};

use self::sprites::{DrawParams, SpriteAtlas};

const KEY_BINDINGS: [(KeyCode, Key); 10] = [
    (KeyCode::Left, Key::Left),
    (KeyCode::Right, Key::Right),
    (KeyCode::Up, Key::Up),
    (KeyCode::A, Key::A),
    (KeyCode::D, Key::D),
    (KeyCode::W, Key::W),
    (KeyCode::Space, Key::Space),
    (KeyCode::LeftControl, Key::LeftControl),
    (KeyCode::X, Key::X),
    (KeyCode::Enter, Key::Enter),
];

const HUD_FONT_SIZE: f32 = 24.0;
const STATUS_FONT_SIZE: f32 = 48.0;
const CROSSHAIR_ARM: f32 = 8.0;
const PARTICLE_RADIUS: f32 = 12.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` or `Q` quits the game loop.
    quit_requested: bool,
    /// `B` toggles bounding-box outlines.
    toggle_bounds: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            toggle_bounds: is_key_pressed(KeyCode::B),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    debug_bounds: bool,
    sprite_manifest: Option<PathBuf>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether bounding boxes are outlined from the first frame.
    #[must_use]
    pub fn with_debug_bounds(mut self, enabled: bool) -> Self {
        self.debug_bounds = enabled;
        self
    }

    /// Loads sprite textures from the manifest at `path` instead of drawing rectangles.
    #[must_use]
    pub fn with_sprite_manifest(mut self, path: Option<PathBuf>) -> Self {
        self.sprite_manifest = path;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns averages once one second has elapsed.
    fn record_frame(
        &mut self,
        frame: Duration,
        update: Duration,
        render: Duration,
    ) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += update;
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;
        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: self.update_accum / self.frames,
            avg_render: self.render_accum / self.frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            debug_bounds,
            sprite_manifest,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            window,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window.width()).context("window width overflows")?,
            window_height: i32::try_from(window.height()).context("window height overflows")?,
            fullscreen: window.fullscreen(),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let sprite_atlas = match sprite_manifest.map(SpriteAtlas::from_manifest_path) {
                Some(Ok(atlas)) => {
                    info!(textures = atlas.len(), "sprite atlas loaded");
                    Some(atlas)
                }
                Some(Err(error)) => {
                    let _ = atlas_init_sender.send(Err(error));
                    return;
                }
                None => None,
            };
            let _ = atlas_init_sender.send(Ok(()));

            let mut scene = scene;
            scene.show_bounds = debug_bounds;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let (cursor_x, cursor_y) = mouse_position();
            let mut last_cursor = Vec2::new(cursor_x, cursor_y);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let (cursor_x, cursor_y) = mouse_position();
                let cursor = Vec2::new(cursor_x, cursor_y);
                let frame_input = FrameInput {
                    input: InputSnapshot::new(held_keys(is_key_down), cursor - last_cursor),
                };
                last_cursor = cursor;

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();
                if keyboard.toggle_bounds {
                    scene.show_bounds = !scene.show_bounds;
                }

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_scene(&scene, screen, sprite_atlas.as_ref());
                let render_duration = render_start.elapsed();

                let metrics = fps_counter.record_frame(frame_dt, update_duration, render_duration);
                if show_fps {
                    if let Some(metrics) = metrics {
                        info!(
                            fps = metrics.per_second,
                            trailing_fps = metrics.trailing_ten_seconds,
                            update_ms = metrics.avg_update.as_secs_f64() * 1_000.0,
                            render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
                            "frame timings"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| {
            warn!("render loop exited before reporting sprite loading");
            Ok(())
        })?;

        Ok(())
    }
}

/// Keys from the binding table that `is_down` reports as held.
fn held_keys(is_down: impl Fn(KeyCode) -> bool) -> Vec<Key> {
    KEY_BINDINGS
        .iter()
        .filter(|(code, _)| is_down(*code))
        .map(|(_, key)| *key)
        .collect()
}

#[derive(Clone, Copy, Debug)]
struct ScreenRect {
    position: Vec2,
    size: Vec2,
}

fn project(scene: &Scene, screen: Vec2, rect: Rect) -> ScreenRect {
    let corner = Vec2::new(rect.left() as f32, rect.top() as f32);
    let size = Vec2::new(rect.width() as f32, rect.height() as f32);
    ScreenRect {
        position: scene.world_to_screen(corner, screen),
        size: size * scene.screen_scale(screen),
    }
}

fn draw_scene(scene: &Scene, screen: Vec2, atlas: Option<&SpriteAtlas>) {
    draw_tiles(scene, screen, atlas);
    draw_exit(scene, screen);
    for entity in &scene.entities {
        draw_entity(scene, screen, entity, atlas);
    }
    draw_particles(scene, screen, atlas);
    draw_crosshair(scene, screen);
    draw_hud(scene, screen);
}

fn draw_tiles(scene: &Scene, screen: Vec2, atlas: Option<&SpriteAtlas>) {
    for tile in &scene.tiles {
        if !tile.bounds.intersects(&scene.camera) {
            continue;
        }
        let target = project(scene, screen, tile.bounds);
        let drawn = tile.visual == TileVisual::Breakable
            && atlas.is_some_and(|atlas| {
                atlas.draw(
                    SpriteKey::BreakableTile,
                    DrawParams {
                        position: target.position,
                        size: target.size,
                        flip_x: false,
                        tint: Color::new(1.0, 1.0, 1.0, 1.0),
                    },
                )
            });
        if !drawn {
            fill(target, tile_color(tile.visual));
        }
    }
}

fn draw_exit(scene: &Scene, screen: Vec2) {
    let centre = scene.world_to_screen(scene.exit.as_vec2(), screen);
    let color = to_macroquad_color(Color::from_rgb_u8(250, 220, 90));
    macroquad::shapes::draw_circle_lines(centre.x, centre.y, 12.0, 3.0, color);
}

fn draw_entity(scene: &Scene, screen: Vec2, entity: &SceneEntity, atlas: Option<&SpriteAtlas>) {
    let target = project(scene, screen, entity.bounds);
    let drawn = atlas.is_some_and(|atlas| {
        atlas.draw(
            sprite_for(entity.kind),
            DrawParams {
                position: target.position,
                size: target.size,
                flip_x: entity.facing == Facing::Left,
                tint: Color::new(1.0, 1.0, 1.0, 1.0),
            },
        )
    });
    if !drawn {
        fill(target, entity_color(entity.kind));
    }

    if scene.show_bounds {
        let outline = to_macroquad_color(Color::from_rgb_u8(255, 0, 255));
        macroquad::shapes::draw_rectangle_lines(
            target.position.x,
            target.position.y,
            target.size.x,
            target.size.y,
            1.0,
            outline,
        );
    }
}

fn draw_particles(scene: &Scene, screen: Vec2, atlas: Option<&SpriteAtlas>) {
    let scale = scene.screen_scale(screen);
    for particle in &scene.particles {
        let centre = scene.world_to_screen(particle.position, screen);
        let radius = PARTICLE_RADIUS * particle.scale * scale.x;
        let tint = Color::new(1.0, 1.0, 1.0, 1.0).fade(particle.alpha);
        let drawn = atlas.is_some_and(|atlas| {
            atlas.draw(
                particle.texture,
                DrawParams {
                    position: centre - Vec2::splat(radius),
                    size: Vec2::splat(radius * 2.0),
                    flip_x: false,
                    tint,
                },
            )
        });
        if !drawn {
            let color = Color::from_rgb_u8(255, 170, 60).fade(particle.alpha);
            macroquad::shapes::draw_circle(centre.x, centre.y, radius, to_macroquad_color(color));
        }
    }
}

fn draw_crosshair(scene: &Scene, screen: Vec2) {
    let centre = scene.world_to_screen(scene.crosshair, screen);
    let color = to_macroquad_color(Color::from_rgb_u8(255, 255, 255));
    macroquad::shapes::draw_line(
        centre.x - CROSSHAIR_ARM,
        centre.y,
        centre.x + CROSSHAIR_ARM,
        centre.y,
        2.0,
        color,
    );
    macroquad::shapes::draw_line(
        centre.x,
        centre.y - CROSSHAIR_ARM,
        centre.x,
        centre.y + CROSSHAIR_ARM,
        2.0,
        color,
    );
}

fn draw_hud(scene: &Scene, screen: Vec2) {
    let text_color = to_macroquad_color(Color::from_rgb_u8(235, 235, 235));
    for (row, message) in scene.hud.messages.iter().enumerate() {
        let baseline = HUD_FONT_SIZE * (row as f32 + 1.0) + 8.0;
        let _ = macroquad::text::draw_text(message, 12.0, baseline, HUD_FONT_SIZE, text_color);
    }

    let clock = format_clock(scene.hud.time_remaining);
    let _ = macroquad::text::draw_text(
        &clock,
        screen.x - 96.0,
        HUD_FONT_SIZE + 8.0,
        HUD_FONT_SIZE,
        text_color,
    );

    if let Some(status) = &scene.hud.status {
        let dimensions = macroquad::text::measure_text(status, None, STATUS_FONT_SIZE as u16, 1.0);
        let _ = macroquad::text::draw_text(
            status,
            (screen.x - dimensions.width) / 2.0,
            screen.y / 2.0,
            STATUS_FONT_SIZE,
            text_color,
        );
    }
}

/// Minutes and seconds left, rounded up so the clock reads `0:00` only once time is out.
fn format_clock(remaining: Duration) -> String {
    let seconds = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn fill(target: ScreenRect, color: Color) {
    macroquad::shapes::draw_rectangle(
        target.position.x,
        target.position.y,
        target.size.x,
        target.size.y,
        to_macroquad_color(color),
    );
}

fn sprite_for(kind: EntityKind) -> SpriteKey {
    match kind {
        EntityKind::Player => SpriteKey::Player,
        EntityKind::Enemy => SpriteKey::Enemy,
        EntityKind::Bullet => SpriteKey::Bullet,
        EntityKind::TileBomb => SpriteKey::TileBomb,
        EntityKind::BreakableTile => SpriteKey::BreakableTile,
        EntityKind::Obstacle => SpriteKey::Obstacle,
    }
}

fn entity_color(kind: EntityKind) -> Color {
    match kind {
        EntityKind::Player => Color::from_rgb_u8(70, 160, 255),
        EntityKind::Enemy => Color::from_rgb_u8(220, 60, 60),
        EntityKind::Bullet => Color::from_rgb_u8(255, 240, 120),
        EntityKind::TileBomb => Color::from_rgb_u8(40, 40, 40),
        EntityKind::BreakableTile => Color::from_rgb_u8(150, 110, 70),
        EntityKind::Obstacle => Color::from_rgb_u8(90, 140, 70),
    }
}

fn tile_color(visual: TileVisual) -> Color {
    match visual {
        TileVisual::Ground => Color::from_rgb_u8(96, 80, 64),
        TileVisual::Platform => Color::from_rgb_u8(130, 130, 150),
        TileVisual::Breakable => Color::from_rgb_u8(150, 110, 70),
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_follow_the_binding_table() {
        let held = held_keys(|code| matches!(code, KeyCode::A | KeyCode::LeftControl | KeyCode::Z));
        assert_eq!(held, vec![Key::A, Key::LeftControl]);
        assert!(held_keys(|_| false).is_empty());
        assert_eq!(held_keys(|_| true).len(), KEY_BINDINGS.len());
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);
        for _ in 0..3 {
            assert!(counter
                .record_frame(frame, Duration::from_millis(2), Duration::from_millis(4))
                .is_none());
        }

        let metrics = counter
            .record_frame(frame, Duration::from_millis(2), Duration::from_millis(4))
            .expect("a full second has elapsed");
        assert!((metrics.per_second - 4.0).abs() < 1e-4);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() < 1e-4);
        assert_eq!(metrics.avg_update, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(4));
        assert!(counter
            .record_frame(frame, Duration::ZERO, Duration::ZERO)
            .is_none());
    }

    #[test]
    fn project_maps_world_rectangles_through_the_camera() {
        let scene = Scene::new(
            Rect::new(0, 0, 400, 96),
            Rect::new(0, 0, 200, 100),
            glam::IVec2::ZERO,
        );
        let target = project(&scene, Vec2::new(400.0, 200.0), Rect::new(40, 32, 40, 32));
        assert_eq!(target.position, Vec2::new(80.0, 64.0));
        assert_eq!(target.size, Vec2::new(80.0, 64.0));
    }

    #[test]
    fn clock_rounds_partial_seconds_up() {
        assert_eq!(format_clock(Duration::from_secs(120)), "2:00");
        assert_eq!(format_clock(Duration::from_millis(59_001)), "1:00");
        assert_eq!(format_clock(Duration::from_millis(500)), "0:01");
        assert_eq!(format_clock(Duration::ZERO), "0:00");
    }
}
