#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tilebreaker adapters.

mod particles;

use anyhow::Result as AnyResult;
use glam::{IVec2, Vec2};
use std::{error::Error, fmt, time::Duration};
use tilebreaker_core::{EntityId, EntityKind, Facing, InputSnapshot, Rect};

pub use particles::{ParticleField, ParticleInstance};

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

    /// Returns the same color with its alpha multiplied by `factor`.
    #[must_use]
    pub fn fade(self, factor: f32) -> Self {
        Self {
            alpha: self.alpha * factor.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Keys held and pointer motion sampled for the frame.
    pub input: InputSnapshot,
}

/// Visual category of a solid grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileVisual {
    /// Indestructible ground.
    Ground,
    /// One-way platform.
    Platform,
    /// Cell owned by a destructible tile.
    Breakable,
}

/// Solid cell drawn behind the entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTile {
    /// World-space rectangle of the cell.
    pub bounds: Rect,
    /// How the cell should look.
    pub visual: TileVisual,
}

/// Live entity drawn by the backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEntity {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Variant of the entity.
    pub kind: EntityKind,
    /// World-space bounding box.
    pub bounds: Rect,
    /// Horizontal facing used to mirror the sprite.
    pub facing: Facing,
    /// Remaining hit points for damageable entities.
    pub health: Option<u32>,
}

/// Overlay text composed by the HUD system.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HudPresentation {
    /// Recent messages from oldest to newest.
    pub messages: Vec<String>,
    /// Caption of the status overlay, if one is shown.
    pub status: Option<String>,
    /// Time left before the level times out.
    pub time_remaining: Duration,
}

/// Everything the backend draws for one frame, in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Extent of the level grid.
    pub level_bounds: Rect,
    /// World-space region visible through the camera.
    pub camera: Rect,
    /// Solid cells of the grid.
    pub tiles: Vec<SceneTile>,
    /// Live entities sorted by identifier.
    pub entities: Vec<SceneEntity>,
    /// Live explosion particles.
    pub particles: Vec<ParticleInstance>,
    /// Point the player must reach.
    pub exit: IVec2,
    /// World-space aim point.
    pub crosshair: Vec2,
    /// HUD overlay.
    pub hud: HudPresentation,
    /// Whether bounding boxes should be outlined.
    pub show_bounds: bool,
}

impl Scene {
    /// Creates an empty scene covering `level_bounds` and viewed through `camera`.
    #[must_use]
    pub fn new(level_bounds: Rect, camera: Rect, exit: IVec2) -> Self {
        Self {
            level_bounds,
            camera,
            tiles: Vec::new(),
            entities: Vec::new(),
            particles: Vec::new(),
            exit,
            crosshair: camera.center().as_vec2(),
            hud: HudPresentation::default(),
            show_bounds: false,
        }
    }

    /// Maps a world position into the camera's screen space scaled to `screen`.
    #[must_use]
    pub fn world_to_screen(&self, position: Vec2, screen: Vec2) -> Vec2 {
        let origin = Vec2::new(self.camera.left() as f32, self.camera.top() as f32);
        (position - origin) * self.screen_scale(screen)
    }

    /// Screen pixels per world unit along each axis.
    #[must_use]
    pub fn screen_scale(&self, screen: Vec2) -> Vec2 {
        let view = Vec2::new(
            self.camera.width().max(1) as f32,
            self.camera.height().max(1) as f32,
        );
        screen / view
    }
}

/// Window configuration requested by the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    width: u32,
    height: u32,
    fullscreen: bool,
}

impl WindowConfig {
    /// Creates a window configuration, rejecting empty dimensions.
    pub fn new(width: u32, height: u32, fullscreen: bool) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::InvalidWindowSize { width, height });
        }
        Ok(Self {
            width,
            height,
            fullscreen,
        })
    }

    /// Window width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Window height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the window covers the whole display.
    #[must_use]
    pub const fn fullscreen(&self) -> bool {
        self.fullscreen
    }
}

/// Static presentation parameters plus the initial scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the window.
    pub window_title: String,
    /// Color used to clear each frame.
    pub clear_color: Color,
    /// Requested window geometry.
    pub window: WindowConfig,
    /// Scene drawn before the first update.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, window: WindowConfig, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            window,
            scene,
        }
    }
}

/// Backend capable of presenting scenes and sampling player input.
pub trait RenderingBackend {
    /// Runs the backend until the player quits.
    ///
    /// `update_scene` is invoked once per frame with the elapsed time and the
    /// sampled input, and must leave the scene ready to draw.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors raised while describing a presentation.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A window dimension was zero.
    InvalidWindowSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWindowSize { width, height } => {
                write!(f, "window size must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
