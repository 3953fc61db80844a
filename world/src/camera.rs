//! Eased follow camera.

use glam::Vec2;
use tilebreaker_core::Rect;

/// Fraction of the remaining distance covered per second.
const MOVE_SPEED: f32 = 1.25;
const DEFAULT_VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

#[derive(Clone, Debug)]
pub(crate) struct Camera {
    position: Vec2,
    viewport: Vec2,
}

impl Camera {
    pub(crate) fn new(focus: Vec2) -> Self {
        Self {
            position: focus,
            viewport: DEFAULT_VIEWPORT,
        }
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    /// Eases toward `focus` and returns the displacement applied.
    pub(crate) fn follow(&mut self, focus: Vec2, dt: f32) -> Vec2 {
        let delta = (focus - self.position) * MOVE_SPEED * dt;
        self.position += delta;
        delta
    }

    /// Jumps straight to `focus` without easing.
    pub(crate) fn snap_to(&mut self, focus: Vec2) -> Vec2 {
        let delta = focus - self.position;
        self.position = focus;
        delta
    }

    /// World-space rectangle visible through the viewport.
    pub(crate) fn view(&self) -> Rect {
        let corner = self.position - self.viewport / 2.0;
        Rect::new(
            corner.x.round() as i32,
            corner.y.round() as i32,
            self.viewport.x.round() as i32,
            self.viewport.y.round() as i32,
        )
    }
}
