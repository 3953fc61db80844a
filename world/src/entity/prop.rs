//! Destructible level props.

use tilebreaker_core::TileIndex;
use tilebreaker_system_collision::CollisionResult;

use super::{Body, Collidable, Damageable, Effect, Health, Lifecycle, Movable, TickContext};

const BREAKABLE_TILE_HEALTH: u32 = 3;
const OBSTACLE_HEALTH: u32 = 5;

/// Solid tile that owns its grid cell until destroyed.
#[derive(Clone, Debug)]
pub(crate) struct BreakableTile {
    tile: TileIndex,
    health: Health,
}

impl BreakableTile {
    pub(crate) fn new(tile: TileIndex) -> Self {
        Self {
            tile,
            health: Health::new(BREAKABLE_TILE_HEALTH),
        }
    }

    pub(crate) const fn tile(&self) -> TileIndex {
        self.tile
    }
}

impl Damageable for BreakableTile {
    fn health(&self) -> Health {
        self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

/// Gravity-bound prop tested per pixel.
#[derive(Clone, Debug)]
pub(crate) struct Obstacle {
    health: Health,
}

impl Obstacle {
    pub(crate) fn new() -> Self {
        Self {
            health: Health::new(OBSTACLE_HEALTH),
        }
    }
}

impl Movable for Obstacle {
    fn falls(&self) -> bool {
        true
    }

    fn steer(&mut self, body: &mut Body, _ctx: &TickContext<'_>, _effects: &mut Vec<Effect>) {
        body.velocity.x = 0.0;
    }
}

impl Collidable for Obstacle {
    fn handle_collision(
        &mut self,
        body: &mut Body,
        result: &CollisionResult,
        _effects: &mut Vec<Effect>,
    ) -> Lifecycle {
        body.settle(result);
        Lifecycle::Alive
    }
}

impl Damageable for Obstacle {
    fn health(&self) -> Health {
        self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}
