use tilebreaker_core::{EntityKind, Facing};
use tilebreaker_system_collision::{CollisionResult, Contact};

use super::{Body, Collidable, Damageable, Effect, Health, Lifecycle, Movable, TickContext};

const WALK_SPEED: f32 = 64.0;
/// Horizontal distance under which the enemy stops turning toward the player.
const ENGAGE_DISTANCE: f32 = 2.0;

/// Walker that closes in on the player's column.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    health: Health,
}

impl Enemy {
    pub(crate) fn new() -> Self {
        Self {
            health: Health::new(2),
        }
    }
}

/// Melee offensive rule: face the player's x coordinate.
fn pursue(body: &Body, target_x: f32) -> Option<Facing> {
    let offset = target_x - body.position.x;
    if offset.abs() <= ENGAGE_DISTANCE {
        return None;
    }
    Facing::from_sign(offset)
}

impl Movable for Enemy {
    fn falls(&self) -> bool {
        true
    }

    fn steer(&mut self, body: &mut Body, ctx: &TickContext<'_>, _effects: &mut Vec<Effect>) {
        match ctx
            .player_position
            .and_then(|target| pursue(body, target.x))
        {
            Some(facing) => {
                body.facing = facing;
                body.velocity.x = facing.sign() * WALK_SPEED;
            }
            None => body.velocity.x = 0.0,
        }
    }
}

impl Collidable for Enemy {
    fn handle_collision(
        &mut self,
        body: &mut Body,
        result: &CollisionResult,
        effects: &mut Vec<Effect>,
    ) -> Lifecycle {
        body.settle(result);
        if let Some(Contact::Entity {
            kind: EntityKind::Player,
            ..
        }) = result.contact
        {
            effects.push(Effect::PlayerCaught);
        }
        Lifecycle::Alive
    }
}

impl Damageable for Enemy {
    fn health(&self) -> Health {
        self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}
