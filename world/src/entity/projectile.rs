//! Projectiles: bullets and thrown tile bombs.

use tilebreaker_core::{Facing, HitData};
use tilebreaker_system_collision::CollisionResult;

use super::{
    explosion, facing_rotation, Body, Collidable, Effect, Lifecycle, Movable, TickContext,
};

const BULLET_SPEED: f32 = 1_750.0;
const BULLET_DAMAGE: u32 = 1;

const BOMB_ACCELERATION: f32 = 20_000.0;
const BOMB_DRAG: f32 = 0.58;
const BOMB_MAX_SPEED: f32 = 1_750.0;
const BOMB_ARC_TIME: f32 = 0.15;
const BOMB_LAUNCH_VELOCITY: f32 = -2_000.0;
const BOMB_CONTROL_POWER: f32 = 0.14;
const BOMB_DAMAGE: u32 = 2;

/// Horizontal projectile that dies on its first contact.
#[derive(Clone, Debug)]
pub(crate) struct Bullet {
    facing: Facing,
}

impl Bullet {
    pub(crate) fn new(facing: Facing) -> Self {
        Self { facing }
    }
}

impl Movable for Bullet {
    fn falls(&self) -> bool {
        false
    }

    fn steer(&mut self, body: &mut Body, _ctx: &TickContext<'_>, _effects: &mut Vec<Effect>) {
        body.facing = self.facing;
        body.velocity.x = self.facing.sign() * BULLET_SPEED;
        body.velocity.y = 0.0;
    }
}

impl Collidable for Bullet {
    fn handle_collision(
        &mut self,
        body: &mut Body,
        result: &CollisionResult,
        effects: &mut Vec<Effect>,
    ) -> Lifecycle {
        let Some(contact) = result.contact else {
            return Lifecycle::Alive;
        };

        let hit = HitData::new(facing_rotation(self.facing), body.position, BULLET_DAMAGE);
        effects.push(Effect::Hit { contact, hit });
        effects.push(Effect::Explosion(explosion(
            body.position,
            40,
            8.0,
            (0, 380),
            200,
            None,
        )));
        Lifecycle::Expire
    }
}

/// Arcing explosive that detonates on contact or on request.
#[derive(Clone, Debug)]
pub(crate) struct TileBomb {
    facing: Facing,
    arc_time: f32,
    arc_finished: bool,
}

impl TileBomb {
    pub(crate) fn new(facing: Facing) -> Self {
        Self {
            facing,
            arc_time: 0.0,
            arc_finished: false,
        }
    }

    /// Explosion requested when the bomb goes off at `body`.
    pub(crate) fn detonation(body: &Body) -> Effect {
        Effect::Explosion(explosion(body.position, 80, 50.0, (0, 360), 600, None))
    }

    fn arc(&mut self, velocity_y: f32, dt: f32) -> f32 {
        if self.arc_finished {
            return velocity_y;
        }

        self.arc_time += dt;
        if self.arc_time <= BOMB_ARC_TIME {
            let progress = (self.arc_time / BOMB_ARC_TIME).powf(BOMB_CONTROL_POWER);
            BOMB_LAUNCH_VELOCITY * (1.0 - progress)
        } else {
            self.arc_finished = true;
            velocity_y
        }
    }
}

impl Movable for TileBomb {
    fn falls(&self) -> bool {
        true
    }

    fn steer(&mut self, body: &mut Body, ctx: &TickContext<'_>, _effects: &mut Vec<Effect>) {
        body.facing = self.facing;
        body.velocity.x += self.facing.sign() * BOMB_ACCELERATION * ctx.dt;
        body.velocity.y = self.arc(body.velocity.y, ctx.dt);
        body.velocity.x *= BOMB_DRAG;
        body.velocity.x = body.velocity.x.clamp(-BOMB_MAX_SPEED, BOMB_MAX_SPEED);
    }
}

impl Collidable for TileBomb {
    fn handle_collision(
        &mut self,
        body: &mut Body,
        result: &CollisionResult,
        effects: &mut Vec<Effect>,
    ) -> Lifecycle {
        let Some(contact) = result.contact else {
            body.settle(result);
            return Lifecycle::Alive;
        };

        let hit = HitData::new(facing_rotation(self.facing), body.position, BOMB_DAMAGE);
        effects.push(Effect::Hit { contact, hit });
        effects.push(Self::detonation(body));
        Lifecycle::Expire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bomb_arc_lifts_then_hands_over_to_gravity() {
        let mut bomb = TileBomb::new(Facing::Right);
        let first = bomb.arc(0.0, 0.05);
        assert!(first < 0.0);
        assert!(first > BOMB_LAUNCH_VELOCITY);

        let _ = bomb.arc(0.0, 0.05);
        let _ = bomb.arc(0.0, 0.05);
        assert_eq!(bomb.arc(120.0, 0.05), 120.0);
        assert!(bomb.arc_finished);
        assert_eq!(bomb.arc(80.0, 0.05), 80.0);
    }
}
