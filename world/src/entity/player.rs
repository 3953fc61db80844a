use std::time::Duration;

use glam::Vec2;
use tilebreaker_core::{EntityKind, Facing, SpawnRequest};
use tilebreaker_system_collision::{CollisionResult, Contact};

use super::{
    explosion, Body, Collidable, Damageable, Effect, Health, Lifecycle, Movable, TickContext,
};

// Horizontal movement.
const MOVE_ACCELERATION: f32 = 13_000.0;
const MAX_MOVE_SPEED: f32 = 1_750.0;
const GROUND_DRAG: f32 = 0.48;
const AIR_DRAG: f32 = 0.58;
const MOVEMENT_DEADZONE: f32 = 0.5;

// Vertical jump.
const MAX_JUMP_TIME: f32 = 0.35;
const JUMP_LAUNCH_VELOCITY: f32 = -3_500.0;
const JUMP_CONTROL_POWER: f32 = 0.14;

// Weapons.
const SHOT_DELAY: Duration = Duration::from_millis(300);
const THROW_DELAY: Duration = Duration::from_millis(900);
const BULLET_OFFSET: f32 = 30.0;
const BOMB_OFFSET: f32 = 10.0;

/// Controllable character.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    health: Health,
    jump: JumpState,
    shot_timer: Duration,
    throw_timer: Duration,
    bomb_in_flight: bool,
}

impl Player {
    pub(crate) fn new() -> Self {
        Self {
            health: Health::new(1),
            jump: JumpState::default(),
            shot_timer: Duration::ZERO,
            throw_timer: Duration::ZERO,
            bomb_in_flight: false,
        }
    }

    fn use_weapons(&mut self, body: &Body, ctx: &TickContext<'_>, effects: &mut Vec<Effect>) {
        self.shot_timer = self.shot_timer.saturating_add(ctx.step);
        self.throw_timer = self.throw_timer.saturating_add(ctx.step);

        let facing = body.facing;
        if ctx.intent.fire && self.shot_timer > SHOT_DELAY {
            let position = Vec2::new(
                body.position.x + facing.sign() * BULLET_OFFSET,
                body.position.y - body.frame_height() / 1.5,
            );
            effects.push(Effect::Spawn(SpawnRequest::Bullet { position, facing }));
            effects.push(Effect::Explosion(explosion(
                position,
                4,
                2.0,
                (0, 360),
                100,
                None,
            )));
            self.shot_timer = Duration::ZERO;
        } else if ctx.intent.throw {
            if self.bomb_in_flight && self.throw_timer > THROW_DELAY / 5 {
                effects.push(Effect::DetonateBombs);
                self.bomb_in_flight = false;
            } else if self.throw_timer > THROW_DELAY {
                let position = Vec2::new(
                    body.position.x + facing.sign() * BOMB_OFFSET,
                    body.position.y - body.frame_height(),
                );
                effects.push(Effect::Spawn(SpawnRequest::TileBomb { position, facing }));
                self.throw_timer = Duration::ZERO;
                self.bomb_in_flight = true;
            }
        }
    }
}

impl Movable for Player {
    fn falls(&self) -> bool {
        true
    }

    fn steer(&mut self, body: &mut Body, ctx: &TickContext<'_>, effects: &mut Vec<Effect>) {
        let movement = if ctx.intent.movement.abs() < MOVEMENT_DEADZONE {
            0.0
        } else {
            ctx.intent.movement.clamp(-1.0, 1.0)
        };
        if let Some(facing) = Facing::from_sign(movement) {
            body.facing = facing;
        }

        self.use_weapons(body, ctx, effects);

        body.velocity.x += movement * MOVE_ACCELERATION * ctx.dt;
        body.velocity.y = self
            .jump
            .apply(ctx.intent.jump, body.on_ground, body.velocity.y, ctx.dt);
        body.velocity.x *= if body.on_ground { GROUND_DRAG } else { AIR_DRAG };
        body.velocity.x = body.velocity.x.clamp(-MAX_MOVE_SPEED, MAX_MOVE_SPEED);
    }
}

impl Collidable for Player {
    fn handle_collision(
        &mut self,
        body: &mut Body,
        result: &CollisionResult,
        effects: &mut Vec<Effect>,
    ) -> Lifecycle {
        body.settle(result);
        if let Some(Contact::Entity {
            kind: EntityKind::Enemy,
            ..
        }) = result.contact
        {
            effects.push(Effect::PlayerCaught);
        }
        Lifecycle::Alive
    }
}

impl Damageable for Player {
    fn health(&self) -> Health {
        self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

/// Variable-height jump: holding the control extends the ascent up to a cap.
#[derive(Clone, Copy, Debug, Default)]
struct JumpState {
    was_jumping: bool,
    jump_time: f32,
}

impl JumpState {
    fn apply(&mut self, jumping: bool, on_ground: bool, velocity_y: f32, dt: f32) -> f32 {
        let mut velocity_y = velocity_y;
        if jumping {
            if (!self.was_jumping && on_ground) || self.jump_time > 0.0 {
                self.jump_time += dt;
            }

            if 0.0 < self.jump_time && self.jump_time <= MAX_JUMP_TIME {
                let progress = (self.jump_time / MAX_JUMP_TIME).powf(JUMP_CONTROL_POWER);
                velocity_y = JUMP_LAUNCH_VELOCITY * (1.0 - progress);
            } else {
                self.jump_time = 0.0;
            }
        } else {
            self.jump_time = 0.0;
        }
        self.was_jumping = jumping;
        velocity_y
    }
}
