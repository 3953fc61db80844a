//! Entity model: one concrete entity holding a tagged behaviour.
//!
//! Every entity shares a [`Body`] and a dead flag. Behaviour-specific state
//! lives in [`Behaviour`], whose variants opt into the small capability
//! traits below. Entities never touch each other or the grid directly; side
//! effects are requested through [`Effect`] values that the world dispatches.

mod enemy;
mod player;
mod projectile;
mod prop;

use std::{f32::consts::PI, sync::Arc, time::Duration};

use glam::{IVec2, Vec2};
use tilebreaker_core::{
    BoxShape, CollisionFidelity, EntityId, EntityKind, EntitySnapshot, ExplosionSpec, Facing,
    HitData, PlayerIntent, Rect, SpawnRequest, SpriteKey, SpriteMask, TileIndex,
};
use tilebreaker_system_collision::{self as collision, Collider, CollisionResult, Contact, Subject};

use crate::{content::Sprite, grid::Grid};

pub(crate) use self::{
    enemy::Enemy,
    player::Player,
    projectile::{Bullet, TileBomb},
    prop::{BreakableTile, Obstacle},
};

/// Downward acceleration applied to falling entities, in units per second squared.
const GRAVITY: f32 = 3400.0;
/// Terminal vertical speed of falling entities.
const MAX_FALL_SPEED: f32 = 550.0;

/// Side effect requested by an entity during its update or death.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Effect {
    /// Admit a new entity on the next tick.
    Spawn(SpawnRequest),
    /// Forward an explosion to the particle collaborator.
    Explosion(ExplosionSpec),
    /// Deliver a hit to whatever the contact refers to.
    Hit { contact: Contact, hit: HitData },
    /// Clear a grid cell whose owner died.
    RemoveTile(TileIndex),
    /// An enemy and the player touched.
    PlayerCaught,
    /// Detonate every tile bomb in flight.
    DetonateBombs,
}

/// Whether an entity survives its own collision reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    Alive,
    Expire,
}

/// Read-only data available to every entity during a tick.
pub(crate) struct TickContext<'a> {
    pub(crate) step: Duration,
    pub(crate) dt: f32,
    pub(crate) intent: PlayerIntent,
    pub(crate) player_position: Option<Vec2>,
    pub(crate) grid: &'a Grid,
}

/// Remaining hit points of a damageable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Health {
    remaining: u32,
}

impl Health {
    pub(crate) const fn new(points: u32) -> Self {
        Self { remaining: points }
    }

    pub(crate) const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Removes `damage` points and reports whether the entity is depleted.
    pub(crate) fn absorb(&mut self, damage: u32) -> bool {
        self.remaining = self.remaining.saturating_sub(damage);
        self.remaining == 0
    }
}

/// Physical state shared by every entity.
#[derive(Clone, Debug)]
pub(crate) struct Body {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) facing: Facing,
    pub(crate) on_ground: bool,
    pub(crate) previous_bounds: Rect,
    shape: BoxShape,
    fidelity: CollisionFidelity,
    mask: Arc<SpriteMask>,
}

impl Body {
    pub(crate) fn new(sprite: &Sprite, position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::default(),
            on_ground: false,
            previous_bounds: sprite.shape.bounds_at(position),
            shape: sprite.shape,
            fidelity: sprite.fidelity,
            mask: Arc::clone(&sprite.mask),
        }
    }

    pub(crate) fn bounds(&self) -> Rect {
        self.shape.bounds_at(self.position)
    }

    pub(crate) fn frame_origin(&self) -> IVec2 {
        self.shape.frame_origin(self.position)
    }

    pub(crate) fn frame_height(&self) -> f32 {
        self.mask.height() as f32
    }

    /// Records ground contact and stops motion along blocked axes.
    pub(crate) fn settle(&mut self, result: &CollisionResult) {
        self.on_ground = result.on_ground;
        if result.blocked_horizontally() {
            self.velocity.x = 0.0;
        }
        if result.blocked_vertically() {
            self.velocity.y = 0.0;
        }
    }
}

/// Entities that integrate velocity every tick.
pub(crate) trait Movable {
    /// Whether gravity pulls on the entity.
    fn falls(&self) -> bool;

    /// Applies type-specific forces and intents before integration.
    fn steer(&mut self, body: &mut Body, ctx: &TickContext<'_>, effects: &mut Vec<Effect>);
}

/// Entities that react to the resolver's verdict.
pub(crate) trait Collidable {
    fn handle_collision(
        &mut self,
        body: &mut Body,
        result: &CollisionResult,
        effects: &mut Vec<Effect>,
    ) -> Lifecycle;
}

/// Entities that absorb hits until their health runs out.
pub(crate) trait Damageable {
    fn health(&self) -> Health;

    fn health_mut(&mut self) -> &mut Health;

    /// Applies the hit and reports whether the entity is depleted.
    fn on_hit(&mut self, hit: &HitData) -> bool {
        self.health_mut().absorb(hit.damage())
    }
}

/// Movable entity that also reacts to collisions.
pub(crate) trait Actor: Movable + Collidable {}

impl<T: Movable + Collidable> Actor for T {}

/// Behaviour-specific state of an entity.
#[derive(Clone, Debug)]
pub(crate) enum Behaviour {
    Player(Player),
    Enemy(Enemy),
    Bullet(Bullet),
    TileBomb(TileBomb),
    BreakableTile(BreakableTile),
    Obstacle(Obstacle),
}

impl Behaviour {
    pub(crate) const fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Enemy(_) => EntityKind::Enemy,
            Self::Bullet(_) => EntityKind::Bullet,
            Self::TileBomb(_) => EntityKind::TileBomb,
            Self::BreakableTile(_) => EntityKind::BreakableTile,
            Self::Obstacle(_) => EntityKind::Obstacle,
        }
    }

    fn as_actor(&mut self) -> Option<&mut dyn Actor> {
        match self {
            Self::Player(player) => Some(player),
            Self::Enemy(enemy) => Some(enemy),
            Self::Bullet(bullet) => Some(bullet),
            Self::TileBomb(bomb) => Some(bomb),
            Self::Obstacle(obstacle) => Some(obstacle),
            Self::BreakableTile(_) => None,
        }
    }

    fn as_damageable(&mut self) -> Option<&mut dyn Damageable> {
        match self {
            Self::Player(player) => Some(player),
            Self::Enemy(enemy) => Some(enemy),
            Self::Obstacle(obstacle) => Some(obstacle),
            Self::BreakableTile(tile) => Some(tile),
            Self::Bullet(_) | Self::TileBomb(_) => None,
        }
    }

    fn health(&self) -> Option<Health> {
        match self {
            Self::Player(player) => Some(player.health()),
            Self::Enemy(enemy) => Some(enemy.health()),
            Self::Obstacle(obstacle) => Some(obstacle.health()),
            Self::BreakableTile(tile) => Some(tile.health()),
            Self::Bullet(_) | Self::TileBomb(_) => None,
        }
    }

    fn on_death(&mut self, body: &Body, effects: &mut Vec<Effect>) {
        match self {
            Self::BreakableTile(tile) => effects.push(Effect::RemoveTile(tile.tile())),
            Self::Obstacle(_) => effects.push(Effect::Explosion(explosion(
                body.bounds().center().as_vec2(),
                20,
                30.0,
                (0, 360),
                400,
                Some(SpriteKey::TileDebris),
            ))),
            Self::Enemy(_) => effects.push(Effect::Explosion(explosion(
                body.bounds().center().as_vec2(),
                30,
                30.0,
                (0, 360),
                500,
                None,
            ))),
            Self::Player(_) | Self::Bullet(_) | Self::TileBomb(_) => {}
        }
    }
}

/// A live or dead entity owned by the world.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) body: Body,
    pub(crate) behaviour: Behaviour,
    dead: bool,
}

impl Entity {
    pub(crate) fn new(id: EntityId, body: Body, behaviour: Behaviour) -> Self {
        Self {
            id,
            body,
            behaviour,
            dead: false,
        }
    }

    pub(crate) const fn kind(&self) -> EntityKind {
        self.behaviour.kind()
    }

    pub(crate) const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Whether the entity takes part in other entities' collision checks.
    pub(crate) fn is_collider(&self) -> bool {
        !self.dead && !self.kind().is_grid_bound()
    }

    /// Flips the entity into the dead state.
    ///
    /// Returns `false` without side effects when the entity was already dead;
    /// otherwise runs the death reaction exactly once.
    pub(crate) fn kill(&mut self, effects: &mut Vec<Effect>) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        self.behaviour.on_death(&self.body, effects);
        true
    }

    /// Applies a hit, returning `None` when the entity cannot be damaged and
    /// otherwise whether its health ran out.
    pub(crate) fn hit(&mut self, hit: &HitData) -> Option<bool> {
        if self.dead {
            return None;
        }
        self.behaviour
            .as_damageable()
            .map(|damageable| damageable.on_hit(hit))
    }

    pub(crate) fn collider(&self) -> Collider<'_> {
        Collider {
            id: self.id,
            kind: self.kind(),
            bounds: self.body.bounds(),
            frame_origin: self.body.frame_origin(),
            fidelity: self.body.fidelity,
            mask: &self.body.mask,
        }
    }

    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            kind: self.kind(),
            position: self.body.position,
            velocity: self.body.velocity,
            bounds: self.body.bounds(),
            frame_origin: self.body.frame_origin(),
            facing: self.body.facing,
            on_ground: self.body.on_ground,
            health: self.behaviour.health().map(|health| health.remaining()),
        }
    }

    /// Runs one update: forces, integration, collision, reaction.
    pub(crate) fn update<'a, I>(
        &mut self,
        ctx: &TickContext<'_>,
        others: I,
        effects: &mut Vec<Effect>,
    ) -> Lifecycle
    where
        I: IntoIterator<Item = Collider<'a>>,
    {
        let id = self.id;
        let kind = self.kind();
        let body = &mut self.body;
        let Some(actor) = self.behaviour.as_actor() else {
            return Lifecycle::Alive;
        };

        let position_before_update = body.position;
        if actor.falls() {
            body.velocity.y =
                (body.velocity.y + GRAVITY * ctx.dt).clamp(-MAX_FALL_SPEED, MAX_FALL_SPEED);
        }
        actor.steer(body, ctx, effects);

        let integrated = body.position + body.velocity * ctx.dt;
        body.position = Vec2::new(integrated.x.round_ties_even(), integrated.y.round_ties_even());

        let subject = Subject {
            id,
            kind,
            position_before_update,
            position: body.position,
            shape: body.shape,
            previous_bounds: body.previous_bounds,
            fidelity: body.fidelity,
            mask: &body.mask,
        };
        let others: Vec<Collider<'a>> = others.into_iter().collect();
        let result = collision::sweep(ctx.grid, &subject, &others);

        body.position = result.position;
        body.previous_bounds = result.bounds;
        actor.handle_collision(body, &result, effects)
    }
}

/// Direction of a horizontal hit in radians.
pub(crate) fn facing_rotation(facing: Facing) -> f32 {
    match facing {
        Facing::Right => 0.0,
        Facing::Left => PI,
    }
}

pub(crate) fn explosion(
    position: Vec2,
    particle_count: u32,
    size: f32,
    (min_angle, max_angle): (i32, i32),
    max_age_ms: u64,
    texture: Option<SpriteKey>,
) -> ExplosionSpec {
    ExplosionSpec {
        position,
        particle_count,
        size,
        min_angle,
        max_angle,
        max_age: Duration::from_millis(max_age_ms),
        texture,
    }
}

/// Debris thrown back from a struck tile, spread around the reversed hit direction.
pub(crate) fn tile_debris(hit: &HitData) -> ExplosionSpec {
    let angle = hit.rotation().to_degrees().round() as i32 + 180;
    explosion(
        hit.position(),
        30,
        40.0,
        (angle - 45, angle + 45),
        600,
        Some(SpriteKey::TileDebris),
    )
}
