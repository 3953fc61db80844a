#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tilebreaker engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to deterministically. Geometry helpers live
//! here as well so that every crate derives bounding boxes and penetration
//! depths the same way.

use std::time::Duration;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tilebreaker.";

/// Width of a single level tile measured in world units.
pub const TILE_WIDTH: i32 = 40;

/// Height of a single level tile measured in world units.
pub const TILE_HEIGHT: i32 = 32;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resizes the camera viewport that drives culling and camera follow.
    ConfigureViewport {
        /// Width of the visible region in world units.
        width: u32,
        /// Height of the visible region in world units.
        height: u32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Player intent sampled for this tick.
        intent: PlayerIntent,
    },
    /// Requests that the world admit a new entity on the next tick.
    Spawn {
        /// Description of the entity to create.
        request: SpawnRequest,
    },
    /// Forces the identified entity into the dead state.
    Kill {
        /// Identifier of the entity to kill.
        entity: EntityId,
    },
    /// Requests a fresh player at the level start after a death.
    StartNewLife,
    /// Detonates every tile bomb currently in flight.
    DetonateBombs,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports the camera displacement applied during the tick.
    CameraMoved {
        /// World-space translation of the camera centre.
        delta: Vec2,
    },
    /// Confirms that an entity was created and queued for admission.
    EntitySpawned {
        /// Identifier assigned to the entity.
        entity: EntityId,
        /// Variant of the spawned entity.
        kind: EntityKind,
    },
    /// Reports that an entity absorbed a hit.
    EntityHit {
        /// Identifier of the struck entity.
        entity: EntityId,
        /// Variant of the struck entity.
        kind: EntityKind,
        /// Hit points removed by the hit.
        damage: u32,
    },
    /// Reports that an entity transitioned into the dead state.
    EntityDied {
        /// Identifier of the entity that died.
        entity: EntityId,
        /// Variant of the entity that died.
        kind: EntityKind,
    },
    /// Reports that an entity was despawned for leaving the camera view.
    EntityCulled {
        /// Identifier of the culled entity.
        entity: EntityId,
        /// Variant of the culled entity.
        kind: EntityKind,
    },
    /// Confirms that a grid cell became passable after its occupant died.
    TileRemoved {
        /// Cell that was cleared.
        tile: TileIndex,
    },
    /// Requests a particle explosion from the presentation layer.
    ExplosionRequested {
        /// Parameters describing the explosion.
        explosion: ExplosionSpec,
    },
    /// Announces that the player died.
    PlayerKilled {
        /// Reason the player died.
        cause: DeathCause,
    },
    /// Announces that the player reached the level exit.
    ExitReached,
    /// Announces that the level time limit ran out.
    TimeExpired,
    /// Announces that a new player entered the level.
    LifeStarted {
        /// Identifier of the new player entity.
        entity: EntityId,
    },
}

/// Reason reported when the player dies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// The player's bounding box dropped below the level.
    Fell,
    /// A projectile reduced the player's health to zero.
    Shot,
    /// The player touched an enemy.
    CaughtByEnemy,
    /// An explicit kill command targeted the player.
    Forced,
}

/// Final state of the level, if one has been reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LevelOutcome {
    /// The level is still being played.
    #[default]
    InProgress,
    /// The player reached the exit.
    Completed,
    /// The player died and no new life has started yet.
    PlayerDied,
    /// The time limit ran out before the exit was reached.
    TimedOut,
}

/// Integer rectangle measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Leftmost column covered by the rectangle.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Topmost row covered by the rectangle.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Integer centre point, rounding toward the top-left.
    #[must_use]
    pub const fn center(&self) -> IVec2 {
        IVec2::new(self.left + self.width / 2, self.top + self.height / 2)
    }

    /// Midpoint of the bottom edge.
    #[must_use]
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(
            self.left as f32 + self.width as f32 / 2.0,
            self.bottom() as f32,
        )
    }

    /// Reports whether the point lies inside the rectangle's half-open extent.
    #[must_use]
    pub const fn contains_point(&self, point: IVec2) -> bool {
        self.left <= point.x
            && point.x < self.right()
            && self.top <= point.y
            && point.y < self.bottom()
    }

    /// Reports whether two rectangles share a region of positive area.
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        other.left < self.right()
            && self.left < other.right()
            && other.top < self.bottom()
            && self.top < other.bottom()
    }

    /// Overlapping region of two rectangles, if any.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Signed penetration depth of `self` into `other`.
    ///
    /// The returned vector is the translation that would separate the two
    /// rectangles along each axis independently, pointing away from `other`.
    /// Non-overlapping rectangles report [`Vec2::ZERO`].
    #[must_use]
    pub fn intersection_depth(&self, other: &Rect) -> Vec2 {
        let half_self = Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0);
        let half_other = Vec2::new(other.width as f32 / 2.0, other.height as f32 / 2.0);

        let center_self = Vec2::new(self.left as f32, self.top as f32) + half_self;
        let center_other = Vec2::new(other.left as f32, other.top as f32) + half_other;

        let distance = center_self - center_other;
        let minimum = half_self + half_other;

        if distance.x.abs() >= minimum.x || distance.y.abs() >= minimum.y {
            return Vec2::ZERO;
        }

        let depth_x = if distance.x > 0.0 {
            minimum.x - distance.x
        } else {
            -minimum.x - distance.x
        };
        let depth_y = if distance.y > 0.0 {
            minimum.y - distance.y
        } else {
            -minimum.y - distance.y
        };
        Vec2::new(depth_x, depth_y)
    }

    /// Returns the rectangle shifted by the provided offset.
    #[must_use]
    pub const fn translated(&self, offset: IVec2) -> Rect {
        Rect::new(
            self.left + offset.x,
            self.top + offset.y,
            self.width,
            self.height,
        )
    }
}

/// Signed coordinate of a level tile.
///
/// Coordinates are signed because collision queries routinely probe cells
/// beyond the grid edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileIndex {
    column: i32,
    row: i32,
}

impl TileIndex {
    /// Creates a tile coordinate from column and row indices.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// World-space rectangle covered by the tile.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(
            self.column * TILE_WIDTH,
            self.row * TILE_HEIGHT,
            TILE_WIDTH,
            TILE_HEIGHT,
        )
    }
}

/// Collision behaviour of a tile cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCollision {
    /// Entities move through the cell freely.
    #[default]
    Passable,
    /// The cell blocks movement from every direction.
    Impassable,
    /// The cell only blocks entities landing on it from above.
    Platform,
}

impl TileCollision {
    /// Reports whether the cell never interacts with moving entities.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        matches!(self, Self::Passable)
    }
}

/// Precision used when testing two entities against each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CollisionFidelity {
    /// Bounding rectangle overlap is sufficient.
    #[default]
    Rectangle,
    /// Overlapping opaque pixels are required.
    PerPixel,
}

/// Anchor and local bounding box of an entity sprite.
///
/// The world-space bounding box of an entity is always derived from its
/// position through [`BoxShape::bounds_at`] and never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxShape {
    origin: Vec2,
    local: Rect,
}

impl BoxShape {
    /// Creates a shape from an explicit origin and local rectangle.
    #[must_use]
    pub const fn new(origin: Vec2, local: Rect) -> Self {
        Self { origin, local }
    }

    /// Full-frame box anchored at the bottom centre of the frame.
    #[must_use]
    pub fn bottom_anchored(width: u32, height: u32) -> Self {
        let (width, height) = (width as i32, height as i32);
        Self::new(
            Vec2::new(width as f32 / 2.0, height as f32),
            Rect::new(0, 0, width, height),
        )
    }

    /// Full-frame box anchored at the top-left corner of the frame.
    #[must_use]
    pub fn top_left_anchored(width: u32, height: u32) -> Self {
        Self::new(Vec2::ZERO, Rect::new(0, 0, width as i32, height as i32))
    }

    /// Character box: a horizontally centred slice of the frame resting on
    /// its bottom edge, anchored at the bottom centre.
    #[must_use]
    pub fn character(width: u32, height: u32, width_ratio: f32, height_ratio: f32) -> Self {
        let box_width = (width as f32 * width_ratio).round() as i32;
        let box_height = (height as f32 * height_ratio).round() as i32;
        let left = (width as i32 - box_width) / 2;
        let top = height as i32 - box_height;
        Self::new(
            Vec2::new(width as f32 / 2.0, height as f32),
            Rect::new(left, top, box_width, box_height),
        )
    }

    /// Anchor point inside the sprite frame.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Bounding box relative to the sprite frame's top-left corner.
    #[must_use]
    pub const fn local(&self) -> Rect {
        self.local
    }

    /// World-space top-left corner of the sprite frame for a position.
    #[must_use]
    pub fn frame_origin(&self, position: Vec2) -> IVec2 {
        let corner = position - self.origin;
        IVec2::new(
            corner.x.round_ties_even() as i32,
            corner.y.round_ties_even() as i32,
        )
    }

    /// World-space bounding box for a position.
    #[must_use]
    pub fn bounds_at(&self, position: Vec2) -> Rect {
        self.local.translated(self.frame_origin(position))
    }
}

/// Opacity mask of a sprite frame used for per-pixel collision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl SpriteMask {
    /// Creates a mask from row-major alpha values.
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    #[must_use]
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Option<Self> {
        if alpha.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            alpha,
        })
    }

    /// Creates a fully opaque mask.
    #[must_use]
    pub fn opaque(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| u8::MAX)
    }

    /// Creates a mask by sampling `alpha` for every pixel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, alpha: impl Fn(u32, u32) -> u8) -> Self {
        let mut values = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                values.push(alpha(x, y));
            }
        }
        Self {
            width,
            height,
            alpha: values,
        }
    }

    /// Width of the frame in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the frame in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the mask covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Alpha value at a frame-local pixel; zero outside the frame.
    #[must_use]
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.alpha.get(index).copied().unwrap_or(0)
    }
}

/// Sprites the core binds to entities and explosions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Player character frame.
    Player,
    /// Enemy walker frame.
    Enemy,
    /// Bullet projectile.
    Bullet,
    /// Thrown tile bomb.
    TileBomb,
    /// Gravity-bound obstacle prop.
    Obstacle,
    /// Breakable level tile.
    BreakableTile,
    /// Debris particle spawned when a tile is hit.
    TileDebris,
    /// Default explosion particle.
    Explosion,
}

impl SpriteKey {
    /// Every sprite key, in loading order.
    pub const ALL: [SpriteKey; 8] = [
        SpriteKey::Player,
        SpriteKey::Enemy,
        SpriteKey::Bullet,
        SpriteKey::TileBomb,
        SpriteKey::Obstacle,
        SpriteKey::BreakableTile,
        SpriteKey::TileDebris,
        SpriteKey::Explosion,
    ];

    /// Stable asset name used by content manifests.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
            Self::Bullet => "bullet",
            Self::TileBomb => "tile_bomb",
            Self::Obstacle => "obstacle",
            Self::BreakableTile => "breakable_tile",
            Self::TileDebris => "tile_debris",
            Self::Explosion => "explosion",
        }
    }
}

/// Unique identifier assigned to each entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Variants of entities owned by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The controllable player character.
    Player,
    /// Walker that hunts the player.
    Enemy,
    /// Horizontal projectile fired by the player.
    Bullet,
    /// Thrown explosive.
    TileBomb,
    /// Destructible tile that owns a grid cell.
    BreakableTile,
    /// Destructible prop that falls under gravity.
    Obstacle,
}

impl EntityKind {
    /// Reports whether the entity occupies a grid cell instead of moving.
    #[must_use]
    pub const fn is_grid_bound(&self) -> bool {
        matches!(self, Self::BreakableTile)
    }

    /// Reports whether the entity is despawned once it leaves the camera view.
    #[must_use]
    pub const fn is_cullable(&self) -> bool {
        matches!(self, Self::Bullet | Self::TileBomb)
    }
}

/// Description of a hit delivered to an entity or tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitData {
    rotation: f32,
    position: Vec2,
    damage: u32,
}

impl HitData {
    /// Creates hit data from the travel direction, impact point and damage.
    #[must_use]
    pub const fn new(rotation: f32, position: Vec2, damage: u32) -> Self {
        Self {
            rotation,
            position,
            damage,
        }
    }

    /// Direction the hit travelled in, in radians.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// World-space impact point.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Hit points the hit removes.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }
}

/// Request for a particle explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionSpec {
    /// World-space centre of the explosion.
    pub position: Vec2,
    /// Number of particles to emit.
    pub particle_count: u32,
    /// Maximum distance a particle travels, in world units.
    pub size: f32,
    /// Lower bound of the emission angle, in degrees.
    pub min_angle: i32,
    /// Upper bound of the emission angle, in degrees.
    pub max_angle: i32,
    /// Lifetime of every particle.
    pub max_age: Duration,
    /// Sprite used for the particles; the default explosion sprite when absent.
    pub texture: Option<SpriteKey>,
}

/// Player input resolved for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerIntent {
    /// Horizontal movement in `[-1, 1]`.
    pub movement: f32,
    /// Whether the jump control is held.
    pub jump: bool,
    /// Whether the fire control is held.
    pub fire: bool,
    /// Whether the throw control is held.
    pub throw: bool,
}

/// Horizontal facing of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Facing toward decreasing x.
    Left,
    /// Facing toward increasing x.
    #[default]
    Right,
}

impl Facing {
    /// Unit sign of the facing along the x axis.
    #[must_use]
    pub const fn sign(&self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing that matches the sign of `value`, if it is non-zero.
    #[must_use]
    pub fn from_sign(value: f32) -> Option<Self> {
        if value > 0.0 {
            Some(Self::Right)
        } else if value < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Entities that may be created while the level is running.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnRequest {
    /// Horizontal projectile.
    Bullet {
        /// Spawn position.
        position: Vec2,
        /// Direction of travel.
        facing: Facing,
    },
    /// Thrown explosive.
    TileBomb {
        /// Spawn position.
        position: Vec2,
        /// Direction of the throw.
        facing: Facing,
    },
    /// Enemy walker.
    Enemy {
        /// Spawn position, at the feet of the enemy.
        position: Vec2,
    },
}

/// Keys sampled by the input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Letter A.
    A,
    /// Letter D.
    D,
    /// Letter W.
    W,
    /// Space bar.
    Space,
    /// Left control key.
    LeftControl,
    /// Letter X.
    X,
    /// Enter key.
    Enter,
}

/// Keys held and pointer motion observed during a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    held: Vec<Key>,
    pointer_delta: Vec2,
}

impl InputSnapshot {
    /// Creates a snapshot from the held keys and the pointer displacement.
    #[must_use]
    pub fn new(held: impl IntoIterator<Item = Key>, pointer_delta: Vec2) -> Self {
        let mut held: Vec<Key> = held.into_iter().collect();
        held.sort_unstable();
        held.dedup();
        Self {
            held,
            pointer_delta,
        }
    }

    /// Reports whether the key is held.
    #[must_use]
    pub fn is_down(&self, key: Key) -> bool {
        self.held.binary_search(&key).is_ok()
    }

    /// Keys held during the frame in sorted order.
    #[must_use]
    pub fn held(&self) -> &[Key] {
        &self.held
    }

    /// Pointer displacement observed during the frame.
    #[must_use]
    pub const fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }
}

/// Read-only snapshot describing a live entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Identifier allocated to the entity.
    pub id: EntityId,
    /// Variant of the entity.
    pub kind: EntityKind,
    /// World-space anchor position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Bounding box derived from the position.
    pub bounds: Rect,
    /// Top-left corner of the sprite frame.
    pub frame_origin: IVec2,
    /// Direction the entity faces.
    pub facing: Facing,
    /// Whether the entity rested on ground after its last update.
    pub on_ground: bool,
    /// Remaining hit points for damageable variants.
    pub health: Option<u32>,
}

/// Read-only view of every live entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a view from the provided snapshots sorted by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot of the identified entity, if it is live.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}
