#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Axis-separated collision resolution shared by every moving entity.
//!
//! Resolution runs in two passes. The tile pass pushes a bounding box out of
//! every non-passable cell it overlaps, one axis at a time, and reports the
//! first cell it had to resolve against. The entity pass is skipped when the
//! tile pass stopped the box against a wall or ceiling; resting on a surface
//! does not suppress it. It reports the first other collider whose bounds, or
//! opaque pixels, overlap the subject. [`sweep`] runs both passes over
//! short sub-steps for movers that travel further than their own box.

use std::ops::RangeInclusive;

use glam::{IVec2, Vec2};
use tilebreaker_core::{
    BoxShape, CollisionFidelity, EntityId, EntityKind, Rect, SpriteMask, TileCollision, TileIndex,
    TILE_HEIGHT, TILE_WIDTH,
};

/// Collision answer for a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileProbe {
    /// Collision behaviour of the cell.
    pub collision: TileCollision,
    /// Entity owning the cell, if any.
    pub occupant: Option<EntityId>,
}

/// Grid queried by the tile pass.
pub trait TileMap {
    /// Describes the cell at `tile`, including cells outside the grid.
    fn probe(&self, tile: TileIndex) -> TileProbe;
}

/// Counterpart recorded by a collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// A non-passable grid cell.
    Tile {
        /// Coordinate of the cell.
        tile: TileIndex,
        /// Entity owning the cell, if any.
        occupant: Option<EntityId>,
    },
    /// Another live entity.
    Entity {
        /// Identifier of the entity.
        entity: EntityId,
        /// Variant of the entity.
        kind: EntityKind,
    },
}

/// Outcome of resolving one entity for one update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionResult {
    /// Position captured before forces were applied this update.
    pub position_before_update: Vec2,
    /// Position after tile resolution.
    pub position: Vec2,
    /// Bounding box at the resolved position.
    pub bounds: Rect,
    /// Whether the tile pass resolved against any cell.
    pub hit_tile: bool,
    /// Whether the entity pass found an overlapping entity.
    pub hit_entity: bool,
    /// First counterpart struck. An entity found by the entity pass takes
    /// the place of the surface the subject rests on.
    pub contact: Option<Contact>,
    /// Whether a vertical resolution left the entity resting on a surface.
    pub on_ground: bool,
    /// Whether the tile pass stopped the box against a wall or ceiling.
    pub blocked: bool,
}

impl CollisionResult {
    /// Reports whether the resolver stopped horizontal motion.
    #[must_use]
    pub fn blocked_horizontally(&self) -> bool {
        self.position.x == self.position_before_update.x
    }

    /// Reports whether the resolver stopped vertical motion.
    #[must_use]
    pub fn blocked_vertically(&self) -> bool {
        self.position.y == self.position_before_update.y
    }
}

/// Outcome of the tile pass on its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePass {
    /// Position after every resolution.
    pub position: Vec2,
    /// Bounding box at the resolved position.
    pub bounds: Rect,
    /// First cell that required a resolution.
    pub first_hit: Option<(TileIndex, Option<EntityId>)>,
    /// Whether a vertical resolution landed the box on a surface.
    pub on_ground: bool,
    /// Whether any resolution other than a landing occurred.
    pub blocked: bool,
}

/// Entity being resolved.
#[derive(Clone, Copy, Debug)]
pub struct Subject<'a> {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Variant of the entity.
    pub kind: EntityKind,
    /// Position captured before forces were applied this update.
    pub position_before_update: Vec2,
    /// Position after velocity integration.
    pub position: Vec2,
    /// Sprite anchor and local bounds.
    pub shape: BoxShape,
    /// Bounding box at the end of the previous update.
    pub previous_bounds: Rect,
    /// Precision required by the entity.
    pub fidelity: CollisionFidelity,
    /// Opacity mask of the entity's sprite.
    pub mask: &'a SpriteMask,
}

/// Read-only view of a live entity taking part in the entity pass.
#[derive(Clone, Copy, Debug)]
pub struct Collider<'a> {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Variant of the entity.
    pub kind: EntityKind,
    /// World-space bounding box.
    pub bounds: Rect,
    /// World-space top-left corner of the sprite frame.
    pub frame_origin: IVec2,
    /// Precision required by the entity.
    pub fidelity: CollisionFidelity,
    /// Opacity mask of the entity's sprite.
    pub mask: &'a SpriteMask,
}

/// Resolves `subject` against the grid and, unless a wall or ceiling stopped it, against `others`.
pub fn resolve<'a, M, I>(map: &M, subject: &Subject<'_>, others: I) -> CollisionResult
where
    M: TileMap + ?Sized,
    I: IntoIterator<Item = Collider<'a>>,
{
    let pass = resolve_tiles(
        map,
        subject.position,
        &subject.shape,
        subject.previous_bounds,
    );

    let mut result = CollisionResult {
        position_before_update: subject.position_before_update,
        position: pass.position,
        bounds: pass.bounds,
        hit_tile: pass.first_hit.is_some(),
        hit_entity: false,
        contact: pass
            .first_hit
            .map(|(tile, occupant)| Contact::Tile { tile, occupant }),
        on_ground: pass.on_ground,
        blocked: pass.blocked,
    };

    if pass.blocked {
        return result;
    }

    let collider = Collider {
        id: subject.id,
        kind: subject.kind,
        bounds: pass.bounds,
        frame_origin: subject.shape.frame_origin(pass.position),
        fidelity: subject.fidelity,
        mask: subject.mask,
    };

    if let Some(other) = first_overlap(&collider, others) {
        result.hit_entity = true;
        result.contact = Some(Contact::Entity {
            entity: other.id,
            kind: other.kind,
        });
    }

    result
}

/// Resolves the move from `subject.position_before_update` to
/// `subject.position` in sub-steps no longer than the subject's box or a
/// tile along either axis.
///
/// The sweep stops at the first sub-step that is blocked or meets another
/// collider, so a fast mover cannot pass over a cell or an entity. A move
/// that fits in one sub-step resolves exactly as [`resolve`] does.
pub fn sweep<M>(map: &M, subject: &Subject<'_>, others: &[Collider<'_>]) -> CollisionResult
where
    M: TileMap + ?Sized,
{
    let start = subject.position_before_update;
    let travel = subject.position - start;
    let steps = sweep_steps(&subject.shape, travel);

    let mut reached = start;
    let mut resolved = start;
    let mut previous_bounds = subject.previous_bounds;
    for step in 1..steps {
        let target = round_position(start + travel * (step as f32 / steps as f32));
        let partial = Subject {
            position: resolved + (target - reached),
            previous_bounds,
            ..*subject
        };
        let result = resolve(map, &partial, others.iter().copied());
        if result.blocked || result.hit_entity {
            return result;
        }
        reached = target;
        resolved = result.position;
        previous_bounds = result.bounds;
    }

    let last = Subject {
        position: resolved + (subject.position - reached),
        previous_bounds,
        ..*subject
    };
    resolve(map, &last, others.iter().copied())
}

/// Number of sub-steps needed so no single step outruns the box or a tile.
fn sweep_steps(shape: &BoxShape, travel: Vec2) -> u32 {
    let local = shape.local();
    let reach_x = local.width().min(TILE_WIDTH).max(1) as f32;
    let reach_y = local.height().min(TILE_HEIGHT).max(1) as f32;
    let steps = (travel.x.abs() / reach_x).max(travel.y.abs() / reach_y).ceil();
    (steps as u32).max(1)
}

fn round_position(position: Vec2) -> Vec2 {
    Vec2::new(position.x.round_ties_even(), position.y.round_ties_even())
}

/// Pushes the box out of every non-passable cell it overlaps.
///
/// The scanned cell range is fixed by the box at entry; each resolution moves
/// the position along one axis and the remaining cells are tested against the
/// updated box.
pub fn resolve_tiles<M>(
    map: &M,
    position: Vec2,
    shape: &BoxShape,
    previous_bounds: Rect,
) -> TilePass
where
    M: TileMap + ?Sized,
{
    let mut position = position;
    let mut bounds = shape.bounds_at(position);
    let mut first_hit = None;
    let mut on_ground = false;
    let mut blocked = false;

    let (columns, rows) = covered_tiles(&bounds);
    for row in rows {
        for column in columns.clone() {
            let tile = TileIndex::new(column, row);
            let probe = map.probe(tile);
            if probe.collision.is_passable() {
                continue;
            }

            let tile_bounds = tile.bounds();
            let depth = bounds.intersection_depth(&tile_bounds);
            if depth == Vec2::ZERO {
                continue;
            }

            let landed_from_above = previous_bounds.bottom() <= tile_bounds.top();
            let vertical = match probe.collision {
                TileCollision::Platform if landed_from_above => true,
                TileCollision::Platform | TileCollision::Passable => continue,
                TileCollision::Impassable => depth.y.abs() < depth.x.abs(),
            };

            if vertical {
                if landed_from_above {
                    on_ground = true;
                } else {
                    blocked = true;
                }
                position.y += depth.y;
            } else {
                blocked = true;
                position.x += depth.x;
            }
            bounds = shape.bounds_at(position);

            if first_hit.is_none() {
                first_hit = Some((tile, probe.occupant));
            }
        }
    }

    TilePass {
        position,
        bounds,
        first_hit,
        on_ground,
        blocked,
    }
}

/// Grid columns and rows overlapped by the rectangle.
#[must_use]
pub fn covered_tiles(bounds: &Rect) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
    let first_column = bounds.left().div_euclid(TILE_WIDTH);
    let last_column = ceil_div(bounds.right(), TILE_WIDTH) - 1;
    let first_row = bounds.top().div_euclid(TILE_HEIGHT);
    let last_row = ceil_div(bounds.bottom(), TILE_HEIGHT) - 1;
    (first_column..=last_column, first_row..=last_row)
}

fn ceil_div(value: i32, divisor: i32) -> i32 {
    -(-value).div_euclid(divisor)
}

/// First collider other than `subject` that overlaps it.
pub fn first_overlap<'a, I>(subject: &Collider<'_>, others: I) -> Option<Collider<'a>>
where
    I: IntoIterator<Item = Collider<'a>>,
{
    others
        .into_iter()
        .filter(|other| other.id != subject.id)
        .find(|other| colliders_overlap(subject, other))
}

/// Reports whether two colliders overlap at the precision either requires.
#[must_use]
pub fn colliders_overlap(a: &Collider<'_>, b: &Collider<'_>) -> bool {
    let Some(overlap) = a.bounds.intersection(&b.bounds) else {
        return false;
    };

    match (a.fidelity, b.fidelity) {
        (CollisionFidelity::Rectangle, CollisionFidelity::Rectangle) => true,
        _ => pixels_overlap(a, b, &overlap),
    }
}

/// Scans the overlap region for a pixel that is opaque in both sprites.
fn pixels_overlap(a: &Collider<'_>, b: &Collider<'_>, overlap: &Rect) -> bool {
    for y in overlap.top()..overlap.bottom() {
        for x in overlap.left()..overlap.right() {
            let alpha_a = a.mask.alpha_at(x - a.frame_origin.x, y - a.frame_origin.y);
            if alpha_a == 0 {
                continue;
            }
            let alpha_b = b.mask.alpha_at(x - b.frame_origin.x, y - b.frame_origin.y);
            if alpha_b != 0 {
                return true;
            }
        }
    }
    false
}
