use glam::{IVec2, Vec2};
use tilebreaker_core::{
    BoxShape, CollisionFidelity, EntityId, EntityKind, Rect, SpriteMask, TileCollision, TileIndex,
};
use tilebreaker_system_collision::{
    resolve, resolve_tiles, sweep, Collider, Contact, Subject, TileMap, TileProbe,
};

const OCCUPANT: EntityId = EntityId::new(7);

struct Fixture {
    columns: i32,
    rows: Vec<Vec<char>>,
}

impl Fixture {
    fn new(layout: &[&str]) -> Self {
        let rows: Vec<Vec<char>> = layout.iter().map(|row| row.chars().collect()).collect();
        let columns = rows.first().map_or(0, |row| row.len() as i32);
        Self { columns, rows }
    }
}

impl TileMap for Fixture {
    fn probe(&self, tile: TileIndex) -> TileProbe {
        if tile.column() < 0 || tile.column() >= self.columns {
            return TileProbe {
                collision: TileCollision::Impassable,
                occupant: None,
            };
        }
        let symbol = usize::try_from(tile.row())
            .ok()
            .and_then(|row| self.rows.get(row))
            .and_then(|row| row.get(tile.column() as usize))
            .copied()
            .unwrap_or('.');
        match symbol {
            '-' => TileProbe {
                collision: TileCollision::Impassable,
                occupant: None,
            },
            '~' => TileProbe {
                collision: TileCollision::Platform,
                occupant: None,
            },
            '#' => TileProbe {
                collision: TileCollision::Impassable,
                occupant: Some(OCCUPANT),
            },
            _ => TileProbe::default(),
        }
    }
}

fn character() -> BoxShape {
    BoxShape::character(64, 64, 0.4, 0.8)
}

fn subject<'a>(mask: &'a SpriteMask, before: Vec2, after: Vec2) -> Subject<'a> {
    let shape = character();
    Subject {
        id: EntityId::new(1),
        kind: EntityKind::Player,
        position_before_update: before,
        position: after,
        shape,
        previous_bounds: shape.bounds_at(before),
        fidelity: CollisionFidelity::Rectangle,
        mask,
    }
}

#[test]
fn landing_on_ground_resolves_vertically_and_grounds() {
    let grid = Fixture::new(&["...", "...", "---"]);
    let mask = SpriteMask::opaque(64, 64);
    let result = resolve(
        &grid,
        &subject(&mask, Vec2::new(60.0, 62.0), Vec2::new(60.0, 66.0)),
        [],
    );

    assert!(result.hit_tile);
    assert!(result.on_ground);
    assert_eq!(result.position, Vec2::new(60.0, 64.0));
    assert_eq!(result.bounds.bottom(), 64);
    assert_eq!(
        result.contact,
        Some(Contact::Tile {
            tile: TileIndex::new(1, 2),
            occupant: None,
        })
    );
}

#[test]
fn resolution_is_idempotent_once_clear() {
    let grid = Fixture::new(&["...", "...", "---"]);
    let shape = character();
    let landed = resolve_tiles(
        &grid,
        Vec2::new(60.0, 66.0),
        &shape,
        shape.bounds_at(Vec2::new(60.0, 62.0)),
    );

    let again = resolve_tiles(&grid, landed.position, &shape, landed.bounds);
    assert_eq!(again.position, landed.position);
    assert_eq!(again.first_hit, None);
    assert!(!again.on_ground);
}

#[test]
fn clear_entity_converges_without_displacement() {
    let grid = Fixture::new(&["...", "...", "---"]);
    let mask = SpriteMask::opaque(64, 64);
    let start = Vec2::new(60.0, 32.0);

    for _ in 0..4 {
        let result = resolve(&grid, &subject(&mask, start, start), []);
        assert_eq!(result.position, start);
        assert!(!result.hit_tile);
        assert!(!result.hit_entity);
        assert_eq!(result.contact, None);
        assert!(!result.on_ground);
    }
}

#[test]
fn wall_pushes_back_horizontally() {
    let grid = Fixture::new(&["..-", "..-", "..."]);
    let mask = SpriteMask::opaque(64, 64);
    let result = resolve(
        &grid,
        &subject(&mask, Vec2::new(68.0, 50.0), Vec2::new(72.0, 50.0)),
        [],
    );

    assert!(result.hit_tile);
    assert!(!result.on_ground);
    assert_eq!(result.position, Vec2::new(67.0, 50.0));
    assert_eq!(result.bounds.right(), 80);
    assert_eq!(
        result.contact,
        Some(Contact::Tile {
            tile: TileIndex::new(2, 0),
            occupant: None,
        })
    );
}

#[test]
fn platform_stops_entities_landing_from_above() {
    let grid = Fixture::new(&["...", ".~.", "..."]);
    let mask = SpriteMask::opaque(64, 64);
    let result = resolve(
        &grid,
        &subject(&mask, Vec2::new(60.0, 30.0), Vec2::new(60.0, 36.0)),
        [],
    );

    assert!(result.hit_tile);
    assert!(result.on_ground);
    assert_eq!(result.position, Vec2::new(60.0, 32.0));
}

#[test]
fn platform_lets_entities_pass_from_below_and_the_side() {
    let grid = Fixture::new(&["...", ".~.", "..."]);
    let mask = SpriteMask::opaque(64, 64);

    let rising = resolve(
        &grid,
        &subject(&mask, Vec2::new(60.0, 70.0), Vec2::new(60.0, 60.0)),
        [],
    );
    assert!(!rising.hit_tile);
    assert!(!rising.on_ground);
    assert_eq!(rising.position, Vec2::new(60.0, 60.0));

    let sideways = resolve(
        &grid,
        &subject(&mask, Vec2::new(20.0, 50.0), Vec2::new(30.0, 50.0)),
        [],
    );
    assert!(!sideways.hit_tile);
    assert_eq!(sideways.position, Vec2::new(30.0, 50.0));
}

#[test]
fn occupied_cell_reports_its_occupant() {
    let grid = Fixture::new(&["..#", "..#", "..."]);
    let mask = SpriteMask::opaque(64, 64);
    let result = resolve(
        &grid,
        &subject(&mask, Vec2::new(68.0, 50.0), Vec2::new(72.0, 50.0)),
        [],
    );

    assert_eq!(
        result.contact,
        Some(Contact::Tile {
            tile: TileIndex::new(2, 0),
            occupant: Some(OCCUPANT),
        })
    );
}

#[test]
fn level_edges_block_horizontal_escape() {
    let grid = Fixture::new(&["...", "...", "..."]);
    let mask = SpriteMask::opaque(64, 64);
    let result = resolve(
        &grid,
        &subject(&mask, Vec2::new(16.0, 70.0), Vec2::new(10.0, 70.0)),
        [],
    );

    assert!(result.hit_tile);
    assert_eq!(result.bounds.left(), 0);
}

#[test]
fn entity_pass_reports_first_overlap_and_skips_self() {
    let grid = Fixture::new(&["....", "....", "...."]);
    let mask = SpriteMask::opaque(64, 64);
    let enemy_mask = SpriteMask::opaque(64, 64);
    let position = Vec2::new(60.0, 60.0);
    let shape = character();

    let me = Collider {
        id: EntityId::new(1),
        kind: EntityKind::Player,
        bounds: shape.bounds_at(position),
        frame_origin: shape.frame_origin(position),
        fidelity: CollisionFidelity::Rectangle,
        mask: &mask,
    };
    let far = Collider {
        id: EntityId::new(2),
        kind: EntityKind::Enemy,
        bounds: Rect::new(150, 0, 20, 20),
        frame_origin: IVec2::new(150, 0),
        fidelity: CollisionFidelity::Rectangle,
        mask: &enemy_mask,
    };
    let near = Collider {
        id: EntityId::new(3),
        kind: EntityKind::Enemy,
        bounds: Rect::new(60, 30, 20, 20),
        frame_origin: IVec2::new(60, 30),
        fidelity: CollisionFidelity::Rectangle,
        mask: &enemy_mask,
    };

    let result = resolve(
        &grid,
        &subject(&mask, position, position),
        [me, far, near],
    );

    assert!(!result.hit_tile);
    assert!(result.hit_entity);
    assert_eq!(
        result.contact,
        Some(Contact::Entity {
            entity: EntityId::new(3),
            kind: EntityKind::Enemy,
        })
    );
}

#[test]
fn entity_pass_is_skipped_after_a_wall_hit() {
    let grid = Fixture::new(&["..-", "..-", "..."]);
    let mask = SpriteMask::opaque(64, 64);
    let enemy_mask = SpriteMask::opaque(8, 8);
    let overlapping = Collider {
        id: EntityId::new(5),
        kind: EntityKind::Enemy,
        bounds: Rect::new(60, 20, 8, 8),
        frame_origin: IVec2::new(60, 20),
        fidelity: CollisionFidelity::Rectangle,
        mask: &enemy_mask,
    };

    let result = resolve(
        &grid,
        &subject(&mask, Vec2::new(68.0, 50.0), Vec2::new(72.0, 50.0)),
        [overlapping],
    );

    assert!(result.hit_tile);
    assert!(!result.hit_entity);
    assert!(matches!(result.contact, Some(Contact::Tile { .. })));
}

#[test]
fn grounded_entities_still_meet_other_entities() {
    let grid = Fixture::new(&["...", "...", "---"]);
    let mask = SpriteMask::opaque(64, 64);
    let enemy_mask = SpriteMask::opaque(8, 8);
    let overlapping = Collider {
        id: EntityId::new(5),
        kind: EntityKind::Enemy,
        bounds: Rect::new(50, 40, 8, 8),
        frame_origin: IVec2::new(50, 40),
        fidelity: CollisionFidelity::Rectangle,
        mask: &enemy_mask,
    };

    let result = resolve(
        &grid,
        &subject(&mask, Vec2::new(60.0, 62.0), Vec2::new(60.0, 66.0)),
        [overlapping],
    );

    assert!(result.hit_tile);
    assert!(result.on_ground);
    assert!(result.hit_entity);
    assert_eq!(
        result.contact,
        Some(Contact::Entity {
            entity: EntityId::new(5),
            kind: EntityKind::Enemy,
        })
    );
}

fn bullet<'a>(mask: &'a SpriteMask, before: Vec2, after: Vec2) -> Subject<'a> {
    let shape = BoxShape::top_left_anchored(8, 4);
    Subject {
        id: EntityId::new(2),
        kind: EntityKind::Bullet,
        position_before_update: before,
        position: after,
        shape,
        previous_bounds: shape.bounds_at(before),
        fidelity: CollisionFidelity::Rectangle,
        mask,
    }
}

#[test]
fn sweep_stops_fast_movers_at_the_first_solid_cell() {
    let grid = Fixture::new(&["....#.....", "..........", "----------"]);
    let mask = SpriteMask::opaque(8, 4);
    let fast = bullet(&mask, Vec2::new(120.0, 10.0), Vec2::new(208.0, 10.0));

    let jumped = resolve(&grid, &fast, []);
    assert_eq!(jumped.contact, None);

    let swept = sweep(&grid, &fast, &[]);
    assert!(swept.hit_tile);
    assert!(swept.blocked);
    assert_eq!(swept.bounds.right(), 160);
    assert_eq!(
        swept.contact,
        Some(Contact::Tile {
            tile: TileIndex::new(4, 0),
            occupant: Some(OCCUPANT),
        })
    );
}

#[test]
fn sweep_meets_colliders_between_start_and_end() {
    let grid = Fixture::new(&["..........", "..........", "----------"]);
    let mask = SpriteMask::opaque(8, 4);
    let enemy_mask = SpriteMask::opaque(10, 10);
    let enemy = Collider {
        id: EntityId::new(9),
        kind: EntityKind::Enemy,
        bounds: Rect::new(170, 5, 10, 10),
        frame_origin: IVec2::new(170, 5),
        fidelity: CollisionFidelity::Rectangle,
        mask: &enemy_mask,
    };
    let fast = bullet(&mask, Vec2::new(120.0, 8.0), Vec2::new(208.0, 8.0));

    assert!(!resolve(&grid, &fast, [enemy]).hit_entity);

    let swept = sweep(&grid, &fast, &[enemy]);
    assert!(swept.hit_entity);
    assert!(swept.position.x < 180.0);
    assert_eq!(
        swept.contact,
        Some(Contact::Entity {
            entity: EntityId::new(9),
            kind: EntityKind::Enemy,
        })
    );
}

#[test]
fn short_moves_sweep_like_a_single_resolve() {
    let grid = Fixture::new(&["...", "...", "---"]);
    let mask = SpriteMask::opaque(64, 64);
    let landing = subject(&mask, Vec2::new(60.0, 62.0), Vec2::new(60.0, 66.0));

    assert_eq!(sweep(&grid, &landing, &[]), resolve(&grid, &landing, []));
}
