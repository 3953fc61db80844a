#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tilebreaker.

mod camera;
mod content;
mod entity;
mod grid;
mod level;

use std::{collections::VecDeque, time::Duration};

use glam::{IVec2, Vec2};
use tilebreaker_core::{
    Command, DeathCause, EntityId, EntityKind, Event, HitData, LevelOutcome, PlayerIntent,
    SpawnRequest, WELCOME_BANNER,
};
use tilebreaker_system_collision::Contact;
use tracing::{debug, info, warn};

use crate::{
    camera::Camera,
    content::SpriteBook,
    entity::{
        tile_debris, Behaviour, Body, BreakableTile, Bullet, Effect, Enemy, Entity, Lifecycle,
        Obstacle, Player, TickContext, TileBomb,
    },
    level::{Placement, PlacementKind},
};

pub use content::{Content, ContentError, SpriteCatalog};
pub use grid::{Grid, TileCell};
pub use level::LevelError;

/// Time allotted to finish a level.
pub const TIME_LIMIT: Duration = Duration::from_secs(120);

/// Level loaded when no description is supplied.
pub const DEFAULT_LEVEL: &str = "\
........................................
........................................
..............~~~~......................
........~~~.............E.......~~~~....
.1...............##.......Y............X
-------------....-------------.---------
-------------....-------------.---------
";

/// Represents the authoritative Tilebreaker world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    start: Vec2,
    exit: IVec2,
    sprites: SpriteBook,
    entities: Vec<Entity>,
    pending: Vec<Entity>,
    next_entity_id: u32,
    player: Option<EntityId>,
    camera: Camera,
    outcome: LevelOutcome,
    time_remaining: Duration,
    tick_index: u64,
}

impl World {
    /// Builds a world from a level description, binding sprites through `content`.
    ///
    /// Level entities and the player are live immediately. Any parse or
    /// content error aborts construction so no partial world is exposed.
    pub fn from_level(source: &str, content: &dyn Content) -> Result<Self, LevelError> {
        let layout = level::parse(source)?;
        let sprites = SpriteBook::load(content)?;

        let mut world = Self {
            banner: WELCOME_BANNER,
            grid: layout.grid,
            start: layout.start,
            exit: layout.exit,
            sprites,
            entities: Vec::new(),
            pending: Vec::new(),
            next_entity_id: 0,
            player: None,
            camera: Camera::new(layout.start),
            outcome: LevelOutcome::InProgress,
            time_remaining: TIME_LIMIT,
            tick_index: 0,
        };

        let player = world.create(Behaviour::Player(Player::new()), layout.start);
        world.player = Some(player.id);
        world.entities.push(player);

        for placement in layout.placements {
            let entity = world.place(placement);
            world.entities.push(entity);
        }

        info!(
            columns = world.grid.columns(),
            rows = world.grid.rows(),
            entities = world.entities.len(),
            "level loaded"
        );
        Ok(world)
    }

    /// Builds the built-in level with the built-in sprite catalog.
    pub fn with_default_level() -> Result<Self, LevelError> {
        Self::from_level(DEFAULT_LEVEL, &SpriteCatalog::builtin())
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.saturating_add(1);
        id
    }

    fn create(&mut self, behaviour: Behaviour, position: Vec2) -> Entity {
        let id = self.allocate_id();
        let body = Body::new(self.sprites.sprite(behaviour.kind()), position);
        Entity::new(id, body, behaviour)
    }

    fn place(&mut self, placement: Placement) -> Entity {
        let bounds = Grid::bounds(placement.tile);
        let top_left = Vec2::new(bounds.left() as f32, bounds.top() as f32);
        match placement.kind {
            PlacementKind::BreakableTile => {
                let entity = self.create(
                    Behaviour::BreakableTile(BreakableTile::new(placement.tile)),
                    top_left,
                );
                let _ = self.grid.claim(placement.tile, entity.id);
                entity
            }
            PlacementKind::Obstacle => self.create(Behaviour::Obstacle(Obstacle::new()), top_left),
            PlacementKind::Enemy => {
                self.create(Behaviour::Enemy(Enemy::new()), bounds.bottom_center())
            }
        }
    }

    /// Creates the requested entity in the pending buffer.
    fn spawn(&mut self, request: SpawnRequest, out_events: &mut Vec<Event>) {
        let entity = match request {
            SpawnRequest::Bullet { position, facing } => {
                let mut entity = self.create(Behaviour::Bullet(Bullet::new(facing)), position);
                entity.body.facing = facing;
                entity
            }
            SpawnRequest::TileBomb { position, facing } => {
                let mut entity = self.create(Behaviour::TileBomb(TileBomb::new(facing)), position);
                entity.body.facing = facing;
                entity
            }
            SpawnRequest::Enemy { position } => {
                self.create(Behaviour::Enemy(Enemy::new()), position)
            }
        };
        out_events.push(Event::EntitySpawned {
            entity: entity.id,
            kind: entity.kind(),
        });
        self.pending.push(entity);
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .chain(self.pending.iter_mut())
            .find(|entity| entity.id == id)
    }

    fn live_player(&self) -> Option<&Entity> {
        let id = self.player?;
        self.entities
            .iter()
            .find(|entity| entity.id == id && !entity.is_dead())
    }

    fn tick(&mut self, dt: Duration, intent: PlayerIntent, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        self.entities.append(&mut self.pending);

        if self.outcome == LevelOutcome::InProgress {
            self.time_remaining = self.time_remaining.saturating_sub(dt);
            if self.time_remaining.is_zero() {
                self.outcome = LevelOutcome::TimedOut;
                warn!(tick = self.tick_index, "time limit reached");
                out_events.push(Event::TimeExpired);
            }
        }
        let intent = if self.outcome == LevelOutcome::InProgress {
            intent
        } else {
            PlayerIntent::default()
        };

        let seconds = dt.as_secs_f32();
        if let Some(focus) = self.live_player().map(|player| player.body.position) {
            let delta = self.camera.follow(focus, seconds);
            if delta != Vec2::ZERO {
                out_events.push(Event::CameraMoved { delta });
            }
        }

        self.update_entities(dt, seconds, intent, out_events);
        self.check_player(out_events);
        self.drop_fallen(out_events);

        self.entities.retain(|entity| !entity.is_dead());
        self.cull(out_events);
    }

    fn update_entities(
        &mut self,
        step: Duration,
        dt: f32,
        intent: PlayerIntent,
        out_events: &mut Vec<Event>,
    ) {
        for index in 0..self.entities.len() {
            if self.entities[index].is_dead() {
                continue;
            }

            let player_position = self.live_player().map(|player| player.body.position);
            let mut effects = Vec::new();
            let (id, lifecycle) = {
                let (before, rest) = self.entities.split_at_mut(index);
                let Some((entity, after)) = rest.split_first_mut() else {
                    break;
                };
                let ctx = TickContext {
                    step,
                    dt,
                    intent,
                    player_position,
                    grid: &self.grid,
                };
                let others = before
                    .iter()
                    .chain(after.iter())
                    .filter(|other| other.is_collider())
                    .map(Entity::collider);
                (entity.id, entity.update(&ctx, others, &mut effects))
            };

            self.dispatch(effects, out_events);
            if lifecycle == Lifecycle::Expire {
                let _ = self.kill_entity(id, DeathCause::Forced, out_events);
            }
        }
    }

    fn check_player(&mut self, out_events: &mut Vec<Event>) {
        let Some((id, bounds, on_ground)) = self
            .live_player()
            .map(|player| (player.id, player.body.bounds(), player.body.on_ground))
        else {
            return;
        };

        if bounds.top() > self.grid.height() {
            let _ = self.kill_entity(id, DeathCause::Fell, out_events);
        } else if self.outcome == LevelOutcome::InProgress
            && on_ground
            && bounds.contains_point(self.exit)
        {
            self.outcome = LevelOutcome::Completed;
            info!(tick = self.tick_index, "exit reached");
            out_events.push(Event::ExitReached);
        }
    }

    /// Removes movers other than the player that dropped below the level.
    fn drop_fallen(&mut self, out_events: &mut Vec<Event>) {
        let lower_boundary = self.grid.height();
        let fallen: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|entity| {
                !entity.is_dead()
                    && entity.kind() != EntityKind::Player
                    && !entity.kind().is_grid_bound()
                    && entity.body.bounds().top() > lower_boundary
            })
            .map(|entity| entity.id)
            .collect();
        for id in fallen {
            let _ = self.kill_entity(id, DeathCause::Forced, out_events);
        }
    }

    fn cull(&mut self, out_events: &mut Vec<Event>) {
        let view = self.camera.view();
        let outside: Vec<(EntityId, EntityKind)> = self
            .entities
            .iter()
            .filter(|entity| {
                !entity.is_dead()
                    && entity.kind().is_cullable()
                    && !entity.body.bounds().intersects(&view)
            })
            .map(|entity| (entity.id, entity.kind()))
            .collect();

        for (id, kind) in outside {
            if self.kill_entity(id, DeathCause::Forced, out_events) {
                debug!(entity = id.get(), ?kind, "culled off-camera entity");
                out_events.push(Event::EntityCulled { entity: id, kind });
            }
        }
    }

    fn kill_entity(&mut self, id: EntityId, cause: DeathCause, out_events: &mut Vec<Event>) -> bool {
        let mut queue = VecDeque::new();
        let killed = self.kill(id, cause, &mut queue, out_events);
        self.dispatch(queue, out_events);
        killed
    }

    /// Flips an entity to dead and queues its death reaction.
    fn kill(
        &mut self,
        id: EntityId,
        cause: DeathCause,
        queue: &mut VecDeque<Effect>,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let mut effects = Vec::new();
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        let kind = entity.kind();
        if !entity.kill(&mut effects) {
            return false;
        }

        out_events.push(Event::EntityDied { entity: id, kind });
        queue.extend(effects);
        if kind == EntityKind::Player && self.player == Some(id) {
            self.on_player_killed(cause, out_events);
        }
        true
    }

    fn on_player_killed(&mut self, cause: DeathCause, out_events: &mut Vec<Event>) {
        self.player = None;
        if self.outcome == LevelOutcome::InProgress {
            self.outcome = LevelOutcome::PlayerDied;
        }
        info!(?cause, tick = self.tick_index, "player killed");
        out_events.push(Event::PlayerKilled { cause });
    }

    fn hit(
        &mut self,
        id: EntityId,
        hit: &HitData,
        queue: &mut VecDeque<Effect>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        let kind = entity.kind();
        let Some(depleted) = entity.hit(hit) else {
            return;
        };

        out_events.push(Event::EntityHit {
            entity: id,
            kind,
            damage: hit.damage(),
        });
        if depleted {
            let _ = self.kill(id, DeathCause::Shot, queue, out_events);
        }
    }

    /// Carries out requested side effects, including those they trigger in turn.
    fn dispatch(&mut self, effects: impl IntoIterator<Item = Effect>, out_events: &mut Vec<Event>) {
        let mut queue: VecDeque<Effect> = effects.into_iter().collect();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Spawn(request) => self.spawn(request, out_events),
                Effect::Explosion(explosion) => {
                    out_events.push(Event::ExplosionRequested { explosion });
                }
                Effect::Hit { contact, hit } => match contact {
                    Contact::Tile { occupant, .. } => {
                        out_events.push(Event::ExplosionRequested {
                            explosion: tile_debris(&hit),
                        });
                        if let Some(occupant) = occupant {
                            self.hit(occupant, &hit, &mut queue, out_events);
                        }
                    }
                    Contact::Entity { entity, .. } => {
                        self.hit(entity, &hit, &mut queue, out_events);
                    }
                },
                Effect::RemoveTile(tile) => {
                    if self.grid.remove_tile_at(tile).is_some() {
                        debug!(column = tile.column(), row = tile.row(), "tile removed");
                        out_events.push(Event::TileRemoved { tile });
                    }
                }
                Effect::PlayerCaught => {
                    if let Some(player) = self.player {
                        let _ = self.kill(player, DeathCause::CaughtByEnemy, &mut queue, out_events);
                    }
                }
                Effect::DetonateBombs => {
                    let bombs: Vec<EntityId> = self
                        .entities
                        .iter()
                        .chain(self.pending.iter())
                        .filter(|entity| !entity.is_dead() && entity.kind() == EntityKind::TileBomb)
                        .map(|entity| entity.id)
                        .collect();
                    for bomb in bombs {
                        if let Some(entity) = self.entity_mut(bomb) {
                            queue.push_back(TileBomb::detonation(&entity.body));
                        }
                        let _ = self.kill(bomb, DeathCause::Forced, &mut queue, out_events);
                    }
                }
            }
        }
    }

    fn start_new_life(&mut self, out_events: &mut Vec<Event>) {
        if self.player.is_some()
            || matches!(
                self.outcome,
                LevelOutcome::Completed | LevelOutcome::TimedOut
            )
        {
            return;
        }

        let player = self.create(Behaviour::Player(Player::new()), self.start);
        let id = player.id;
        self.pending.push(player);
        self.player = Some(id);
        self.outcome = LevelOutcome::InProgress;

        let delta = self.camera.snap_to(self.start);
        if delta != Vec2::ZERO {
            out_events.push(Event::CameraMoved { delta });
        }
        info!(entity = id.get(), "new life started");
        out_events.push(Event::EntitySpawned {
            entity: id,
            kind: EntityKind::Player,
        });
        out_events.push(Event::LifeStarted { entity: id });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureViewport { width, height } => world.camera.resize(width, height),
        Command::Tick { dt, intent } => world.tick(dt, intent, out_events),
        Command::Spawn { request } => world.spawn(request, out_events),
        Command::Kill { entity } => {
            let _ = world.kill_entity(entity, DeathCause::Forced, out_events);
        }
        Command::StartNewLife => world.start_new_life(out_events),
        Command::DetonateBombs => world.dispatch([Effect::DetonateBombs], out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::{IVec2, Vec2};
    use tilebreaker_core::{
        EntityId, EntitySnapshot, EntityView, LevelOutcome, Rect, TileCollision, TileIndex,
    };

    use super::{Grid, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the level grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Collision behaviour of the cell at `tile`, applying the edge policy.
    #[must_use]
    pub fn collision_at(world: &World, tile: TileIndex) -> TileCollision {
        world.grid.collision(tile)
    }

    /// Feet position at which the player enters the level.
    #[must_use]
    pub fn start_location(world: &World) -> Vec2 {
        world.start
    }

    /// Point the grounded player must cover to finish the level.
    #[must_use]
    pub fn exit_point(world: &World) -> IVec2 {
        world.exit
    }

    /// Captures a read-only view of every live entity.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        let snapshots: Vec<EntitySnapshot> = world
            .entities
            .iter()
            .filter(|entity| !entity.is_dead())
            .map(|entity| entity.snapshot())
            .collect();
        EntityView::from_snapshots(snapshots)
    }

    /// Snapshot of a single live entity.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<EntitySnapshot> {
        world
            .entities
            .iter()
            .find(|entity| entity.id == id && !entity.is_dead())
            .map(|entity| entity.snapshot())
    }

    /// Snapshot of the player, once it is live.
    #[must_use]
    pub fn player(world: &World) -> Option<EntitySnapshot> {
        world.live_player().map(|player| player.snapshot())
    }

    /// Number of entities waiting to join the live set on the next tick.
    #[must_use]
    pub fn pending_count(world: &World) -> usize {
        world.pending.len()
    }

    /// Centre of the camera in world coordinates.
    #[must_use]
    pub fn camera_position(world: &World) -> Vec2 {
        world.camera.position()
    }

    /// World-space rectangle visible through the camera.
    #[must_use]
    pub fn camera_view(world: &World) -> Rect {
        world.camera.view()
    }

    /// Current state of the level.
    #[must_use]
    pub fn outcome(world: &World) -> LevelOutcome {
        world.outcome
    }

    /// Time left before the level times out.
    #[must_use]
    pub fn time_remaining(world: &World) -> Duration {
        world.time_remaining
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
