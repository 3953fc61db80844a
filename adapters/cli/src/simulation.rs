//! Glue that advances the world and its collaborators once per frame.

use std::{collections::BTreeMap, fmt, time::Duration};

use tilebreaker_core::{
    Command, EntityKind, Event, InputSnapshot, LevelOutcome, Rect, TileCollision,
};
use tilebreaker_rendering::{
    HudPresentation, ParticleField, Scene, SceneEntity, SceneTile, TileVisual,
};
use tilebreaker_system_controls::Controls;
use tilebreaker_system_hud::Hud;
use tilebreaker_world::{self as world, query, World};

/// Longest step handed to the world; slower frames are split.
const MAX_STEP: Duration = Duration::from_millis(50);

/// World plus the systems and collaborators that react to its events.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    controls: Controls,
    hud: Hud,
    particles: ParticleField,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    pub(crate) fn new(mut world: World, viewport: (u32, u32), seed: u64) -> Self {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureViewport {
                width: viewport.0,
                height: viewport.1,
            },
            &mut events,
        );
        let controls = Controls::new(query::camera_position(&world));

        Self {
            world,
            controls,
            hud: Hud::new(),
            particles: ParticleField::new(seed),
            events,
            commands: Vec::new(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Advances by `dt`, splitting long frames into steps no longer than [`MAX_STEP`].
    ///
    /// Events from all steps are appended to `log`.
    pub(crate) fn advance(&mut self, dt: Duration, input: &InputSnapshot, log: &mut Vec<Event>) {
        let mut remaining = dt;
        loop {
            let step = remaining.min(MAX_STEP);
            self.step(step, input);
            log.extend(self.events.iter().cloned());
            remaining = remaining.saturating_sub(step);
            if remaining.is_zero() {
                break;
            }
        }
    }

    fn step(&mut self, dt: Duration, input: &InputSnapshot) {
        let intent = self.controls.handle(&self.events, input, &mut self.commands);
        self.events.clear();

        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        world::apply(&mut self.world, Command::Tick { dt, intent }, &mut self.events);

        self.hud.handle(&self.events);
        for event in &self.events {
            if let Event::ExplosionRequested { explosion } = event {
                self.particles.spawn(explosion);
            }
        }
        self.particles.update(dt);
    }

    /// Creates the scene describing the current state.
    pub(crate) fn scene(&self) -> Scene {
        let grid = query::grid(&self.world);
        let mut scene = Scene::new(
            Rect::new(0, 0, grid.width(), grid.height()),
            query::camera_view(&self.world),
            query::exit_point(&self.world),
        );
        self.populate(&mut scene);
        scene
    }

    /// Refreshes the dynamic parts of `scene`.
    pub(crate) fn populate(&self, scene: &mut Scene) {
        let grid = query::grid(&self.world);

        scene.camera = query::camera_view(&self.world);
        scene.crosshair = self.controls.crosshair();

        scene.tiles.clear();
        scene
            .tiles
            .extend(grid.solid_cells().map(|(tile, cell)| SceneTile {
                bounds: tile.bounds(),
                visual: match (cell.collision(), cell.occupant()) {
                    (_, Some(_)) => TileVisual::Breakable,
                    (TileCollision::Platform, None) => TileVisual::Platform,
                    _ => TileVisual::Ground,
                },
            }));

        scene.entities.clear();
        scene.entities.extend(
            query::entity_view(&self.world)
                .iter()
                .filter(|snapshot| !snapshot.kind.is_grid_bound())
                .map(|snapshot| SceneEntity {
                    id: snapshot.id,
                    kind: snapshot.kind,
                    bounds: snapshot.bounds,
                    facing: snapshot.facing,
                    health: snapshot.health,
                }),
        );

        scene.particles.clear();
        scene.particles.extend(self.particles.instances());

        scene.hud = HudPresentation {
            messages: self.hud.messages().map(str::to_owned).collect(),
            status: self.hud.status().map(|status| status.caption().to_owned()),
            time_remaining: query::time_remaining(&self.world),
        };
    }
}

/// Totals reported after a headless run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RunSummary {
    pub(crate) ticks: u64,
    pub(crate) outcome: LevelOutcome,
    pub(crate) time_remaining: Duration,
    pub(crate) live_entities: usize,
    pub(crate) deaths: BTreeMap<&'static str, usize>,
    pub(crate) explosions: usize,
}

impl RunSummary {
    pub(crate) fn collect(world: &World, log: &[Event]) -> Self {
        let mut deaths = BTreeMap::new();
        let mut explosions = 0;
        for event in log {
            match event {
                Event::EntityDied { kind, .. } => *deaths.entry(kind_name(*kind)).or_insert(0) += 1,
                Event::ExplosionRequested { .. } => explosions += 1,
                _ => {}
            }
        }

        Self {
            ticks: query::tick_index(world),
            outcome: query::outcome(world),
            time_remaining: query::time_remaining(world),
            live_entities: query::entity_view(world).len(),
            deaths,
            explosions,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks: {}", self.ticks)?;
        writeln!(f, "outcome: {:?}", self.outcome)?;
        writeln!(
            f,
            "time remaining: {:.2}s",
            self.time_remaining.as_secs_f64()
        )?;
        writeln!(f, "live entities: {}", self.live_entities)?;
        writeln!(f, "explosions: {}", self.explosions)?;
        for (kind, count) in &self.deaths {
            writeln!(f, "deaths ({kind}): {count}")?;
        }
        Ok(())
    }
}

fn kind_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Player => "player",
        EntityKind::Enemy => "enemy",
        EntityKind::Bullet => "bullet",
        EntityKind::TileBomb => "tile bomb",
        EntityKind::BreakableTile => "breakable tile",
        EntityKind::Obstacle => "obstacle",
    }
}
