use std::time::Duration;

use tilebreaker_core::{
    Command, DeathCause, EntityId, EntityKind, Event, LevelOutcome, PlayerIntent,
};
use tilebreaker_world::{self as world, query, SpriteCatalog, World, TIME_LIMIT};

const FRAME: Duration = Duration::from_nanos(16_666_667);

fn load(source: &str) -> World {
    World::from_level(source, &SpriteCatalog::builtin()).expect("level loads")
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn tick(world: &mut World, intent: PlayerIntent) -> Vec<Event> {
    run(
        world,
        Command::Tick {
            dt: FRAME,
            intent,
        },
    )
}

fn first_of_kind(world: &World, kind: EntityKind) -> EntityId {
    query::entity_view(world)
        .iter()
        .find(|entity| entity.kind == kind)
        .map(|entity| entity.id)
        .expect("entity of the requested kind is live")
}

#[test]
fn killing_twice_reports_one_death() {
    let mut world = load("1...X\n..E..\n-----");
    let enemy = first_of_kind(&world, EntityKind::Enemy);

    let first = run(&mut world, Command::Kill { entity: enemy });
    assert!(matches!(
        first.as_slice(),
        [
            Event::EntityDied {
                kind: EntityKind::Enemy,
                ..
            },
            Event::ExplosionRequested { .. },
        ]
    ));

    let second = run(&mut world, Command::Kill { entity: enemy });
    assert!(second.is_empty());

    let _ = tick(&mut world, PlayerIntent::default());
    assert!(query::entity(&world, enemy).is_none());
}

#[test]
fn falling_below_the_level_kills_the_player_and_a_new_life_restarts() {
    let mut world = load("...X\n1...\n.---");

    let mut cause = None;
    for _ in 0..120 {
        let events = tick(&mut world, PlayerIntent::default());
        cause = events.iter().find_map(|event| match event {
            Event::PlayerKilled { cause } => Some(*cause),
            _ => None,
        });
        if cause.is_some() {
            break;
        }
    }

    assert_eq!(cause, Some(DeathCause::Fell));
    assert_eq!(query::outcome(&world), LevelOutcome::PlayerDied);
    assert!(query::player(&world).is_none());

    let events = run(&mut world, Command::StartNewLife);
    let Some(Event::LifeStarted { entity }) = events.last().cloned() else {
        panic!("expected a new life, got {events:?}");
    };
    assert!(events.contains(&Event::EntitySpawned {
        entity,
        kind: EntityKind::Player,
    }));
    assert_eq!(query::outcome(&world), LevelOutcome::InProgress);
    assert_eq!(query::pending_count(&world), 1);
    assert!(query::player(&world).is_none());
    assert_eq!(query::camera_position(&world), query::start_location(&world));

    assert!(run(&mut world, Command::StartNewLife).is_empty());

    let _ = tick(&mut world, PlayerIntent::default());
    let player = query::player(&world).expect("new player is live");
    assert_eq!(player.id, entity);
    assert_eq!(player.health, Some(1));
}

#[test]
fn enemy_contact_kills_the_player() {
    let mut world = load("1.E.X\n.....\n-----");

    let mut cause = None;
    for _ in 0..300 {
        let events = tick(&mut world, PlayerIntent::default());
        cause = events.iter().find_map(|event| match event {
            Event::PlayerKilled { cause } => Some(*cause),
            _ => None,
        });
        if cause.is_some() {
            break;
        }
    }

    assert_eq!(cause, Some(DeathCause::CaughtByEnemy));
    assert_eq!(query::outcome(&world), LevelOutcome::PlayerDied);
}

#[test]
fn forced_kill_of_the_player_ends_the_life() {
    let mut world = load("1...X\n.....\n-----");
    let player = query::player(&world).expect("player is live").id;

    let events = run(&mut world, Command::Kill { entity: player });
    assert_eq!(
        events,
        vec![
            Event::EntityDied {
                entity: player,
                kind: EntityKind::Player,
            },
            Event::PlayerKilled {
                cause: DeathCause::Forced,
            },
        ]
    );
    assert_eq!(query::outcome(&world), LevelOutcome::PlayerDied);
}

#[test]
fn clock_runs_out_once_and_freezes_the_level() {
    let mut world = load("1...X\n.....\n-----");
    let step = Duration::from_millis(50);
    let ticks = TIME_LIMIT.as_millis() / step.as_millis();

    let mut expired_at = Vec::new();
    for index in 1..=ticks + 10 {
        let events = run(
            &mut world,
            Command::Tick {
                dt: step,
                intent: PlayerIntent::default(),
            },
        );
        if events.contains(&Event::TimeExpired) {
            expired_at.push(index);
        }
    }

    assert_eq!(expired_at, vec![ticks]);
    assert_eq!(query::outcome(&world), LevelOutcome::TimedOut);
    assert_eq!(query::time_remaining(&world), Duration::ZERO);
    assert!(query::player(&world).is_some());
    assert!(run(&mut world, Command::StartNewLife).is_empty());
}

#[test]
fn thrown_bomb_spawns_later_and_detonates() {
    let mut world = load(&format!("1{}X\n{}\n{}", ".".repeat(8), ".".repeat(10), "-".repeat(10)));
    let throw = PlayerIntent {
        throw: true,
        ..PlayerIntent::default()
    };

    let mut bomb = None;
    let mut detonated = false;
    for _ in 0..300 {
        let events = tick(&mut world, throw);
        for event in &events {
            match event {
                Event::EntitySpawned {
                    entity,
                    kind: EntityKind::TileBomb,
                } if bomb.is_none() => bomb = Some(*entity),
                Event::ExplosionRequested { explosion } if explosion.particle_count == 80 => {
                    assert!(bomb.is_some());
                    detonated = true;
                }
                _ => {}
            }
        }
        if detonated {
            break;
        }
    }

    let bomb = bomb.expect("a tile bomb was thrown");
    assert!(detonated);
    let _ = tick(&mut world, PlayerIntent::default());
    assert!(query::entity(&world, bomb).is_none());
}
