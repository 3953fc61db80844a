use glam::Vec2;
use tilebreaker_core::{Command, DeathCause, EntityId, Event, InputSnapshot, Key, PlayerIntent};
use tilebreaker_system_controls::Controls;

#[test]
fn keys_map_to_intents() {
    let mut controls = Controls::new(Vec2::ZERO);
    let mut commands = Vec::new();

    let intent = controls.handle(
        &[],
        &InputSnapshot::new([Key::D, Key::W, Key::LeftControl, Key::X], Vec2::ZERO),
        &mut commands,
    );

    assert_eq!(
        intent,
        PlayerIntent {
            movement: 1.0,
            jump: true,
            fire: true,
            throw: true,
        }
    );
    assert!(commands.is_empty());
}

#[test]
fn crosshair_follows_camera_and_pointer() {
    let mut controls = Controls::new(Vec2::new(100.0, 50.0));
    let mut commands = Vec::new();

    let _ = controls.handle(
        &[Event::CameraMoved {
            delta: Vec2::new(10.0, -2.0),
        }],
        &InputSnapshot::new([], Vec2::new(-4.0, 6.0)),
        &mut commands,
    );

    assert_eq!(controls.crosshair(), Vec2::new(106.0, 54.0));
}

#[test]
fn enter_requests_one_new_life_after_death() {
    let mut controls = Controls::new(Vec2::ZERO);
    let mut commands = Vec::new();
    let enter = InputSnapshot::new([Key::Enter], Vec2::ZERO);

    let _ = controls.handle(&[], &enter, &mut commands);
    assert!(commands.is_empty(), "restart ignored while alive");

    let died = [Event::PlayerKilled {
        cause: DeathCause::Fell,
    }];
    let _ = controls.handle(&died, &enter, &mut commands);
    assert!(commands.is_empty(), "held key needs a fresh press");
    assert!(controls.awaiting_new_life());

    let _ = controls.handle(&[], &InputSnapshot::default(), &mut commands);
    let _ = controls.handle(&[], &enter, &mut commands);
    assert_eq!(commands, vec![Command::StartNewLife]);

    let started = [Event::LifeStarted {
        entity: EntityId::new(9),
    }];
    let _ = controls.handle(&started, &InputSnapshot::default(), &mut commands);
    assert!(!controls.awaiting_new_life());
}

#[test]
fn finished_level_refuses_restarts() {
    let mut controls = Controls::new(Vec2::ZERO);
    let mut commands = Vec::new();

    let _ = controls.handle(&[Event::ExitReached], &InputSnapshot::default(), &mut commands);
    let _ = controls.handle(
        &[Event::PlayerKilled {
            cause: DeathCause::Fell,
        }],
        &InputSnapshot::new([Key::Enter], Vec2::ZERO),
        &mut commands,
    );

    assert!(commands.is_empty());
    assert!(!controls.awaiting_new_life());
}
