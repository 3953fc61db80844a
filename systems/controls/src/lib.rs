#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure controls system translating sampled keys into player intents.
//!
//! The system also owns the crosshair. Camera displacement reaches it as
//! `CameraMoved` events published by the world once per tick, so the aim
//! point stays fixed relative to the level while the view scrolls.

use glam::Vec2;
use tilebreaker_core::{Command, Event, InputSnapshot, Key, PlayerIntent};

const MOVE_LEFT: [Key; 2] = [Key::Left, Key::A];
const MOVE_RIGHT: [Key; 2] = [Key::Right, Key::D];
const JUMP: [Key; 3] = [Key::Space, Key::Up, Key::W];
const FIRE: Key = Key::LeftControl;
const THROW: Key = Key::X;
const RESTART: Key = Key::Enter;

/// Whether the controlled player can currently act.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Playing,
    Dead,
    Finished,
}

/// Controls system that tracks aim and life restarts between frames.
#[derive(Clone, Debug)]
pub struct Controls {
    crosshair: Vec2,
    phase: Phase,
    restart_held: bool,
}

impl Controls {
    /// Creates the system with the crosshair placed at `aim`.
    #[must_use]
    pub const fn new(aim: Vec2) -> Self {
        Self {
            crosshair: aim,
            phase: Phase::Playing,
            restart_held: false,
        }
    }

    /// World-space aim point.
    #[must_use]
    pub const fn crosshair(&self) -> Vec2 {
        self.crosshair
    }

    /// Reports whether the player is dead and a new life may be requested.
    #[must_use]
    pub fn awaiting_new_life(&self) -> bool {
        self.phase == Phase::Dead
    }

    /// Consumes world events and the frame input, returning the intent for
    /// the next tick and emitting any commands the input triggers.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: &InputSnapshot,
        out: &mut Vec<Command>,
    ) -> PlayerIntent {
        for event in events {
            match event {
                Event::CameraMoved { delta } => self.crosshair += *delta,
                Event::PlayerKilled { .. } if self.phase == Phase::Playing => {
                    self.phase = Phase::Dead;
                }
                Event::LifeStarted { .. } => self.phase = Phase::Playing,
                Event::ExitReached | Event::TimeExpired => self.phase = Phase::Finished,
                _ => {}
            }
        }
        self.crosshair += input.pointer_delta();

        let restart_down = input.is_down(RESTART);
        if restart_down && !self.restart_held && self.phase == Phase::Dead {
            out.push(Command::StartNewLife);
        }
        self.restart_held = restart_down;

        intent_from(input)
    }
}

/// Maps held keys to a player intent. Left takes precedence over right.
#[must_use]
pub fn intent_from(input: &InputSnapshot) -> PlayerIntent {
    let any = |keys: &[Key]| keys.iter().any(|key| input.is_down(*key));

    let movement = if any(&MOVE_LEFT) {
        -1.0
    } else if any(&MOVE_RIGHT) {
        1.0
    } else {
        0.0
    };

    PlayerIntent {
        movement,
        jump: any(&JUMP),
        fire: input.is_down(FIRE),
        throw: input.is_down(THROW),
    }
}
