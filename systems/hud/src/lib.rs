#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure HUD system that turns world events into overlay state.

use std::collections::VecDeque;

use tilebreaker_core::{DeathCause, EntityKind, Event};

/// Number of messages the HUD keeps by default.
pub const DEFAULT_CAPACITY: usize = 5;

/// Full-screen overlay shown when the level pauses for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HudStatus {
    /// The player reached the exit.
    PlayerWon,
    /// The clock ran out.
    PlayerLost,
    /// The player died and may start a new life.
    PlayerDied,
}

impl HudStatus {
    /// Text shown by adapters that lack overlay art.
    #[must_use]
    pub const fn caption(self) -> &'static str {
        match self {
            Self::PlayerWon => "You win!",
            Self::PlayerLost => "You lose!",
            Self::PlayerDied => "You died. Press Enter to continue.",
        }
    }
}

/// Bounded message log plus the current overlay status.
#[derive(Clone, Debug)]
pub struct Hud {
    messages: VecDeque<String>,
    capacity: usize,
    status: Option<HudStatus>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Hud {
    /// Creates a HUD retaining the default number of messages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a HUD retaining at most `capacity` messages.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
            status: None,
        }
    }

    /// Appends a message, dropping the oldest once the log is full.
    pub fn push(&mut self, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.messages.len() == self.capacity {
            let _ = self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    /// Messages from oldest to newest.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Overlay currently shown, if any.
    #[must_use]
    pub const fn status(&self) -> Option<HudStatus> {
        self.status
    }

    /// Updates the overlay and log from the events of one tick.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::ExitReached => {
                    self.status = Some(HudStatus::PlayerWon);
                    self.push("Level complete");
                }
                Event::TimeExpired => {
                    self.status = Some(HudStatus::PlayerLost);
                    self.push("Time is up");
                }
                Event::PlayerKilled { cause } => {
                    if self.status.is_none() {
                        self.status = Some(HudStatus::PlayerDied);
                    }
                    self.push(death_message(*cause));
                }
                Event::LifeStarted { .. } => {
                    self.status = None;
                    self.push("New life");
                }
                Event::TileRemoved { .. } => self.push("Tile destroyed"),
                Event::EntityDied {
                    kind: EntityKind::Enemy,
                    ..
                } => self.push("Enemy destroyed"),
                _ => {}
            }
        }
    }
}

fn death_message(cause: DeathCause) -> &'static str {
    match cause {
        DeathCause::Fell => "You fell out of the level",
        DeathCause::Shot => "You were blown up",
        DeathCause::CaughtByEnemy => "An enemy caught you",
        DeathCause::Forced => "You died",
    }
}
