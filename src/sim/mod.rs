//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, no wall-clock reads
//! - Seeded RNG only
//! - No rendering or platform dependencies; cues for the host leave
//!   through the state's event queue

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{
    Deferred, EnemyCar, Explosion, GameEvent, GamePhase, GameState, PlayerCar, RoadMarking,
    ScheduledEvent,
};
pub use tick::{TickInput, tick};
