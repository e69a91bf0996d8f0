//! Session state and entity types
//!
//! Everything the simulation mutates lives here, owned by one `GameState`
//! passed to the step function; there are no ambient globals. Deferred
//! effects are queued inside the state and tagged with a session generation
//! so a reset can never be outrun by a stale timer.

use glam::{Vec2, vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen shown, no simulation
    Idle,
    /// Simulation stepping
    Running,
    /// Summary screen shown, high score compared/persisted by the host
    Over,
}

/// Outbound cues for the host (audio, persistence). Drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player hit an enemy car
    Crash,
    /// An explosion effect spawned
    Explosion,
    /// Difficulty step applied
    SpeedUp,
    /// Boost engaged
    BoostEngaged,
    /// Session transitioned to Over
    RunEnded,
}

/// Deferred effect kinds
#[derive(Debug, Clone, Copy)]
pub enum Deferred {
    /// Staggered follow-up explosion around a crash point
    FollowUpExplosion { center: Vec2 },
    /// Delayed transition to Over after the terminal explosion
    EndRun,
}

/// A deferred effect tagged with the session it belongs to.
/// Events whose generation no longer matches are dropped unfired.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEvent {
    pub due_tick: u64,
    pub generation: u32,
    pub kind: Deferred,
}

/// The player's car
#[derive(Debug, Clone, Copy)]
pub struct PlayerCar {
    /// Top-left corner
    pub pos: Vec2,
}

impl PlayerCar {
    pub fn new() -> Self {
        Self {
            pos: vec2(
                FIELD_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                FIELD_HEIGHT - PLAYER_START_OFFSET,
            ),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, vec2(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    /// Step left, clamped to the field edge
    pub fn move_left(&mut self) {
        self.pos.x = (self.pos.x - PLAYER_SPEED).max(0.0);
    }

    /// Step right, clamped to the field edge
    pub fn move_right(&mut self) {
        self.pos.x = (self.pos.x + PLAYER_SPEED).min(FIELD_WIDTH - PLAYER_WIDTH);
    }
}

impl Default for PlayerCar {
    fn default() -> Self {
        Self::new()
    }
}

/// An oncoming enemy car
#[derive(Debug, Clone, Copy)]
pub struct EnemyCar {
    /// Top-left corner
    pub pos: Vec2,
    /// Per-instance speed, before the global game-speed multiplier
    pub speed: f32,
    /// Sprite variant, drawn once at spawn so the car looks the same each frame
    pub sprite: usize,
}

impl EnemyCar {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, vec2(ENEMY_WIDTH, ENEMY_HEIGHT))
    }
}

/// One segment of the dashed center line. The ring is fixed-size; segments
/// wrap back above the field instead of being destroyed.
#[derive(Debug, Clone, Copy)]
pub struct RoadMarking {
    pub y: f32,
}

/// A finite-frame explosion effect
#[derive(Debug, Clone, Copy)]
pub struct Explosion {
    /// Top-left corner
    pub pos: Vec2,
    /// Current animation frame
    pub frame: u8,
    /// Ticks accumulated toward the next frame advance
    pub delay: u8,
    pub active: bool,
}

impl Explosion {
    /// Create an explosion centered on `center`
    pub fn at(center: Vec2) -> Self {
        Self {
            pos: center - vec2(EXPLOSION_SIZE / 2.0, EXPLOSION_SIZE / 2.0),
            frame: 0,
            delay: 0,
            active: true,
        }
    }

    /// Advance the delay counter, stepping the frame when it elapses.
    /// Deactivates once the last frame has been shown.
    pub fn step(&mut self) {
        if !self.active {
            return;
        }
        self.delay += 1;
        if self.delay >= EXPLOSION_FRAME_DELAY {
            self.delay = 0;
            self.frame += 1;
            if self.frame >= EXPLOSION_FRAMES {
                self.active = false;
            }
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Session RNG; every random draw comes from this stream
    pub rng: Pcg32,
    /// Bumped on every session start; guards deferred events
    pub generation: u32,
    pub phase: GamePhase,
    /// Step counter, advanced once per running tick
    pub time_ticks: u64,
    pub score: u64,
    pub lives: u8,
    /// Global speed multiplier
    pub game_speed: f32,
    /// Floor for newly spawned enemy speeds
    pub enemy_base_speed: f32,
    /// Score threshold for the next difficulty step
    pub next_speed_increase: u64,
    /// Boost resource in [0, BOOST_MAX]
    pub boost: f32,
    pub boost_active: bool,
    /// Set when the last life is gone and the terminal delay is running
    pub ending: bool,
    pub player: PlayerCar,
    pub enemies: Vec<EnemyCar>,
    pub markings: Vec<RoadMarking>,
    pub explosions: Vec<Explosion>,
    /// Deferred effects, generation-tagged
    pub pending: Vec<ScheduledEvent>,
    /// Outbound cues, drained by the host each frame
    pub events: Vec<GameEvent>,
    /// Ticks remaining on the transient banners
    pub crash_banner: u32,
    pub speed_banner: u32,
}

impl GameState {
    /// Create an idle session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            generation: 0,
            phase: GamePhase::Idle,
            time_ticks: 0,
            score: 0,
            lives: START_LIVES,
            game_speed: 1.0,
            enemy_base_speed: ENEMY_START_SPEED,
            next_speed_increase: SPEED_INTERVAL,
            boost: BOOST_MAX,
            boost_active: false,
            ending: false,
            player: PlayerCar::new(),
            enemies: Vec::new(),
            markings: marking_ring(),
            explosions: Vec::new(),
            pending: Vec::new(),
            events: Vec::new(),
            crash_banner: 0,
            speed_banner: 0,
        }
    }

    /// Reset every store and scalar and enter Running.
    ///
    /// Valid from any phase. Pending deferred effects are cleared and the
    /// generation is bumped, so anything scheduled by the previous session
    /// can never apply to this one.
    pub fn start(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.generation = self.generation.wrapping_add(1);
        self.phase = GamePhase::Running;
        self.time_ticks = 0;
        self.score = 0;
        self.lives = START_LIVES;
        self.game_speed = 1.0;
        self.enemy_base_speed = ENEMY_START_SPEED;
        self.next_speed_increase = SPEED_INTERVAL;
        self.boost = BOOST_MAX;
        self.boost_active = false;
        self.ending = false;
        self.player = PlayerCar::new();
        self.enemies.clear();
        self.markings = marking_ring();
        self.explosions.clear();
        self.pending.clear();
        self.events.clear();
        self.crash_banner = 0;
        self.speed_banner = 0;
    }

    /// Queue a deferred effect for the current session
    pub fn schedule(&mut self, delay_ticks: u64, kind: Deferred) {
        self.pending.push(ScheduledEvent {
            due_tick: self.time_ticks + delay_ticks,
            generation: self.generation,
            kind,
        });
    }

    /// Spawn an explosion centered on `center` and emit the cue
    pub fn spawn_explosion(&mut self, center: Vec2) {
        self.explosions.push(Explosion::at(center));
        self.events.push(GameEvent::Explosion);
    }

    /// Hand the queued cues to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

fn marking_ring() -> Vec<RoadMarking> {
    (0..MARKING_COUNT)
        .map(|i| RoadMarking {
            y: i as f32 * MARKING_SPACING,
        })
        .collect()
}
