//! Per-frame simulation step
//!
//! `tick` advances the session by exactly one frame: deferred effects,
//! input, spawning, motion, collision resolution, difficulty, boost,
//! banners. It never draws and never touches the platform; cues for the
//! host leave through the state's event queue.

use glam::vec2;
use rand::Rng;

use super::state::{Deferred, EnemyCar, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single step
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Left movement key held
    pub left: bool,
    /// Right movement key held
    pub right: bool,
    /// Boost key edge (one-shot)
    pub boost: bool,
    /// Start/restart edge (one-shot)
    pub start: bool,
}

/// Advance the session by one frame step
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Idle | GamePhase::Over => {
            if input.start {
                // Next session's seed comes off the current stream, so a
                // whole sequence of runs replays from the initial seed
                let seed = state.rng.random();
                state.start(seed);
            }
            return;
        }
        GamePhase::Running => {}
    }

    state.time_ticks += 1;

    fire_due_events(state);
    if state.phase == GamePhase::Over {
        return;
    }

    if input.left {
        state.player.move_left();
    }
    if input.right {
        state.player.move_right();
    }

    // Boost engages on the key edge, only from a sufficient reserve
    if input.boost && !state.boost_active && state.boost >= BOOST_MIN_ACTIVATION {
        state.boost_active = true;
        state.events.push(GameEvent::BoostEngaged);
    }

    scroll_markings(state);
    roll_spawner(state);
    advance_enemies(state);
    if !state.ending {
        resolve_collisions(state);
    }
    advance_explosions(state);
    advance_score(state);
    update_boost(state);

    state.crash_banner = state.crash_banner.saturating_sub(1);
    state.speed_banner = state.speed_banner.saturating_sub(1);
}

/// Fire deferred effects that have come due. Effects scheduled by an
/// earlier session are dropped without firing.
fn fire_due_events(state: &mut GameState) {
    let now = state.time_ticks;
    let mut due = Vec::new();
    state.pending.retain(|ev| {
        if ev.due_tick <= now {
            due.push(*ev);
            false
        } else {
            true
        }
    });

    for ev in due {
        if ev.generation != state.generation {
            continue;
        }
        match ev.kind {
            Deferred::FollowUpExplosion { center } => {
                let dx = state
                    .rng
                    .random_range(-SECONDARY_OFFSET_RANGE..SECONDARY_OFFSET_RANGE);
                let dy = state
                    .rng
                    .random_range(-SECONDARY_OFFSET_RANGE..SECONDARY_OFFSET_RANGE);
                state.spawn_explosion(center + vec2(dx, dy));
            }
            Deferred::EndRun => {
                state.phase = GamePhase::Over;
                state.events.push(GameEvent::RunEnded);
            }
        }
    }
}

fn scroll_markings(state: &mut GameState) {
    let scroll = MARKING_SCROLL * state.game_speed;
    for mark in &mut state.markings {
        mark.y += scroll;
        if mark.y > FIELD_HEIGHT {
            mark.y = -MARKING_HEIGHT;
        }
    }
}

/// Spawn roll: probability scales with the score tier and the game speed.
/// Concurrent enemy count is bounded only by attrition.
fn roll_spawner(state: &mut GameState) {
    let tier = (state.score / SPAWN_RATE_SCORE_STEP) as f32;
    let rate = (SPAWN_RATE_BASE + tier * SPAWN_RATE_STEP) * state.game_speed;
    if state.rng.random::<f32>() >= rate {
        return;
    }

    let lane_span = FIELD_WIDTH - ENEMY_WIDTH - 2.0 * ROAD_SHOULDER;
    let x = ROAD_SHOULDER + state.rng.random::<f32>() * lane_span;
    let floor = state.enemy_base_speed + (state.score / 100) as f32 * ENEMY_TIER_BONUS;
    let speed = floor + state.rng.random::<f32>() * ENEMY_SPEED_SPREAD;
    let sprite = state.rng.random_range(0..ENEMY_SPRITES);

    state.enemies.push(EnemyCar {
        pos: vec2(x, -ENEMY_HEIGHT),
        speed,
        sprite,
    });
}

fn advance_enemies(state: &mut GameState) {
    let multiplier = state.game_speed;
    for enemy in &mut state.enemies {
        enemy.pos.y += enemy.speed * multiplier;
    }
    // Cars that clear the bottom edge just disappear; evasion earns nothing
    state.enemies.retain(|e| e.pos.y < FIELD_HEIGHT);
}

/// AABB player-vs-enemy resolution. Each colliding enemy is removed on
/// detection and costs exactly one life, so simultaneous overlaps resolve
/// independently and nothing is counted twice.
fn resolve_collisions(state: &mut GameState) {
    let player_rect = state.player.rect();
    let mut i = 0;
    while i < state.enemies.len() {
        if !state.enemies[i].rect().overlaps(&player_rect) {
            i += 1;
            continue;
        }
        let enemy = state.enemies.remove(i);

        state.events.push(GameEvent::Crash);
        state.crash_banner = CRASH_BANNER_TICKS;

        let center = (player_rect.center() + enemy.rect().center()) * 0.5;
        state.spawn_explosion(center);
        for n in 1..=SECONDARY_EXPLOSIONS as u64 {
            state.schedule(
                n * SECONDARY_STAGGER_TICKS,
                Deferred::FollowUpExplosion { center },
            );
        }

        state.lives = state.lives.saturating_sub(1);
        if state.lives == 0 {
            state.spawn_explosion(player_rect.center());
            state.schedule(GAME_OVER_DELAY_TICKS, Deferred::EndRun);
            state.ending = true;
            break;
        }
    }
}

fn advance_explosions(state: &mut GameState) {
    for explosion in &mut state.explosions {
        explosion.step();
    }
    state.explosions.retain(|e| e.active);
}

/// Score accrual plus the two score-triggered difficulty mechanisms
fn advance_score(state: &mut GameState) {
    let old_score = state.score;
    state.score += state.game_speed.floor() as u64;

    // Global step every SPEED_INTERVAL points. A large increment can cross
    // more than one threshold, so loop rather than test equality.
    while state.score >= state.next_speed_increase {
        state.game_speed += GAME_SPEED_STEP;
        state.enemy_base_speed += ENEMY_BASE_SPEED_STEP;
        state.next_speed_increase += SPEED_INTERVAL;
        state.speed_banner = SPEED_BANNER_TICKS;
        state.events.push(GameEvent::SpeedUp);
    }

    // Live enemies creep faster at every 100-point crossing
    let crossings = state.score / 100 - old_score / 100;
    if crossings > 0 {
        let creep = ENEMY_CREEP * crossings as f32;
        for enemy in &mut state.enemies {
            enemy.speed += creep;
        }
    }
}

fn update_boost(state: &mut GameState) {
    if state.boost_active {
        state.boost -= BOOST_DRAIN;
        if state.boost <= 0.0 {
            state.boost = 0.0;
            state.boost_active = false;
        }
    } else if state.boost < BOOST_MAX {
        state.boost = (state.boost + BOOST_REGEN).min(BOOST_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ScheduledEvent;
    use proptest::prelude::*;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start(seed);
        state
    }

    /// An enemy parked on top of the player
    fn enemy_on_player(state: &GameState) -> EnemyCar {
        EnemyCar {
            pos: state.player.pos,
            speed: 0.0,
            sprite: 0,
        }
    }

    #[test]
    fn test_idle_ignores_everything_but_start() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput {
            left: true,
            boost: true,
            ..Default::default()
        });
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &TickInput {
            start: true,
            ..Default::default()
        });
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.boost, BOOST_MAX);
        assert_eq!(state.next_speed_increase, SPEED_INTERVAL);
    }

    #[test]
    fn test_score_accrues_by_floored_speed() {
        let mut state = running_state(3);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);

        state.game_speed = 1.8;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 2);

        state.game_speed = 2.3;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 4);
    }

    #[test]
    fn test_speed_threshold_crossing() {
        let mut state = running_state(5);
        state.score = SPEED_INTERVAL - 1;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, SPEED_INTERVAL);
        assert!((state.game_speed - 1.2).abs() < 1e-6);
        assert!((state.enemy_base_speed - 2.5).abs() < 1e-6);
        assert_eq!(state.next_speed_increase, 2 * SPEED_INTERVAL);
        assert!(state.speed_banner > 0);
        assert!(state.drain_events().contains(&GameEvent::SpeedUp));
    }

    #[test]
    fn test_enemy_creep_on_hundred_crossing() {
        let mut state = running_state(5);
        state.score = 99;
        state.enemies.push(EnemyCar {
            pos: vec2(100.0, 10.0),
            speed: 2.0,
            sprite: 0,
        });

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 100);
        let creeped = state
            .enemies
            .iter()
            .find(|e| (e.speed - (2.0 + ENEMY_CREEP)).abs() < 1e-6);
        assert!(creeped.is_some(), "live enemy did not pick up the creep");
    }

    #[test]
    fn test_enemies_culled_past_bottom() {
        let mut state = running_state(9);
        state.enemies.push(EnemyCar {
            pos: vec2(100.0, FIELD_HEIGHT - 0.5),
            speed: 2.0,
            sprite: 0,
        });
        let before = state.enemies.len();

        tick(&mut state, &TickInput::default());

        // The planted car crossed the bottom edge and is gone; anything
        // remaining was freshly spawned at the top
        assert!(state.enemies.len() < before || state.enemies.iter().all(|e| e.pos.y < 0.0));
        assert!(!state.enemies.iter().any(|e| e.pos.y >= FIELD_HEIGHT));
    }

    #[test]
    fn test_markings_scroll_and_wrap() {
        let mut state = running_state(2);
        state.markings[0].y = FIELD_HEIGHT - 1.0;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.markings[0].y, -MARKING_HEIGHT);
        assert_eq!(state.markings.len(), MARKING_COUNT);
    }

    #[test]
    fn test_collision_costs_one_life_and_four_explosions() {
        let mut state = running_state(11);
        state.enemies.push(enemy_on_player(&state));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, START_LIVES - 1);
        // Primary explosion now, three follow-ups still queued
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.pending.len(), SECONDARY_EXPLOSIONS as usize);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Crash));
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::Explosion).count(),
            1
        );
        assert!(state.crash_banner > 0);
        // The colliding car is gone
        let player_rect = state.player.rect();
        assert!(!state.enemies.iter().any(|e| e.rect().overlaps(&player_rect)));

        // Follow-ups land staggered over the next few steps
        for _ in 0..(SECONDARY_EXPLOSIONS as u64 * SECONDARY_STAGGER_TICKS) {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.pending.is_empty());
        let later = state.drain_events();
        assert_eq!(
            later.iter().filter(|e| **e == GameEvent::Explosion).count(),
            SECONDARY_EXPLOSIONS as usize
        );
    }

    #[test]
    fn test_simultaneous_collisions_each_cost_a_life() {
        let mut state = running_state(13);
        state.enemies.push(enemy_on_player(&state));
        state.enemies.push(enemy_on_player(&state));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, START_LIVES - 2);
    }

    #[test]
    fn test_last_life_ends_run_after_delay() {
        let mut state = running_state(17);
        state.lives = 1;
        state.enemies.push(enemy_on_player(&state));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, 0);
        assert!(state.ending);
        assert_eq!(state.phase, GamePhase::Running);
        // Primary crash explosion plus the terminal one at the player
        assert_eq!(state.explosions.len(), 2);

        for _ in 0..GAME_OVER_DELAY_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Over);
        assert!(state.drain_events().contains(&GameEvent::RunEnded));
    }

    #[test]
    fn test_no_damage_while_run_is_ending() {
        let mut state = running_state(19);
        state.lives = 1;
        state.enemies.push(enemy_on_player(&state));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 0);

        // Another car drives straight through the wreck
        state.enemies.push(enemy_on_player(&state));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_boost_activation_threshold() {
        let mut state = running_state(23);
        state.boost = BOOST_MIN_ACTIVATION - 0.5;
        tick(&mut state, &TickInput {
            boost: true,
            ..Default::default()
        });
        assert!(!state.boost_active);

        state.boost = BOOST_MIN_ACTIVATION;
        tick(&mut state, &TickInput {
            boost: true,
            ..Default::default()
        });
        assert!(state.boost_active);
        assert!(state.drain_events().contains(&GameEvent::BoostEngaged));
    }

    #[test]
    fn test_boost_drains_to_zero_and_deactivates() {
        let mut state = running_state(29);
        state.boost = BOOST_MIN_ACTIVATION;
        tick(&mut state, &TickInput {
            boost: true,
            ..Default::default()
        });

        // First tick already drained once; finish the reserve
        let remaining = (BOOST_MIN_ACTIVATION / BOOST_DRAIN) as u32 - 1;
        for _ in 0..remaining - 1 {
            tick(&mut state, &TickInput::default());
            assert!(state.boost_active);
            assert!(state.boost > 0.0);
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.boost, 0.0);
        assert!(!state.boost_active);
    }

    #[test]
    fn test_boost_regenerates_to_cap() {
        let mut state = running_state(31);
        state.boost = BOOST_MAX - BOOST_REGEN / 2.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.boost, BOOST_MAX);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.boost, BOOST_MAX);
    }

    #[test]
    fn test_spawns_reproducible_from_seed() {
        let mut a = running_state(0xDEADBEEF);
        let mut b = running_state(0xDEADBEEF);
        let input = TickInput {
            left: true,
            ..Default::default()
        };

        for _ in 0..600 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.speed, eb.speed);
            assert_eq!(ea.sprite, eb.sprite);
        }
    }

    #[test]
    fn test_restart_after_game_over_is_clean() {
        let mut state = running_state(37);
        state.lives = 1;
        state.enemies.push(enemy_on_player(&state));
        tick(&mut state, &TickInput::default());
        for _ in 0..GAME_OVER_DELAY_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Over);

        tick(&mut state, &TickInput {
            start: true,
            ..Default::default()
        });
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.boost, BOOST_MAX);
        assert!(!state.ending);
        assert!(state.enemies.is_empty());
        assert!(state.explosions.is_empty());
        assert!(state.pending.is_empty());
    }

    #[test]
    fn test_stale_generation_events_never_fire() {
        let mut state = running_state(41);
        state.pending.push(ScheduledEvent {
            due_tick: state.time_ticks + 1,
            generation: state.generation.wrapping_sub(1),
            kind: Deferred::FollowUpExplosion {
                center: vec2(200.0, 300.0),
            },
        });

        tick(&mut state, &TickInput::default());

        assert!(state.explosions.is_empty());
        assert!(!state.drain_events().contains(&GameEvent::Explosion));
        assert!(state.pending.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Lives and boost stay in bounds and score never decreases, no
        /// matter what the player mashes.
        #[test]
        fn prop_session_invariants(seed in any::<u64>(), moves in prop::collection::vec(0u8..8, 1..400)) {
            let mut state = GameState::new(seed);
            state.start(seed);
            let mut last_score = 0u64;

            for m in moves {
                let input = TickInput {
                    left: m & 1 != 0,
                    right: m & 2 != 0,
                    boost: m & 4 != 0,
                    start: false,
                };
                tick(&mut state, &input);

                prop_assert!(state.lives <= START_LIVES);
                prop_assert!(state.boost >= 0.0 && state.boost <= BOOST_MAX);
                prop_assert!(state.score >= last_score);
                last_score = state.score;

                if state.phase == GamePhase::Over {
                    break;
                }
            }
        }
    }
}
