//! 2D canvas rendering
//!
//! A pure view of the game state: the renderer reads, draws, and mutates
//! nothing in the simulation. Draw order per frame: background and road,
//! markings, enemies, explosions, player, boost bar, HUD text, banners,
//! then the phase overlay.
//!
//! Sprite images are looked up in the DOM and polled for readiness; until
//! every image reports complete, entities render as flat-color rectangles.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::consts::*;
use crate::sim::{EnemyCar, Explosion, GamePhase, GameState};

/// Fallback body colors for the enemy sprite variants
const ENEMY_COLORS: [&str; ENEMY_SPRITES] = ["#2ecc71", "#9b59b6", "#3498db", "#e67e22"];

/// Sprite images sourced from the host page
struct Sprites {
    player: Option<HtmlImageElement>,
    enemies: Vec<HtmlImageElement>,
    explosions: Vec<HtmlImageElement>,
    ready: bool,
}

impl Sprites {
    fn lookup(document: &Document) -> Self {
        let by_id = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        };

        let enemies: Vec<_> = (1..=ENEMY_SPRITES)
            .filter_map(|i| by_id(&format!("enemyCar{}Img", i)))
            .collect();
        let explosions: Vec<_> = (1..=EXPLOSION_FRAMES as usize)
            .filter_map(|i| by_id(&format!("explosion{}Img", i)))
            .collect();

        Self {
            player: by_id("playerCarImg"),
            enemies,
            explosions,
            ready: false,
        }
    }

    /// Readiness poll: true once every expected image has finished loading.
    /// Missing images leave the renderer on flat-color fallback for good.
    fn poll_ready(&mut self) {
        if self.ready {
            return;
        }
        let player_ok = self.player.as_ref().is_some_and(|img| img.complete());
        let enemies_ok =
            self.enemies.len() == ENEMY_SPRITES && self.enemies.iter().all(|img| img.complete());
        let explosions_ok = self.explosions.len() == EXPLOSION_FRAMES as usize
            && self.explosions.iter().all(|img| img.complete());
        if player_ok && enemies_ok && explosions_ok {
            self.ready = true;
            log::info!("Sprite images ready");
        }
    }
}

/// Renders the game state onto a 2D canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    sprites: Sprites,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, document: &Document) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            sprites: Sprites::lookup(document),
        })
    }

    /// Draw one frame. `best` is the persisted high score; `new_high` marks
    /// the just-ended session as a record for the summary screen.
    pub fn draw(&mut self, state: &GameState, best: u64, new_high: bool) {
        self.sprites.poll_ready();

        self.draw_road(state);
        for enemy in &state.enemies {
            self.draw_enemy(enemy);
        }
        for explosion in &state.explosions {
            self.draw_explosion(explosion);
        }
        self.draw_player(state);
        self.draw_boost_bar(state);
        self.draw_hud(state);
        self.draw_banners(state);

        match state.phase {
            GamePhase::Idle => self.draw_idle_overlay(best),
            GamePhase::Over => self.draw_over_overlay(state, best, new_high),
            GamePhase::Running => {}
        }
    }

    fn draw_road(&self, state: &GameState) {
        let ctx = &self.ctx;

        ctx.set_fill_style_str("#34495e");
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.set_fill_style_str("#7f8c8d");
        ctx.fill_rect(0.0, 0.0, ROAD_SHOULDER as f64, self.height);
        ctx.fill_rect(
            self.width - ROAD_SHOULDER as f64,
            0.0,
            ROAD_SHOULDER as f64,
            self.height,
        );

        ctx.set_fill_style_str("#f1c40f");
        let mark_x = self.width / 2.0 - MARKING_WIDTH as f64 / 2.0;
        for mark in &state.markings {
            ctx.fill_rect(
                mark_x,
                mark.y as f64,
                MARKING_WIDTH as f64,
                MARKING_HEIGHT as f64,
            );
        }
    }

    fn draw_player(&self, state: &GameState) {
        let ctx = &self.ctx;
        let (x, y) = (state.player.pos.x as f64, state.player.pos.y as f64);

        let drawn = self.sprites.ready
            && self
                .sprites
                .player
                .as_ref()
                .map(|img| {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        x,
                        y,
                        PLAYER_WIDTH as f64,
                        PLAYER_HEIGHT as f64,
                    )
                    .is_ok()
                })
                .unwrap_or(false);
        if !drawn {
            ctx.set_fill_style_str("#e74c3c");
            ctx.fill_rect(x, y, PLAYER_WIDTH as f64, PLAYER_HEIGHT as f64);
        }

        // Exhaust flame while boosting
        if state.boost_active {
            ctx.set_fill_style_str("#f1c40f");
            ctx.fill_rect(
                x + PLAYER_WIDTH as f64 / 2.0 - 5.0,
                y + PLAYER_HEIGHT as f64,
                10.0,
                20.0,
            );
        }
    }

    fn draw_enemy(&self, enemy: &EnemyCar) {
        let ctx = &self.ctx;
        let (x, y) = (enemy.pos.x as f64, enemy.pos.y as f64);

        if self.sprites.ready {
            if let Some(img) = self.sprites.enemies.get(enemy.sprite) {
                if ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        x,
                        y,
                        ENEMY_WIDTH as f64,
                        ENEMY_HEIGHT as f64,
                    )
                    .is_ok()
                {
                    return;
                }
            }
        }

        ctx.set_fill_style_str(ENEMY_COLORS[enemy.sprite % ENEMY_COLORS.len()]);
        ctx.fill_rect(x, y, ENEMY_WIDTH as f64, ENEMY_HEIGHT as f64);
    }

    fn draw_explosion(&self, explosion: &Explosion) {
        let ctx = &self.ctx;
        let (x, y) = (explosion.pos.x as f64, explosion.pos.y as f64);
        let size = EXPLOSION_SIZE as f64;

        if self.sprites.ready {
            if let Some(img) = self.sprites.explosions.get(explosion.frame as usize) {
                if ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, size, size)
                    .is_ok()
                {
                    return;
                }
            }
        }

        // Procedural burst fallback: a fireball disc plus scattered embers,
        // hashed from the explosion's own state so replays look identical
        let seed = hash32(
            (explosion.pos.x.abs() * 16.0) as u32,
            ((explosion.frame as u32) << 8) | explosion.delay as u32,
        );
        let cx = x + size / 2.0;
        let cy = y + size / 2.0;

        ctx.set_fill_style_str(&format!("rgba(255, {}, 0, 0.8)", 100 + seed % 100));
        ctx.begin_path();
        ctx.arc(cx, cy, size / 2.0, 0.0, std::f64::consts::TAU).ok();
        ctx.fill();

        for i in 0..10u32 {
            let h = hash32(seed, i);
            let angle = (h % 1000) as f64 / 1000.0 * std::f64::consts::TAU;
            let distance = ((h / 1000) % 1000) as f64 / 1000.0 * 30.0;
            ctx.set_fill_style_str(&format!("rgba(255, {}, 0, 0.7)", h % 155));
            ctx.fill_rect(
                cx + angle.cos() * distance - 5.0,
                cy + angle.sin() * distance - 5.0,
                10.0,
                10.0,
            );
        }
    }

    fn draw_boost_bar(&self, state: &GameState) {
        let ctx = &self.ctx;
        let bar_width = 200.0;
        let bar_height = 20.0;
        let x = self.width / 2.0 - bar_width / 2.0;
        let y = 20.0;

        ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
        ctx.fill_rect(x, y, bar_width, bar_height);

        ctx.set_fill_style_str(if state.boost_active {
            "#f1c40f"
        } else {
            "#2ecc71"
        });
        ctx.fill_rect(
            x,
            y,
            bar_width * (state.boost / BOOST_MAX) as f64,
            bar_height,
        );

        ctx.set_stroke_style_str("#fff");
        ctx.set_line_width(2.0);
        ctx.stroke_rect(x, y, bar_width, bar_height);

        ctx.set_fill_style_str("#fff");
        ctx.set_font("16px Arial");
        ctx.set_text_align("center");
        ctx.fill_text("BOOST", self.width / 2.0, y + bar_height + 18.0)
            .ok();
    }

    fn draw_hud(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("#fff");
        ctx.set_font("16px Arial");
        ctx.set_text_align("left");

        ctx.fill_text(&format!("Score: {}", state.score), 20.0, 30.0).ok();
        ctx.fill_text(&format!("Lives: {}", state.lives), 20.0, 52.0).ok();
        ctx.fill_text(&format!("Speed: {:.1}", state.game_speed), 20.0, 74.0)
            .ok();

        let level = state.score / SPEED_INTERVAL + 1;
        let to_next = state.next_speed_increase.saturating_sub(state.score);
        ctx.fill_text(
            &format!("Next Level: {} pts", to_next),
            20.0,
            self.height - 40.0,
        )
        .ok();
        ctx.fill_text(&format!("Speed Level: {}", level), 20.0, self.height - 20.0)
            .ok();
    }

    fn draw_banners(&self, state: &GameState) {
        let ctx = &self.ctx;

        if state.crash_banner > 0 {
            ctx.set_fill_style_str("#ff0000");
            ctx.set_font("bold 40px Arial");
            ctx.set_text_align("center");
            ctx.fill_text("CRASH!", self.width / 2.0, self.height / 2.0 - 50.0)
                .ok();
        }

        if state.speed_banner > 0 {
            ctx.set_fill_style_str("#f1c40f");
            ctx.set_font("bold 30px Arial");
            ctx.set_text_align("center");
            ctx.fill_text("SPEED INCREASED!", self.width / 2.0, 100.0).ok();
        }
    }

    fn draw_idle_overlay(&self, best: u64) {
        let ctx = &self.ctx;
        self.dim_field();

        ctx.set_fill_style_str("#f1c40f");
        ctx.set_font("bold 48px Arial");
        ctx.set_text_align("center");
        ctx.fill_text("ROAD RUSH", self.width / 2.0, self.height / 2.0 - 80.0)
            .ok();

        ctx.set_fill_style_str("#fff");
        ctx.set_font("20px Arial");
        ctx.fill_text("Press Space to Start", self.width / 2.0, self.height / 2.0)
            .ok();
        ctx.set_font("16px Arial");
        ctx.fill_text(
            "Arrows / A D to steer - Space to boost - M to mute",
            self.width / 2.0,
            self.height / 2.0 + 36.0,
        )
        .ok();
        ctx.fill_text(
            &format!("High Score: {}", best),
            self.width / 2.0,
            self.height / 2.0 + 70.0,
        )
        .ok();
    }

    fn draw_over_overlay(&self, state: &GameState, best: u64, new_high: bool) {
        let ctx = &self.ctx;
        self.dim_field();

        ctx.set_fill_style_str("#e74c3c");
        ctx.set_font("bold 48px Arial");
        ctx.set_text_align("center");
        ctx.fill_text("GAME OVER", self.width / 2.0, self.height / 2.0 - 80.0)
            .ok();

        ctx.set_fill_style_str("#fff");
        ctx.set_font("24px Arial");
        ctx.fill_text(
            &format!("Score: {}", state.score),
            self.width / 2.0,
            self.height / 2.0 - 20.0,
        )
        .ok();

        if new_high {
            ctx.set_fill_style_str("#f1c40f");
            ctx.fill_text("NEW HIGH SCORE!", self.width / 2.0, self.height / 2.0 + 20.0)
                .ok();
        } else {
            ctx.fill_text(
                &format!("High Score: {}", best),
                self.width / 2.0,
                self.height / 2.0 + 20.0,
            )
            .ok();
        }

        ctx.set_font("20px Arial");
        ctx.fill_text(
            "Press Space to Restart",
            self.width / 2.0,
            self.height / 2.0 + 70.0,
        )
        .ok();
    }

    fn dim_field(&self) {
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.6)");
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }
}

#[inline]
fn hash32(a: u32, b: u32) -> u32 {
    a.wrapping_mul(2654435761).wrapping_add(b.wrapping_mul(7919))
}
