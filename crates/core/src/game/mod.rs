//! Coin-catching mini game played with the face.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::GameConfig,
    geometry::{Vec2, Viewport},
    rng::Rng,
    sticker::StickerStore,
    timeline::Cooldown,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u64,
    pub position: Vec2,
    pub value: u32,
    /// Set on the step that scores the coin; it leaves the field that step.
    #[serde(default)]
    pub collected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    CoinCollected { coin: u64, value: u32, score: u32 },
    Won { score: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    config: GameConfig,
    active: bool,
    score: u32,
    coins: Vec<Coin>,
    spawn: Cooldown,
    next_coin: u64,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            spawn: Cooldown::new(config.spawn_interval_ms),
            config,
            active: false,
            score: 0,
            coins: Vec::new(),
            next_coin: 1,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Resets the round and strips everything but the face sticker.
    pub fn start(&mut self, stickers: &mut StickerStore) {
        self.active = true;
        self.score = 0;
        self.coins.clear();
        self.spawn.reset();
        stickers.retain_faces();
        info!("game started");
    }

    pub fn stop(&mut self) {
        if self.active {
            info!(score = self.score, "game stopped");
        }
        self.active = false;
        self.coins.clear();
    }

    /// Drops a coin in at `x`, just above the visible area.
    pub fn spawn_coin(&mut self, x: f32) -> u64 {
        let id = self.next_coin;
        self.next_coin += 1;
        self.coins.push(Coin {
            id,
            position: Vec2::new(x, self.config.spawn_y),
            value: self.config.coin_value,
            collected: false,
        });
        id
    }

    fn speed(&self) -> f32 {
        if self.score >= self.config.speed_up_score {
            self.config.fast_speed
        } else {
            self.config.base_speed
        }
    }

    /// Runs one frame. `nose` is the face's nose tip in screen pixels; with
    /// no face nothing is collected.
    pub fn step(
        &mut self,
        now_ms: f64,
        nose: Option<Vec2>,
        viewport: Viewport,
        rng: &mut Rng,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.active {
            return events;
        }

        if self.score >= self.config.win_score {
            self.active = false;
            self.coins.clear();
            info!(score = self.score, "game won");
            events.push(GameEvent::Won { score: self.score });
            return events;
        }

        if self.spawn.try_fire(now_ms) {
            let margin = self.config.coin_radius;
            let x = rng.range(margin, (viewport.width - margin).max(margin));
            self.spawn_coin(x);
        }

        let speed = self.speed();
        for coin in &mut self.coins {
            coin.position.y += speed;
        }

        let reach = self.config.collision_radius();
        if let Some(nose) = nose {
            for coin in self.coins.iter_mut().filter(|coin| !coin.collected) {
                if coin.position.distance(nose) < reach {
                    coin.collected = true;
                    self.score += coin.value;
                    events.push(GameEvent::CoinCollected {
                        coin: coin.id,
                        value: coin.value,
                        score: self.score,
                    });
                }
            }
        }

        let floor = viewport.height + self.config.coin_radius;
        self.coins
            .retain(|coin| !coin.collected && coin.position.y < floor);

        events
    }
}
