//! Simulated bullet-hell field used as perception source and actuator target.
//!
//! Screen coordinates throughout: the origin is the top-left corner of the field and y grows
//! downward. Enemies drift along a band at the top and fire volleys, the ship lives near the bottom.

use std::{f64::consts::TAU, time::Duration};

use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

use super::{Actuator, BoundingBox, Detections, Direction, HasCollision};

#[derive(Clone, Debug, PartialEq)]
pub struct Arena {
    config: ArenaConfig,
    rng: ChaCha8Rng,
    ship: Ship,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    shots: Vec<Shot>,
    maneuver: Option<(Direction, Duration)>,
    firing: bool,
    focused: bool,
    shot_cooldown: Duration,
    lives: u32,
    hits: u32,
    bombs: u32,
    score: u32,
    rounds: u32,
    game_over: Option<Duration>,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let mut arena = Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ship: Ship::new(Vector2::zeros(), config.ship_size),
            enemies: vec![],
            bullets: vec![],
            shots: vec![],
            maneuver: None,
            firing: false,
            focused: false,
            shot_cooldown: Duration::ZERO,
            lives: config.lives,
            hits: 0,
            bombs: 0,
            score: 0,
            rounds: 0,
            game_over: None,
            config,
        };
        arena.start_round();
        Ok(arena)
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn maneuver(&self) -> Option<(Direction, Duration)> {
        self.maneuver
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn bombs(&self) -> u32 {
        self.bombs
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Rounds finished by a game over.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// What a detector would report for the current frame. The ship is only visible while alive.
    pub fn detections(&self) -> Detections {
        Detections::new(
            self.bullets.iter().map(|b| b.bounding_box()).collect(),
            self.enemies.iter().map(|e| e.bounding_box()).collect(),
            self.ship
                .is_alive()
                .then(|| self.ship.bounding_box())
                .into_iter()
                .collect(),
        )
    }

    /// Manual input: keep moving in `direction` for `hold`, or stop.
    pub fn steer(&mut self, direction: Option<Direction>, hold: Duration) {
        self.maneuver = direction.map(|d| (d, hold));
    }

    pub fn spawn_bullet(&mut self, position: Vector2<f64>, velocity: Vector2<f64>) {
        self.bullets.push(Bullet {
            position,
            velocity,
            size: self.config.bullet_size,
        });
    }

    pub fn update(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f64();

        if let Some(remaining) = self.game_over {
            if remaining <= dt {
                self.rounds += 1;
                info!(round = self.rounds, score = self.score, "starting new round");
                self.start_round();
            } else {
                self.game_over = Some(remaining - dt);
            }
            self.move_bullets(seconds);
            return;
        }

        self.move_ship(dt);
        self.move_enemies(dt);
        self.move_bullets(seconds);
        self.fire_shots(dt);
        self.move_shots(seconds);
        self.check_hits();
    }

    fn start_round(&mut self) {
        self.lives = self.config.lives;
        self.ship = Ship::new(self.spawn_point(), self.config.ship_size);
        self.bullets.clear();
        self.shots.clear();
        self.maneuver = None;
        self.game_over = None;
        let enemies = (0..self.config.enemy_count)
            .map(|_| self.new_enemy())
            .collect();
        self.enemies = enemies;
    }

    fn spawn_point(&self) -> Vector2<f64> {
        Vector2::new(self.config.width / 2.0, self.config.height * 0.85)
    }

    fn new_enemy(&mut self) -> Enemy {
        let half = self.config.enemy_size / 2.0;
        let x = self.rng.random_range(half..=self.config.width - half);
        let y = self.rng.random_range(half..=self.config.enemy_band - half);
        let velocity = if self.rng.random_bool(0.5) {
            self.config.enemy_speed
        } else {
            -self.config.enemy_speed
        };
        let cooldown = self
            .config
            .volley_interval
            .mul_f64(self.rng.random_range(0.75..1.25));
        Enemy {
            position: Vector2::new(x, y),
            size: self.config.enemy_size,
            velocity,
            health: self.config.enemy_health,
            cooldown,
        }
    }

    fn speed(&self) -> f64 {
        if self.focused {
            self.config.ship_speed * self.config.focus_factor
        } else {
            self.config.ship_speed
        }
    }

    fn clamp(&self, position: Vector2<f64>, size: f64) -> Vector2<f64> {
        let half = size / 2.0;
        Vector2::new(
            position.x.clamp(half, self.config.width - half),
            position.y.clamp(half, self.config.height - half),
        )
    }

    fn move_ship(&mut self, dt: Duration) {
        match self.ship.state {
            ShipState::Alive => {
                if let Some((direction, remaining)) = self.maneuver {
                    let step = remaining.min(dt).as_secs_f64();
                    let position = self.ship.position + direction.unit() * self.speed() * step;
                    self.ship.position = self.clamp(position, self.ship.size);
                    self.maneuver = (remaining > dt).then(|| (direction, remaining - dt));
                }
            }
            ShipState::Respawning(remaining) => {
                if remaining <= dt {
                    self.ship.position = self.spawn_point();
                    self.ship.state = ShipState::Alive;
                    debug!("ship respawned");
                } else {
                    self.ship.state = ShipState::Respawning(remaining - dt);
                }
            }
            ShipState::Wrecked => {}
        }
    }

    fn move_enemies(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f64();
        let width = self.config.width;
        let mut muzzles = vec![];

        for enemy in &mut self.enemies {
            let half = enemy.size / 2.0;
            enemy.position.x += enemy.velocity * seconds;
            if enemy.position.x < half || enemy.position.x > width - half {
                enemy.velocity = -enemy.velocity;
                enemy.position.x = enemy.position.x.clamp(half, width - half);
            }
            if enemy.cooldown <= dt {
                enemy.cooldown = self.config.volley_interval;
                muzzles.push(enemy.position);
            } else {
                enemy.cooldown -= dt;
            }
        }

        let target = self.ship.is_alive().then_some(self.ship.position);
        for origin in muzzles {
            self.fire_volley(origin, target);
        }
    }

    /// One bullet aimed at the ship plus an evenly spaced ring with a random phase.
    fn fire_volley(&mut self, origin: Vector2<f64>, target: Option<Vector2<f64>>) {
        let speed = self.config.bullet_speed;
        if let Some(direction) = target.and_then(|t| (t - origin).try_normalize(f64::EPSILON)) {
            self.spawn_bullet(origin, direction * speed);
        }
        let phase = self.rng.random_range(0.0..TAU);
        let count = self.config.volley_size;
        for k in 0..count {
            let angle = phase + TAU * k as f64 / count as f64;
            self.spawn_bullet(origin, Vector2::new(angle.cos(), angle.sin()) * speed);
        }
    }

    fn move_bullets(&mut self, seconds: f64) {
        let (width, height) = (self.config.width, self.config.height);
        self.bullets.retain_mut(|bullet| {
            bullet.position += bullet.velocity * seconds;
            let margin = bullet.size;
            (-margin..=width + margin).contains(&bullet.position.x)
                && (-margin..=height + margin).contains(&bullet.position.y)
        });
    }

    fn fire_shots(&mut self, dt: Duration) {
        if !self.firing || !self.ship.is_alive() {
            self.shot_cooldown = Duration::ZERO;
            return;
        }
        if self.shot_cooldown <= dt {
            self.shots.push(Shot {
                position: self.ship.position - Vector2::new(0.0, self.ship.size / 2.0),
                size: self.config.shot_size,
            });
            self.shot_cooldown = self.config.shot_interval;
        } else {
            self.shot_cooldown -= dt;
        }
    }

    fn move_shots(&mut self, seconds: f64) {
        let distance = self.config.shot_speed * seconds;
        let enemies = &mut self.enemies;
        let mut destroyed = vec![];

        self.shots.retain_mut(|shot| {
            shot.position.y -= distance;
            if shot.position.y < -shot.size {
                return false;
            }
            match enemies
                .iter_mut()
                .enumerate()
                .find(|(_, e)| e.health > 0 && e.has_collision(&*shot))
            {
                Some((index, enemy)) => {
                    enemy.health -= 1;
                    if enemy.health == 0 {
                        destroyed.push(index);
                    }
                    false
                }
                None => true,
            }
        });

        for index in destroyed {
            self.score += 1;
            debug!(score = self.score, "enemy destroyed");
            let enemy = self.new_enemy();
            self.enemies[index] = enemy;
        }
    }

    fn check_hits(&mut self) {
        if !self.ship.is_alive() {
            return;
        }
        let hit = self.bullets.iter().any(|b| b.has_collision(&self.ship))
            || self.enemies.iter().any(|e| e.has_collision(&self.ship));
        if !hit {
            return;
        }

        self.hits += 1;
        self.lives -= 1;
        self.bullets.clear();
        self.maneuver = None;
        if self.lives == 0 {
            self.ship.state = ShipState::Wrecked;
            self.game_over = Some(self.config.game_over_delay);
            info!(hits = self.hits, score = self.score, "game over");
        } else {
            self.ship.state = ShipState::Respawning(self.config.respawn_delay);
            info!(lives = self.lives, "ship hit");
        }
    }
}

impl Actuator for Arena {
    fn dodge(&mut self, vector: Vector2<f64>, hold: Duration) {
        self.maneuver = Direction::from_vector(vector)
            .filter(|_| !hold.is_zero())
            .map(|d| (d, hold));
    }

    fn set_fire(&mut self, firing: bool) {
        self.firing = firing;
    }

    fn bomb(&mut self) {
        if !self.ship.is_alive() {
            return;
        }
        debug!(cleared = self.bullets.len(), "bomb");
        self.bullets.clear();
        self.bombs += 1;
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }
}

fn square_at(position: Vector2<f64>, size: f64) -> BoundingBox {
    let size = size.round() as i32;
    BoundingBox::from_center(
        position.x.round() as i32,
        position.y.round() as i32,
        size,
        size,
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShipState {
    Alive,
    Respawning(Duration),
    Wrecked,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    position: Vector2<f64>,
    size: f64,
    state: ShipState,
}

impl Ship {
    fn new(position: Vector2<f64>, size: f64) -> Self {
        Self {
            position,
            size,
            state: ShipState::Alive,
        }
    }

    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn state(&self) -> ShipState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == ShipState::Alive
    }
}

impl HasCollision for Ship {
    fn bounding_box(&self) -> BoundingBox {
        square_at(self.position, self.size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    position: Vector2<f64>,
    size: f64,
    velocity: f64,
    health: u32,
    cooldown: Duration,
}

impl Enemy {
    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    pub fn size(&self) -> f64 {
        self.size
    }

}

impl HasCollision for Enemy {
    fn bounding_box(&self) -> BoundingBox {
        square_at(self.position, self.size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    position: Vector2<f64>,
    velocity: Vector2<f64>,
    size: f64,
}

impl Bullet {
    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    pub fn size(&self) -> f64 {
        self.size
    }
}

impl HasCollision for Bullet {
    fn bounding_box(&self) -> BoundingBox {
        square_at(self.position, self.size)
    }
}

/// Projectile fired by the ship. Travels straight up.
#[derive(Clone, Debug, PartialEq)]
pub struct Shot {
    position: Vector2<f64>,
    size: f64,
}

impl Shot {
    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    pub fn size(&self) -> f64 {
        self.size
    }
}

impl HasCollision for Shot {
    fn bounding_box(&self) -> BoundingBox {
        square_at(self.position, self.size)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArenaError {
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("focus factor must be in (0, 1], got {0}")]
    InvalidFocusFactor(f64),
    #[error("field of {width}x{height} is too small for its entities")]
    FieldTooSmall { width: f64, height: f64 },
    #[error("{0} interval must not be zero")]
    ZeroInterval(&'static str),
    #[error("at least one life is required")]
    NoLives,
}

/// Sizes in pixels, speeds in pixels per second.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
    pub ship_size: f64,
    pub ship_speed: f64,
    /// Speed factor while focused.
    pub focus_factor: f64,
    pub enemy_size: f64,
    pub enemy_count: usize,
    pub enemy_speed: f64,
    pub enemy_health: u32,
    /// Height of the band at the top of the field the enemies spawn in.
    pub enemy_band: f64,
    pub volley_interval: Duration,
    pub volley_size: usize,
    pub bullet_size: f64,
    pub bullet_speed: f64,
    pub shot_interval: Duration,
    pub shot_speed: f64,
    pub shot_size: f64,
    pub lives: u32,
    pub respawn_delay: Duration,
    pub game_over_delay: Duration,
    pub seed: u64,
}

impl ArenaConfig {
    pub const fn new(width: f64, height: f64, seed: u64) -> Self {
        Self {
            width,
            height,
            ship_size: 20.0,
            ship_speed: 300.0,
            focus_factor: 0.5,
            enemy_size: 30.0,
            enemy_count: 3,
            enemy_speed: 80.0,
            enemy_health: 20,
            enemy_band: 200.0,
            volley_interval: Duration::from_millis(1200),
            volley_size: 12,
            bullet_size: 10.0,
            bullet_speed: 150.0,
            shot_interval: Duration::from_millis(80),
            shot_speed: 600.0,
            shot_size: 6.0,
            lives: 3,
            respawn_delay: Duration::from_secs(1),
            game_over_delay: Duration::from_secs(2),
            seed,
        }
    }

    pub fn validate(&self) -> Result<(), ArenaError> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("ship size", self.ship_size),
            ("ship speed", self.ship_speed),
            ("enemy size", self.enemy_size),
            ("enemy band", self.enemy_band),
            ("bullet size", self.bullet_size),
            ("bullet speed", self.bullet_speed),
            ("shot speed", self.shot_speed),
            ("shot size", self.shot_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ArenaError::NonPositive { name, value });
            }
        }
        if !(self.enemy_speed.is_finite() && self.enemy_speed >= 0.0) {
            return Err(ArenaError::NonPositive {
                name: "enemy speed",
                value: self.enemy_speed,
            });
        }
        if !(self.focus_factor > 0.0 && self.focus_factor <= 1.0) {
            return Err(ArenaError::InvalidFocusFactor(self.focus_factor));
        }
        if self.width <= self.enemy_size.max(self.ship_size)
            || self.enemy_band < self.enemy_size
            || self.height <= self.enemy_band + self.ship_size
        {
            return Err(ArenaError::FieldTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.volley_interval.is_zero() {
            return Err(ArenaError::ZeroInterval("volley"));
        }
        if self.shot_interval.is_zero() {
            return Err(ArenaError::ZeroInterval("shot"));
        }
        if self.lives == 0 {
            return Err(ArenaError::NoLives);
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig::new(600.0, 800.0, 0)
    }
}
