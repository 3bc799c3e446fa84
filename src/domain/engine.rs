//! Reactive dodge engine choosing one movement per control cycle.
//!
//! The engine is re-evaluated every frame and keeps no history besides the home position, the
//! player's position when it was first seen in a round.

use std::{fmt, slice::Iter, time::Duration};

use nalgebra::Vector2;
use thiserror::Error;
use tracing::{debug, info, trace};

use super::{strategy, with_magnitude, Detections, NoOverlay, Overlay, Position};

#[derive(Clone, Debug, PartialEq)]
pub struct DodgeEngine {
    config: EngineConfig,
    strategy: Strategy,
    home: Option<Position>,
}

impl DodgeEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            strategy: Strategy::default(),
            home: None,
        })
    }

    pub fn with_strategy(self, strategy: Strategy) -> Self {
        Self { strategy, ..self }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn home(&self) -> Option<Position> {
        self.home
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        if strategy != self.strategy {
            debug!(from = %self.strategy, to = %strategy, "strategy changed");
        }
        self.strategy = strategy;
    }

    pub fn set_detection_radius(&mut self, px: i32) -> Result<(), ConfigError> {
        self.reconfigure(|config| config.detection_radius = px)
    }

    pub fn set_cell_size(&mut self, px: i32) -> Result<(), ConfigError> {
        self.reconfigure(|config| config.cell_size = px)
    }

    pub fn set_cell_size_multiplier(&mut self, factor: f64) -> Result<(), ConfigError> {
        self.reconfigure(|config| config.cell_size_multiplier = factor)
    }

    pub fn set_travel_time_multiplier(&mut self, factor: f64) -> Result<(), ConfigError> {
        self.reconfigure(|config| config.travel_time_multiplier = factor)
    }

    /// Applies `change` to a copy of the configuration and keeps it only if it is valid.
    fn reconfigure(&mut self, change: impl FnOnce(&mut EngineConfig)) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        change(&mut config);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Forgets the home position. Called between rounds.
    pub fn reset_home(&mut self) {
        if let Some(home) = self.home.take() {
            info!(x = home.x(), y = home.y(), "home position cleared");
        }
    }

    /// Whether the player box overlaps any bullet box.
    pub fn is_in_danger(&self, detections: &Detections) -> bool {
        detections
            .player()
            .is_some_and(|player| detections.bullets.iter().any(|b| player.intersects(b)))
    }

    pub fn decide(&mut self, detections: &Detections) -> Decision {
        self.decide_with(detections, &mut NoOverlay)
    }

    /// Like [`DodgeEngine::decide`], reporting the decision's inputs to `overlay`.
    pub fn decide_with(&mut self, detections: &Detections, overlay: &mut dyn Overlay) -> Decision {
        let Some(player) = detections.player() else {
            trace!("no player detected");
            return Decision::idle();
        };
        let player = player.center();
        let home = *self.home.get_or_insert_with(|| {
            info!(x = player.x(), y = player.y(), "home position recorded");
            player
        });

        let situation = strategy::Situation {
            player,
            home,
            detections,
            config: &self.config,
        };
        let decision = match self.strategy {
            Strategy::NearestThreat => strategy::nearest_threat(&situation, overlay),
            Strategy::DensityGrid => strategy::density_grid(&situation, overlay),
            Strategy::Mixed => strategy::mixed(&situation, overlay),
        };
        overlay.decision(player, &decision);

        debug!(
            strategy = %self.strategy,
            maneuver = ?decision.maneuver,
            dx = decision.vector.x,
            dy = decision.vector.y,
            hold_ms = decision.hold.as_millis() as u64,
            "decided"
        );
        decision
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Strategy {
    #[default]
    NearestThreat,
    DensityGrid,
    Mixed,
}

impl Strategy {
    pub fn iter() -> Iter<'static, Strategy> {
        static STRATEGIES: [Strategy; 3] = [
            Strategy::NearestThreat,
            Strategy::DensityGrid,
            Strategy::Mixed,
        ];
        STRATEGIES.iter()
    }
}

impl TryFrom<usize> for Strategy {
    type Error = ConfigError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Strategy::NearestThreat),
            1 => Ok(Strategy::DensityGrid),
            2 => Ok(Strategy::Mixed),
            _ => Err(ConfigError::UnknownStrategy(value)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::NearestThreat => "nearest-threat",
            Strategy::DensityGrid => "density-grid",
            Strategy::Mixed => "mixed",
        })
    }
}

/// Branch of the strategy that produced a decision.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Maneuver {
    Idle,
    /// Perpendicular deflection from a close threat.
    Dodge,
    /// Horizontal move toward the nearest enemy.
    Approach,
    /// Move back toward the home position.
    Recenter,
    /// Move to the best neighboring grid cell.
    Reposition,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub vector: Vector2<f64>,
    pub hold: Duration,
    pub maneuver: Maneuver,
}

impl Decision {
    pub fn idle() -> Self {
        Self {
            vector: Vector2::zeros(),
            hold: Duration::ZERO,
            maneuver: Maneuver::Idle,
        }
    }

    /// A zero vector yields the idle decision, so nothing is ever held without a direction.
    pub fn new(vector: Vector2<f64>, hold: Duration, maneuver: Maneuver) -> Self {
        if vector.norm() < f64::EPSILON {
            Self::idle()
        } else {
            Self {
                vector,
                hold,
                maneuver,
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.maneuver == Maneuver::Idle
    }
}

impl Default for Decision {
    fn default() -> Self {
        Self::idle()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("detection radius must be positive, got {0} px")]
    NonPositiveRadius(i32),
    #[error("cell size must be positive, got {0} px")]
    NonPositiveCellSize(i32),
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidMultiplier { name: &'static str, value: f64 },
    #[error("cell size {cell_size} px scaled by {multiplier} is below one pixel")]
    DegenerateCellSize { cell_size: i32, multiplier: f64 },
    #[error("cell size {cell_size} px scaled by {multiplier} exceeds {max} px")]
    OversizedCell {
        cell_size: i32,
        multiplier: f64,
        max: f64,
    },
    #[error("travel time must be positive")]
    ZeroTravelTime,
    #[error("travel time {travel_time:?} scaled by {multiplier} is not a representable duration")]
    UnrepresentableHold {
        travel_time: Duration,
        multiplier: f64,
    },
    #[error("dodge magnitude must be a positive finite number, got {0}")]
    InvalidMagnitude(f64),
    #[error("unknown strategy {0}")]
    UnknownStrategy(usize),
}

/// Largest effective cell size. Leaves room for the grid's offsets around a screen position.
pub const MAX_CELL_SIZE: f64 = i32::MAX as f64 / 4.0;

/// Tunable parameters. Distances are in screen pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Threats whose center is at most this far from the player are dodged.
    pub detection_radius: i32,
    /// Side of a density grid cell before scaling.
    pub cell_size: i32,
    pub cell_size_multiplier: f64,
    /// Hold duration of a movement before scaling.
    pub travel_time: Duration,
    pub travel_time_multiplier: f64,
    /// Length dodge vectors are scaled to, if any.
    pub dodge_magnitude: Option<f64>,
}

impl EngineConfig {
    pub const fn new(
        detection_radius: i32,
        cell_size: i32,
        cell_size_multiplier: f64,
        travel_time: Duration,
        travel_time_multiplier: f64,
        dodge_magnitude: Option<f64>,
    ) -> Self {
        EngineConfig {
            detection_radius,
            cell_size,
            cell_size_multiplier,
            travel_time,
            travel_time_multiplier,
            dodge_magnitude,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detection_radius <= 0 {
            return Err(ConfigError::NonPositiveRadius(self.detection_radius));
        }
        if self.cell_size <= 0 {
            return Err(ConfigError::NonPositiveCellSize(self.cell_size));
        }
        check_multiplier("cell size multiplier", self.cell_size_multiplier)?;
        check_multiplier("travel time multiplier", self.travel_time_multiplier)?;
        let scaled_cell_size = self.cell_size as f64 * self.cell_size_multiplier;
        if scaled_cell_size > MAX_CELL_SIZE {
            return Err(ConfigError::OversizedCell {
                cell_size: self.cell_size,
                multiplier: self.cell_size_multiplier,
                max: MAX_CELL_SIZE,
            });
        }
        if self.effective_cell_size() < 1 {
            return Err(ConfigError::DegenerateCellSize {
                cell_size: self.cell_size,
                multiplier: self.cell_size_multiplier,
            });
        }
        if self.travel_time.is_zero() {
            return Err(ConfigError::ZeroTravelTime);
        }
        if self.scaled_travel_time().is_none() {
            return Err(ConfigError::UnrepresentableHold {
                travel_time: self.travel_time,
                multiplier: self.travel_time_multiplier,
            });
        }
        if let Some(magnitude) = self.dodge_magnitude {
            if !(magnitude.is_finite() && magnitude > 0.0) {
                return Err(ConfigError::InvalidMagnitude(magnitude));
            }
        }
        Ok(())
    }

    pub fn effective_cell_size(&self) -> i32 {
        (self.cell_size as f64 * self.cell_size_multiplier).round() as i32
    }

    /// Saturates for configurations that did not pass [`EngineConfig::validate`].
    pub fn hold_duration(&self) -> Duration {
        self.scaled_travel_time().unwrap_or(Duration::MAX)
    }

    fn scaled_travel_time(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.travel_time.as_secs_f64() * self.travel_time_multiplier)
            .ok()
    }

    /// Half the diagonal of a grid cell.
    pub fn critical_radius(&self) -> f64 {
        self.effective_cell_size() as f64 * std::f64::consts::SQRT_2 / 2.0
    }

    pub(super) fn scale_dodge(&self, vector: Vector2<f64>) -> Vector2<f64> {
        match self.dodge_magnitude {
            Some(magnitude) => with_magnitude(vector, magnitude),
            None => vector,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::new(150, 100, 1.0, Duration::from_millis(80), 1.0, None)
    }
}

fn check_multiplier(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidMultiplier { name, value })
    }
}
