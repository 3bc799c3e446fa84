//! The domain module encapsulates the core logic: the geometry of detections, the dodge engine
//! with its strategies, the per-cycle pilot, and a simulated field to fly in.
//!
//! Nothing in here knows about Bevy. Input and output go through the `Actuator` and `Overlay`
//! traits.

mod arena;
mod basis;
mod bounding_box;
mod collision;
mod detections;
mod engine;
mod grid;
mod overlay;
mod pilot;
mod strategy;

pub use arena::{Arena, ArenaConfig, ArenaError, Bullet, Enemy, Ship, ShipState, Shot};
pub use basis::{perpendiculars, with_magnitude, Position};
pub use bounding_box::BoundingBox;
pub use collision::HasCollision;
pub use detections::Detections;
pub use engine::{ConfigError, Decision, DodgeEngine, EngineConfig, Maneuver, Strategy};
pub use grid::{Grid, Region};
pub use overlay::{Mark, NoOverlay, Overlay, Sketch};
pub use pilot::{Actuator, Cycle, Direction, Pilot, PilotConfig};
