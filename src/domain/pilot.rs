//! Autopilot running one perceive-decide-act cycle per frame.
//!
//! The pilot wraps the dodge engine with the round-level policy around it: fire while the player
//! is visible, bomb when a bullet already overlaps the player, and call the round over after the
//! player has been missing for too many cycles in a row.

use std::time::Duration;

use nalgebra::Vector2;
use tracing::{debug, info};

use super::{Decision, Detections, DodgeEngine, Maneuver, Overlay};

/// Receiver of the pilot's commands. Delivering them as input is up to the implementation.
pub trait Actuator {
    /// Move along `vector` for `hold`. A zero hold means stop.
    fn dodge(&mut self, vector: Vector2<f64>, hold: Duration);

    fn set_fire(&mut self, firing: bool);

    fn bomb(&mut self);

    /// Slow, precise movement.
    fn set_focus(&mut self, focused: bool);
}

/// Directional input.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Key of the dominant axis of `vector`. Vertical wins when both axes are equal.
    pub fn from_vector(vector: Vector2<f64>) -> Option<Direction> {
        let (dx, dy) = (vector.x, vector.y);
        if dx == 0.0 && dy == 0.0 {
            None
        } else if dx.abs() > dy.abs() {
            Some(if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            Some(if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        }
    }

    /// Unit vector in screen space, where down is positive y.
    pub fn unit(self) -> Vector2<f64> {
        match self {
            Direction::Up => Vector2::new(0.0, -1.0),
            Direction::Down => Vector2::new(0.0, 1.0),
            Direction::Left => Vector2::new(-1.0, 0.0),
            Direction::Right => Vector2::new(1.0, 0.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PilotConfig {
    pub use_bombs: bool,
    /// Consecutive cycles without a player after which the round is considered over.
    pub max_missing_player_cycles: u32,
}

impl PilotConfig {
    pub const fn new(use_bombs: bool, max_missing_player_cycles: u32) -> Self {
        PilotConfig {
            use_bombs,
            max_missing_player_cycles,
        }
    }
}

impl Default for PilotConfig {
    fn default() -> Self {
        PilotConfig::new(false, 200)
    }
}

/// Outcome of one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cycle {
    /// No player detected, for the given number of cycles in a row.
    NoPlayer(u32),
    /// The player stayed missing long enough to end the round. The home position was reset.
    RoundOver,
    Acted(Decision),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pilot {
    engine: DodgeEngine,
    config: PilotConfig,
    missing_player_cycles: u32,
    bombs_used: u32,
}

impl Pilot {
    pub fn new(engine: DodgeEngine, config: PilotConfig) -> Self {
        Self {
            engine,
            config,
            missing_player_cycles: 0,
            bombs_used: 0,
        }
    }

    pub fn engine(&self) -> &DodgeEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DodgeEngine {
        &mut self.engine
    }

    pub fn config(&self) -> &PilotConfig {
        &self.config
    }

    pub fn set_use_bombs(&mut self, use_bombs: bool) {
        self.config.use_bombs = use_bombs;
    }

    pub fn bombs_used(&self) -> u32 {
        self.bombs_used
    }

    pub fn step(
        &mut self,
        detections: &Detections,
        actuator: &mut dyn Actuator,
        overlay: &mut dyn Overlay,
    ) -> Cycle {
        if detections.player().is_none() {
            actuator.set_fire(false);
            actuator.set_focus(false);
            actuator.dodge(Vector2::zeros(), Duration::ZERO);
            self.missing_player_cycles += 1;
            if self.missing_player_cycles >= self.config.max_missing_player_cycles {
                info!(cycles = self.missing_player_cycles, "player lost, round over");
                self.missing_player_cycles = 0;
                self.engine.reset_home();
                return Cycle::RoundOver;
            }
            debug!(cycles = self.missing_player_cycles, "player not detected");
            return Cycle::NoPlayer(self.missing_player_cycles);
        }

        self.missing_player_cycles = 0;
        actuator.set_fire(true);

        if self.config.use_bombs && self.engine.is_in_danger(detections) {
            actuator.set_fire(false);
            actuator.bomb();
            self.bombs_used += 1;
            info!(bombs_used = self.bombs_used, "bomb used");
            actuator.set_fire(true);
        }

        let decision = self.engine.decide_with(detections, overlay);
        actuator.set_focus(decision.maneuver == Maneuver::Dodge);
        actuator.dodge(decision.vector, decision.hold);
        Cycle::Acted(decision)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::{EngineConfig, NoOverlay, Position};
    use crate::tests::frame;

    #[derive(Clone, Debug, PartialEq)]
    enum Command {
        Dodge(Vector2<f64>, Duration),
        Fire(bool),
        Bomb,
        Focus(bool),
    }

    #[derive(Default)]
    struct Recorder {
        commands: Vec<Command>,
    }

    impl Actuator for Recorder {
        fn dodge(&mut self, vector: Vector2<f64>, hold: Duration) {
            self.commands.push(Command::Dodge(vector, hold));
        }

        fn set_fire(&mut self, firing: bool) {
            self.commands.push(Command::Fire(firing));
        }

        fn bomb(&mut self) {
            self.commands.push(Command::Bomb);
        }

        fn set_focus(&mut self, focused: bool) {
            self.commands.push(Command::Focus(focused));
        }
    }

    fn pilot(config: PilotConfig) -> Pilot {
        Pilot::new(DodgeEngine::new(EngineConfig::default()).unwrap(), config)
    }

    #[rstest]
    #[case::right(Vector2::new(3.0, 1.0), Some(Direction::Right))]
    #[case::left(Vector2::new(-3.0, 2.9), Some(Direction::Left))]
    #[case::down(Vector2::new(1.0, 3.0), Some(Direction::Down))]
    #[case::up(Vector2::new(0.0, -0.5), Some(Direction::Up))]
    #[case::diagonal_is_vertical(Vector2::new(2.0, -2.0), Some(Direction::Up))]
    #[case::zero(Vector2::new(0.0, 0.0), None)]
    fn test_direction_from_vector(
        #[case] vector: Vector2<f64>,
        #[case] expected: Option<Direction>,
    ) {
        assert_eq!(Direction::from_vector(vector), expected);
    }

    #[test]
    fn test_direction_unit_points_along_vector() {
        for vector in [
            Vector2::new(5.0, 1.0),
            Vector2::new(-5.0, 1.0),
            Vector2::new(1.0, 5.0),
            Vector2::new(1.0, -5.0),
        ] {
            let unit = Direction::from_vector(vector).unwrap().unit();
            assert!(unit.dot(&vector) > 0.0);
            assert_abs_diff_eq!(unit.norm(), 1.0);
        }
    }

    #[test]
    fn test_step_with_player_fires_and_dodges() {
        let mut pilot = pilot(PilotConfig::default());
        let mut recorder = Recorder::default();
        pilot.step(&frame(&[], &[], Some((500, 500))), &mut recorder, &mut NoOverlay);
        recorder.commands.clear();

        let cycle = pilot.step(
            &frame(&[(550, 500)], &[], Some((500, 500))),
            &mut recorder,
            &mut NoOverlay,
        );
        let Cycle::Acted(decision) = cycle else {
            panic!("expected a decision, got {cycle:?}");
        };
        assert_eq!(decision.maneuver, Maneuver::Dodge);
        assert_eq!(
            recorder.commands,
            vec![
                Command::Fire(true),
                Command::Focus(true),
                Command::Dodge(decision.vector, decision.hold),
            ]
        );
    }

    #[test]
    fn test_step_bombs_only_when_enabled_and_hit() {
        let overlapping = frame(&[(505, 500)], &[], Some((500, 500)));
        let mut recorder = Recorder::default();

        let mut without_bombs = pilot(PilotConfig::default());
        without_bombs.step(&overlapping, &mut recorder, &mut NoOverlay);
        assert!(!recorder.commands.contains(&Command::Bomb));

        let mut with_bombs = pilot(PilotConfig::new(true, 200));
        recorder.commands.clear();
        with_bombs.step(&overlapping, &mut recorder, &mut NoOverlay);
        assert_eq!(
            recorder.commands[..4].to_vec(),
            vec![
                Command::Fire(true),
                Command::Fire(false),
                Command::Bomb,
                Command::Fire(true),
            ]
        );
        assert_eq!(with_bombs.bombs_used(), 1);

        recorder.commands.clear();
        with_bombs.step(
            &frame(&[(560, 500)], &[], Some((500, 500))),
            &mut recorder,
            &mut NoOverlay,
        );
        assert!(!recorder.commands.contains(&Command::Bomb));
        assert_eq!(with_bombs.bombs_used(), 1);
    }

    #[test]
    fn test_missing_player_ends_round() {
        let mut pilot = pilot(PilotConfig::new(false, 3));
        let mut recorder = Recorder::default();
        pilot.step(&frame(&[], &[], Some((500, 500))), &mut recorder, &mut NoOverlay);
        assert_eq!(pilot.engine().home(), Some(Position::new(500, 500)));

        let empty = frame(&[(100, 100)], &[], None);
        assert_eq!(pilot.step(&empty, &mut recorder, &mut NoOverlay), Cycle::NoPlayer(1));
        assert_eq!(pilot.step(&empty, &mut recorder, &mut NoOverlay), Cycle::NoPlayer(2));
        assert_eq!(
            recorder.commands.last(),
            Some(&Command::Dodge(Vector2::zeros(), Duration::ZERO))
        );
        assert_eq!(pilot.step(&empty, &mut recorder, &mut NoOverlay), Cycle::RoundOver);
        assert_eq!(pilot.engine().home(), None);
        assert_eq!(pilot.step(&empty, &mut recorder, &mut NoOverlay), Cycle::NoPlayer(1));
    }

    #[test]
    fn test_player_sighting_resets_missing_counter() {
        let mut pilot = pilot(PilotConfig::new(false, 3));
        let mut recorder = Recorder::default();
        let empty = frame(&[], &[], None);
        pilot.step(&empty, &mut recorder, &mut NoOverlay);
        pilot.step(&empty, &mut recorder, &mut NoOverlay);
        pilot.step(&frame(&[], &[], Some((500, 500))), &mut recorder, &mut NoOverlay);
        assert_eq!(pilot.step(&empty, &mut recorder, &mut NoOverlay), Cycle::NoPlayer(1));
        assert_eq!(pilot.engine().home(), Some(Position::new(500, 500)));
    }
}
