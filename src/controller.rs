//! Controller steering the ship.
//!
//! The ship is flown either by the autopilot or by the keyboard. F8 switches between the two. The
//! autopilot starts paused, so the arrow keys and Z (fire) work until it is switched on.
//!
//! While the autopilot runs, its parameters can be tuned live: 1 to 3 select the strategy, B
//! toggles bombing, `[`/`]` scale the grid cell size and `-`/`=` the travel time.

use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::*;

use crate::{
    domain::{Actuator, Cycle, Direction, Strategy},
    resource::{ArenaRes, PilotRes, SketchRes},
};

static ACTIVE: AtomicBool = AtomicBool::new(false);

const MULTIPLIER_STEP: f64 = 0.25;

const STRATEGY_KEYS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];

const DIRECTION_KEYS: [(KeyCode, Direction); 4] = [
    (KeyCode::ArrowUp, Direction::Up),
    (KeyCode::ArrowDown, Direction::Down),
    (KeyCode::ArrowLeft, Direction::Left),
    (KeyCode::ArrowRight, Direction::Right),
];

pub fn is_active() -> bool {
    ACTIVE.load(Ordering::Relaxed)
}

/// Flips the autopilot flag and returns the new state.
fn toggle() -> bool {
    !ACTIVE.fetch_xor(true, Ordering::Relaxed)
}

pub struct Controller;

impl Plugin for Controller {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (handle_hotkeys, control).chain());
    }
}

pub fn control(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut pilot: ResMut<PilotRes>,
    mut arena: ResMut<ArenaRes>,
    mut sketch: ResMut<SketchRes>,
) {
    if !is_active() {
        let direction = DIRECTION_KEYS
            .iter()
            .find(|(key, _)| keys.pressed(*key))
            .map(|(_, direction)| *direction);
        arena.steer(direction, time.delta());
        arena.set_fire(keys.pressed(KeyCode::KeyZ));
        arena.set_focus(keys.pressed(KeyCode::ShiftLeft));
        return;
    }

    let detections = arena.detections();
    sketch.clear();
    match pilot.step(&detections, &mut **arena, &mut **sketch) {
        Cycle::RoundOver => info!("round over, waiting for the player"),
        Cycle::NoPlayer(_) | Cycle::Acted(_) => {}
    }
}

fn handle_hotkeys(keys: Res<ButtonInput<KeyCode>>, mut pilot: ResMut<PilotRes>) {
    if keys.just_pressed(KeyCode::F8) {
        let active = toggle();
        info!(active, "autopilot toggled");
    }

    for (i, key) in STRATEGY_KEYS.iter().enumerate() {
        if keys.just_pressed(*key) {
            match Strategy::try_from(i) {
                Ok(strategy) => {
                    pilot.engine_mut().set_strategy(strategy);
                    info!(%strategy, "strategy selected");
                }
                Err(e) => warn!("{e}"),
            }
        }
    }

    if keys.just_pressed(KeyCode::KeyB) {
        let use_bombs = !pilot.config().use_bombs;
        pilot.set_use_bombs(use_bombs);
        info!(use_bombs, "bombing toggled");
    }

    let cell_step = step(&keys, KeyCode::BracketLeft, KeyCode::BracketRight);
    if cell_step != 0.0 {
        let factor = pilot.engine().config().cell_size_multiplier + cell_step;
        match pilot.engine_mut().set_cell_size_multiplier(factor) {
            Ok(()) => info!(factor, "cell size multiplier changed"),
            Err(e) => warn!("{e}"),
        }
    }

    let travel_step = step(&keys, KeyCode::Minus, KeyCode::Equal);
    if travel_step != 0.0 {
        let factor = pilot.engine().config().travel_time_multiplier + travel_step;
        match pilot.engine_mut().set_travel_time_multiplier(factor) {
            Ok(()) => info!(factor, "travel time multiplier changed"),
            Err(e) => warn!("{e}"),
        }
    }
}

fn step(keys: &ButtonInput<KeyCode>, down: KeyCode, up: KeyCode) -> f64 {
    match (keys.just_pressed(down), keys.just_pressed(up)) {
        (true, false) => -MULTIPLIER_STEP,
        (false, true) => MULTIPLIER_STEP,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_flag() {
        let before = is_active();
        assert_eq!(toggle(), !before);
        assert_eq!(is_active(), !before);
        assert_eq!(toggle(), before);
        assert_eq!(is_active(), before);
    }

    #[test]
    fn test_step() {
        let mut keys = ButtonInput::<KeyCode>::default();
        assert_eq!(step(&keys, KeyCode::Minus, KeyCode::Equal), 0.0);
        keys.press(KeyCode::Equal);
        assert_eq!(step(&keys, KeyCode::Minus, KeyCode::Equal), MULTIPLIER_STEP);
        keys.press(KeyCode::Minus);
        assert_eq!(step(&keys, KeyCode::Minus, KeyCode::Equal), 0.0);
    }
}
