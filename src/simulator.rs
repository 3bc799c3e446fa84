//! Simulation of the arena.
//!
//! Every frame the field advances by the elapsed time, after the controller has issued its input
//! for the frame.

use bevy::prelude::*;

use crate::{controller, resource::ArenaRes};

pub struct Simulator;

impl Plugin for Simulator {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, simulate.after(controller::control));
    }
}

fn simulate(time: Res<Time>, mut arena: ResMut<ArenaRes>) {
    arena.update(time.delta());
}
