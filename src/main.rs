use std::error::Error;

use bevy::{prelude::*, window::WindowResolution};

use domain::{Arena, ArenaConfig, DodgeEngine, EngineConfig, Pilot, PilotConfig, Sketch};


mod controller;
mod domain;
mod resource;
mod simulator;
mod visualizer;

const ARENA_SEED: u64 = 19878367467712;

fn main() -> Result<(), Box<dyn Error>> {
    let arena_config = ArenaConfig::new(600.0, 800.0, ARENA_SEED);
    let resolution = WindowResolution::new(arena_config.width as f32, arena_config.height as f32);
    let arena = Arena::new(arena_config)?;
    let pilot = Pilot::new(
        DodgeEngine::new(EngineConfig::default())?,
        PilotConfig::default(),
    );

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "shmup dodger".into(),
                resolution,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(resource::ArenaRes::from(arena))
        .insert_resource(resource::PilotRes::from(pilot))
        .insert_resource(resource::SketchRes::from(Sketch::default()))
        .add_plugins(controller::Controller)
        .add_plugins(simulator::Simulator)
        .add_plugins(visualizer::Visualizer)
        .run();

    Ok(())
}
