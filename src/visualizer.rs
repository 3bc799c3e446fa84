//! 2D visualization of the arena and of the autopilot's reasoning.
//!
//! The domain works in screen coordinates with y growing downward, Bevy's world has y growing
//! upward with the origin at the center of the window. O toggles the decision overlay, T the
//! status text.

use bevy::prelude::*;

use crate::{
    controller,
    domain::{Arena, BoundingBox, Mark, Position},
    resource::{ArenaRes, PilotRes, SketchRes},
};

const BORDER_COLOR: Color = Color::GRAY;
const SHIP_COLOR: Color = Color::BLUE;
const ENEMY_COLOR: Color = Color::RED;
const BULLET_COLOR: Color = Color::ORANGE;
const SHOT_COLOR: Color = Color::CYAN;
const THREAT_COLOR: Color = Color::YELLOW;
const DECISION_COLOR: Color = Color::GREEN;

pub struct Visualizer;

impl Plugin for Visualizer {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, set_up)
            .add_systems(
                Update,
                (
                    handle_keyboard_input,
                    update_text,
                    draw_arena,
                    draw_overlay,
                ),
            )
            .init_resource::<Scene>();
    }
}

#[derive(Resource)]
pub struct Scene {
    show_text: bool,
    show_overlay: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            show_text: true,
            show_overlay: true,
        }
    }
}

fn set_up(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
    create_text(&mut commands);
}

fn create_text(commands: &mut Commands) {
    let text_style = TextStyle {
        font_size: 16.0,
        ..default()
    };
    commands.spawn(
        TextBundle::from_sections(vec![TextSection::new("", text_style.clone())]).with_style(
            Style {
                position_type: PositionType::Absolute,
                bottom: Val::Px(12.0),
                left: Val::Px(12.0),
                ..default()
            },
        ),
    );
}

fn draw_arena(mut gizmos: Gizmos, arena: Res<ArenaRes>) {
    let config = arena.config();
    gizmos.rect_2d(
        Vec2::ZERO,
        0.0,
        Vec2::new(config.width as f32, config.height as f32),
        BORDER_COLOR,
    );

    for bullet in arena.bullets() {
        let position = to_bevy_position(&arena, bullet.position().x, bullet.position().y);
        gizmos.circle_2d(position, bullet.size() as f32 / 2.0, BULLET_COLOR);
    }

    for enemy in arena.enemies() {
        let position = to_bevy_position(&arena, enemy.position().x, enemy.position().y);
        gizmos.rect_2d(position, 0.0, Vec2::splat(enemy.size() as f32), ENEMY_COLOR);
    }

    for shot in arena.shots() {
        let position = to_bevy_position(&arena, shot.position().x, shot.position().y);
        let half = Vec2::new(0.0, shot.size() as f32 / 2.0);
        gizmos.line_2d(position - half, position + half, SHOT_COLOR);
    }

    let ship = arena.ship();
    if ship.is_alive() {
        let position = to_bevy_position(&arena, ship.position().x, ship.position().y);
        gizmos.rect_2d(position, 0.0, Vec2::splat(ship.size() as f32), SHIP_COLOR);
    }
}

fn draw_overlay(
    mut gizmos: Gizmos,
    scene: Res<Scene>,
    sketch: Res<SketchRes>,
    arena: Res<ArenaRes>,
) {
    if !scene.show_overlay || !controller::is_active() {
        return;
    }

    for mark in sketch.marks() {
        match mark {
            Mark::ThreatRadius { center, radius } => {
                gizmos.circle_2d(
                    to_bevy_point(&arena, *center),
                    *radius as f32,
                    Color::rgba(1.0, 1.0, 1.0, 0.3),
                );
            }
            Mark::Region(region) => {
                let alpha = (0.1 + 0.2 * region.danger_score).min(0.9) as f32;
                draw_box(
                    &mut gizmos,
                    &arena,
                    &region.bbox,
                    Color::rgba(1.0, 0.3, 0.3, alpha),
                );
            }
            Mark::Threat(threat) => draw_box(&mut gizmos, &arena, threat, THREAT_COLOR),
            Mark::Decision { from, decision } => {
                let start = to_bevy_point(&arena, *from);
                let end = start + Vec2::new(decision.vector.x as f32, -decision.vector.y as f32);
                gizmos.line_2d(start, end, DECISION_COLOR);
            }
        }
    }
}

fn draw_box(gizmos: &mut Gizmos, arena: &Arena, bbox: &BoundingBox, color: Color) {
    let center = Vec2::new(
        (bbox.x1 + bbox.x2) as f32 / 2.0,
        (bbox.y1 + bbox.y2) as f32 / 2.0,
    );
    gizmos.rect_2d(
        to_bevy_position(arena, center.x as f64, center.y as f64),
        0.0,
        Vec2::new(bbox.width() as f32, bbox.height() as f32),
        color,
    );
}

fn update_text(
    mut text: Query<&mut Text>,
    scene: Res<Scene>,
    arena: Res<ArenaRes>,
    pilot: Res<PilotRes>,
) {
    let mut text = text.single_mut();
    if scene.show_text {
        let engine = pilot.engine();
        let config = engine.config();
        let mode = if controller::is_active() {
            "AUTO"
        } else {
            "MANUAL"
        };
        let bombs = if pilot.config().use_bombs {
            "on"
        } else {
            "off"
        };
        let fire = if arena.is_firing() { "FIRE" } else { "" };
        let focus = if arena.is_focused() { "FOCUS" } else { "" };
        text.sections[0].value = format!(
            "{mode} {}   CELL x{:.2}   TRAVEL x{:.2}   BOMBS {bombs}   {fire} {focus}\n\
             LIVES {}   HITS {}   BOMBS USED {}   SCORE {}   ROUND {}",
            engine.strategy(),
            config.cell_size_multiplier,
            config.travel_time_multiplier,
            arena.lives(),
            arena.hits(),
            arena.bombs(),
            arena.score(),
            arena.rounds() + 1,
        );
    } else {
        text.sections[0].value = String::new();
    }
}

fn handle_keyboard_input(keys: Res<ButtonInput<KeyCode>>, mut scene: ResMut<Scene>) {
    if keys.just_pressed(KeyCode::KeyO) {
        scene.show_overlay = !scene.show_overlay;
    }

    if keys.just_pressed(KeyCode::KeyT) {
        scene.show_text = !scene.show_text;
    }
}

fn to_bevy_point(arena: &Arena, position: Position) -> Vec2 {
    to_bevy_position(arena, position.x() as f64, position.y() as f64)
}

fn to_bevy_position(arena: &Arena, x: f64, y: f64) -> Vec2 {
    let config = arena.config();
    Vec2::new(
        (x - config.width / 2.0) as f32,
        (config.height / 2.0 - y) as f32,
    )
}
