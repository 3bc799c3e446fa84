//! Scoring strategies of the dodge engine.
//!
//! * Nearest threat: sidestep the closest enemy or bullet within the detection radius, otherwise
//!   drift toward the nearest enemy or back home.
//! * Density grid: move to the neighboring cell with the best balance of bullet density and
//!   attraction toward home and enemies.
//! * Mixed: sidestep bullets inside the critical radius, judging the two sidesteps by grid
//!   density, and fall back to the density grid otherwise.

use nalgebra::Vector2;
use tracing::trace;

use super::{
    detections::nearest, perpendiculars, BoundingBox, Decision, Detections, EngineConfig, Grid,
    Maneuver, Overlay, Position, Region,
};

/// Floor of the distances used as score denominators.
pub const DISTANCE_FLOOR: f64 = 1.0;

/// Stand-in horizontal distance to an enemy when none is detected.
pub const NO_ENEMY_DISTANCE: f64 = 1e9;

pub(super) struct Situation<'a> {
    pub player: Position,
    pub home: Position,
    pub detections: &'a Detections,
    pub config: &'a EngineConfig,
}

impl Situation<'_> {
    fn dodge(&self, threat: &BoundingBox, cost: impl Fn(Vector2<f64>) -> f64) -> Decision {
        let [first, second] = perpendiculars(self.player - threat.center());
        let chosen = if cost(second) < cost(first) {
            second
        } else {
            first
        };
        Decision::new(
            self.config.scale_dodge(chosen),
            self.config.hold_duration(),
            Maneuver::Dodge,
        )
    }

    fn toward(&self, target: Position, maneuver: Maneuver) -> Decision {
        Decision::new(target - self.player, self.config.hold_duration(), maneuver)
    }
}

pub(super) fn nearest_threat(situation: &Situation, overlay: &mut dyn Overlay) -> Decision {
    let Situation {
        player,
        home,
        detections,
        config,
    } = *situation;
    let radius = config.detection_radius as f64;
    overlay.threat_radius(player, radius);

    let in_range = detections
        .threats()
        .filter(|t| t.center().distance(player) <= radius);
    let nearest_enemy = detections.nearest_enemy(player);

    if let Some(threat) = nearest(in_range, player) {
        overlay.threat(threat);
        trace!(x = threat.center().x(), y = threat.center().y(), "dodging threat");
        let origin = player.to_vector();
        return match nearest_enemy {
            Some(enemy) => situation.dodge(threat, |perp| {
                ((origin + perp).x - enemy.x() as f64).abs()
            }),
            None => situation.dodge(threat, |perp| {
                (origin + perp).metric_distance(&home.to_vector())
            }),
        };
    }

    match nearest_enemy {
        Some(enemy) => situation.toward(
            Position::new(enemy.x(), player.y()),
            Maneuver::Approach,
        ),
        None => situation.toward(home, Maneuver::Recenter),
    }
}

pub(super) fn density_grid(situation: &Situation, overlay: &mut dyn Overlay) -> Decision {
    let grid = scan(situation);
    for region in grid.regions() {
        overlay.region(region);
    }

    let best = grid
        .candidates()
        .map(|r| (r, score(r, situation.home, &situation.detections.enemies)))
        .fold(None::<(&Region, f64)>, |best, (r, s)| match best {
            Some((_, best_s)) if best_s >= s => best,
            _ => Some((r, s)),
        });

    match best {
        Some((region, s)) => {
            trace!(region = region.index, score = s, "best region");
            situation.toward(region.center(), Maneuver::Reposition)
        }
        None => Decision::idle(),
    }
}

pub(super) fn mixed(situation: &Situation, overlay: &mut dyn Overlay) -> Decision {
    let player = situation.player;
    let critical_radius = situation.config.critical_radius();
    overlay.threat_radius(player, critical_radius);

    let close = situation
        .detections
        .bullets
        .iter()
        .filter(|b| b.center().distance(player) <= critical_radius);
    let Some(threat) = nearest(close, player) else {
        return density_grid(situation, overlay);
    };
    overlay.threat(threat);

    let grid = scan(situation);
    situation.dodge(threat, |perp| {
        grid.locate(player.offset(perp))
            .map_or(0.0, |region| region.danger_score)
    })
}

fn scan(situation: &Situation) -> Grid {
    Grid::scan(
        situation.player,
        situation.config.effective_cell_size(),
        &situation.detections.bullets,
    )
}

/// Attraction toward home and the closest enemy column minus the region's danger.
pub fn score(region: &Region, home: Position, enemies: &[BoundingBox]) -> f64 {
    let center = region.center();
    let home_distance = center.distance(home).max(DISTANCE_FLOOR);
    let enemy_distance = enemies
        .iter()
        .map(|e| (e.center().x() - center.x()).abs() as f64)
        .min_by(f64::total_cmp)
        .unwrap_or(NO_ENEMY_DISTANCE)
        .max(DISTANCE_FLOOR);
    1.0 / home_distance + 1.0 / enemy_distance - region.danger_score
}
