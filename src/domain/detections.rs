//! One frame's worth of classified bounding boxes.

use super::{BoundingBox, Position};

/// Detected objects of a single control cycle, grouped by class. Built fresh every cycle and
/// dropped after the decision.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Detections {
    pub bullets: Vec<BoundingBox>,
    pub enemies: Vec<BoundingBox>,
    pub players: Vec<BoundingBox>,
}

impl Detections {
    pub fn new(
        bullets: Vec<BoundingBox>,
        enemies: Vec<BoundingBox>,
        players: Vec<BoundingBox>,
    ) -> Self {
        Self {
            bullets,
            enemies,
            players,
        }
    }

    /// Only the first player box is meaningful.
    pub fn player(&self) -> Option<&BoundingBox> {
        self.players.first()
    }

    /// Bullets first, then enemies, in detection order.
    pub fn threats(&self) -> impl Iterator<Item = &BoundingBox> {
        self.bullets.iter().chain(self.enemies.iter())
    }

    /// Center of the enemy closest to `position`; the first one wins ties.
    pub fn nearest_enemy(&self, position: Position) -> Option<Position> {
        nearest(&self.enemies, position).map(BoundingBox::center)
    }
}

/// Box whose center is closest to `position`, keeping the earliest on ties.
pub fn nearest<'a>(
    boxes: impl IntoIterator<Item = &'a BoundingBox>,
    position: Position,
) -> Option<&'a BoundingBox> {
    boxes
        .into_iter()
        .map(|b| (b, b.center().distance(position)))
        .fold(None::<(&BoundingBox, f64)>, |best, (b, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((b, d)),
        })
        .map(|(b, _)| b)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_player_uses_first_box() {
        let detections = Detections::new(
            vec![],
            vec![],
            vec![BoundingBox::new(0, 0, 10, 10), BoundingBox::new(50, 50, 60, 60)],
        );
        assert_eq!(detections.player(), Some(&BoundingBox::new(0, 0, 10, 10)));
        assert_eq!(Detections::default().player(), None);
    }

    #[test]
    fn test_threats_order() {
        let bullet = BoundingBox::new(0, 0, 2, 2);
        let enemy = BoundingBox::new(10, 10, 20, 20);
        let detections = Detections::new(vec![bullet], vec![enemy], vec![]);
        assert_eq!(detections.threats().collect::<Vec<_>>(), vec![&bullet, &enemy]);
    }

    #[test]
    fn test_nearest_keeps_first_on_tie() {
        let boxes = [
            BoundingBox::from_center(10, 0, 4, 4),
            BoundingBox::from_center(-10, 0, 4, 4),
            BoundingBox::from_center(0, 20, 4, 4),
        ];
        assert_eq!(nearest(&boxes, Position::new(0, 0)), Some(&boxes[0]));
        assert_eq!(nearest(&[] as &[BoundingBox], Position::new(0, 0)), None);
    }

    #[test]
    fn test_nearest_enemy() {
        let detections = Detections::new(
            vec![],
            vec![
                BoundingBox::from_center(100, 0, 20, 20),
                BoundingBox::from_center(30, 40, 20, 20),
            ],
            vec![],
        );
        assert_eq!(
            detections.nearest_enemy(Position::new(0, 0)),
            Some(Position::new(30, 40))
        );
    }
}
