//! Basic building blocks.

use std::ops::Sub;

use nalgebra::Vector2;

/// Point in screen space. The y-axis points down, as in a captured frame.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn distance(&self, position: Self) -> f64 {
        self.to_vector().metric_distance(&position.to_vector())
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x as f64, self.y as f64)
    }

    /// Nearest point after moving by `offset`.
    pub fn offset(self, offset: Vector2<f64>) -> Position {
        Position::new(
            (self.x as f64 + offset.x).round() as i32,
            (self.y as f64 + offset.y).round() as i32,
        )
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (i32, i32) {
    fn from(value: Position) -> Self {
        (value.x, value.y)
    }
}

impl Sub for Position {
    type Output = Vector2<f64>;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector2::new((self.x - rhs.x) as f64, (self.y - rhs.y) as f64)
    }
}

/// Perpendiculars of `v`, in tie-break order: `(-vy, vx)` first, then `(vy, -vx)`.
pub fn perpendiculars(v: Vector2<f64>) -> [Vector2<f64>; 2] {
    [Vector2::new(-v.y, v.x), Vector2::new(v.y, -v.x)]
}

/// Scales `v` to `magnitude`. A zero vector stays zero.
pub fn with_magnitude(v: Vector2<f64>, magnitude: f64) -> Vector2<f64> {
    v.try_normalize(f64::EPSILON)
        .map_or_else(Vector2::zeros, |unit| unit * magnitude)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_position() {
        let position = Position::new(1, 2);
        assert_eq!(position.x(), 1);
        assert_eq!(position.y(), 2);
    }

    #[rstest]
    #[case((0, 0), (3, 4), 5.0)]
    #[case((500, 500), (500, 500), 0.0)]
    #[case((-1, -1), (2, 3), 5.0)]
    fn test_position_distance(
        #[case] a: (i32, i32),
        #[case] b: (i32, i32),
        #[case] expected: f64,
    ) {
        assert_abs_diff_eq!(Position::from(a).distance(Position::from(b)), expected);
    }

    #[test]
    fn test_position_sub_is_displacement() {
        let v = Position::new(500, 500) - Position::new(550, 480);
        assert_abs_diff_eq!(v, Vector2::new(-50.0, 20.0));
    }

    #[test]
    fn test_position_offset_rounds() {
        assert_eq!(
            Position::new(10, 10).offset(Vector2::new(0.4, -0.6)),
            Position::new(10, 9)
        );
    }

    #[rstest]
    #[case(Vector2::new(-50.0, 0.0))]
    #[case(Vector2::new(3.0, 4.0))]
    #[case(Vector2::new(-7.5, 12.25))]
    fn test_perpendiculars_are_orthogonal(#[case] v: Vector2<f64>) {
        for p in perpendiculars(v) {
            assert_abs_diff_eq!(p.dot(&v), 0.0);
            assert_abs_diff_eq!(p.norm(), v.norm());
        }
    }

    #[test]
    fn test_perpendiculars_order() {
        let [first, second] = perpendiculars(Vector2::new(-50.0, 0.0));
        assert_abs_diff_eq!(first, Vector2::new(0.0, -50.0));
        assert_abs_diff_eq!(second, Vector2::new(0.0, 50.0));
    }

    #[test]
    fn test_with_magnitude() {
        assert_abs_diff_eq!(
            with_magnitude(Vector2::new(3.0, 4.0), 10.0),
            Vector2::new(6.0, 8.0)
        );
        assert_abs_diff_eq!(with_magnitude(Vector2::zeros(), 10.0), Vector2::zeros());
    }
}
