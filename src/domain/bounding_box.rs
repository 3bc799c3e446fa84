//! Axis-aligned bounding boxes in screen space.

use super::Position;

/// Rectangle spanning `x1..x2` horizontally and `y1..y2` vertically. Callers keep `x1 < x2` and
/// `y1 < y2`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box of roughly `w` by `h` centered at `(cx, cy)`. Odd sizes lose one pixel.
    pub const fn from_center(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Self::new(cx - w / 2, cy - h / 2, cx + w / 2, cy + h / 2)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Integer midpoint, rounded toward zero.
    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Overlap of the open interiors. Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.x2 <= other.x1 || self.x1 >= other.x2 || self.y2 <= other.y1 || self.y1 >= other.y2)
    }

    /// Half-open containment: `x1 <= x < x2` and `y1 <= y < y2`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 <= x && x < self.x2 && self.y1 <= y && y < self.y2
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.contains(position.x(), position.y())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::even(BoundingBox::new(0, 0, 10, 20), Position::new(5, 10))]
    #[case::odd(BoundingBox::new(0, 0, 5, 5), Position::new(2, 2))]
    #[case::negative_rounds_toward_zero(BoundingBox::new(-5, -5, 0, 0), Position::new(-2, -2))]
    fn test_center(#[case] bbox: BoundingBox, #[case] center: Position) {
        assert_eq!(bbox.center(), center);
    }

    #[rstest]
    #[case::overlap(BoundingBox::new(5, 5, 15, 15), true)]
    #[case::inside(BoundingBox::new(2, 2, 4, 4), true)]
    #[case::touching_right_edge(BoundingBox::new(10, 0, 20, 10), false)]
    #[case::touching_bottom_edge(BoundingBox::new(0, 10, 10, 20), false)]
    #[case::touching_corner(BoundingBox::new(10, 10, 20, 20), false)]
    #[case::apart(BoundingBox::new(30, 30, 40, 40), false)]
    #[case::one_pixel_overlap(BoundingBox::new(9, 9, 20, 20), true)]
    fn test_intersects(#[case] other: BoundingBox, #[case] expected: bool) {
        let bbox = BoundingBox::new(0, 0, 10, 10);
        assert_eq!(bbox.intersects(&other), expected);
        assert_eq!(other.intersects(&bbox), expected);
    }

    #[rstest]
    #[case::top_left_corner(0, 0, true)]
    #[case::interior(5, 5, true)]
    #[case::right_edge(10, 5, false)]
    #[case::bottom_edge(5, 10, false)]
    #[case::last_pixel(9, 9, true)]
    #[case::outside(-1, 5, false)]
    fn test_contains(#[case] x: i32, #[case] y: i32, #[case] expected: bool) {
        assert_eq!(BoundingBox::new(0, 0, 10, 10).contains(x, y), expected);
    }

    #[test]
    fn test_from_center() {
        assert_eq!(
            BoundingBox::from_center(500, 500, 200, 100),
            BoundingBox::new(400, 450, 600, 550)
        );
        assert_eq!(
            BoundingBox::from_center(10, 10, 5, 5),
            BoundingBox::new(8, 8, 12, 12)
        );
    }

    #[test]
    fn test_shared_point_implies_intersection() {
        let boxes = [
            BoundingBox::new(0, 0, 10, 10),
            BoundingBox::new(9, 9, 12, 12),
            BoundingBox::new(10, 0, 20, 10),
            BoundingBox::from_center(10, 10, 4, 4),
            BoundingBox::from_center(7, 3, 5, 3),
        ];
        for a in &boxes {
            for b in &boxes {
                for x in -1..22 {
                    for y in -1..22 {
                        if a.contains(x, y) && b.contains(x, y) {
                            assert!(a.intersects(b), "{a:?} and {b:?} share ({x}, {y})");
                        }
                    }
                }
            }
        }
    }
}
