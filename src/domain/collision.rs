//! Collision detection based on bounding boxes.

use super::BoundingBox;

pub trait HasCollision {
    fn has_collision(&self, other: &dyn HasCollision) -> bool {
        self.bounding_box().intersects(&other.bounding_box())
    }

    fn bounding_box(&self) -> BoundingBox;
}

impl HasCollision for BoundingBox {
    fn bounding_box(&self) -> BoundingBox {
        *self
    }
}
