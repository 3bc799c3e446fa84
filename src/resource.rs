//! The resource module encapsulates domain entities for use with Bevy.

use std::ops::{Deref, DerefMut};

use bevy::ecs::system::Resource;

use crate::domain;

macro_rules! resource {
    ($name:ident, $inner:ty) => {
        #[derive(Resource)]
        pub struct $name($inner);

        impl Deref for $name {
            type Target = $inner;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

resource!(ArenaRes, domain::Arena);
resource!(PilotRes, domain::Pilot);
// Marks of the last decision, drawn by the visualizer.
resource!(SketchRes, domain::Sketch);
