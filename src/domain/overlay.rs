//! Debug side channel of the dodge engine.
//!
//! The engine reports what it looked at while deciding. Sinks are free to ignore any of it, which
//! is exactly what [`NoOverlay`] does.

use super::{BoundingBox, Decision, Position, Region};

pub trait Overlay {
    fn threat_radius(&mut self, _center: Position, _radius: f64) {}

    fn region(&mut self, _region: &Region) {}

    fn threat(&mut self, _threat: &BoundingBox) {}

    fn decision(&mut self, _from: Position, _decision: &Decision) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverlay;

impl Overlay for NoOverlay {}

#[derive(Clone, Debug, PartialEq)]
pub enum Mark {
    ThreatRadius { center: Position, radius: f64 },
    Region(Region),
    Threat(BoundingBox),
    Decision { from: Position, decision: Decision },
}

/// Overlay recording every mark of the last decisions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sketch {
    marks: Vec<Mark>,
}

impl Sketch {
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }
}

impl Overlay for Sketch {
    fn threat_radius(&mut self, center: Position, radius: f64) {
        self.marks.push(Mark::ThreatRadius { center, radius });
    }

    fn region(&mut self, region: &Region) {
        self.marks.push(Mark::Region(*region));
    }

    fn threat(&mut self, threat: &BoundingBox) {
        self.marks.push(Mark::Threat(*threat));
    }

    fn decision(&mut self, from: Position, decision: &Decision) {
        self.marks.push(Mark::Decision {
            from,
            decision: *decision,
        });
    }
}
