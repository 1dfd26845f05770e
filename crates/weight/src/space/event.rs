use std::fmt::Display;

use weight_macro_tools::Fields;

use crate::{
    body::BodyId,
    math::{vector::Vector, FloatNum},
};

/// First contact between two bodies, described by the deepest point the
/// narrow phase reported.
#[derive(Clone, Copy, Debug, PartialEq, Fields)]
#[r]
pub struct CollisionEvent {
    /// simulated time of the space when the contact was found
    time: FloatNum,
    body_a: BodyId,
    body_b: BodyId,
    point: Vector,
    normal: Vector,
    penetration_depth: FloatNum,
}

impl CollisionEvent {
    pub fn new(
        time: FloatNum,
        body_a: BodyId,
        body_b: BodyId,
        point: Vector,
        normal: Vector,
        penetration_depth: FloatNum,
    ) -> Self {
        Self {
            time,
            body_a,
            body_b,
            point,
            normal,
            penetration_depth,
        }
    }
}

impl Display for CollisionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[Collision")?;
        writeln!(f, " body A: {}", self.body_a)?;
        writeln!(f, " body B: {}", self.body_b)?;
        writeln!(f, " contact: {}", self.point)?;
        writeln!(f, " normal: {}", self.normal)?;
        write!(f, " penetration: {}]", self.penetration_depth)
    }
}
