use crate::{
    body::{Body, BodyId, BodyStore},
    errors::WeightResult,
    math::FloatNum,
};

use super::{basic::BasicJoint, Joint, JointKind};

/// Holds both bodies at their current distance and orientation: one pin
/// at the center of each body.
#[derive(Clone, Debug)]
pub struct FixedJoint {
    joint1: BasicJoint,
    joint2: BasicJoint,
}

impl FixedJoint {
    pub fn new(body1: &Body, body2: &Body) -> Self {
        Self {
            joint1: BasicJoint::new(body1, body2, body1.position()),
            joint2: BasicJoint::new(body2, body1, body2.position()),
        }
    }

    /// the pin centered on the first body
    pub fn first(&self) -> &BasicJoint {
        &self.joint1
    }

    pub fn second(&self) -> &BasicJoint {
        &self.joint2
    }
}

impl Joint for FixedJoint {
    fn kind(&self) -> JointKind {
        JointKind::Fixed
    }

    fn body1(&self) -> BodyId {
        self.joint1.body1()
    }

    fn body2(&self) -> BodyId {
        self.joint1.body2()
    }

    fn set_relaxation(&mut self, relaxation: FloatNum) {
        Joint::set_relaxation(&mut self.joint1, relaxation);
        Joint::set_relaxation(&mut self.joint2, relaxation);
    }

    fn pre_step(&mut self, inv_dt: FloatNum, bodies: &mut BodyStore) -> WeightResult<()> {
        self.joint1.pre_step(inv_dt, bodies)?;
        self.joint2.pre_step(inv_dt, bodies)
    }

    fn apply_impulse(&mut self, bodies: &mut BodyStore) -> WeightResult<()> {
        self.joint1.apply_impulse(bodies)?;
        self.joint2.apply_impulse(bodies)
    }
}
