use weight_macro_tools::Fields;

use crate::{
    body::{Body, BodyId, BodyStore},
    errors::WeightResult,
    math::{vector::Vector, FloatNum},
};

use super::{basic::BasicJoint, Joint, JointKind};

/// A rope: acts as a pin at `anchor` only while the bodies are further apart
/// than `distance` and the first body keeps moving away from the second.
#[derive(Clone, Debug, Fields)]
#[r]
pub struct ConstrainingJoint {
    distance: FloatNum,
    is_active: bool,
    #[shared(skip)]
    joint: BasicJoint,
}

impl ConstrainingJoint {
    pub fn new(body1: &Body, body2: &Body, anchor: impl Into<Vector>, distance: FloatNum) -> Self {
        Self {
            distance,
            is_active: false,
            joint: BasicJoint::new(body1, body2, anchor),
        }
    }

    pub fn pin(&self) -> &BasicJoint {
        &self.joint
    }

    fn should_act(&self, body1: &Body, body2: &Body) -> bool {
        if body1.position().distance_sq(&body2.position()) <= self.distance * self.distance {
            return false;
        }
        let to_body2 = (body2.position() - body1.position()).normalize();
        body1.velocity() * to_body2 < 0.
    }
}

impl Joint for ConstrainingJoint {
    fn kind(&self) -> JointKind {
        JointKind::Constraining
    }

    fn body1(&self) -> BodyId {
        self.joint.body1()
    }

    fn body2(&self) -> BodyId {
        self.joint.body2()
    }

    fn set_relaxation(&mut self, _relaxation: FloatNum) {}

    fn pre_step(&mut self, inv_dt: FloatNum, bodies: &mut BodyStore) -> WeightResult<()> {
        let (body1, body2) = bodies.pair_mut(self.joint.body1(), self.joint.body2())?;
        self.is_active = self.should_act(body1, body2);
        if self.is_active {
            self.joint.pre_step_bodies(inv_dt, body1, body2)?;
        }
        Ok(())
    }

    fn apply_impulse(&mut self, bodies: &mut BodyStore) -> WeightResult<()> {
        if !self.is_active {
            return Ok(());
        }
        let (body1, body2) = bodies.pair_mut(self.joint.body1(), self.joint.body2())?;
        self.joint.apply_impulse_bodies(body1, body2);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::test_utils::{square_at, store_with},
        *,
    };

    fn rope(x2: FloatNum, velocity1: FloatNum) -> (ConstrainingJoint, BodyStore) {
        let mut bodies = store_with(vec![square_at(0., 0.), square_at(x2, 0.)]);
        let joint = ConstrainingJoint::new(
            bodies.get(1).unwrap(),
            bodies.get(2).unwrap(),
            (x2 / 2., 0.),
            3.,
        );
        bodies.get_mut(1).unwrap().set_velocity((velocity1, 0.));
        (joint, bodies)
    }

    #[test]
    fn test_slack_rope_does_nothing() {
        let (mut joint, mut bodies) = rope(2., -1.);
        joint.pre_step(60., &mut bodies).unwrap();
        joint.apply_impulse(&mut bodies).unwrap();
        assert!(!joint.is_active());
        assert_eq!(bodies.get(1).unwrap().velocity(), Vector::new(-1., 0.));
    }

    #[test]
    fn test_closing_bodies_are_left_alone() {
        let (mut joint, mut bodies) = rope(4., 1.);
        joint.pre_step(60., &mut bodies).unwrap();
        assert!(!joint.is_active());
    }

    #[test]
    fn test_taut_rope_stops_escape() {
        let (mut joint, mut bodies) = rope(4., -1.);
        joint.pre_step(60., &mut bodies).unwrap();
        assert!(joint.is_active());
        for _ in 0..10 {
            joint.apply_impulse(&mut bodies).unwrap();
        }
        let v1 = bodies.get(1).unwrap().velocity();
        let v2 = bodies.get(2).unwrap().velocity();
        assert!((v1.x() - v2.x()).abs() < 1e-3);
        assert!(v1.x() > -1.);
    }
}
