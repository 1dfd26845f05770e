use weight_macro_tools::Fields;

use crate::{
    body::{apply_impulse_pair, velocity_at_contact, Body, BodyId, BodyStore},
    errors::WeightResult,
    math::{matrix::Matrix2, vector::Vector, FloatNum},
};

use super::{local_anchor, point_mass_matrix, world_arm, Joint, JointKind};

const BIAS_FACTOR: FloatNum = 0.2;

/// Pins a point of each body to a shared anchor, the bodies may still spin
/// around it.
#[derive(Clone, Debug, Fields)]
#[r]
pub struct BasicJoint {
    body1: BodyId,
    body2: BodyId,
    local_anchor1: Vector,
    local_anchor2: Vector,
    relaxation: FloatNum,
    accumulated_impulse: Vector,
    #[shared(skip)]
    r1: Vector,
    #[shared(skip)]
    r2: Vector,
    #[shared(skip)]
    mass: Matrix2,
    #[shared(skip)]
    bias: Vector,
}

impl BasicJoint {
    /// `anchor` is in world coordinates
    pub fn new(body1: &Body, body2: &Body, anchor: impl Into<Vector>) -> Self {
        let anchor = anchor.into();
        Self {
            body1: body1.id(),
            body2: body2.id(),
            local_anchor1: local_anchor(body1, anchor),
            local_anchor2: local_anchor(body2, anchor),
            relaxation: 1.,
            accumulated_impulse: Vector::ZERO,
            r1: Vector::ZERO,
            r2: Vector::ZERO,
            mass: Matrix2::default(),
            bias: Vector::ZERO,
        }
    }

    pub(crate) fn pre_step_bodies(
        &mut self,
        inv_dt: FloatNum,
        body1: &mut Body,
        body2: &mut Body,
    ) -> WeightResult<()> {
        self.r1 = world_arm(body1, self.local_anchor1);
        self.r2 = world_arm(body2, self.local_anchor2);
        self.mass = point_mass_matrix(body1, body2, self.r1, self.r2).invert()?;

        let p1 = body1.position() + self.r1;
        let p2 = body2.position() + self.r2;
        self.bias = (p2 - p1) * (-BIAS_FACTOR * inv_dt);

        self.accumulated_impulse *= self.relaxation;
        apply_impulse_pair(body1, body2, self.r1, self.r2, self.accumulated_impulse);
        Ok(())
    }

    pub(crate) fn apply_impulse_bodies(&mut self, body1: &mut Body, body2: &mut Body) {
        let dv = velocity_at_contact(body1, body2, self.r1, self.r2);
        let impulse = self.mass * (self.bias - dv);

        apply_impulse_pair(body1, body2, self.r1, self.r2, impulse);
        self.accumulated_impulse += impulse;
    }
}

impl Joint for BasicJoint {
    fn kind(&self) -> JointKind {
        JointKind::Basic
    }

    fn body1(&self) -> BodyId {
        self.body1
    }

    fn body2(&self) -> BodyId {
        self.body2
    }

    fn set_relaxation(&mut self, relaxation: FloatNum) {
        self.relaxation = relaxation;
    }

    fn pre_step(&mut self, inv_dt: FloatNum, bodies: &mut BodyStore) -> WeightResult<()> {
        let (body1, body2) = bodies.pair_mut(self.body1, self.body2)?;
        self.pre_step_bodies(inv_dt, body1, body2)
    }

    fn apply_impulse(&mut self, bodies: &mut BodyStore) -> WeightResult<()> {
        let (body1, body2) = bodies.pair_mut(self.body1, self.body2)?;
        self.apply_impulse_bodies(body1, body2);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::test_utils::{integrate, square_at, store_with},
        *,
    };
    use crate::{
        errors::{GeometryError, WeightError},
        shape::rect::Rect,
    };

    const DT: FloatNum = 1. / 60.;

    fn anchor_gap(joint: &BasicJoint, bodies: &BodyStore) -> FloatNum {
        let body1 = bodies.get(joint.body1()).unwrap();
        let body2 = bodies.get(joint.body2()).unwrap();
        let p1 = body1.position() + world_arm(body1, joint.local_anchor1());
        let p2 = body2.position() + world_arm(body2, joint.local_anchor2());
        p1.distance(&p2)
    }

    #[test]
    fn test_anchor_is_stored_locally() {
        let bodies = store_with(vec![square_at(0., 0.), square_at(2., 0.)]);
        let joint = BasicJoint::new(bodies.get(1).unwrap(), bodies.get(2).unwrap(), (1., 0.));
        assert_eq!(joint.local_anchor1(), Vector::new(1., 0.));
        assert_eq!(joint.local_anchor2(), Vector::new(-1., 0.));
        assert_eq!(joint.relaxation(), 1.);
    }

    #[test]
    fn test_bodies_pulled_apart_stay_pinned() {
        let mut bodies = store_with(vec![square_at(0., 0.), square_at(2., 0.)]);
        let mut joint =
            BasicJoint::new(bodies.get(1).unwrap(), bodies.get(2).unwrap(), (1., 0.));
        bodies.get_mut(1).unwrap().set_velocity((-5., 0.));
        bodies.get_mut(2).unwrap().set_velocity((5., 0.));

        for _ in 0..60 {
            joint.pre_step(1. / DT, &mut bodies).unwrap();
            for _ in 0..10 {
                joint.apply_impulse(&mut bodies).unwrap();
            }
            integrate(&mut bodies, DT);
        }

        assert!(anchor_gap(&joint, &bodies) < 0.05);
        // equal masses pulling apart cancel out
        let v1 = bodies.get(1).unwrap().velocity();
        let v2 = bodies.get(2).unwrap().velocity();
        assert!((v1 + v2).abs() < 1e-3);
        assert!(v1.abs() < 0.1);
    }

    #[test]
    fn test_two_static_bodies_are_singular() {
        let mut bodies = store_with(vec![
            Body::new_static(Rect::new(1., 1.)),
            Body::new_static(Rect::new(1., 1.)),
        ]);
        let mut joint =
            BasicJoint::new(bodies.get(1).unwrap(), bodies.get(2).unwrap(), (1., 0.));
        assert_eq!(
            joint.pre_step(60., &mut bodies),
            Err(WeightError::Geometry(GeometryError::SingularMatrix))
        );
    }

    #[test]
    fn test_missing_body_is_reported() {
        let mut bodies = store_with(vec![square_at(0., 0.), square_at(2., 0.)]);
        let mut joint =
            BasicJoint::new(bodies.get(1).unwrap(), bodies.get(2).unwrap(), (1., 0.));
        bodies.remove(2);
        assert_eq!(
            joint.pre_step(60., &mut bodies),
            Err(WeightError::UnknownBody(2))
        );
    }
}
