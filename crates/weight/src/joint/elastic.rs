use weight_macro_tools::Fields;

use crate::{
    body::{apply_impulse_pair, velocity_at_contact, Body, BodyId, BodyStore},
    errors::WeightResult,
    math::{matrix::Matrix2, vector::Vector, FloatNum},
};

use super::{local_anchor, point_mass_matrix, world_arm, Joint, JointKind};

const BIAS_FACTOR: FloatNum = 0.1;

/// A soft link anchoring each body at the other body's starting position.
/// Both anchors travel with their bodies, so the weak position correction
/// settles the pair at twice the distance they started at.
#[derive(Clone, Debug, Fields)]
#[r]
pub struct ElasticJoint {
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

impl ElasticJoint {
    pub fn new(body1: &Body, body2: &Body) -> Self {
        Self {
            body1: body1.id(),
            body2: body2.id(),
            local_anchor1: local_anchor(body1, body2.position()),
            local_anchor2: local_anchor(body2, body1.position()),
            relaxation: 1.,
            accumulated_impulse: Vector::ZERO,
            r1: Vector::ZERO,
            r2: Vector::ZERO,
            mass: Matrix2::default(),
            bias: Vector::ZERO,
        }
    }
}

impl Joint for ElasticJoint {
    fn kind(&self) -> JointKind {
        JointKind::Elastic
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

    fn apply_impulse(&mut self, bodies: &mut BodyStore) -> WeightResult<()> {
        let (body1, body2) = bodies.pair_mut(self.body1, self.body2)?;

        let dv = self.bias - velocity_at_contact(body1, body2, self.r1, self.r2);
        if dv.is_zero() {
            return Ok(());
        }

        let impulse = self.mass * dv;
        apply_impulse_pair(body1, body2, self.r1, self.r2, impulse);
        self.accumulated_impulse += impulse;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::test_utils::{square_at, store_with},
        *,
    };

    #[test]
    fn test_anchors_point_at_each_other() {
        let bodies = store_with(vec![square_at(0., 0.), square_at(3., 4.)]);
        let joint = ElasticJoint::new(bodies.get(1).unwrap(), bodies.get(2).unwrap());
        assert_eq!(joint.local_anchor1(), Vector::new(3., 4.));
        assert_eq!(joint.local_anchor2(), Vector::new(-3., -4.));
    }

    #[test]
    fn test_pair_is_pushed_towards_double_distance() {
        let mut bodies = store_with(vec![square_at(0., 0.), square_at(2., 0.)]);
        let mut joint = ElasticJoint::new(bodies.get(1).unwrap(), bodies.get(2).unwrap());

        joint.pre_step(60., &mut bodies).unwrap();
        for _ in 0..10 {
            joint.apply_impulse(&mut bodies).unwrap();
        }
        assert!(bodies.get(1).unwrap().velocity().x() < 0.);
        assert!(bodies.get(2).unwrap().velocity().x() > 0.);
    }

    #[test]
    fn test_settled_pair_gets_no_impulse() {
        let mut bodies = store_with(vec![square_at(0., 0.), square_at(2., 0.)]);
        let mut joint = ElasticJoint::new(bodies.get(1).unwrap(), bodies.get(2).unwrap());
        bodies.get_mut(2).unwrap().set_position((4., 0.));

        joint.pre_step(60., &mut bodies).unwrap();
        joint.apply_impulse(&mut bodies).unwrap();
        assert!(joint.accumulated_impulse().is_zero());
        assert!(bodies.get(1).unwrap().velocity().is_zero());
        assert!(bodies.get(2).unwrap().velocity().is_zero());
    }
}
