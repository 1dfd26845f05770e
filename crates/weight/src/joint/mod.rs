//! Constraints between two bodies solved next to the contacts.
//!
//! Joints address their bodies by id. They are built from the bodies as they
//! are placed at construction time, so add the bodies to the world first.

pub mod basic;
pub mod constraining;
pub mod elastic;
pub mod fixed;
pub mod spring;

use std::fmt::Display;

use crate::{
    body::{Body, BodyId, BodyStore},
    errors::WeightResult,
    math::{matrix::Matrix2, vector::Vector, FloatNum},
};

pub use self::{
    basic::BasicJoint, constraining::ConstrainingJoint, elastic::ElasticJoint,
    fixed::FixedJoint, spring::SpringJoint,
};

pub type JointId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JointKind {
    Basic,
    Fixed,
    Elastic,
    Spring,
    Constraining,
}

impl Display for JointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JointKind::Basic => "BasicJoint",
            JointKind::Fixed => "FixedJoint",
            JointKind::Elastic => "ElasticJoint",
            JointKind::Spring => "SpringJoint",
            JointKind::Constraining => "ConstrainingJoint",
        };
        f.write_str(name)
    }
}

pub trait Joint {
    fn kind(&self) -> JointKind;

    fn body1(&self) -> BodyId;

    fn body2(&self) -> BodyId;

    /// scale applied to the carried over impulse before warm starting,
    /// joints without warm starting ignore it
    fn set_relaxation(&mut self, relaxation: FloatNum);

    /// precomputes the solver terms and warm starts, once per step
    fn pre_step(&mut self, inv_dt: FloatNum, bodies: &mut BodyStore) -> WeightResult<()>;

    /// one solver iteration
    fn apply_impulse(&mut self, bodies: &mut BodyStore) -> WeightResult<()>;
}

/// `point - body position` in the body's local frame
pub(crate) fn local_anchor(body: &Body, point: Vector) -> Vector {
    Matrix2::rotation(body.rotation()).transpose() * (point - body.position())
}

/// lever arm of a local anchor in world orientation
pub(crate) fn world_arm(body: &Body, local_anchor: Vector) -> Vector {
    Matrix2::rotation(body.rotation()) * local_anchor
}

/// mass matrix of a point to point constraint before inversion
pub(crate) fn point_mass_matrix(body1: &Body, body2: &Body, r1: Vector, r2: Vector) -> Matrix2 {
    let inv_mass = body1.inv_mass() + body2.inv_mass();
    let (i1, i2) = (body1.inv_inertia(), body2.inv_inertia());

    let k_mass = Matrix2::from_rows(inv_mass, 0., 0., inv_mass);
    let k1 = Matrix2::from_rows(
        i1 * r1.y() * r1.y(),
        -i1 * r1.x() * r1.y(),
        -i1 * r1.x() * r1.y(),
        i1 * r1.x() * r1.x(),
    );
    let k2 = Matrix2::from_rows(
        i2 * r2.y() * r2.y(),
        -i2 * r2.x() * r2.y(),
        -i2 * r2.x() * r2.y(),
        i2 * r2.x() * r2.x(),
    );
    k_mass + k1 + k2
}

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::{
        body::{Body, BodyId, BodyStore},
        math::FloatNum,
        shape::rect::Rect,
    };

    pub(crate) fn store_with(bodies: Vec<Body>) -> BodyStore {
        let mut store = BodyStore::default();
        for (i, mut body) in bodies.into_iter().enumerate() {
            body.inject_id(i as BodyId + 1);
            store.push(body);
        }
        store
    }

    pub(crate) fn square_at(x: FloatNum, y: FloatNum) -> Body {
        let mut body = Body::new(Rect::new(1., 1.), 1.);
        body.set_position((x, y));
        body
    }

    /// integrates positions the way a world step does, without contacts
    pub(crate) fn integrate(store: &mut BodyStore, dt: FloatNum) {
        for body in store.iter_mut().filter(|body| body.inv_mass() != 0.) {
            body.integrate_position(dt);
        }
    }
}
