use weight_macro_tools::Fields;

use crate::{
    body::{
        apply_biased_impulse_pair, apply_impulse_pair, velocity_at_contact, Body, BodyId,
        BodyStore,
    },
    errors::WeightResult,
    math::{vector::Vector, FloatNum},
};

use super::{local_anchor, world_arm, Joint, JointKind};

const DEFAULT_SPRING_CONST: FloatNum = 100.;

/// Hooke spring between two anchor points. Stretched and compressed springs
/// may differ in stiffness. Past `min_spring_size` or `max_spring_size` the
/// spring is broken: it corrects the length through the biased velocity and
/// stops the bodies from moving further out of range.
#[derive(Clone, Debug, Fields)]
#[r]
pub struct SpringJoint {
    body1: BodyId,
    body2: BodyId,
    local_anchor1: Vector,
    local_anchor2: Vector,
    #[w(set)]
    stretched_spring_const: FloatNum,
    #[w(set)]
    compressed_spring_const: FloatNum,
    #[w(set)]
    broken_spring_const: FloatNum,
    spring_size: FloatNum,
    min_spring_size: FloatNum,
    max_spring_size: FloatNum,
    is_broken: bool,
    #[shared(skip)]
    r1: Vector,
    #[shared(skip)]
    r2: Vector,
    #[shared(skip)]
    spring: Vector,
    #[shared(skip)]
    spring_length: FloatNum,
    #[shared(skip)]
    mass_normal: FloatNum,
}

impl SpringJoint {
    /// anchors are in world coordinates, their distance becomes the rest size
    pub fn new(
        body1: &Body,
        body2: &Body,
        anchor1: impl Into<Vector>,
        anchor2: impl Into<Vector>,
    ) -> Self {
        let (anchor1, anchor2) = (anchor1.into(), anchor2.into());
        let spring_size = anchor1.distance(&anchor2);
        Self {
            body1: body1.id(),
            body2: body2.id(),
            local_anchor1: local_anchor(body1, anchor1),
            local_anchor2: local_anchor(body2, anchor2),
            stretched_spring_const: DEFAULT_SPRING_CONST,
            compressed_spring_const: DEFAULT_SPRING_CONST,
            broken_spring_const: DEFAULT_SPRING_CONST,
            spring_size,
            min_spring_size: 0.,
            max_spring_size: 2. * spring_size,
            is_broken: false,
            r1: Vector::ZERO,
            r2: Vector::ZERO,
            spring: Vector::ZERO,
            spring_length: 0.,
            mass_normal: 0.,
        }
    }

    /// the rest size widens the allowed range when it falls outside of it
    pub fn set_spring_size(&mut self, size: FloatNum) -> &mut Self {
        self.spring_size = size;
        self.max_spring_size = self.max_spring_size.max(size);
        self.min_spring_size = self.min_spring_size.min(size);
        self
    }

    pub fn set_max_spring_size(&mut self, size: FloatNum) -> &mut Self {
        self.max_spring_size = size;
        self.spring_size = self.spring_size.min(size);
        self
    }

    pub fn set_min_spring_size(&mut self, size: FloatNum) -> &mut Self {
        self.min_spring_size = size;
        self.spring_size = self.spring_size.max(size);
        self
    }

    fn is_out_of_range(&self) -> bool {
        self.spring_length < self.min_spring_size || self.spring_length > self.max_spring_size
    }
}

impl Joint for SpringJoint {
    fn kind(&self) -> JointKind {
        JointKind::Spring
    }

    fn body1(&self) -> BodyId {
        self.body1
    }

    fn body2(&self) -> BodyId {
        self.body2
    }

    fn set_relaxation(&mut self, _relaxation: FloatNum) {}

    fn pre_step(&mut self, inv_dt: FloatNum, bodies: &mut BodyStore) -> WeightResult<()> {
        let (body1, body2) = bodies.pair_mut(self.body1, self.body2)?;

        self.r1 = world_arm(body1, self.local_anchor1);
        self.r2 = world_arm(body2, self.local_anchor2);

        let spring = body2.position() + self.r2 - body1.position() - self.r1;
        self.spring_length = spring.abs();
        self.spring = spring.normalize();

        let stretch = self.spring_length - self.spring_size;
        let dt = if inv_dt != 0. { inv_dt.recip() } else { 0. };

        if self.is_out_of_range() {
            let rn1 = self.r1 * self.spring;
            let rn2 = self.r2 * self.spring;
            let k = body1.inv_mass()
                + body2.inv_mass()
                + body1.inv_inertia() * (self.r1 * self.r1 - rn1 * rn1)
                + body2.inv_inertia() * (self.r2 * self.r2 - rn2 * rn2);
            self.mass_normal = if k == 0. { 0. } else { k.recip() };

            let impulse = self.spring * (self.broken_spring_const * stretch * dt);
            apply_biased_impulse_pair(body1, body2, self.r1, self.r2, -impulse);
            self.is_broken = true;
            return Ok(());
        }

        self.is_broken = false;
        let spring_const = if self.spring_length < self.spring_size {
            self.compressed_spring_const
        } else {
            self.stretched_spring_const
        };

        let impulse = self.spring * (spring_const * stretch * dt);
        apply_impulse_pair(body1, body2, self.r1, self.r2, -impulse);
        Ok(())
    }

    fn apply_impulse(&mut self, bodies: &mut BodyStore) -> WeightResult<()> {
        if !self.is_broken {
            return Ok(());
        }
        let (body1, body2) = bodies.pair_mut(self.body1, self.body2)?;

        let relative_velocity = velocity_at_contact(body1, body2, self.r1, self.r2);
        let normal_impulse = self.mass_normal * (relative_velocity * self.spring);

        // only stop motion that leaves the allowed range further
        let too_short = self.spring_length < self.min_spring_size && normal_impulse < 0.;
        let too_long = self.spring_length > self.max_spring_size && normal_impulse > 0.;
        if too_short || too_long {
            let impulse = self.spring * normal_impulse;
            apply_impulse_pair(body1, body2, self.r1, self.r2, -impulse);
        }
        Ok(())
    }
}
