use std::fmt::Display;

use crate::{
    body::{
        apply_biased_impulse_pair, apply_impulse_pair, velocity_at_contact, Body, BodyId,
    },
    collide::{contact::Contact, factory::ColliderFactory},
    errors::WeightResult,
    math::{num::limit_at_range, vector::Vector, FloatNum},
};

/// most contacts a single pair of bodies can produce
pub const MAX_CONTACTS: usize = 10;

// penetration tolerated before the position bias kicks in
const ALLOWED_PENETRATION: FloatNum = 0.01;
const BIAS_FACTOR: FloatNum = 0.8;

/// Contact state between two bodies, kept alive across frames for as long as
/// the bodies touch so accumulated impulses can warm start the solver.
#[derive(Clone, Debug)]
pub struct Arbiter {
    body1: BodyId,
    body2: BodyId,
    contacts: [Contact; MAX_CONTACTS],
    num_contacts: usize,
    friction: FloatNum,
}

/// key of the unordered body pair an arbiter belongs to
pub(crate) fn pair_key(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Arbiter {
    /// `a` goes first only when `b` is dynamic and has the higher id, so a
    /// static `b` always leads while a static `a` may end up second
    pub(crate) fn new(a: &Body, b: &Body) -> Self {
        let (body1, body2) = if !b.is_static() && a.id() < b.id() {
            (a.id(), b.id())
        } else {
            (b.id(), a.id())
        };

        Self {
            body1,
            body2,
            contacts: [Contact::default(); MAX_CONTACTS],
            num_contacts: 0,
            friction: 0.,
        }
    }

    #[inline]
    pub fn body1(&self) -> BodyId {
        self.body1
    }

    #[inline]
    pub fn body2(&self) -> BodyId {
        self.body2
    }

    #[inline]
    pub fn key(&self) -> (BodyId, BodyId) {
        pair_key(self.body1, self.body2)
    }

    #[inline]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts[..self.num_contacts]
    }

    #[inline]
    pub fn num_contacts(&self) -> usize {
        self.num_contacts
    }

    #[inline]
    pub fn friction(&self) -> FloatNum {
        self.friction
    }

    pub fn concerns(&self, body: BodyId) -> bool {
        self.body1 == body || self.body2 == body
    }

    /// bodies in arbiter order
    fn ordered<'a>(&self, a: &'a Body, b: &'a Body) -> (&'a Body, &'a Body) {
        if a.id() == self.body1 {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// runs the narrow phase for the pair, replacing the current contacts
    pub(crate) fn collide(
        &mut self,
        factory: &dyn ColliderFactory,
        a: &Body,
        b: &Body,
    ) -> WeightResult<usize> {
        let (body1, body2) = self.ordered(a, b);
        let collider = factory.create_collider(body1.shape().kind(), body2.shape().kind())?;

        self.contacts.iter_mut().for_each(Contact::reset);
        self.num_contacts = collider.collide(&mut self.contacts, body1, body2);
        Ok(self.num_contacts)
    }

    /// called once when the arbiter starts tracking a touching pair
    pub(crate) fn init(&mut self, a: &Body, b: &Body) {
        if self.num_contacts > 0 {
            self.friction = (a.friction() * b.friction()).sqrt();
        }
    }

    /// Takes the geometry of a fresh collision. Contacts on the same features
    /// as before keep their accumulated impulses.
    pub(crate) fn update(&mut self, fresh: &Arbiter) {
        let mut merged = [Contact::default(); MAX_CONTACTS];
        for (merged, new_contact) in merged.iter_mut().zip(fresh.contacts()) {
            *merged = *new_contact;
            if let Some(old) = self
                .contacts()
                .iter()
                .find(|old| old.feature == new_contact.feature)
            {
                merged.accumulated_normal_impulse = old.accumulated_normal_impulse;
                merged.accumulated_tangent_impulse = old.accumulated_tangent_impulse;
            }
        }

        self.contacts = merged;
        self.num_contacts = fresh.num_contacts;
    }

    pub(crate) fn has_resting_pair(&self, a: &Body, b: &Body) -> bool {
        a.is_resting() && b.is_resting()
    }

    pub(crate) fn pre_step(
        &mut self,
        a: &mut Body,
        b: &mut Body,
        inv_dt: FloatNum,
        dt: FloatNum,
        damping: FloatNum,
    ) {
        let (body1, body2) = if a.id() == self.body1 { (a, b) } else { (b, a) };

        for contact in self.contacts[..self.num_contacts].iter_mut() {
            contact.normal = contact.normal.normalize();
            let normal = contact.normal;

            let r1 = contact.position - body1.position();
            let r2 = contact.position - body2.position();

            let effective_mass = |axis: Vector| {
                let rn1: FloatNum = r1 * axis;
                let rn2: FloatNum = r2 * axis;
                let k = body1.inv_mass()
                    + body2.inv_mass()
                    + body1.inv_inertia() * (r1 * r1 - rn1 * rn1)
                    + body2.inv_inertia() * (r2 * r2 - rn2 * rn2);
                if k == 0. {
                    0.
                } else {
                    damping / k
                }
            };

            contact.mass_normal = effective_mass(normal);
            let tangent = normal ^ 1.;
            contact.mass_tangent = effective_mass(tangent);

            let relative_velocity = velocity_at_contact(body1, body2, r1, r2);
            let restitution = body1.restitution() * body2.restitution();
            contact.restitution = (restitution * -(normal * relative_velocity)).max(0.);

            let penetration_velocity = -contact.separation / dt;
            contact.bias = if contact.restitution >= penetration_velocity {
                0.
            } else {
                -BIAS_FACTOR * inv_dt * (contact.separation + ALLOWED_PENETRATION).min(0.)
            };

            contact.accumulated_normal_impulse *= damping;

            // warm start
            let impulse = normal * contact.accumulated_normal_impulse
                + tangent * contact.accumulated_tangent_impulse;
            apply_impulse_pair(body1, body2, r1, r2, impulse);

            contact.bias_impulse = 0.;
        }
    }

    /// one sequential impulse iteration over every contact
    pub(crate) fn apply_impulse(&mut self, a: &mut Body, b: &mut Body) {
        let (body1, body2) = if a.id() == self.body1 { (a, b) } else { (b, a) };
        let friction = self.friction;

        for contact in self.contacts[..self.num_contacts].iter_mut() {
            let normal = contact.normal;
            let r1 = contact.position - body1.position();
            let r2 = contact.position - body2.position();

            // normal impulse
            let relative_velocity = velocity_at_contact(body1, body2, r1, r2);
            let vn = relative_velocity * normal;
            let normal_impulse = contact.mass_normal * (contact.restitution - vn);

            let old_normal_impulse = contact.accumulated_normal_impulse;
            contact.accumulated_normal_impulse = (old_normal_impulse + normal_impulse).max(0.);
            let normal_impulse = contact.accumulated_normal_impulse - old_normal_impulse;
            apply_impulse_pair(body1, body2, r1, r2, normal * normal_impulse);

            // position bias, through the biased velocity channel only
            let biased_velocity = body2.biased_velocity()
                + (body2.biased_angular_velocity() ^ r2)
                - body1.biased_velocity()
                - (body1.biased_angular_velocity() ^ r1);
            let vnb = biased_velocity * normal;
            let bias_impulse = contact.mass_normal * (-vnb + contact.bias);

            let old_bias_impulse = contact.bias_impulse;
            contact.bias_impulse = (old_bias_impulse + bias_impulse).max(0.);
            let bias_impulse = normal * (contact.bias_impulse - old_bias_impulse);

            apply_biased_impulse_pair(body1, body2, r1, r2, bias_impulse);

            // friction
            let max_tangent_impulse = friction * contact.accumulated_normal_impulse;
            let relative_velocity = velocity_at_contact(body1, body2, r1, r2);
            let tangent = normal ^ 1.;
            let vt = relative_velocity * tangent;
            let tangent_impulse = contact.mass_tangent * -vt;

            let old_tangent_impulse = contact.accumulated_tangent_impulse;
            contact.accumulated_tangent_impulse = limit_at_range(
                old_tangent_impulse + tangent_impulse,
                -max_tangent_impulse..=max_tangent_impulse,
            );
            let tangent_impulse = contact.accumulated_tangent_impulse - old_tangent_impulse;
            apply_impulse_pair(body1, body2, r1, r2, tangent * tangent_impulse);
        }
    }
}

impl Display for Arbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Arbiter {} <-> {} contacts: {}]",
            self.body1, self.body2, self.num_contacts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collide::{contact::FeaturePair, factory::DefaultColliderFactory},
        shape::rect::Rect,
    };

    fn body(id: BodyId, y: FloatNum) -> Body {
        let mut body = Body::new(Rect::new(1., 1.), 1.);
        body.inject_id(id);
        body.set_position((0., y));
        body
    }

    fn ground(id: BodyId) -> Body {
        let mut body = Body::new_static(Rect::new(10., 1.));
        body.inject_id(id);
        body
    }

    #[test]
    fn test_static_body_goes_first() {
        let crate_box = body(1, -0.9);
        let ground = ground(2);
        let arbiter = Arbiter::new(&crate_box, &ground);
        assert_eq!((arbiter.body1(), arbiter.body2()), (2, 1));
        assert_eq!(arbiter.key(), (1, 2));

        let arbiter = Arbiter::new(&body(3, 0.), &body(4, 0.));
        assert_eq!((arbiter.body1(), arbiter.body2()), (3, 4));
        assert!(arbiter.concerns(4));
        assert!(!arbiter.concerns(2));
    }

    #[test]
    fn test_static_first_argument_keeps_id_order_rule() {
        // dynamic b with the lower id leads
        let arbiter = Arbiter::new(&ground(3), &body(2, -0.9));
        assert_eq!((arbiter.body1(), arbiter.body2()), (2, 3));

        // dynamic b with the higher id follows
        let arbiter = Arbiter::new(&ground(1), &body(2, -0.9));
        assert_eq!((arbiter.body1(), arbiter.body2()), (1, 2));

        // a static b leads regardless of ids
        let arbiter = Arbiter::new(&body(1, -0.9), &ground(5));
        assert_eq!((arbiter.body1(), arbiter.body2()), (5, 1));
        assert_eq!(arbiter.key(), (1, 5));
    }

    #[test]
    fn test_update_keeps_impulses_of_matching_features() {
        let a = body(1, 0.);
        let b = body(2, 0.9);
        let mut old = Arbiter::new(&a, &b);
        old.num_contacts = 2;
        old.contacts[0].feature = FeaturePair::new(1, 2, 3, 4);
        old.contacts[0].accumulated_normal_impulse = 5.;
        old.contacts[0].accumulated_tangent_impulse = 1.;
        old.contacts[1].feature = FeaturePair::new(4, 3, 2, 1);
        old.contacts[1].accumulated_normal_impulse = 7.;

        let mut fresh = Arbiter::new(&a, &b);
        fresh.num_contacts = 2;
        fresh.contacts[0].feature = FeaturePair::new(9, 9, 9, 9);
        fresh.contacts[1].feature = FeaturePair::new(1, 2, 3, 4);
        fresh.contacts[1].separation = -0.3;

        old.update(&fresh);
        assert_eq!(old.num_contacts(), 2);
        assert_eq!(old.contacts()[0].accumulated_normal_impulse(), 0.);
        assert_eq!(old.contacts()[1].accumulated_normal_impulse(), 5.);
        assert_eq!(old.contacts()[1].accumulated_tangent_impulse(), 1.);
        assert_eq!(old.contacts()[1].separation(), -0.3);
    }

    #[test]
    fn test_impulses_push_bodies_apart() {
        let mut ground = ground(1);
        let mut falling = body(2, -0.9);
        falling.set_velocity((0., 2.));

        let mut arbiter = Arbiter::new(&ground, &falling);
        let count = arbiter
            .collide(&DefaultColliderFactory, &ground, &falling)
            .unwrap();
        assert!(count > 0);
        arbiter.init(&ground, &falling);
        assert!((arbiter.friction() - 0.2).abs() < 1e-6);

        let dt = 1. / 60.;
        arbiter.pre_step(&mut ground, &mut falling, 1. / dt, dt, 1.);
        for _ in 0..10 {
            arbiter.apply_impulse(&mut falling, &mut ground);
        }

        // the crate no longer moves into the ground and is pushed out
        assert!(falling.velocity().y() <= 1e-3);
        assert!(falling.biased_velocity().y() < 0.);
        assert!(arbiter
            .contacts()
            .iter()
            .all(|contact| contact.accumulated_normal_impulse() >= 0.));
        assert_eq!(ground.velocity(), Vector::ZERO);
    }
}
