pub(crate) mod store;

use std::{any::Any, fmt::Display, ops::Deref};

use tracing::debug;
use weight_macro_tools::Fields;

use crate::{
    math::{vector::Vector, FloatNum, INFINITE_MASS},
    shape::Shape,
};

pub use self::store::BodyStore;

pub type BodyId = u32;

/// Thresholds that decide when a body is still enough to rest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Fields)]
#[r]
pub struct RestingTolerance {
    /// squared speed another body must exceed to wake a resting body
    hit: FloatNum,
    rotation: FloatNum,
    /// squared distance a body may drift during one frame
    position: FloatNum,
}

impl RestingTolerance {
    pub const fn new(hit: FloatNum, rotation: FloatNum, position: FloatNum) -> Self {
        Self {
            hit,
            rotation,
            position,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ValueWithInv {
    value: FloatNum,
    inv_value: FloatNum,
}

impl Deref for ValueWithInv {
    type Target = FloatNum;
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl ValueWithInv {
    const INFINITE: ValueWithInv = ValueWithInv {
        value: INFINITE_MASS,
        inv_value: 0.,
    };

    fn new(value: FloatNum) -> Self {
        if value < INFINITE_MASS {
            Self {
                value,
                inv_value: value.recip(),
            }
        } else {
            Self::INFINITE
        }
    }

    fn inv(&self) -> FloatNum {
        self.inv_value
    }
}

// per frame bookkeeping for resting detection
#[derive(Clone, Debug, Default)]
struct RestingState {
    enabled: bool,
    tolerance: RestingTolerance,
    is_resting: bool,
    old_position: Vector,
    hit_by_another: bool,
    hit_count: usize,
    touching: Vec<BodyId>,
    touching_count: usize,
    touching_static: bool,
    // where the body was put to rest
    rest_position: Vector,
    rest_rotation: FloatNum,
}

/// A rigid body. Bodies get their id when they are added to a world.
#[derive(Fields)]
#[r]
pub struct Body {
    id: BodyId,
    #[w(set)]
    name: String,
    #[shared(skip)]
    shape: Shape,
    position: Vector,
    last_position: Vector,
    #[w(set)]
    rotation: FloatNum,
    #[w(set)]
    velocity: Vector,
    #[w(set)]
    angular_velocity: FloatNum,
    last_velocity: Vector,
    last_angular_velocity: FloatNum,
    biased_velocity: Vector,
    biased_angular_velocity: FloatNum,
    #[w(set)]
    force: Vector,
    #[w(set)]
    torque: FloatNum,
    #[shared(skip)]
    mass: ValueWithInv,
    #[shared(skip)]
    inertia: ValueWithInv,
    original_mass: FloatNum,
    #[w(set)]
    restitution: FloatNum,
    #[w(set)]
    friction: FloatNum,
    #[w(set)]
    damping: FloatNum,
    #[w(set)]
    rotation_damping: FloatNum,
    #[w(set)]
    gravity_effected: bool,
    #[shared(skip)]
    moveable: bool,
    #[shared(skip)]
    rotatable: bool,
    #[w(set)]
    can_rest: bool,
    is_static: bool,
    #[w(set)]
    bitmask: u64,
    excluded: Vec<BodyId>,
    #[shared(skip)]
    resting: RestingState,
    #[shared(skip)]
    user_data: Option<Box<dyn Any>>,
}

impl Body {
    pub fn new(shape: impl Into<Shape>, mass: FloatNum) -> Self {
        let mut body = Self {
            id: 0,
            name: "UnnamedBody".to_owned(),
            shape: shape.into(),
            position: Vector::ZERO,
            last_position: Vector::ZERO,
            rotation: 0.,
            velocity: Vector::ZERO,
            angular_velocity: 0.,
            last_velocity: Vector::ZERO,
            last_angular_velocity: 0.,
            biased_velocity: Vector::ZERO,
            biased_angular_velocity: 0.,
            force: Vector::ZERO,
            torque: 0.,
            mass: ValueWithInv::INFINITE,
            inertia: ValueWithInv::INFINITE,
            original_mass: mass,
            restitution: 0.,
            friction: 0.2,
            damping: 0.,
            rotation_damping: 0.,
            gravity_effected: true,
            moveable: true,
            rotatable: true,
            can_rest: true,
            is_static: false,
            bitmask: u64::MAX,
            excluded: Vec::new(),
            resting: Default::default(),
            user_data: None,
        };
        body.apply_mass(mass);
        body
    }

    /// an immovable body, it never integrates and counts as resting
    pub fn new_static(shape: impl Into<Shape>) -> Self {
        let mut body = Self::new(shape, INFINITE_MASS);
        body.is_static = true;
        body
    }

    pub(crate) fn inject_id(&mut self, id: BodyId) {
        self.id = id;
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// swaps the shape and mass, resetting the motion state
    pub fn reconfigure(&mut self, shape: impl Into<Shape>, mass: FloatNum) -> &mut Self {
        self.position.set_zero();
        self.last_position.set_zero();
        self.rotation = 0.;
        self.velocity.set_zero();
        self.angular_velocity = 0.;
        self.force.set_zero();
        self.torque = 0.;
        self.friction = 0.2;
        self.shape = shape.into();
        let mass = if self.is_static { INFINITE_MASS } else { mass };
        self.original_mass = mass;
        self.apply_mass(mass);
        self
    }

    fn apply_mass(&mut self, mass: FloatNum) {
        self.mass = ValueWithInv::new(mass);
        self.inertia = if mass < INFINITE_MASS {
            ValueWithInv::new(mass * self.shape.surface_factor() / 12.)
        } else {
            ValueWithInv::INFINITE
        };
    }

    #[inline]
    pub fn mass(&self) -> FloatNum {
        *self.mass
    }

    #[inline]
    pub fn inv_mass(&self) -> FloatNum {
        self.mass.inv()
    }

    #[inline]
    pub fn inertia(&self) -> FloatNum {
        *self.inertia
    }

    #[inline]
    pub fn inv_inertia(&self) -> FloatNum {
        self.inertia.inv()
    }

    pub fn energy(&self) -> FloatNum {
        let velocity_energy = self.mass() * (self.velocity * self.velocity);
        let angular_energy = self.inertia() * self.angular_velocity * self.angular_velocity;
        velocity_energy + angular_energy
    }

    pub fn is_moveable(&self) -> bool {
        self.moveable && !self.is_static
    }

    pub fn set_moveable(&mut self, moveable: bool) -> &mut Self {
        self.moveable = moveable;
        self
    }

    pub fn is_rotatable(&self) -> bool {
        self.rotatable && !self.is_static
    }

    pub fn set_rotatable(&mut self, rotatable: bool) -> &mut Self {
        self.rotatable = rotatable;
        self
    }

    /// places the body without implying any motion
    pub fn set_position(&mut self, position: impl Into<Vector>) -> &mut Self {
        let position = position.into();
        self.position = position;
        self.last_position = position;
        self
    }

    pub fn move_to(&mut self, position: impl Into<Vector>) -> &mut Self {
        self.last_position = self.position;
        self.position = position.into();
        self
    }

    pub fn adjust_position(&mut self, delta: Vector) -> &mut Self {
        self.last_position = self.position;
        self.position += delta;
        self
    }

    pub fn adjust_rotation(&mut self, delta: FloatNum) -> &mut Self {
        self.rotation += delta;
        self
    }

    pub fn add_force(&mut self, force: Vector) -> &mut Self {
        self.force += force;
        self
    }

    pub fn adjust_velocity(&mut self, delta: Vector) {
        if !self.is_moveable() {
            return;
        }
        self.last_velocity = self.velocity;
        self.velocity += delta;
    }

    pub fn adjust_angular_velocity(&mut self, delta: FloatNum) {
        if !self.is_rotatable() {
            return;
        }
        self.last_angular_velocity = self.angular_velocity;
        self.angular_velocity += delta;
    }

    pub(crate) fn adjust_biased_velocity(&mut self, delta: Vector) {
        if !self.is_moveable() {
            return;
        }
        self.biased_velocity += delta;
    }

    pub(crate) fn adjust_biased_angular_velocity(&mut self, delta: FloatNum) {
        if !self.is_rotatable() {
            return;
        }
        self.biased_angular_velocity += delta;
    }

    pub(crate) fn reset_bias(&mut self) {
        self.biased_velocity.set_zero();
        self.biased_angular_velocity = 0.;
    }

    /// velocity from force, gravity and damping over `dt`
    pub(crate) fn integrate_forces(&mut self, dt: FloatNum, gravity: Vector) {
        let mut acceleration = self.force * self.inv_mass();
        if self.gravity_effected {
            acceleration += gravity;
        }
        self.adjust_velocity(acceleration * dt);
        self.adjust_velocity(self.velocity * (-dt * self.damping * self.inv_mass()));

        self.adjust_angular_velocity(dt * self.inv_inertia() * self.torque);
        self.adjust_angular_velocity(
            -dt * self.angular_velocity * self.inv_inertia() * self.rotation_damping,
        );
    }

    /// moves by the real and biased velocities, then drops the per step state
    pub(crate) fn integrate_position(&mut self, dt: FloatNum) {
        let delta = (self.velocity + self.biased_velocity) * dt;
        self.adjust_position(delta);
        self.adjust_rotation(dt * (self.angular_velocity + self.biased_angular_velocity));
        self.reset_bias();
        self.force.set_zero();
        self.torque = 0.;
    }

    pub fn add_bit(&mut self, bits: u64) -> &mut Self {
        self.bitmask |= bits;
        self
    }

    pub fn remove_bit(&mut self, bits: u64) -> &mut Self {
        self.bitmask -= bits & self.bitmask;
        self
    }

    pub fn is_excluded(&self, other: BodyId) -> bool {
        self.excluded.contains(&other)
    }

    pub(crate) fn add_excluded(&mut self, other: BodyId) {
        if other != self.id && !self.excluded.contains(&other) {
            self.excluded.push(other);
        }
    }

    pub(crate) fn remove_excluded(&mut self, other: BodyId) {
        self.excluded.retain(|&id| id != other);
    }

    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref()
    }

    pub fn user_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.user_data.as_mut()?.downcast_mut()
    }

    pub fn set_user_data(&mut self, data: impl Any) -> &mut Self {
        self.user_data = Some(Box::new(data));
        self
    }

    pub fn take_user_data(&mut self) -> Option<Box<dyn Any>> {
        self.user_data.take()
    }

    // resting detection

    pub fn is_resting(&self) -> bool {
        self.is_static || self.resting.is_resting
    }

    pub fn touching(&self) -> &[BodyId] {
        &self.resting.touching
    }

    pub fn resting_tolerance(&self) -> RestingTolerance {
        self.resting.tolerance
    }

    pub(crate) fn configure_resting_detection(&mut self, tolerance: RestingTolerance) {
        self.resting.tolerance = tolerance;
        self.resting.enabled = true;
    }

    /// leaving the resting state gives the body its mass back
    pub fn set_resting(&mut self, resting: bool) {
        if self.is_static {
            return;
        }
        if self.resting.is_resting && !resting {
            self.apply_mass(self.original_mass);
            debug!(body = self.id, "body left resting state");
        }
        if !self.resting.is_resting && resting {
            self.record_rest_pose();
        }
        self.resting.touching_static = false;
        self.resting.is_resting = resting;
    }

    pub(crate) fn start_frame(&mut self) {
        if !self.can_rest || self.is_static {
            return;
        }
        let resting = &mut self.resting;
        resting.old_position = self.position;
        resting.hit_by_another = false;
        resting.hit_count = 0;
        resting.touching.clear();
    }

    /// records contact with `other` during this frame
    pub(crate) fn collided(&mut self, other: &Body) {
        if !self.resting.enabled || self.is_static {
            return;
        }

        if !self.resting.touching.contains(&other.id) {
            self.resting.touching.push(other.id);
        }

        if self.is_resting()
            && !other.is_resting()
            && other.velocity.abs_sq() > self.resting.tolerance.hit
        {
            self.resting.hit_by_another = true;
            self.apply_mass(self.original_mass);
        }

        self.resting.hit_count += 1;
    }

    fn is_still(&self) -> bool {
        let resting = &self.resting;
        self.position.distance_sq(&resting.old_position) <= resting.tolerance.position
            && self.velocity.abs_sq() <= 0.001
            && self.biased_velocity.abs_sq() <= 0.001
            && self.angular_velocity.abs() <= resting.tolerance.rotation
    }

    fn has_stable_contacts(&self) -> bool {
        self.resting.hit_count != 0 && self.resting.touching_count == self.resting.touching.len()
    }

    /// whether `end_frame` will ask if the body leans on something static
    pub(crate) fn needs_static_check(&self) -> bool {
        self.can_rest
            && !self.is_static
            && self.has_stable_contacts()
            && !self.resting.hit_by_another
            && !self.resting.touching_static
            && self.is_still()
    }

    /// `reaches_static` tells whether the touching graph leads to a static body
    pub(crate) fn end_frame(&mut self, reaches_static: bool) {
        if !self.can_rest || self.is_static {
            return;
        }

        let was_resting = self.resting.is_resting;

        if was_resting && self.drifted_from_rest() {
            self.resting.is_resting = false;
            self.apply_mass(self.original_mass);
            self.resting.touching_static = false;
        } else if !self.has_stable_contacts() {
            self.resting.is_resting = false;
            self.apply_mass(self.original_mass);
            self.resting.touching_static = false;
            self.resting.touching_count = self.resting.touching.len();
        } else {
            if !self.resting.hit_by_another {
                if self.is_still() {
                    self.resting.touching_static |= reaches_static;
                    if self.resting.touching_static {
                        self.come_to_rest();
                    }
                }
            } else {
                self.resting.is_resting = false;
                self.apply_mass(self.original_mass);
            }

            let resting = &self.resting;
            if self.position.distance_sq(&resting.old_position) > resting.tolerance.position
                && self.angular_velocity.abs() > resting.tolerance.rotation
            {
                self.resting.touching_static = false;
            }
        }

        match (was_resting, self.resting.is_resting) {
            (false, true) => debug!(body = self.id, "body came to rest"),
            (true, false) => debug!(body = self.id, "body woke up"),
            _ => {}
        }
    }

    // moved from outside, e.g. by `set_position`, since it came to rest
    fn drifted_from_rest(&self) -> bool {
        let resting = &self.resting;
        self.position.distance_sq(&resting.rest_position) > resting.tolerance.position
            || (self.rotation - resting.rest_rotation).abs() > resting.tolerance.rotation
    }

    fn record_rest_pose(&mut self) {
        self.resting.rest_position = self.position;
        self.resting.rest_rotation = self.rotation;
    }

    fn come_to_rest(&mut self) {
        if !self.resting.is_resting {
            self.record_rest_pose();
        }
        self.resting.is_resting = true;
        self.apply_mass(INFINITE_MASS);
        self.velocity.set_zero();
        self.biased_velocity.set_zero();
        self.angular_velocity = 0.;
        self.biased_angular_velocity = 0.;
        self.force.set_zero();
        self.torque = 0.;
    }
}

/// velocity of body2 relative to body1 at the lever arms `r1` and `r2`
pub(crate) fn velocity_at_contact(
    body1: &Body,
    body2: &Body,
    r1: Vector,
    r2: Vector,
) -> Vector {
    body2.velocity() + (body2.angular_velocity() ^ r2)
        - body1.velocity()
        - (body1.angular_velocity() ^ r1)
}

/// equal and opposite impulse, `impulse` pushes body2 and pulls body1
pub(crate) fn apply_impulse_pair(
    body1: &mut Body,
    body2: &mut Body,
    r1: Vector,
    r2: Vector,
    impulse: Vector,
) {
    body1.adjust_velocity(impulse * -body1.inv_mass());
    body1.adjust_angular_velocity(-body1.inv_inertia() * (r1 ^ impulse));
    body2.adjust_velocity(impulse * body2.inv_mass());
    body2.adjust_angular_velocity(body2.inv_inertia() * (r2 ^ impulse));
}

/// same as [`apply_impulse_pair`] on the biased velocity channel
pub(crate) fn apply_biased_impulse_pair(
    body1: &mut Body,
    body2: &mut Body,
    r1: Vector,
    r2: Vector,
    impulse: Vector,
) {
    body1.adjust_biased_velocity(impulse * -body1.inv_mass());
    body1.adjust_biased_angular_velocity(-body1.inv_inertia() * (r1 ^ impulse));
    body2.adjust_biased_velocity(impulse * body2.inv_mass());
    body2.adjust_biased_angular_velocity(body2.inv_inertia() * (r2 ^ impulse));
}

impl Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Body '{}' id: {} pos: {} vel: {} ({})]",
            self.name, self.id, self.position, self.velocity, self.angular_velocity
        )
    }
}
