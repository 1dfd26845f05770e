use crate::body::Body;

use super::{contact::Contact, Collider};

/// Lines never collide with each other. Telling which side one line came
/// from needs the relative side of the previous frame, which is not tracked.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineLineCollider;

impl Collider for LineLineCollider {
    fn collide(&self, _contacts: &mut [Contact], _body_a: &Body, _body_b: &Body) -> usize {
        0
    }
}
