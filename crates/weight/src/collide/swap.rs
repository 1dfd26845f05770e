use crate::body::Body;

use super::{contact::Contact, Collider};

/// Runs the wrapped collider with the bodies exchanged and turns the normals
/// around, so every shape pair only needs one implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwapCollider<C>(pub C);

impl<C: Collider> Collider for SwapCollider<C> {
    fn collide(&self, contacts: &mut [Contact], body_a: &Body, body_b: &Body) -> usize {
        let count = self.0.collide(contacts, body_b, body_a);
        for contact in contacts.iter_mut().take(count) {
            contact.normal = -contact.normal;
        }
        count
    }
}
