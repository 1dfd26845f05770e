use crate::body::Body;

use super::{
    bounds_touch,
    contact::{Contact, FeaturePair},
    Collider,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct CircleCircleCollider;

impl Collider for CircleCircleCollider {
    fn collide(&self, contacts: &mut [Contact], body_a: &Body, body_b: &Body) -> usize {
        let (Some(circle_a), Some(circle_b)) =
            (body_a.shape().as_circle(), body_b.shape().as_circle())
        else {
            return 0;
        };

        if contacts.is_empty() || !bounds_touch(body_a, body_b) {
            return 0;
        }

        let position_a = body_a.position();
        let position_b = body_b.position();
        if !circle_a.touches(position_a, circle_b, position_b) {
            return 0;
        }

        let between = position_b - position_a;
        let penetration = circle_a.radius() + circle_b.radius() - between.abs();
        let normal = between.normalize();
        let point = normal * circle_a.radius() + position_a;

        contacts[0].set(point, normal, -penetration, FeaturePair::default());
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::circle::Circle;

    fn circle_at(radius: f32, x: f32, y: f32) -> Body {
        let mut body = Body::new(Circle::new(radius), 1.);
        body.set_position((x, y));
        body
    }

    #[test]
    fn test_overlapping_circles() {
        let a = circle_at(1., 0., 0.);
        let b = circle_at(1., 1.5, 0.);
        let mut contacts = [Contact::default(); 2];

        assert_eq!(CircleCircleCollider.collide(&mut contacts, &a, &b), 1);
        let contact = contacts[0];
        assert_eq!(contact.normal(), (1., 0.).into());
        assert_eq!(contact.position(), (1., 0.).into());
        assert!((contact.separation() + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_distant_circles() {
        let a = circle_at(1., 0., 0.);
        let b = circle_at(1., 2.5, 0.);
        let mut contacts = [Contact::default(); 2];
        assert_eq!(CircleCircleCollider.collide(&mut contacts, &a, &b), 0);
    }
}
