use crate::body::Body;

use super::{
    bounds_touch,
    contact::{Contact, FeaturePair},
    Collider,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct LineCircleCollider;

impl Collider for LineCircleCollider {
    fn collide(&self, contacts: &mut [Contact], line_body: &Body, circle_body: &Body) -> usize {
        let (Some(line), Some(circle)) =
            (line_body.shape().as_line(), circle_body.shape().as_circle())
        else {
            return 0;
        };

        if contacts.is_empty() || !bounds_touch(line_body, circle_body) {
            return 0;
        }

        let [start, end] = line.vertices(line_body.position(), line_body.rotation());
        let center = circle_body.position();

        // foot of the perpendicular from the centre, clamped to the segment
        let segment = end - start;
        let length_sq = segment.abs_sq();
        let position = if length_sq == 0. {
            start
        } else {
            let u = (segment * (center - start)) / length_sq;
            if u < 0. {
                start
            } else if u > 1. {
                end
            } else {
                start + segment * u
            }
        };

        let offset = center - position;
        let distance_sq = offset.abs_sq();
        if distance_sq >= circle.radius() * circle.radius() {
            return 0;
        }

        contacts[0].set(
            position,
            offset.normalize(),
            distance_sq.sqrt() - circle.radius(),
            FeaturePair::default(),
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{circle::Circle, line::Line};

    #[test]
    fn test_circle_resting_on_line() {
        let mut floor = Body::new_static(Line::new((-5., 0.), (5., 0.)));
        floor.set_position((0., 0.));
        let mut ball = Body::new(Circle::new(1.), 1.);
        ball.set_position((2., -0.75));

        let mut contacts = [Contact::default(); 2];
        assert_eq!(LineCircleCollider.collide(&mut contacts, &floor, &ball), 1);
        assert_eq!(contacts[0].position(), (2., 0.).into());
        assert_eq!(contacts[0].normal(), (0., -1.).into());
        assert!((contacts[0].separation() + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_contact_clamped_to_end_point() {
        let floor = Body::new_static(Line::new((0., 0.), (4., 0.)));
        let mut ball = Body::new(Circle::new(1.), 1.);
        ball.set_position((4.5, 0.5));

        let mut contacts = [Contact::default(); 2];
        assert_eq!(LineCircleCollider.collide(&mut contacts, &floor, &ball), 1);
        assert_eq!(contacts[0].position(), (4., 0.).into());
    }
}
