use crate::{body::Body, math::FloatNum, shape::line::Line};

use super::{
    bounds_touch,
    contact::{Contact, FeaturePair},
    Collider,
};

/// Box against circle: the box is reduced to its four edges and the edge
/// nearest to the circle centre decides the contact.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxCircleCollider;

impl Collider for BoxCircleCollider {
    fn collide(&self, contacts: &mut [Contact], box_body: &Body, circle_body: &Body) -> usize {
        let (Some(rect), Some(circle)) =
            (box_body.shape().as_rect(), circle_body.shape().as_circle())
        else {
            return 0;
        };

        if contacts.is_empty() || !bounds_touch(box_body, circle_body) {
            return 0;
        }

        let points = rect.points(box_body.position(), box_body.rotation());
        let edges = [
            Line::new(points[0], points[1]),
            Line::new(points[1], points[2]),
            Line::new(points[2], points[3]),
            Line::new(points[3], points[0]),
        ];

        let center = circle_body.position();
        let radius_sq = circle.radius() * circle.radius();

        let mut closest: Option<(usize, FloatNum)> = None;
        for (i, edge) in edges.iter().enumerate() {
            let distance_sq = edge.distance_sq(center);
            if distance_sq < radius_sq && closest.map_or(true, |(_, d)| d > distance_sq) {
                closest = Some((i, distance_sq));
            }
        }

        let Some((edge_index, distance_sq)) = closest else {
            return 0;
        };

        let point = edges[edge_index].closest_point(center);
        let normal = (center - point).normalize();
        contacts[0].set(
            point,
            normal,
            distance_sq.sqrt() - circle.radius(),
            FeaturePair::default(),
        );
        1
    }
}

/// Circle against box. Runs the box collider the other way round, flips the
/// normals and moves every contact onto the circle's surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct CircleBoxCollider;

impl Collider for CircleBoxCollider {
    fn collide(&self, contacts: &mut [Contact], circle_body: &Body, box_body: &Body) -> usize {
        let Some(circle) = circle_body.shape().as_circle() else {
            return 0;
        };

        let count = BoxCircleCollider.collide(contacts, box_body, circle_body);
        let center = circle_body.position();
        for contact in contacts.iter_mut().take(count) {
            contact.normal = -contact.normal;
            contact.position = (contact.position - center).normalize() * circle.radius() + center;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{circle::Circle, rect::Rect};

    fn bodies() -> (Body, Body) {
        let mut square = Body::new(Rect::new(2., 2.), 1.);
        square.set_position((0., 0.));
        let mut ball = Body::new(Circle::new(1.), 1.);
        ball.set_position((0., 1.5));
        (square, ball)
    }

    #[test]
    fn test_box_circle_contact_on_top_edge() {
        let (square, ball) = bodies();
        let mut contacts = [Contact::default(); 2];

        assert_eq!(BoxCircleCollider.collide(&mut contacts, &square, &ball), 1);
        let contact = contacts[0];
        assert_eq!(contact.position(), (0., 1.).into());
        assert_eq!(contact.normal(), (0., 1.).into());
        assert!((contact.separation() + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_circle_box_projects_onto_circle() {
        let (square, ball) = bodies();
        let mut contacts = [Contact::default(); 2];

        assert_eq!(CircleBoxCollider.collide(&mut contacts, &ball, &square), 1);
        let contact = contacts[0];
        assert_eq!(contact.normal(), (0., -1.).into());
        assert_eq!(contact.position(), (0., 0.5).into());
    }

    #[test]
    fn test_circle_clear_of_box() {
        let (square, mut ball) = bodies();
        ball.set_position((0., 2.5));
        let mut contacts = [Contact::default(); 2];
        assert_eq!(BoxCircleCollider.collide(&mut contacts, &square, &ball), 0);
    }
}
