use crate::{body::Body, shape::line::Line};

use super::{
    bounds_touch,
    contact::{Contact, FeaturePair},
    edge_sweep::EdgeSweep,
    Collider,
};

/// Polygon against circle: polygon edges whose sweep projection overlaps
/// the circle's are tested for their closest point to the circle centre.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolygonCircleCollider;

impl Collider for PolygonCircleCollider {
    fn collide(&self, contacts: &mut [Contact], polygon_body: &Body, circle_body: &Body) -> usize {
        let (Some(polygon), Some(circle)) = (
            polygon_body.shape().as_polygon(),
            circle_body.shape().as_circle(),
        ) else {
            return 0;
        };

        if !bounds_touch(polygon_body, circle_body) {
            return 0;
        }

        let vertices = polygon.vertices_at(polygon_body.position(), polygon_body.rotation());
        let centroid = polygon.centroid_at(polygon_body.position(), polygon_body.rotation());
        let circle_position = circle_body.position();
        let radius = circle.radius();

        let sweep_dir = (centroid - circle_position).normalize();
        let mut sweep = EdgeSweep::new(sweep_dir);
        sweep.add_vertices(true, &vertices);
        let circle_projection = circle_position * sweep_dir;
        sweep.insert(0, false, circle_projection - radius);
        sweep.insert(0, false, circle_projection + radius);

        let len = vertices.len();
        let mut num_contacts = 0;
        for (edge, _) in sweep.overlapping_edges() {
            if num_contacts >= contacts.len() {
                return contacts.len();
            }

            let line = Line::new(vertices[edge], vertices[(edge + 1) % len]);
            if line.distance_sq(circle_position) >= radius * radius {
                continue;
            }

            let point = line.closest_point(circle_position);
            let normal = circle_position - point;
            let separation = -(radius - normal.abs());
            contacts[num_contacts].set(
                point,
                normal.normalize(),
                separation,
                FeaturePair::default(),
            );
            num_contacts += 1;
        }

        num_contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collide::swap::SwapCollider,
        math::vector::Vector,
        shape::{circle::Circle, polygon::Polygon},
    };

    fn square_body() -> Body {
        let polygon = Polygon::try_new(vec![
            Vector::new(-1., -1.),
            Vector::new(1., -1.),
            Vector::new(1., 1.),
            Vector::new(-1., 1.),
        ])
        .unwrap();
        Body::new(polygon, 1.)
    }

    fn ball_at(x: f32, y: f32) -> Body {
        let mut body = Body::new(Circle::new(0.5), 1.);
        body.set_position((x, y));
        body
    }

    #[test]
    fn test_ball_touching_right_edge() {
        let square = square_body();
        let ball = ball_at(1.3, 0.);
        let mut contacts = [Contact::default(); 10];

        let count = PolygonCircleCollider.collide(&mut contacts, &square, &ball);
        assert_eq!(count, 1);
        assert_eq!(contacts[0].position(), Vector::new(1., 0.));
        assert_eq!(contacts[0].normal(), Vector::new(1., 0.));
        assert!((contacts[0].separation() + 0.2).abs() < 1e-5);

        let count = SwapCollider(PolygonCircleCollider).collide(&mut contacts, &ball, &square);
        assert_eq!(count, 1);
        assert_eq!(contacts[0].normal(), Vector::new(-1., 0.));
    }

    #[test]
    fn test_ball_out_of_reach() {
        let square = square_body();
        let ball = ball_at(2., 0.);
        let mut contacts = [Contact::default(); 10];
        assert_eq!(PolygonCircleCollider.collide(&mut contacts, &square, &ball), 0);
    }
}
