use crate::body::Body;

use super::{
    bounds_touch,
    contact::Contact,
    edge_sweep::EdgeSweep,
    polygon_polygon::{intersection_groups, populate_contacts},
    Collider,
};

/// Polygon against box, the box standing in as a four sided polygon swept
/// along its own vertical axis.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolygonBoxCollider;

impl Collider for PolygonBoxCollider {
    fn collide(&self, contacts: &mut [Contact], polygon_body: &Body, box_body: &Body) -> usize {
        let (Some(polygon), Some(rect)) =
            (polygon_body.shape().as_polygon(), box_body.shape().as_rect())
        else {
            return 0;
        };

        if !bounds_touch(polygon_body, box_body) {
            return 0;
        }

        let vertices_a = polygon.vertices_at(polygon_body.position(), polygon_body.rotation());
        let vertices_b = rect.points(box_body.position(), box_body.rotation());

        let mut sweep = EdgeSweep::new(vertices_b[1] - vertices_b[2]);
        sweep.add_vertices(true, &vertices_a);
        sweep.add_vertices(false, &vertices_b);
        let candidates = sweep.overlapping_edges();

        let groups = intersection_groups(&vertices_a, &vertices_b, &candidates);
        populate_contacts(contacts, &vertices_a, &vertices_b, &groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collide::swap::SwapCollider,
        math::vector::Vector,
        shape::{polygon::Polygon, rect::Rect},
    };

    fn triangle_at(x: f32, y: f32) -> Body {
        let polygon = Polygon::try_new(vec![
            Vector::new(-1., 1.),
            Vector::new(0., -1.),
            Vector::new(1., 1.),
        ])
        .unwrap();
        let mut body = Body::new(polygon, 1.);
        body.set_position((x, y));
        body
    }

    fn ground() -> Body {
        let mut body = Body::new_static(Rect::new(10., 2.));
        body.set_position((0., 2.));
        body
    }

    #[test]
    fn test_triangle_tip_in_box() {
        let triangle = triangle_at(0., 0.5);
        let ground = ground();
        let mut contacts = [Contact::default(); 10];

        let count = PolygonBoxCollider.collide(&mut contacts, &triangle, &ground);
        assert!(count > 0);
        for contact in &contacts[..count] {
            assert!(contact.normal().y() > 0.);
            assert!(contact.separation() <= 0.);
        }

        let count = SwapCollider(PolygonBoxCollider).collide(&mut contacts, &ground, &triangle);
        assert!(count > 0);
        assert!(contacts[0].normal().y() < 0.);
    }

    #[test]
    fn test_triangle_above_box() {
        let triangle = triangle_at(0., -3.);
        let ground = ground();
        let mut contacts = [Contact::default(); 10];
        assert_eq!(
            PolygonBoxCollider.collide(&mut contacts, &triangle, &ground),
            0
        );
    }
}
