use tracing::warn;

use crate::{
    body::Body,
    math::{edge_normal, vector::Vector, FloatNum},
};

use super::{
    bounds_touch,
    contact::{Contact, FeaturePair},
    edge_sweep::EdgeSweep,
    intersection::{Intersection, IntersectionGatherer},
    polygon_polygon::{set_contact, set_contact_pair},
    Collider,
};

// deeper than this points at a broken contact
const SUSPICIOUS_DEPTH: FloatNum = -10.;

/// Line against polygon. The line is treated as a two vertex polygon whose
/// inside is the half plane away from the polygon's centroid.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinePolygonCollider;

fn check_depth(contact: &Contact, at: &str) {
    if contact.separation() < SUSPICIOUS_DEPTH {
        warn!(
            separation = contact.separation(),
            "line/polygon contact at the {} is unusually deep", at
        );
    }
}

// the polygon hangs over an end of the line
fn set_line_end_contact(
    contact: &mut Contact,
    intersection: &Intersection,
    vertices_b: &[Vector],
) {
    let len_b = vertices_b.len();
    let normal = edge_normal(
        vertices_b[(intersection.edge_b + 1) % len_b],
        vertices_b[intersection.edge_b],
    );
    contact.set(
        intersection.position,
        normal,
        0.,
        FeaturePair::new(0, 0, intersection.edge_a as i32, intersection.edge_b as i32),
    );
}

fn populate_contacts(
    contacts: &mut [Contact],
    vertices_a: &[Vector],
    vertices_b: &[Vector],
    intersections: &[Intersection],
) -> usize {
    let (Some(first), Some(last)) = (intersections.first(), intersections.last()) else {
        return 0;
    };
    if contacts.is_empty() {
        return 0;
    }

    let mut num_contacts = 0;
    if !first.is_ingoing {
        set_line_end_contact(&mut contacts[0], last, vertices_b);
        check_depth(&contacts[0], "first end");
        num_contacts += 1;
    }

    let mut i = num_contacts;
    while i + 1 < intersections.len() {
        if num_contacts + 2 > contacts.len() {
            return num_contacts;
        }

        let (ingoing, outgoing) = (&intersections[i], &intersections[i + 1]);
        if !ingoing.is_ingoing || outgoing.is_ingoing {
            set_contact(&mut contacts[num_contacts], ingoing, vertices_a, vertices_b);
            i += 1;
            num_contacts += 1;
            continue;
        }

        let (entry, exit) = contacts[num_contacts..].split_at_mut(1);
        set_contact_pair(
            &mut entry[0],
            &mut exit[0],
            ingoing,
            outgoing,
            vertices_a,
            vertices_b,
        );
        check_depth(&entry[0], "middle");
        num_contacts += 2;
        i += 2;
    }

    if i < intersections.len() && last.is_ingoing && num_contacts < contacts.len() {
        set_line_end_contact(&mut contacts[num_contacts], last, vertices_b);
        check_depth(&contacts[num_contacts], "last end");
        num_contacts += 1;
    }

    num_contacts
}

impl Collider for LinePolygonCollider {
    fn collide(&self, contacts: &mut [Contact], line_body: &Body, polygon_body: &Body) -> usize {
        let (Some(line), Some(polygon)) = (
            line_body.shape().as_line(),
            polygon_body.shape().as_polygon(),
        ) else {
            return 0;
        };

        if !bounds_touch(line_body, polygon_body) {
            return 0;
        }

        let mut vertices_a = line.vertices(line_body.position(), line_body.rotation());
        let vertices_b = polygon.vertices_at(polygon_body.position(), polygon_body.rotation());
        let centroid = polygon.centroid_at(polygon_body.position(), polygon_body.rotation());

        // keep the polygon on the right hand side of the line
        let [start, end] = vertices_a;
        let is_left_of = (centroid.x() - start.x()) * (end.y() - start.y())
            - (end.x() - start.x()) * (centroid.y() - start.y())
            < 0.;
        if is_left_of {
            vertices_a.swap(0, 1);
        }

        let normal = !(vertices_a[1] - vertices_a[0]);
        let mut sweep = EdgeSweep::new(normal);
        sweep.insert(0, true, vertices_a[0] * normal);
        sweep.insert(0, true, vertices_a[1] * normal);
        sweep.add_vertices(false, &vertices_b);

        let mut gatherer = IntersectionGatherer::new(&vertices_a, &vertices_b);
        for (a, b) in sweep.overlapping_edges() {
            gatherer.intersect(a, b);
        }
        let intersections = gatherer.intersections();

        populate_contacts(contacts, &vertices_a, &vertices_b, &intersections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collide::swap::SwapCollider,
        shape::{line::Line, polygon::Polygon},
    };

    fn floor() -> Body {
        Body::new_static(Line::new((-5., 0.), (5., 0.)))
    }

    fn square_at(x: FloatNum, y: FloatNum) -> Body {
        let polygon = Polygon::try_new(vec![
            Vector::new(-1., -1.),
            Vector::new(1., -1.),
            Vector::new(1., 1.),
            Vector::new(-1., 1.),
        ])
        .unwrap();
        let mut body = Body::new(polygon, 1.);
        body.set_position((x, y));
        body
    }

    #[test]
    fn test_square_crossing_line() {
        let line = floor();
        let square = square_at(0., 0.5);
        let mut contacts = [Contact::default(); 10];

        let count = LinePolygonCollider.collide(&mut contacts, &line, &square);
        assert_eq!(count, 2);
        assert_eq!(contacts[0].normal(), Vector::new(0., 1.));
        assert_eq!(contacts[0].feature(), contacts[1].feature());
        assert!(contacts[0].separation() <= 0.);
        assert_eq!(contacts[0].position(), Vector::new(1., 0.));
        assert_eq!(contacts[1].position(), Vector::new(-1., 0.));

        let count = SwapCollider(LinePolygonCollider).collide(&mut contacts, &square, &line);
        assert_eq!(count, 2);
        assert_eq!(contacts[0].normal(), Vector::new(0., -1.));
    }

    #[test]
    fn test_square_away_from_line() {
        let line = floor();
        let square = square_at(0., 4.);
        let mut contacts = [Contact::default(); 10];
        assert_eq!(LinePolygonCollider.collide(&mut contacts, &line, &square), 0);
    }

    #[test]
    fn test_empty_contact_buffer() {
        let line = floor();
        let square = square_at(0., 0.5);
        assert_eq!(LinePolygonCollider.collide(&mut [], &line, &square), 0);
    }
}
