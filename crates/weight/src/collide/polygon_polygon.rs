use crate::{
    body::Body,
    math::{edge_normal, vector::Vector},
};

use super::{
    bounds_touch,
    contact::{Contact, FeaturePair},
    edge_sweep::EdgeSweep,
    intersection::{Intersection, IntersectionGatherer, IntersectionGroup},
    penetration::penetration_depth,
    Collider,
};

/// Polygon against polygon. Candidate edges come from a sweep along the line
/// between the centroids, then every overlapping area found between the edge
/// intersections becomes a pair of contacts.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolygonPolygonCollider;

impl Collider for PolygonPolygonCollider {
    fn collide(&self, contacts: &mut [Contact], body_a: &Body, body_b: &Body) -> usize {
        let (Some(polygon_a), Some(polygon_b)) =
            (body_a.shape().as_polygon(), body_b.shape().as_polygon())
        else {
            return 0;
        };

        if !bounds_touch(body_a, body_b) {
            return 0;
        }

        let vertices_a = polygon_a.vertices_at(body_a.position(), body_a.rotation());
        let vertices_b = polygon_b.vertices_at(body_b.position(), body_b.rotation());
        let centroid_a = polygon_a.centroid_at(body_a.position(), body_a.rotation());
        let centroid_b = polygon_b.centroid_at(body_b.position(), body_b.rotation());

        let mut sweep = EdgeSweep::new(centroid_b - centroid_a);
        sweep.add_vertices(true, &vertices_a);
        sweep.add_vertices(false, &vertices_b);
        let candidates = sweep.overlapping_edges();

        let groups = intersection_groups(&vertices_a, &vertices_b, &candidates);
        populate_contacts(contacts, &vertices_a, &vertices_b, &groups)
    }
}

pub(crate) fn intersection_groups(
    vertices_a: &[Vector],
    vertices_b: &[Vector],
    candidates: &[(usize, usize)],
) -> Vec<IntersectionGroup> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut gatherer = IntersectionGatherer::new(vertices_a, vertices_b);
    for &(a, b) in candidates {
        gatherer.intersect(a, b);
    }
    gatherer.intersection_pairs()
}

pub(crate) fn populate_contacts(
    contacts: &mut [Contact],
    vertices_a: &[Vector],
    vertices_b: &[Vector],
    groups: &[IntersectionGroup],
) -> usize {
    let mut num_contacts = 0;
    for group in groups {
        if num_contacts >= contacts.len() {
            return contacts.len();
        }

        match group {
            IntersectionGroup::Pair(ingoing, outgoing) => {
                // a pair needs room for both of its contacts
                if num_contacts + 1 < contacts.len() {
                    let (first, second) = contacts[num_contacts..].split_at_mut(1);
                    set_contact_pair(
                        &mut first[0],
                        &mut second[0],
                        ingoing,
                        outgoing,
                        vertices_a,
                        vertices_b,
                    );
                    num_contacts += 2;
                }
            }
            IntersectionGroup::Single(intersection) => {
                set_contact(
                    &mut contacts[num_contacts],
                    intersection,
                    vertices_a,
                    vertices_b,
                );
                num_contacts += 1;
            }
        }
    }
    num_contacts
}

/// a lone crossing: the normal averages both edge normals
pub(crate) fn set_contact(
    contact: &mut Contact,
    intersection: &Intersection,
    vertices_a: &[Vector],
    vertices_b: &[Vector],
) {
    let start_a = vertices_a[intersection.edge_a];
    let end_a = vertices_a[(intersection.edge_a + 1) % vertices_a.len()];
    let start_b = vertices_b[intersection.edge_b];
    let end_b = vertices_b[(intersection.edge_b + 1) % vertices_b.len()];

    let normal = (edge_normal(start_a, end_a) - edge_normal(start_b, end_b)).normalize();
    contact.set(
        intersection.position,
        normal,
        0.,
        FeaturePair::new(
            intersection.edge_a as i32,
            intersection.edge_b as i32,
            0,
            0,
        ),
    );
}

/// contacts at the entry and the exit sharing the depth of the area between
pub(crate) fn set_contact_pair(
    entry: &mut Contact,
    exit: &mut Contact,
    ingoing: &Intersection,
    outgoing: &Intersection,
    vertices_a: &[Vector],
    vertices_b: &[Vector],
) {
    let normal = edge_normal(ingoing.position, outgoing.position);
    let feature = FeaturePair::new(
        ingoing.edge_a as i32,
        ingoing.edge_b as i32,
        outgoing.edge_a as i32,
        outgoing.edge_b as i32,
    );
    let separation =
        -penetration_depth(ingoing, outgoing, normal, vertices_a, vertices_b) / 4.;

    entry.set(ingoing.position, normal, separation, feature);
    exit.set(outgoing.position, normal, separation, feature);
}
