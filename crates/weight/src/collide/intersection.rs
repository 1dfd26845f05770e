use std::cmp::Ordering;

use crate::math::{vector::Vector, FloatNum};

const MAX_INTERSECTIONS: usize = 50;

// an ingoing and outgoing intersection closer than this make a single contact
const MIN_PAIR_DIST: FloatNum = 0.5;

/// Crossing of edge `edge_a` of the first polygon with edge `edge_b` of the
/// second. Ingoing means edge a enters polygon b at this point.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Intersection {
    pub(crate) edge_a: usize,
    pub(crate) edge_b: usize,
    pub(crate) position: Vector,
    pub(crate) is_ingoing: bool,
    // squared distance from the start of each edge
    dist_from_a: FloatNum,
    dist_from_b: FloatNum,
}

impl Intersection {
    // along polygon a, entering before leaving on the same spot
    fn cmp_along_a(&self, other: &Intersection) -> Ordering {
        self.edge_a
            .cmp(&other.edge_a)
            .then(self.dist_from_a.total_cmp(&other.dist_from_a))
            .then(other.is_ingoing.cmp(&self.is_ingoing))
    }

    // along polygon b, leaving before entering on the same spot
    fn cmp_along_b(&self, other: &Intersection) -> Ordering {
        self.edge_b
            .cmp(&other.edge_b)
            .then(self.dist_from_b.total_cmp(&other.dist_from_b))
            .then(self.is_ingoing.cmp(&other.is_ingoing))
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum IntersectionGroup {
    /// entry and exit of one overlapping area
    Pair(Intersection, Intersection),
    Single(Intersection),
}

/// Collects edge intersections between two polygons and groups them into
/// entry/exit pairs describing the overlapping areas.
pub(crate) struct IntersectionGatherer<'a> {
    intersections: Vec<Intersection>,
    vertices_a: &'a [Vector],
    vertices_b: &'a [Vector],
}

impl<'a> IntersectionGatherer<'a> {
    pub(crate) fn new(vertices_a: &'a [Vector], vertices_b: &'a [Vector]) -> Self {
        Self {
            intersections: Vec::new(),
            vertices_a,
            vertices_b,
        }
    }

    /// records the crossing of edge `a` with edge `b`, if they cross
    pub(crate) fn intersect(&mut self, a: usize, b: usize) {
        if self.intersections.len() >= MAX_INTERSECTIONS {
            return;
        }

        let len_a = self.vertices_a.len();
        let len_b = self.vertices_b.len();
        let start_a = self.vertices_a[a];
        let end_a = self.vertices_a[(a + 1) % len_a];
        let start_b = self.vertices_b[b];
        let end_b = self.vertices_b[(b + 1) % len_b];

        let delta_a = end_a - start_a;
        let delta_b = end_b - start_b;
        let between = start_a - start_b;

        let denom = delta_b.y() * delta_a.x() - delta_b.x() * delta_a.y();
        if denom == 0. {
            return;
        }

        let ua = (delta_b.x() * between.y() - delta_b.y() * between.x()) / denom;
        let ub = (delta_a.x() * between.y() - delta_a.y() * between.x()) / denom;
        if !(0. ..=1.).contains(&ua) || !(0. ..=1.).contains(&ub) {
            return;
        }

        let position = start_a + delta_a * ua;
        // start of a lies right of edge b, so a is heading into b
        let is_ingoing = between.x() * delta_b.y() - delta_b.x() * between.y() > 0.;

        self.intersections.push(Intersection {
            edge_a: a,
            edge_b: b,
            position,
            is_ingoing,
            dist_from_a: (position - start_a).abs_sq(),
            dist_from_b: (position - start_b).abs_sq(),
        });
    }

    /// every intersection found so far, in order along polygon a
    pub(crate) fn intersections(&self) -> Vec<Intersection> {
        let mut sorted = self.intersections.clone();
        sorted.sort_by(Intersection::cmp_along_a);
        sorted
    }

    /// Groups the intersections into overlapping areas. Intersections that
    /// would make areas nested or interleaved are dropped first.
    pub(crate) fn intersection_pairs(&mut self) -> Vec<IntersectionGroup> {
        if self.intersections.len() < 2 {
            return Vec::new();
        }

        self.intersections.sort_by(Intersection::cmp_along_a);

        // positions into `intersections`, ordered along polygon b
        let mut pointers: Vec<usize> = (0..self.intersections.len()).collect();
        pointers.sort_by(|&i, &j| self.intersections[i].cmp_along_b(&self.intersections[j]));

        let reference = self.reference_pointer(&pointers);
        self.filter_intersections(reference, &pointers);

        if self.intersections.is_empty() {
            return Vec::new();
        }

        let len = self.intersections.len();
        let first = if self.intersections[0].is_ingoing { 0 } else { 1 };
        let mut groups = Vec::new();
        let mut i = first;
        while i < len + first {
            let incoming = self.intersections[i % len];
            let outgoing = self.intersections[(i + 1) % len];

            if incoming.is_ingoing
                && !outgoing.is_ingoing
                && !incoming
                    .position
                    .equals_delta(&outgoing.position, MIN_PAIR_DIST)
            {
                groups.push(IntersectionGroup::Pair(incoming, outgoing));
                i += 2;
            } else {
                groups.push(IntersectionGroup::Single(incoming));
                i += 1;
            }
        }

        groups
    }

    /// the ingoing intersection starting the widest stretch along polygon b,
    /// a safe point to start filtering from
    fn reference_pointer(&self, pointers: &[usize]) -> usize {
        let len = pointers.len();
        let len_b = self.vertices_b.len();
        let first = if self.intersections[pointers[0]].is_ingoing {
            0
        } else {
            1
        };

        let mut max_in_index = first + 1;
        let mut max_in_out_dist = 0;
        let mut last_in_edge_b: Option<usize> = None;

        for i in first..(len + first) {
            let k = pointers[i % len];
            let intersection = &self.intersections[k];

            if intersection.is_ingoing {
                last_in_edge_b = Some(intersection.edge_b);
            } else if let Some(last_in) = last_in_edge_b {
                let in_out_dist = (intersection.edge_b + len_b - last_in) % len_b;
                if in_out_dist > max_in_out_dist {
                    max_in_out_dist = in_out_dist;
                    max_in_index = i % len;
                }
                last_in_edge_b = None;
            }
        }

        max_in_index
    }

    /// walks polygon b from the reference point and keeps only strictly
    /// alternating out/in intersections
    fn filter_intersections(&mut self, reference: usize, pointers: &[usize]) {
        let len = pointers.len();
        let mut keep = vec![true; self.intersections.len()];
        let mut top_out: isize = -2;

        for i in reference..(len + reference) {
            let k = pointers[i % len];
            if self.intersections[k].is_ingoing {
                // truncating remainder: a cleared `top_out` only matches for
                // larger sets
                if (top_out - 1 + len as isize) % len as isize == k as isize {
                    top_out = -2;
                } else {
                    keep[k] = false;
                }
            } else if top_out < 0 {
                top_out = k as isize;
            } else {
                keep[k] = false;
            }
        }

        let mut keep = keep.into_iter();
        self.intersections.retain(|_| keep.next().unwrap_or(false));
    }
}
