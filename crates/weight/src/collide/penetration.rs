use crate::math::{vector::Vector, FloatNum};

use super::intersection::Intersection;

/// The stretch between an entry and an exit intersection, swept along the
/// line connecting them.
#[derive(Clone, Copy, Debug)]
struct PenetrationSweep {
    normal: Vector,
    sweep_dir: Vector,
    start_dist: FloatNum,
    end_dist: FloatNum,
}

impl PenetrationSweep {
    fn new(normal: Vector, sweep_dir: Vector, start: Vector, end: Vector) -> Self {
        Self {
            normal,
            sweep_dir,
            start_dist: start * sweep_dir,
            end_dist: end * sweep_dir,
        }
    }

    fn outside(&self, distance: FloatNum) -> bool {
        distance < self.start_dist || distance > self.end_dist
    }
}

/// Walks a polygon contour between two vertices while tracking how far along
/// the sweep it is and how deep along the normal.
struct ContourWalker<'a> {
    sweep: PenetrationSweep,
    vertices: &'a [Vector],
    current: usize,
    first: usize,
    last: usize,
    backwards: bool,
    distance: FloatNum,
    next_distance: FloatNum,
    penetration: FloatNum,
    penetration_delta: FloatNum,
}

impl<'a> ContourWalker<'a> {
    fn new(
        sweep: PenetrationSweep,
        vertices: &'a [Vector],
        first: usize,
        last: usize,
        backwards: bool,
    ) -> Self {
        let current = if backwards { last } else { first };
        let mut walker = Self {
            sweep,
            vertices,
            current,
            first,
            last,
            backwards,
            distance: vertices[current] * sweep.sweep_dir,
            next_distance: 0.,
            penetration: vertices[current] * sweep.normal,
            penetration_delta: 0.,
        };
        walker.calculate_next_values();
        walker
    }

    fn distance(&self) -> FloatNum {
        self.distance
    }

    // the sweep borders count as stops
    fn next_distance(&self) -> FloatNum {
        if self.distance < self.sweep.start_dist {
            self.next_distance.min(self.sweep.start_dist)
        } else if self.distance < self.sweep.end_dist {
            self.next_distance.min(self.sweep.end_dist)
        } else {
            self.next_distance
        }
    }

    fn penetration(&self) -> FloatNum {
        self.penetration
    }

    /// interpolated along the current edge, never past its ends
    fn penetration_at(&self, distance: FloatNum) -> FloatNum {
        let low = self.distance.min(self.next_distance);
        let high = self.distance.max(self.next_distance);
        self.penetration + self.penetration_delta * (distance.clamp(low, high) - self.distance)
    }

    fn crosses(&self, border: FloatNum) -> bool {
        self.distance < border && self.next_distance > border
    }

    fn has_next(&self) -> bool {
        if self.crosses(self.sweep.start_dist) || self.crosses(self.sweep.end_dist) {
            return true;
        }

        let len = self.vertices.len();
        let walked = if self.backwards {
            (self.last + len - self.current) % len
        } else {
            (self.current + len - self.first) % len
        };
        let total = (self.last + len - self.first) % len;
        total > walked
    }

    fn advance(&mut self) {
        if !self.has_next() {
            return;
        }

        // an edge crossing a border stops on the border first
        for border in [self.sweep.start_dist, self.sweep.end_dist] {
            if self.crosses(border) {
                self.penetration = self.penetration_at(border);
                self.distance = border;
                return;
            }
        }

        let len = self.vertices.len();
        self.current = if self.backwards {
            (self.current + len - 1) % len
        } else {
            (self.current + 1) % len
        };
        self.distance = self.vertices[self.current] * self.sweep.sweep_dir;
        self.penetration = self.vertices[self.current] * self.sweep.normal;
        self.calculate_next_values();
    }

    fn calculate_next_values(&mut self) {
        let len = self.vertices.len();
        let next = if self.backwards {
            (self.current + len - 1) % len
        } else {
            (self.current + 1) % len
        };

        self.next_distance = self.vertices[next] * self.sweep.sweep_dir;
        self.penetration_delta = self.vertices[next] * self.sweep.normal - self.penetration;

        if self.next_distance == self.distance {
            // vertical edge, only the maximum matters
            self.penetration += self.penetration_delta;
            self.penetration_delta = 0.;
        } else {
            self.penetration_delta /= self.next_distance - self.distance;
        }
    }
}

/// Deepest overlap along `normal` of the area enclosed between an ingoing and
/// the following outgoing intersection.
pub(crate) fn penetration_depth(
    ingoing: &Intersection,
    outgoing: &Intersection,
    normal: Vector,
    vertices_a: &[Vector],
    vertices_b: &[Vector],
) -> FloatNum {
    let sweep_dir = outgoing.position - ingoing.position;
    let sweep = PenetrationSweep::new(normal, sweep_dir, ingoing.position, outgoing.position);

    let len_b = vertices_b.len();
    let mut walker_a = ContourWalker::new(sweep, vertices_a, ingoing.edge_a, outgoing.edge_a, false);
    let mut walker_b = ContourWalker::new(
        sweep,
        vertices_b,
        (outgoing.edge_b + 1) % len_b,
        (ingoing.edge_b + 1) % len_b,
        true,
    );

    let mut penetration: FloatNum = 0.;
    while walker_a.has_next() || walker_b.has_next() {
        let (upper, lower) = if walker_a.has_next()
            && (walker_a.next_distance() < walker_b.next_distance() || !walker_b.has_next())
        {
            walker_a.advance();
            if sweep.outside(walker_a.distance()) {
                continue;
            }
            (
                walker_a.penetration(),
                walker_b.penetration_at(walker_a.distance()),
            )
        } else {
            walker_b.advance();
            if sweep.outside(walker_b.distance()) {
                continue;
            }
            (
                walker_a.penetration_at(walker_b.distance()),
                walker_b.penetration(),
            )
        };
        penetration = penetration.max(upper - lower);
    }

    penetration
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collide::intersection::{IntersectionGatherer, IntersectionGroup},
        math::edge_normal,
    };

    fn square(x: FloatNum, y: FloatNum, half: FloatNum) -> Vec<Vector> {
        vec![
            Vector::new(x - half, y - half),
            Vector::new(x + half, y - half),
            Vector::new(x + half, y + half),
            Vector::new(x - half, y + half),
        ]
    }

    #[test]
    fn test_corner_overlap_depth() {
        let a = square(0., 0., 1.);
        let b = square(1.5, 0.5, 1.);
        let mut gatherer = IntersectionGatherer::new(&a, &b);
        for i in 0..4 {
            for j in 0..4 {
                gatherer.intersect(i, j);
            }
        }

        let groups = gatherer.intersection_pairs();
        let IntersectionGroup::Pair(ingoing, outgoing) = groups[0] else {
            panic!("expected an entry/exit pair");
        };

        let normal = edge_normal(ingoing.position, outgoing.position);
        let depth = penetration_depth(&ingoing, &outgoing, normal, &a, &b);
        // the corner (1, 1) of a lies inside b, beyond the entry/exit chord
        assert!(depth > 0.);
        assert!(depth < 1.);
    }
}
