use crate::{
    algo::sort::SortableCollection,
    math::{vector::Vector, FloatNum},
};

#[derive(Clone, Copy, Debug)]
struct ProjectedVertex {
    vertex: usize,
    is_a: bool,
    distance: FloatNum,
}

/// Edges of one polygon currently crossing the sweep line. Removals are
/// delayed until the sweep moves past the current distance, so edges that
/// only touch at a shared projection still pair up.
#[derive(Default)]
struct CurrentEdges {
    current: Vec<usize>,
    scheduled: Vec<usize>,
}

impl CurrentEdges {
    fn contains(&self, edge: usize) -> bool {
        self.current.contains(&edge) || self.scheduled.contains(&edge)
    }

    fn add(&mut self, edge: usize) {
        self.current.push(edge);
    }

    fn schedule_removal(&mut self, edge: usize) {
        if let Some(index) = self.current.iter().position(|&e| e == edge) {
            self.current.remove(index);
            self.scheduled.push(edge);
        }
    }

    fn remove_scheduled(&mut self) {
        self.scheduled.clear();
    }

    // most recently added first
    fn edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.current
            .iter()
            .rev()
            .chain(self.scheduled.iter().rev())
            .copied()
    }
}

/// Projects the vertices of two shapes on a sweep direction and reports the
/// pairs of edges whose projections overlap. Only those pairs can intersect.
pub(crate) struct EdgeSweep {
    sweep_dir: Vector,
    vertices: Vec<ProjectedVertex>,
}

impl EdgeSweep {
    pub(crate) fn new(sweep_dir: Vector) -> Self {
        Self {
            sweep_dir,
            vertices: Vec::new(),
        }
    }

    pub(crate) fn sweep_dir(&self) -> Vector {
        self.sweep_dir
    }

    pub(crate) fn insert(&mut self, vertex: usize, is_a: bool, distance: FloatNum) {
        self.vertices.push(ProjectedVertex {
            vertex,
            is_a,
            distance,
        });
    }

    /// every vertex is inserted twice: as the start of its edge and as the
    /// end of the previous one
    pub(crate) fn add_vertices(&mut self, is_a: bool, vertices: &[Vector]) {
        let len = vertices.len();
        for i in 0..len {
            let previous = (i + len - 1) % len;
            let distance = self.sweep_dir * vertices[i];
            self.insert(i, is_a, distance);
            self.insert(previous, is_a, distance);
        }
    }

    /// `(edge of a, edge of b)` for every overlapping projection
    pub(crate) fn overlapping_edges(&mut self) -> Vec<(usize, usize)> {
        if self.vertices.is_empty() {
            return Vec::new();
        }

        self.vertices
            .insertion_sort(|a, b| a.distance.total_cmp(&b.distance));

        let mut edges_a = CurrentEdges::default();
        let mut edges_b = CurrentEdges::default();
        let mut pairs = Vec::new();
        let mut last_distance = -FloatNum::MAX;

        for projected in self.vertices.iter() {
            if projected.distance > last_distance {
                last_distance = projected.distance;
                edges_a.remove_scheduled();
                edges_b.remove_scheduled();
            }

            let (own, other) = if projected.is_a {
                (&mut edges_a, &edges_b)
            } else {
                (&mut edges_b, &edges_a)
            };

            if own.contains(projected.vertex) {
                own.schedule_removal(projected.vertex);
                continue;
            }

            own.add(projected.vertex);
            for edge in other.edges() {
                if projected.is_a {
                    pairs.push((projected.vertex, edge));
                } else {
                    pairs.push((edge, projected.vertex));
                }
            }
        }

        pairs.reverse();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: FloatNum, y: FloatNum) -> Vec<Vector> {
        vec![
            Vector::new(x - 1., y - 1.),
            Vector::new(x + 1., y - 1.),
            Vector::new(x + 1., y + 1.),
            Vector::new(x - 1., y + 1.),
        ]
    }

    #[test]
    fn test_disjoint_projections_have_no_pairs() {
        let mut sweep = EdgeSweep::new(Vector::new(1., 0.));
        sweep.add_vertices(true, &square(0., 0.));
        sweep.add_vertices(false, &square(5., 0.));
        assert!(sweep.overlapping_edges().is_empty());
    }

    #[test]
    fn test_overlapping_projections_pair_edges() {
        let mut sweep = EdgeSweep::new(Vector::new(1., 0.));
        sweep.add_vertices(true, &square(0., 0.));
        sweep.add_vertices(false, &square(1.5, 0.));
        let pairs = sweep.overlapping_edges();

        assert!(!pairs.is_empty());
        // the left edge of b (3) crosses the bottom and top edges of a
        assert!(pairs.contains(&(0, 3)));
        assert!(pairs.contains(&(2, 3)));
        // the left edge of a lies before anything of b
        assert!(pairs.iter().all(|&(a, _)| a != 3));
        for (a, b) in pairs {
            assert!(a < 4 && b < 4);
        }
    }

    #[test]
    fn test_empty_sweep() {
        let mut sweep = EdgeSweep::new(Vector::new(0., 1.));
        assert_eq!(sweep.sweep_dir(), Vector::new(0., 1.));
        assert!(sweep.overlapping_edges().is_empty());
    }
}
