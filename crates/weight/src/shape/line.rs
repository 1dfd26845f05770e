use weight_macro_tools::Fields;

use crate::math::{vector::Vector, FloatNum};

use super::aabox::AABox;

/// Line segment in body space. Each side can be made passable through the
/// edge flags, which gives one-way platforms.
#[derive(Clone, Debug, Fields)]
#[r]
pub struct Line {
    start: Vector,
    end: Vector,
    #[w(set)]
    blocks_inner_edge: bool,
    #[w(set)]
    blocks_outer_edge: bool,
    bounds: AABox,
}

impl Line {
    pub fn new(start: impl Into<Vector>, end: impl Into<Vector>) -> Self {
        let start = start.into();
        let end = end.into();
        let radius = start.abs().max(end.abs());
        Self {
            start,
            end,
            blocks_inner_edge: true,
            blocks_outer_edge: true,
            bounds: AABox::new(radius * 2., radius * 2.),
        }
    }

    /// segment from the body origin to `(x, y)` with explicit edge flags
    pub fn from_origin(x: FloatNum, y: FloatNum, inner: bool, outer: bool) -> Self {
        let mut line = Self::new(Vector::ZERO, (x, y));
        line.blocks_inner_edge = inner;
        line.blocks_outer_edge = outer;
        line
    }

    #[inline]
    pub fn direction(&self) -> Vector {
        self.end - self.start
    }

    #[inline]
    pub fn dx(&self) -> FloatNum {
        self.end.x() - self.start.x()
    }

    #[inline]
    pub fn dy(&self) -> FloatNum {
        self.end.y() - self.start.y()
    }

    #[inline]
    pub fn length(&self) -> FloatNum {
        self.direction().abs()
    }

    #[inline]
    pub fn length_sq(&self) -> FloatNum {
        self.direction().abs_sq()
    }

    pub fn surface_factor(&self) -> FloatNum {
        self.length_sq() / 2.
    }

    /// point of the segment nearest to `point`
    pub fn closest_point(&self, point: Vector) -> Vector {
        let segment = self.direction();
        let projection = (point - self.start).project_onto_unit(segment.normalize());

        if projection.abs_sq() > segment.abs_sq() {
            return self.end;
        }

        let projection = projection + self.start;
        if (projection - self.end).abs_sq() > segment.abs_sq() {
            return self.start;
        }

        projection
    }

    pub fn distance_sq(&self, point: Vector) -> FloatNum {
        (self.closest_point(point) - point).abs_sq()
    }

    pub fn distance(&self, point: Vector) -> FloatNum {
        self.distance_sq(point).sqrt()
    }

    /// end points in world space
    pub fn vertices(&self, position: Vector, rotation: FloatNum) -> [Vector; 2] {
        let (sin, cos) = rotation.sin_cos();
        [self.start, self.end].map(|v| {
            Vector::new(
                v.x() * cos - v.y() * sin + position.x(),
                v.y() * cos + v.x() * sin + position.y(),
            )
        })
    }

    pub fn positioned(&self, position: Vector, rotation: FloatNum) -> Line {
        let [start, end] = self.vertices(position, rotation);
        Line::new(start, end)
    }

    pub fn translated(&self, offset: Vector) -> Line {
        let mut line = self.clone();
        line.start += offset;
        line.end += offset;
        line
    }

    /// intersection of the two infinite lines, `None` when they are parallel
    pub fn intersect(&self, other: &Line) -> Option<Vector> {
        let (dx1, dy1) = (self.dx(), self.dy());
        let (dx2, dy2) = (other.dx(), other.dy());
        let denom = dy2 * dx1 - dx2 * dy1;
        if denom == 0. {
            return None;
        }

        let delta = self.start - other.start;
        let ua = (dx2 * delta.y() - dy2 * delta.x()) / denom;

        Some(self.start + self.direction() * ua)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_point() {
        let line = Line::new((0., 0.), (10., 0.));
        assert_eq!(line.closest_point((5., 3.).into()), (5., 0.).into());
        assert_eq!(line.closest_point((-5., 3.).into()), (0., 0.).into());
        assert_eq!(line.closest_point((15., -3.).into()), (10., 0.).into());
        assert_eq!(line.distance((5., 3.).into()), 3.);
    }

    #[test]
    fn test_intersect() {
        let a = Line::new((0., 0.), (2., 2.));
        let b = Line::new((0., 2.), (2., 0.));
        assert_eq!(a.intersect(&b), Some((1., 1.).into()));

        let parallel = Line::new((0., 1.), (2., 3.));
        assert_eq!(a.intersect(&parallel), None);
    }

    #[test]
    fn test_vertices_rotated() {
        let line = Line::new((0., 0.), (1., 0.));
        let [start, end] = line.vertices((1., 1.).into(), std::f32::consts::FRAC_PI_2);
        assert_eq!(start, (1., 1.).into());
        assert!((end.x() - 1.).abs() < 1e-6);
        assert!((end.y() - 2.).abs() < 1e-6);
    }

    #[test]
    fn test_edge_flags() {
        let mut line = Line::from_origin(4., 0., false, true);
        assert!(!line.blocks_inner_edge());
        assert!(line.blocks_outer_edge());
        line.set_blocks_inner_edge(true);
        assert!(line.blocks_inner_edge());
        assert_eq!(line.surface_factor(), 8.);
    }
}
