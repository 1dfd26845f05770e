use crate::math::{matrix::Matrix2, vector::Vector, FloatNum};

use super::aabox::AABox;

/// Box shape, `size` is the full width and height.
#[derive(Clone, Debug)]
pub struct Rect {
    size: Vector,
    bounds: AABox,
}

impl Rect {
    pub fn new(width: FloatNum, height: FloatNum) -> Self {
        let size: Vector = (width, height).into();
        // the diagonal covers every rotation
        let diagonal = size.abs();
        Self {
            size,
            bounds: AABox::new(diagonal, diagonal),
        }
    }

    #[inline]
    pub fn size(&self) -> Vector {
        self.size
    }

    #[inline]
    pub fn half_extents(&self) -> Vector {
        self.size * 0.5
    }

    #[inline]
    pub fn bounds(&self) -> &AABox {
        &self.bounds
    }

    pub fn surface_factor(&self) -> FloatNum {
        self.size.abs_sq()
    }

    /// corners in world space, counter-clockwise starting bottom left
    pub fn points(&self, position: Vector, rotation: FloatNum) -> [Vector; 4] {
        let rot = Matrix2::rotation(rotation);
        let h = self.half_extents();
        [
            (-h.x(), -h.y()),
            (h.x(), -h.y()),
            (h.x(), h.y()),
            (-h.x(), h.y()),
        ]
        .map(|corner| rot * Vector::from(corner) + position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_without_rotation() {
        let rect = Rect::new(2., 4.);
        let points = rect.points((1., 1.).into(), 0.);
        assert_eq!(points[0], (0., -1.).into());
        assert_eq!(points[1], (2., -1.).into());
        assert_eq!(points[2], (2., 3.).into());
        assert_eq!(points[3], (0., 3.).into());
    }

    #[test]
    fn test_surface_factor_and_bounds() {
        let rect = Rect::new(3., 4.);
        assert_eq!(rect.surface_factor(), 25.);
        assert_eq!(rect.bounds().width(), 5.);
        assert_eq!(rect.bounds().height(), 5.);
    }
}
