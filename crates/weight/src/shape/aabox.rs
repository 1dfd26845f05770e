use weight_macro_tools::Fields;

use crate::math::{vector::Vector, FloatNum};

/// Axis aligned box centered on a body's position, used to reject pairs
/// before running exact geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Fields)]
#[r]
pub struct AABox {
    width: FloatNum,
    height: FloatNum,
    offset_x: FloatNum,
    offset_y: FloatNum,
}

impl AABox {
    pub fn new(width: FloatNum, height: FloatNum) -> Self {
        Self::with_offset(0., 0., width, height)
    }

    pub fn with_offset(
        offset_x: FloatNum,
        offset_y: FloatNum,
        width: FloatNum,
        height: FloatNum,
    ) -> Self {
        Self {
            width,
            height,
            offset_x,
            offset_y,
        }
    }

    /// strict overlap of the two boxes placed at `position` and `other_position`
    pub fn touches(&self, position: Vector, other: &AABox, other_position: Vector) -> bool {
        let total_width = (other.width + self.width) / 2.;
        let total_height = (other.height + self.height) / 2.;
        let dx = ((position.x() + self.offset_x) - (other_position.x() + other.offset_x)).abs();
        let dy = ((position.y() + self.offset_y) - (other_position.y() + other.offset_y)).abs();
        total_width > dx && total_height > dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches_is_strict() {
        let a = AABox::new(2., 2.);
        let b = AABox::new(2., 2.);
        assert!(a.touches((0., 0.).into(), &b, (1.9, 0.).into()));
        assert!(!a.touches((0., 0.).into(), &b, (2., 0.).into()));
        assert!(!a.touches((0., 0.).into(), &b, (0., 2.5).into()));
    }

    #[test]
    fn test_offset_moves_box() {
        let a = AABox::with_offset(5., 0., 2., 2.);
        let b = AABox::new(2., 2.);
        assert!(!a.touches((0., 0.).into(), &b, (0., 0.).into()));
        assert!(a.touches((0., 0.).into(), &b, (5., 0.).into()));
    }
}
