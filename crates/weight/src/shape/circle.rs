use std::f32::consts::PI;

use crate::math::{vector::Vector, FloatNum};

use super::aabox::AABox;

#[derive(Clone, Debug)]
pub struct Circle {
    radius: FloatNum,
    bounds: AABox,
}

impl Circle {
    pub fn new(radius: FloatNum) -> Self {
        Self {
            radius,
            bounds: AABox::new(radius * 2., radius * 2.),
        }
    }

    #[inline]
    pub fn radius(&self) -> FloatNum {
        self.radius
    }

    #[inline]
    pub fn bounds(&self) -> &AABox {
        &self.bounds
    }

    /// square of half the circumference
    pub fn surface_factor(&self) -> FloatNum {
        let half_circumference = PI * self.radius;
        half_circumference * half_circumference
    }

    /// inclusive: circles that exactly touch count as touching
    pub fn touches(&self, position: Vector, other: &Circle, other_position: Vector) -> bool {
        let total_radius = self.radius + other.radius;
        let d = other_position - position;
        if d.x().abs() > total_radius || d.y().abs() > total_radius {
            return false;
        }
        total_radius * total_radius >= d.abs_sq()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches_around_threshold() {
        let a = Circle::new(1.);
        let b = Circle::new(2.);
        let origin = Vector::ZERO;
        assert!(a.touches(origin, &b, (2.9, 0.).into()));
        assert!(a.touches(origin, &b, (0., 3.).into()));
        assert!(!a.touches(origin, &b, (3.1, 0.).into()));
        assert!(!a.touches(origin, &b, (2.2, 2.2).into()));
    }

    #[test]
    fn test_bounds() {
        let circle = Circle::new(1.5);
        assert_eq!(circle.bounds().width(), 3.);
        assert_eq!(circle.bounds().height(), 3.);
    }
}
