use std::{
    fmt::Display,
    hash::{Hash, Hasher},
};

use weight_macro_tools::Fields;

use crate::math::{vector::Vector, FloatNum};

/// Identifies which features of the two shapes produced a contact, so the
/// same contact can be recognised from one frame to the next.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeaturePair {
    pub in_edge1: i32,
    pub in_edge2: i32,
    pub out_edge1: i32,
    pub out_edge2: i32,
}

impl FeaturePair {
    pub fn new(in_edge1: i32, in_edge2: i32, out_edge1: i32, out_edge2: i32) -> Self {
        Self {
            in_edge1,
            in_edge2,
            out_edge1,
            out_edge2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self {
            in_edge1: index as i32,
            ..Default::default()
        }
    }

    /// all four edges packed into one integer, equality goes through this
    pub fn key(&self) -> i32 {
        self.in_edge1
            .wrapping_add(self.out_edge1.wrapping_shl(8))
            .wrapping_add(self.in_edge2.wrapping_shl(16))
            .wrapping_add(self.out_edge2.wrapping_shl(24))
    }

    /// swap the roles of the two shapes
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.in_edge1, &mut self.in_edge2);
        std::mem::swap(&mut self.out_edge1, &mut self.out_edge2);
    }
}

impl PartialEq for FeaturePair {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for FeaturePair {}

impl Hash for FeaturePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

impl Display for FeaturePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(({},{}),({},{}))",
            self.in_edge1, self.in_edge2, self.out_edge1, self.out_edge2
        )
    }
}

/// One point of overlap between two bodies plus the solver state that
/// survives across frames.
#[derive(Clone, Copy, Debug, Default, Fields)]
#[r]
pub struct Contact {
    pub(crate) position: Vector,
    /// unit normal pointing away from the first body
    pub(crate) normal: Vector,
    /// negative while penetrating
    pub(crate) separation: FloatNum,
    #[r(copy)]
    pub(crate) feature: FeaturePair,
    pub(crate) accumulated_normal_impulse: FloatNum,
    pub(crate) accumulated_tangent_impulse: FloatNum,
    #[shared(skip)]
    pub(crate) mass_normal: FloatNum,
    #[shared(skip)]
    pub(crate) mass_tangent: FloatNum,
    #[shared(skip)]
    pub(crate) bias: FloatNum,
    #[shared(skip)]
    pub(crate) restitution: FloatNum,
    #[shared(skip)]
    pub(crate) bias_impulse: FloatNum,
}

impl Contact {
    /// geometry written by a collider, solver state is left alone
    pub(crate) fn set(
        &mut self,
        position: Vector,
        normal: Vector,
        separation: FloatNum,
        feature: FeaturePair,
    ) {
        self.position = position;
        self.normal = normal;
        self.separation = separation;
        self.feature = feature;
    }

    /// fresh contact for the collider buffer
    pub(crate) fn reset(&mut self) {
        *self = Contact::default();
    }
}

impl Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Contact {} n: {} sep: {}]",
            self.position, self.normal, self.separation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_pair_equality_uses_key() {
        let a = FeaturePair::new(1, 2, 3, 4);
        let b = FeaturePair::new(1, 2, 3, 4);
        assert_eq!(a, b);
        assert_ne!(a, FeaturePair::new(2, 1, 3, 4));
        assert_eq!(FeaturePair::from_index(3), FeaturePair::new(3, 0, 0, 0));
        assert_eq!(a.key(), 1 + (3 << 8) + (2 << 16) + (4 << 24));
    }

    #[test]
    fn test_flip() {
        let mut pair = FeaturePair::new(1, 2, 3, 4);
        pair.flip();
        assert_eq!(
            (pair.in_edge1, pair.in_edge2, pair.out_edge1, pair.out_edge2),
            (2, 1, 4, 3)
        );
        assert_eq!(pair.to_string(), "((2,1),(4,3))");
    }
}
