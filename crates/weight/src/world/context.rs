use weight_macro_tools::{Builder, Fields};

use crate::{
    body::RestingTolerance,
    math::{vector::Vector, FloatNum},
};

/// tolerances used when resting detection is switched on without explicit values
pub const DEFAULT_RESTING_TOLERANCE: RestingTolerance = RestingTolerance::new(0.01, 0.01, 0.01);

/// Tunables of a world.
#[derive(Clone, Debug, PartialEq, Fields, Builder)]
#[r]
pub struct WorldContext {
    /// acceleration applied to every body with gravity enabled
    #[w(set)]
    #[default(Vector::new(0., 10.))]
    gravity: Vector,
    /// solver passes over contacts and joints per step
    #[w(set)]
    #[default = 10]
    iterations: usize,
    /// scale applied to carried over contact impulses
    #[w(set)]
    #[default = 1.]
    damping: FloatNum,
    #[w(set, vis(pub(crate)))]
    #[default = false]
    resting_body_detection: bool,
    #[r(copy)]
    #[w(set, vis(pub(crate)))]
    resting_tolerance: RestingTolerance,
}
