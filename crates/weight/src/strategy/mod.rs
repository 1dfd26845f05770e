//! Broad phase: decides which groups of bodies are handed to the exact
//! pairwise resolve.

pub mod brute;
pub mod quad_space;

use crate::{
    body::{BodyId, BodyStore},
    errors::WeightResult,
    math::FloatNum,
};

pub use self::{brute::BruteCollisionStrategy, quad_space::QuadSpaceStrategy};

/// What a strategy sees of the space it partitions.
pub trait CollisionContext {
    fn bodies(&self) -> &BodyStore;

    /// tests every pair inside `bodies` and updates the arbiters
    fn resolve(&mut self, bodies: &[BodyId], dt: FloatNum) -> WeightResult<()>;
}

pub trait BroadCollisionStrategy {
    fn collide_bodies(
        &mut self,
        context: &mut dyn CollisionContext,
        dt: FloatNum,
    ) -> WeightResult<()>;
}
