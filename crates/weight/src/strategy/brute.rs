use crate::{body::BodyId, errors::WeightResult, math::FloatNum};

use super::{BroadCollisionStrategy, CollisionContext};

/// Every body against every other body.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteCollisionStrategy;

impl BroadCollisionStrategy for BruteCollisionStrategy {
    fn collide_bodies(
        &mut self,
        context: &mut dyn CollisionContext,
        dt: FloatNum,
    ) -> WeightResult<()> {
        let bodies: Vec<BodyId> = context.bodies().ids().collect();
        context.resolve(&bodies, dt)
    }
}
