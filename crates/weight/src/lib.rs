//! A small impulse based 2d rigid body engine.
//!
//! Bodies live in a [`World`](world::World), which pairs them up through a
//! broad phase strategy, keeps an arbiter per touching pair and resolves
//! contacts and joints with sequential impulses every step.

pub(crate) mod algo;
pub mod body;
pub mod collide;
pub mod errors;
pub mod joint;
pub mod math;
pub mod shape;
pub mod space;
pub mod strategy;
pub mod world;

pub mod prelude {
    pub use super::body::{Body, BodyId, RestingTolerance};
    pub use super::collide::{contact::Contact, factory::ColliderFactory, Collider};
    pub use super::errors::{WeightError, WeightResult};
    pub use super::joint::{
        BasicJoint, ConstrainingJoint, ElasticJoint, FixedJoint, Joint, JointId, SpringJoint,
    };
    pub use super::math::{matrix::Matrix2, vector::Vector, FloatNum, INFINITE_MASS};
    pub use super::shape::{
        circle::Circle,
        line::Line,
        polygon::{ConvexPolygon, Polygon},
        rect::Rect,
        Shape, ShapeKind,
    };
    pub use super::space::{event::CollisionEvent, CollisionSpace};
    pub use super::strategy::{BroadCollisionStrategy, BruteCollisionStrategy, QuadSpaceStrategy};
    pub use super::world::{context::WorldContext, World, DEFAULT_STEP};
}
