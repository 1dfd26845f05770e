use thiserror::Error;

use crate::{body::BodyId, joint::JointId, shape::ShapeKind};

/// Invalid geometry handed to a constructor or a numeric routine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("a polygon can not have fewer than 3 edges, got {0} vertices")]
    TooFewVertices(usize),
    #[error("the supplied vertices do not represent a convex polygon")]
    NotConvex,
    #[error("the supplied vertices enclose no area")]
    ZeroArea,
    #[error("matrix has a zero determinant and can not be inverted")]
    SingularMatrix,
}

/// The collider factory has no routine for this pair of shapes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("No collider available for shapes of type {shape_a} and {shape_b}")]
pub struct ColliderUnavailable {
    pub shape_a: ShapeKind,
    pub shape_b: ShapeKind,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeightError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    ColliderUnavailable(#[from] ColliderUnavailable),
    #[error("body {0} is not part of this world")]
    UnknownBody(BodyId),
    #[error("joint {0} is not part of this world")]
    UnknownJoint(JointId),
    #[error("no ids left to hand out")]
    IdsExhausted,
}

pub type WeightResult<T> = Result<T, WeightError>;
