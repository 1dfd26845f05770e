pub mod matrix;
pub mod vector;

pub(crate) mod num;

use self::vector::Vector;

pub type FloatNum = f32;

/// mass value standing in for "immovable"
pub const INFINITE_MASS: FloatNum = FloatNum::MAX;

/// unit normal of the edge running from `start` to `end`, pointing to its right
pub fn edge_normal(start: Vector, end: Vector) -> Vector {
    (!(end - start)).normalize()
}
