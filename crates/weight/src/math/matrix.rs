use std::ops::{Add, Mul};

use super::{vector::Vector, FloatNum};
use crate::errors::GeometryError;

/// 2x2 matrix stored by columns.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Matrix2 {
    pub col1: Vector,
    pub col2: Vector,
}

impl Matrix2 {
    pub const fn from_columns(col1: Vector, col2: Vector) -> Self {
        Self { col1, col2 }
    }

    /// row-major constructor, reads like the written matrix
    pub fn from_rows(m11: FloatNum, m12: FloatNum, m21: FloatNum, m22: FloatNum) -> Self {
        Self {
            col1: (m11, m21).into(),
            col2: (m12, m22).into(),
        }
    }

    /// rotation by `angle` radians
    pub fn rotation(angle: FloatNum) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            col1: (c, s).into(),
            col2: (-s, c).into(),
        }
    }

    pub fn identity() -> Self {
        Self::from_rows(1., 0., 0., 1.)
    }

    pub fn transpose(&self) -> Self {
        Self::from_rows(
            self.col1.x(),
            self.col1.y(),
            self.col2.x(),
            self.col2.y(),
        )
    }

    pub fn determinant(&self) -> FloatNum {
        self.col1.x() * self.col2.y() - self.col2.x() * self.col1.y()
    }

    pub fn invert(&self) -> Result<Self, GeometryError> {
        let (a, b) = (self.col1.x(), self.col2.x());
        let (c, d) = (self.col1.y(), self.col2.y());
        let det = self.determinant();
        if det == 0. {
            return Err(GeometryError::SingularMatrix);
        }
        let det = det.recip();
        Ok(Self::from_rows(det * d, -det * b, -det * c, det * a))
    }

    /// element-wise absolute value
    pub fn abs(&self) -> Self {
        Self {
            col1: self.col1.abs_components(),
            col2: self.col2.abs_components(),
        }
    }
}

impl Mul<Vector> for Matrix2 {
    type Output = Vector;
    fn mul(self, v: Vector) -> Self::Output {
        (
            self.col1.x() * v.x() + self.col2.x() * v.y(),
            self.col1.y() * v.x() + self.col2.y() * v.y(),
        )
            .into()
    }
}

impl Mul for Matrix2 {
    type Output = Matrix2;
    fn mul(self, rhs: Matrix2) -> Self::Output {
        Self {
            col1: self * rhs.col1,
            col2: self * rhs.col2,
        }
    }
}

impl Add for Matrix2 {
    type Output = Matrix2;
    fn add(self, rhs: Matrix2) -> Self::Output {
        Self {
            col1: self.col1 + rhs.col1,
            col2: self.col2 + rhs.col2,
        }
    }
}
