use super::FloatNum;
use std::{
    fmt::Display,
    ops::{Add, AddAssign, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Not, Sub, SubAssign},
};

/// Plain 2d vector, copied freely.
///
/// Operators follow the usual conventions of this crate:
/// * `a * b` dot product, `a * s` scale
/// * `a ^ b` cross product (z component only)
/// * `a ^ s` / `s ^ a` cross product with a scalar treated as a z-axis vector
/// * `!a` perpendicular `(y, -x)`
#[derive(Clone, Debug, Copy, Default)]
pub struct Vector {
    x: FloatNum,
    y: FloatNum,
}

impl Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ x: {}, y: {} }}", self.x, self.y)
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < FloatNum::EPSILON && (self.y - other.y).abs() < FloatNum::EPSILON
    }
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0., 0.);

    #[inline]
    pub const fn new(x: FloatNum, y: FloatNum) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> FloatNum {
        self.x
    }

    #[inline]
    pub fn y(&self) -> FloatNum {
        self.y
    }

    #[inline]
    pub fn set(&mut self, x: FloatNum, y: FloatNum) {
        self.x = x;
        self.y = y;
    }

    #[inline]
    pub fn abs(&self) -> FloatNum {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn abs_sq(&self) -> FloatNum {
        self.x * self.x + self.y * self.y
    }

    /// unit vector in the same direction, the zero vector stays zero
    pub fn normalize(&self) -> Vector {
        let len = self.abs();
        if len == 0. {
            return *self;
        }
        let shrink = len.recip();
        (self.x * shrink, self.y * shrink).into()
    }

    #[inline]
    pub fn distance(&self, other: &Vector) -> FloatNum {
        (*other - *self).abs()
    }

    #[inline]
    pub fn distance_sq(&self, other: &Vector) -> FloatNum {
        (*other - *self).abs_sq()
    }

    /// project onto a vector that is already unit length
    #[inline]
    pub fn project_onto_unit(&self, unit: Vector) -> Vector {
        unit * (*self * unit)
    }

    #[inline]
    pub fn abs_components(&self) -> Vector {
        (self.x.abs(), self.y.abs()).into()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0. && self.y == 0.
    }

    #[inline]
    pub fn set_zero(&mut self) {
        self.x = 0.;
        self.y = 0.;
    }

    /// component-wise comparison with an open tolerance window
    pub fn equals_delta(&self, other: &Vector, delta: FloatNum) -> bool {
        other.x - delta < self.x
            && other.x + delta > self.x
            && other.y - delta < self.y
            && other.y + delta > self.y
    }
}

impl From<(FloatNum, FloatNum)> for Vector {
    fn from((x, y): (FloatNum, FloatNum)) -> Self {
        Self { x, y }
    }
}

impl From<[FloatNum; 2]> for Vector {
    fn from([x, y]: [FloatNum; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Vector> for (FloatNum, FloatNum) {
    fn from(value: Vector) -> Self {
        (value.x, value.y)
    }
}

impl Add for Vector {
    type Output = Self;
    fn add(self, rhs: Vector) -> Self::Output {
        (self.x + rhs.x, self.y + rhs.y).into()
    }
}

impl Add<&Vector> for Vector {
    type Output = Self;
    fn add(self, rhs: &Vector) -> Self::Output {
        self + *rhs
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Self;
    fn sub(self, rhs: Vector) -> Self::Output {
        (self.x - rhs.x, self.y - rhs.y).into()
    }
}

impl Sub<&Vector> for Vector {
    type Output = Self;
    fn sub(self, rhs: &Vector) -> Self::Output {
        self - *rhs
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul for Vector {
    type Output = FloatNum;
    fn mul(self, rhs: Vector) -> Self::Output {
        self.x * rhs.x + self.y * rhs.y
    }
}

impl Mul<FloatNum> for Vector {
    type Output = Vector;
    fn mul(self, rhs: FloatNum) -> Self::Output {
        (self.x * rhs, self.y * rhs).into()
    }
}

impl Mul<Vector> for FloatNum {
    type Output = Vector;
    fn mul(self, rhs: Vector) -> Self::Output {
        rhs * self
    }
}

impl MulAssign<FloatNum> for Vector {
    fn mul_assign(&mut self, rhs: FloatNum) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<FloatNum> for Vector {
    type Output = Vector;
    fn div(self, rhs: FloatNum) -> Self::Output {
        (self.x / rhs, self.y / rhs).into()
    }
}

impl DivAssign<FloatNum> for Vector {
    fn div_assign(&mut self, rhs: FloatNum) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self::Output {
        (-self.x, -self.y).into()
    }
}

impl Not for Vector {
    type Output = Self;
    fn not(self) -> Self::Output {
        Self {
            x: self.y,
            y: -self.x,
        }
    }
}

// z component of the 3d cross product
impl BitXor for Vector {
    type Output = FloatNum;
    fn bitxor(self, rhs: Self) -> Self::Output {
        self.x * rhs.y - self.y * rhs.x
    }
}

// v x (0, 0, s)
impl BitXor<FloatNum> for Vector {
    type Output = Vector;
    fn bitxor(self, s: FloatNum) -> Self::Output {
        (s * self.y, -s * self.x).into()
    }
}

// (0, 0, s) x v
impl BitXor<Vector> for FloatNum {
    type Output = Vector;
    fn bitxor(self, v: Vector) -> Self::Output {
        (-self * v.y, self * v.x).into()
    }
}
