use weight_macro_tools::Deref;

use crate::{
    errors::GeometryError,
    math::{edge_normal, vector::Vector, FloatNum},
};

use super::aabox::AABox;

/// Counter-clockwise polygon in body space. Area, centroid and the bounding
/// radius are computed once at construction.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Vector>,
    area: FloatNum,
    centroid: Vector,
    bounds: AABox,
}

// true when `p` lies strictly to the left of the directed edge `from -> to`
fn turns_left(from: Vector, to: Vector, p: Vector) -> bool {
    (p.x() - from.x()) * (to.y() - from.y()) - (to.x() - from.x()) * (p.y() - from.y()) < 0.
}

impl Polygon {
    pub fn try_new(vertices: impl Into<Vec<Vector>>) -> Result<Self, GeometryError> {
        let vertices = vertices.into();
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        // collinear or repeated vertices leave the centroid undefined
        let area = Self::compute_area(&vertices);
        if area.is_nan() || area <= FloatNum::EPSILON {
            return Err(GeometryError::ZeroArea);
        }
        Ok(Self::new_unchecked(vertices))
    }

    fn new_unchecked(vertices: Vec<Vector>) -> Self {
        let radius = vertices
            .iter()
            .map(|v| v.abs_sq())
            .fold(0., FloatNum::max)
            .sqrt();

        let area = Self::compute_area(&vertices);
        let centroid = Self::compute_centroid(&vertices, area);

        Self {
            vertices,
            area,
            centroid,
            bounds: AABox::new(radius * 2., radius * 2.),
        }
    }

    fn edges(vertices: &[Vector]) -> impl Iterator<Item = (Vector, Vector)> + '_ {
        let len = vertices.len();
        (0..len).map(move |i| (vertices[i], vertices[(i + 1) % len]))
    }

    // shoelace
    fn compute_area(vertices: &[Vector]) -> FloatNum {
        let double_area: FloatNum = Self::edges(vertices).map(|(v1, v2)| v1 ^ v2).sum();
        (double_area / 2.).abs()
    }

    fn compute_centroid(vertices: &[Vector], area: FloatNum) -> Vector {
        let (x, y) = Self::edges(vertices).fold((0., 0.), |(x, y), (v1, v2)| {
            let cross = v1 ^ v2;
            (x + (v1.x() + v2.x()) * cross, y + (v1.y() + v2.y()) * cross)
        });
        (x / (6. * area), y / (6. * area)).into()
    }

    pub fn is_convex(&self) -> bool {
        let len = self.vertices.len();
        (0..len).all(|i| {
            turns_left(
                self.vertices[i],
                self.vertices[(i + 1) % len],
                self.vertices[(i + 2) % len],
            )
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector] {
        &self.vertices
    }

    #[inline]
    pub fn area(&self) -> FloatNum {
        self.area
    }

    #[inline]
    pub fn centroid(&self) -> Vector {
        self.centroid
    }

    #[inline]
    pub fn bounds(&self) -> &AABox {
        &self.bounds
    }

    pub fn surface_factor(&self) -> FloatNum {
        self.area
    }

    /// vertices rotated by `rotation` and moved to `position`
    pub fn vertices_at(&self, position: Vector, rotation: FloatNum) -> Vec<Vector> {
        let (sin, cos) = rotation.sin_cos();
        self.vertices
            .iter()
            .map(|v| {
                Vector::new(
                    v.x() * cos - v.y() * sin + position.x(),
                    v.y() * cos + v.x() * sin + position.y(),
                )
            })
            .collect()
    }

    pub fn centroid_at(&self, position: Vector, rotation: FloatNum) -> Vector {
        let (sin, cos) = rotation.sin_cos();
        let c = self.centroid;
        Vector::new(
            c.x() * cos - c.y() * sin + position.x(),
            c.y() * cos + c.x() * sin + position.y(),
        )
    }
}

/// A [`Polygon`] whose vertices are known to turn the same way everywhere.
#[derive(Clone, Debug, Deref)]
pub struct ConvexPolygon {
    #[deref]
    polygon: Polygon,
}

impl ConvexPolygon {
    pub fn try_new(vertices: impl Into<Vec<Vector>>) -> Result<Self, GeometryError> {
        let polygon = Polygon::try_new(vertices)?;
        if !polygon.is_convex() {
            return Err(GeometryError::NotConvex);
        }
        Ok(Self { polygon })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// strict containment of a body space point
    pub fn contains(&self, p: Vector) -> bool {
        let vertices = &self.polygon.vertices;
        let len = vertices.len();
        (0..len).all(|i| turns_left(vertices[i], vertices[(i + 1) % len], p))
    }

    /// nearest point on the contour to a body space point
    pub fn nearest_point(&self, p: Vector) -> Vector {
        let vertices = &self.polygon.vertices;
        let len = vertices.len();

        let mut nearest = 0;
        let mut nearest_dist = FloatNum::MAX;
        for (i, v) in vertices.iter().enumerate() {
            let dist = v.distance_sq(&p);
            if dist < nearest_dist {
                nearest_dist = dist;
                nearest = i;
            }
        }

        let prev = vertices[(nearest + len - 1) % len];
        let next = vertices[(nearest + 1) % len];
        let vertex = vertices[nearest];
        let to_point = p - vertex;

        let normal = if to_point * (prev - vertex) > 0. {
            edge_normal(prev, vertex)
        } else if to_point * (next - vertex) > 0. {
            edge_normal(vertex, next)
        } else {
            return vertex;
        };

        normal * -(to_point * normal) + p
    }
}
