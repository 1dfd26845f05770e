pub mod aabox;
pub mod circle;
pub mod line;
pub mod polygon;
pub mod rect;

use std::fmt::Display;

use crate::math::FloatNum;

use self::{
    aabox::AABox,
    circle::Circle,
    line::Line,
    polygon::{ConvexPolygon, Polygon},
    rect::Rect,
};

/// Tag used to pick a collider for a pair of shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Rect,
    Circle,
    Line,
    Polygon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Rect,
        ShapeKind::Circle,
        ShapeKind::Line,
        ShapeKind::Polygon,
    ];
}

impl Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShapeKind::Rect => "Rect",
            ShapeKind::Circle => "Circle",
            ShapeKind::Line => "Line",
            ShapeKind::Polygon => "Polygon",
        };
        f.write_str(name)
    }
}

/// Geometry owned by a body, expressed in the body's local frame.
#[derive(Clone, Debug)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Polygon(Polygon),
    ConvexPolygon(ConvexPolygon),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Polygon(_) | Shape::ConvexPolygon(_) => ShapeKind::Polygon,
        }
    }

    pub fn bounds(&self) -> &AABox {
        match self {
            Shape::Rect(rect) => rect.bounds(),
            Shape::Circle(circle) => circle.bounds(),
            Shape::Line(line) => line.bounds(),
            Shape::Polygon(polygon) => polygon.bounds(),
            Shape::ConvexPolygon(polygon) => polygon.bounds(),
        }
    }

    /// inertia proxy, `I = mass * surface_factor / 12`
    pub fn surface_factor(&self) -> FloatNum {
        match self {
            Shape::Rect(rect) => rect.surface_factor(),
            Shape::Circle(circle) => circle.surface_factor(),
            Shape::Line(line) => line.surface_factor(),
            Shape::Polygon(polygon) => polygon.surface_factor(),
            Shape::ConvexPolygon(polygon) => polygon.surface_factor(),
        }
    }

    pub fn as_rect(&self) -> Option<&Rect> {
        match self {
            Shape::Rect(rect) => Some(rect),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(circle) => Some(circle),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Shape::Line(line) => Some(line),
            _ => None,
        }
    }

    /// both polygon flavours, convex ones included
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon(polygon) => Some(polygon),
            Shape::ConvexPolygon(polygon) => Some(polygon.polygon()),
            _ => None,
        }
    }
}

impl From<Rect> for Shape {
    fn from(value: Rect) -> Self {
        Shape::Rect(value)
    }
}

impl From<Circle> for Shape {
    fn from(value: Circle) -> Self {
        Shape::Circle(value)
    }
}

impl From<Line> for Shape {
    fn from(value: Line) -> Self {
        Shape::Line(value)
    }
}

impl From<Polygon> for Shape {
    fn from(value: Polygon) -> Self {
        Shape::Polygon(value)
    }
}

impl From<ConvexPolygon> for Shape {
    fn from(value: ConvexPolygon) -> Self {
        Shape::ConvexPolygon(value)
    }
}
