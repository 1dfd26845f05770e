use crate::{errors::ColliderUnavailable, shape::ShapeKind};

use super::{
    box_box::BoxBoxCollider,
    box_circle::{BoxCircleCollider, CircleBoxCollider},
    circle_circle::CircleCircleCollider,
    line_box::LineBoxCollider,
    line_circle::LineCircleCollider,
    line_line::LineLineCollider,
    line_polygon::LinePolygonCollider,
    polygon_box::PolygonBoxCollider,
    polygon_circle::PolygonCircleCollider,
    polygon_polygon::PolygonPolygonCollider,
    swap::SwapCollider,
    Collider,
};

/// Picks the narrow phase routine for a pair of shape kinds. The collider is
/// always called with the bodies in the order the kinds were given.
pub trait ColliderFactory {
    fn create_collider(
        &self,
        shape_a: ShapeKind,
        shape_b: ShapeKind,
    ) -> Result<&dyn Collider, ColliderUnavailable>;
}

/// Knows a collider for every combination of the built in shapes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultColliderFactory;

static BOX_BOX: BoxBoxCollider = BoxBoxCollider;
static BOX_CIRCLE: BoxCircleCollider = BoxCircleCollider;
static CIRCLE_BOX: CircleBoxCollider = CircleBoxCollider;
static CIRCLE_CIRCLE: CircleCircleCollider = CircleCircleCollider;
static LINE_BOX: LineBoxCollider = LineBoxCollider;
static LINE_CIRCLE: LineCircleCollider = LineCircleCollider;
static LINE_LINE: LineLineCollider = LineLineCollider;
static LINE_POLYGON: LinePolygonCollider = LinePolygonCollider;
static POLYGON_BOX: PolygonBoxCollider = PolygonBoxCollider;
static POLYGON_CIRCLE: PolygonCircleCollider = PolygonCircleCollider;
static POLYGON_POLYGON: PolygonPolygonCollider = PolygonPolygonCollider;

static BOX_LINE: SwapCollider<LineBoxCollider> = SwapCollider(LineBoxCollider);
static BOX_POLYGON: SwapCollider<PolygonBoxCollider> = SwapCollider(PolygonBoxCollider);
static CIRCLE_LINE: SwapCollider<LineCircleCollider> = SwapCollider(LineCircleCollider);
static CIRCLE_POLYGON: SwapCollider<PolygonCircleCollider> =
    SwapCollider(PolygonCircleCollider);
static POLYGON_LINE: SwapCollider<LinePolygonCollider> = SwapCollider(LinePolygonCollider);

impl ColliderFactory for DefaultColliderFactory {
    fn create_collider(
        &self,
        shape_a: ShapeKind,
        shape_b: ShapeKind,
    ) -> Result<&dyn Collider, ColliderUnavailable> {
        use ShapeKind::*;

        let collider: &dyn Collider = match (shape_a, shape_b) {
            (Circle, Circle) => &CIRCLE_CIRCLE,
            (Circle, Rect) => &CIRCLE_BOX,
            (Circle, Line) => &CIRCLE_LINE,
            (Circle, Polygon) => &CIRCLE_POLYGON,

            (Rect, Circle) => &BOX_CIRCLE,
            (Rect, Rect) => &BOX_BOX,
            (Rect, Line) => &BOX_LINE,
            (Rect, Polygon) => &BOX_POLYGON,

            (Line, Circle) => &LINE_CIRCLE,
            (Line, Rect) => &LINE_BOX,
            (Line, Line) => &LINE_LINE,
            (Line, Polygon) => &LINE_POLYGON,

            (Polygon, Circle) => &POLYGON_CIRCLE,
            (Polygon, Rect) => &POLYGON_BOX,
            (Polygon, Line) => &POLYGON_LINE,
            (Polygon, Polygon) => &POLYGON_POLYGON,
        };
        Ok(collider)
    }
}
