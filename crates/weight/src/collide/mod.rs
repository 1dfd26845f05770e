//! Narrow phase: exact geometry between two bodies producing contacts.
//!
//! Every collider writes at most `contacts.len()` contacts into the buffer it
//! is handed and returns how many it wrote. A collider handed bodies whose
//! shapes it does not understand reports no contacts.

pub mod box_box;
pub mod box_circle;
pub mod circle_circle;
pub mod contact;
pub mod factory;
pub mod line_box;
pub mod line_circle;
pub mod line_line;
pub mod line_polygon;
pub mod polygon_box;
pub mod polygon_circle;
pub mod polygon_polygon;
pub mod swap;

pub(crate) mod edge_sweep;
pub(crate) mod intersection;
pub(crate) mod penetration;

use crate::body::Body;

use self::contact::Contact;

pub trait Collider: Sync {
    fn collide(&self, contacts: &mut [Contact], body_a: &Body, body_b: &Body) -> usize;
}

/// cheap bounding box rejection run before any exact test
pub(crate) fn bounds_touch(body_a: &Body, body_b: &Body) -> bool {
    body_a
        .shape()
        .bounds()
        .touches(body_a.position(), body_b.shape().bounds(), body_b.position())
}
