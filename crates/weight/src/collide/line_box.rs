use crate::{
    body::Body,
    math::{vector::Vector, FloatNum},
    shape::line::Line,
};

use super::{
    bounds_touch,
    contact::{Contact, FeaturePair},
    Collider,
};

/// Line against box. The box corners are projected on the line's normal to
/// find which side of the line the box sits on, and along the line to find
/// corners hanging over one of its end points.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineBoxCollider;

/// which side of the line the box is on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Inner,
    Outer,
}

impl Side {
    // strictly beyond the line on this side
    fn beyond(self, value: FloatNum, line_pos: FloatNum) -> bool {
        match self {
            Side::Inner => value > line_pos,
            Side::Outer => value < line_pos,
        }
    }
}

fn wrapped(points: &[Vector; 4], index: isize) -> Vector {
    points[index.rem_euclid(4) as usize]
}

/// contact for a box corner pushing against one end of the line
fn resolve_end_point(
    contact: &mut Contact,
    position: Vector,
    offset: Vector,
    normal: Vector,
    left_line: &Line,
    right_line: &Line,
    index: usize,
) {
    let normal_line = Line::new(position, position + normal);
    let left_line = left_line.translated(offset);
    let right_line = right_line.translated(offset);

    let distance_to = |line: &Line| {
        normal_line
            .intersect(line)
            .map_or(FloatNum::MAX, |point| point.distance(&position) - normal.abs())
    };
    let distance = distance_to(&right_line).min(distance_to(&left_line));

    contact.set(
        position,
        normal.normalize(),
        -distance,
        FeaturePair::from_index(index),
    );
}

impl Collider for LineBoxCollider {
    fn collide(&self, contacts: &mut [Contact], line_body: &Body, box_body: &Body) -> usize {
        let (Some(line), Some(rect)) = (line_body.shape().as_line(), box_body.shape().as_rect())
        else {
            return 0;
        };

        let length = line.length();
        if length == 0. || !bounds_touch(line_body, box_body) {
            return 0;
        }

        let pos_a = line_body.position();
        let line_vec = line.direction().normalize();
        let axis = Vector::new(-line.dy(), line.dx()).normalize();
        let line_pos = line.start() * axis;
        let centre = (box_body.position() - pos_a) * axis;

        let points = rect
            .points(box_body.position(), box_body.rotation())
            .map(|point| point - pos_a);
        let tangent = points.map(|point| point * axis);
        // 0 at the start of the line, 1 at its end
        let proj = points.map(|point| ((point - line.start()) * line_vec) / length);

        if proj.iter().all(|&p| p >= 1. || p <= 0.) {
            return 0;
        }

        let (side, normal) = if centre < line_pos {
            if !line.blocks_inner_edge() {
                return 0;
            }
            (Side::Inner, -axis)
        } else {
            if !line.blocks_outer_edge() {
                return 0;
            }
            (Side::Outer, axis)
        };

        let mut num_contacts = 0;
        for i in 0..4 {
            if num_contacts >= contacts.len() {
                break;
            }

            if !side.beyond(tangent[i], line_pos) {
                continue;
            }

            if proj[i] < 0. || proj[i] > 1. {
                let end_point = if proj[i] < 0. { line.start() } else { line.end() };
                let left_line = Line::new(wrapped(&points, i as isize - 1), points[i]);
                let right_line = Line::new(wrapped(&points, i as isize + 1), points[i]);
                let left = left_line.closest_point(end_point) * axis;
                let right = right_line.closest_point(end_point) * axis;

                if side.beyond(left, line_pos) && side.beyond(right, line_pos) {
                    resolve_end_point(
                        &mut contacts[num_contacts],
                        pos_a + end_point,
                        pos_a,
                        normal,
                        &left_line,
                        &right_line,
                        i,
                    );
                    num_contacts += 1;
                }
            } else {
                let foot = (points[i] - line.start()).project_onto_unit(line_vec) + line.start();
                let (separation, feature) = match side {
                    Side::Inner => (-(tangent[i] - line_pos), FeaturePair::from_index(i)),
                    Side::Outer => (-(line_pos - tangent[i]), FeaturePair::default()),
                };
                contacts[num_contacts].set(foot + pos_a, normal, separation, feature);
                num_contacts += 1;
            }
        }

        num_contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{collide::swap::SwapCollider, shape::rect::Rect};

    fn floor() -> Body {
        Body::new_static(Line::new((0., 0.), (10., 0.)))
    }

    fn crate_at(x: FloatNum, y: FloatNum) -> Body {
        let mut body = Body::new(Rect::new(1., 1.), 1.);
        body.set_position((x, y));
        body
    }

    #[test]
    fn test_box_sinking_into_line() {
        let line = floor();
        let crate_box = crate_at(5., -0.4);
        let mut contacts = [Contact::default(); 10];

        let count = LineBoxCollider.collide(&mut contacts, &line, &crate_box);
        assert_eq!(count, 2);
        for contact in &contacts[..count] {
            assert_eq!(contact.normal(), (0., -1.).into());
            assert!((contact.separation() + 0.1).abs() < 1e-5);
            assert!(contact.position().y().abs() < 1e-5);
        }
    }

    #[test]
    fn test_passable_inner_edge() {
        let mut line = Line::new((0., 0.), (10., 0.));
        line.set_blocks_inner_edge(false);
        let line = Body::new_static(line);
        let crate_box = crate_at(5., -0.4);
        let mut contacts = [Contact::default(); 10];
        assert_eq!(LineBoxCollider.collide(&mut contacts, &line, &crate_box), 0);
    }

    #[test]
    fn test_box_beside_line_is_ignored() {
        let line = floor();
        let crate_box = crate_at(-3., -0.4);
        let mut contacts = [Contact::default(); 10];
        assert_eq!(LineBoxCollider.collide(&mut contacts, &line, &crate_box), 0);
    }

    #[test]
    fn test_box_line_swap_points_the_other_way() {
        let line = floor();
        let crate_box = crate_at(5., -0.4);
        let mut contacts = [Contact::default(); 10];
        let count = SwapCollider(LineBoxCollider).collide(&mut contacts, &crate_box, &line);
        assert_eq!(count, 2);
        assert_eq!(contacts[0].normal(), (0., 1.).into());
    }
}
