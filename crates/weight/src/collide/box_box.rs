use crate::{
    body::Body,
    math::{matrix::Matrix2, num::sign, vector::Vector, FloatNum},
};

use super::{
    bounds_touch,
    contact::{Contact, FeaturePair},
    Collider,
};

// Box vertex and edge numbering:
//
//         ^ y
//         |
//         e1
//    v2 ------ v1
//     |        |
//  e2 |        | e4  --> x
//     |        |
//    v3 ------ v4
//         e3
const NO_EDGE: i32 = 0;
const EDGE1: i32 = 1;
const EDGE2: i32 = 2;
const EDGE3: i32 = 3;
const EDGE4: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    FaceAX,
    FaceAY,
    FaceBX,
    FaceBY,
}

#[derive(Clone, Copy, Debug, Default)]
struct ClipVertex {
    v: Vector,
    fp: FeaturePair,
}

/// Box against box: separating axis over the four face normals, then the
/// incident edge is clipped against the side planes of the reference face.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxBoxCollider;

fn clip_segment_to_line(
    v_in: &[ClipVertex; 2],
    normal: Vector,
    offset: FloatNum,
    clip_edge: i32,
) -> ([ClipVertex; 2], usize) {
    let mut v_out = [ClipVertex::default(); 2];
    let mut num_out = 0;

    let distance0 = normal * v_in[0].v - offset;
    let distance1 = normal * v_in[1].v - offset;

    // points behind the plane survive
    if distance0 <= 0. {
        v_out[num_out] = v_in[0];
        num_out += 1;
    }
    if distance1 <= 0. {
        v_out[num_out] = v_in[1];
        num_out += 1;
    }

    if distance0 * distance1 < 0. {
        let interp = distance0 / (distance0 - distance1);
        let v = (v_in[1].v - v_in[0].v) * interp + v_in[0].v;
        let fp = if distance0 > 0. {
            let mut fp = v_in[0].fp;
            fp.in_edge1 = clip_edge;
            fp.in_edge2 = NO_EDGE;
            fp
        } else {
            let mut fp = v_in[1].fp;
            fp.out_edge1 = clip_edge;
            fp.out_edge2 = NO_EDGE;
            fp
        };
        v_out[num_out] = ClipVertex { v, fp };
        num_out += 1;
    }

    (v_out, num_out)
}

/// the edge of the incident box facing against `normal`, in world space
fn compute_incident_edge(
    h: Vector,
    position: Vector,
    rotation: Matrix2,
    normal: Vector,
) -> [ClipVertex; 2] {
    // reference normal in the incident box frame, flipped
    let n = -(rotation.transpose() * normal);
    let n_abs = n.abs_components();

    let ((v0, in0, out0), (v1, in1, out1)) = if n_abs.x() > n_abs.y() {
        if sign(n.x()) > 0. {
            (
                ((h.x(), -h.y()), EDGE3, EDGE4),
                ((h.x(), h.y()), EDGE4, EDGE1),
            )
        } else {
            (
                ((-h.x(), h.y()), EDGE1, EDGE2),
                ((-h.x(), -h.y()), EDGE2, EDGE3),
            )
        }
    } else if sign(n.y()) > 0. {
        (
            ((h.x(), h.y()), EDGE4, EDGE1),
            ((-h.x(), h.y()), EDGE1, EDGE2),
        )
    } else {
        (
            ((-h.x(), -h.y()), EDGE2, EDGE3),
            ((h.x(), -h.y()), EDGE3, EDGE4),
        )
    };

    let vertex = |v: (FloatNum, FloatNum), in_edge2, out_edge2| ClipVertex {
        v: rotation * Vector::from(v) + position,
        fp: FeaturePair {
            in_edge2,
            out_edge2,
            ..Default::default()
        },
    };

    [vertex(v0, in0, out0), vertex(v1, in1, out1)]
}

impl Collider for BoxBoxCollider {
    fn collide(&self, contacts: &mut [Contact], body_a: &Body, body_b: &Body) -> usize {
        let (Some(rect_a), Some(rect_b)) = (body_a.shape().as_rect(), body_b.shape().as_rect())
        else {
            return 0;
        };

        if !bounds_touch(body_a, body_b) {
            return 0;
        }

        let h_a = rect_a.half_extents();
        let h_b = rect_b.half_extents();

        let pos_a = body_a.position();
        let pos_b = body_b.position();
        let rot_a = Matrix2::rotation(body_a.rotation());
        let rot_b = Matrix2::rotation(body_b.rotation());
        let rot_a_t = rot_a.transpose();
        let rot_b_t = rot_b.transpose();

        let dp = pos_b - pos_a;
        let d_a = rot_a_t * dp;
        let d_b = rot_b_t * dp;

        let c = rot_a_t * rot_b;
        let abs_c = c.abs();
        let abs_c_t = abs_c.transpose();

        // box A faces
        let face_a = d_a.abs_components() - h_a - abs_c * h_b;
        if face_a.x() > 0. || face_a.y() > 0. {
            return 0;
        }

        // box B faces
        let face_b = d_b.abs_components() - abs_c_t * h_a - h_b;
        if face_b.x() > 0. || face_b.y() > 0. {
            return 0;
        }

        let towards = |column: Vector, d: FloatNum| if d > 0. { column } else { -column };

        // the relative and absolute terms favour earlier axes to stop flip-flopping
        let mut axis = Axis::FaceAX;
        let mut separation = face_a.x();
        let mut normal = towards(rot_a.col1, d_a.x());

        if face_a.y() > 1.05 * separation + 0.01 * h_a.y() {
            axis = Axis::FaceAY;
            separation = face_a.y();
            normal = towards(rot_a.col2, d_a.y());
        }

        if face_b.x() > 1.05 * separation + 0.01 * h_b.x() {
            axis = Axis::FaceBX;
            separation = face_b.x();
            normal = towards(rot_b.col1, d_b.x());
        }

        if face_b.y() > 1.05 * separation + 0.01 * h_b.y() {
            axis = Axis::FaceBY;
            normal = towards(rot_b.col2, d_b.y());
        }

        // clipping planes and the segment to clip
        let (front_normal, front, side_normal, neg_side, pos_side, neg_edge, pos_edge, incident) =
            match axis {
                Axis::FaceAX => {
                    let side_normal = rot_a.col2;
                    let side = pos_a * side_normal;
                    (
                        normal,
                        pos_a * normal + h_a.x(),
                        side_normal,
                        -side + h_a.y(),
                        side + h_a.y(),
                        EDGE3,
                        EDGE1,
                        compute_incident_edge(h_b, pos_b, rot_b, normal),
                    )
                }
                Axis::FaceAY => {
                    let side_normal = rot_a.col1;
                    let side = pos_a * side_normal;
                    (
                        normal,
                        pos_a * normal + h_a.y(),
                        side_normal,
                        -side + h_a.x(),
                        side + h_a.x(),
                        EDGE2,
                        EDGE4,
                        compute_incident_edge(h_b, pos_b, rot_b, normal),
                    )
                }
                Axis::FaceBX => {
                    let front_normal = -normal;
                    let side_normal = rot_b.col2;
                    let side = pos_b * side_normal;
                    (
                        front_normal,
                        pos_b * front_normal + h_b.x(),
                        side_normal,
                        -side + h_b.y(),
                        side + h_b.y(),
                        EDGE3,
                        EDGE1,
                        compute_incident_edge(h_a, pos_a, rot_a, front_normal),
                    )
                }
                Axis::FaceBY => {
                    let front_normal = -normal;
                    let side_normal = rot_b.col1;
                    let side = pos_b * side_normal;
                    (
                        front_normal,
                        pos_b * front_normal + h_b.y(),
                        side_normal,
                        -side + h_b.x(),
                        side + h_b.x(),
                        EDGE2,
                        EDGE4,
                        compute_incident_edge(h_a, pos_a, rot_a, front_normal),
                    )
                }
            };

        let (clip_points1, np) =
            clip_segment_to_line(&incident, -side_normal, neg_side, neg_edge);
        if np < 2 {
            return 0;
        }

        let (clip_points2, np) =
            clip_segment_to_line(&clip_points1, side_normal, pos_side, pos_edge);
        if np < 2 {
            return 0;
        }

        // roundoff may leave no point behind the front face
        let flip = matches!(axis, Axis::FaceBX | Axis::FaceBY);
        let mut num_contacts = 0;
        for clip_point in clip_points2.iter() {
            if num_contacts >= contacts.len() {
                break;
            }

            let separation = front_normal * clip_point.v - front;
            if separation <= 0. {
                let mut feature = clip_point.fp;
                if flip {
                    feature.flip();
                }
                // slide the point onto the reference face
                let position = clip_point.v - front_normal * separation;
                contacts[num_contacts].set(position, normal, separation, feature);
                num_contacts += 1;
            }
        }

        num_contacts
    }
}
