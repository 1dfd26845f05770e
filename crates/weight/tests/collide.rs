use rand::{rngs::StdRng, Rng, SeedableRng};
use weight::{
    collide::{
        box_box::BoxBoxCollider, circle_circle::CircleCircleCollider,
        factory::DefaultColliderFactory,
    },
    prelude::*,
    space::arbiter::MAX_CONTACTS,
};

fn body_at(shape: impl Into<Shape>, x: FloatNum, y: FloatNum) -> Body {
    let mut body = Body::new(shape, 1.);
    body.set_position((x, y));
    body
}

fn shape_of(kind: ShapeKind) -> Shape {
    match kind {
        ShapeKind::Rect => Rect::new(1., 1.).into(),
        ShapeKind::Circle => Circle::new(0.5).into(),
        ShapeKind::Line => Line::new((-1., 0.), (1., 0.)).into(),
        ShapeKind::Polygon => ConvexPolygon::try_new(vec![
            Vector::new(-0.5, -0.5),
            Vector::new(0.5, -0.5),
            Vector::new(0., 0.5),
        ])
        .unwrap()
        .into(),
    }
}

#[test]
fn test_stacked_boxes_touch_at_two_corners() {
    let lower = body_at(Rect::new(1., 1.), 0., 0.);
    let upper = body_at(Rect::new(1., 1.), 0., 0.9);
    let mut contacts = [Contact::default(); MAX_CONTACTS];

    assert_eq!(BoxBoxCollider.collide(&mut contacts, &lower, &upper), 2);
    for contact in &contacts[..2] {
        assert!((contact.separation() + 0.1).abs() < 1e-4);
        assert!(contact.normal().y() > 0.99);
    }
    assert!((contacts[0].position().x() - contacts[1].position().x()).abs() > 0.9);
}

#[test]
fn test_every_shape_pair_has_a_collider() {
    let factory = DefaultColliderFactory;
    for kind_a in ShapeKind::ALL {
        for kind_b in ShapeKind::ALL {
            let collider = factory.create_collider(kind_a, kind_b).unwrap();

            let a = body_at(shape_of(kind_a), 0., 0.);
            let b = body_at(shape_of(kind_b), 50., 50.);
            let mut contacts = [Contact::default(); MAX_CONTACTS];
            assert_eq!(collider.collide(&mut contacts, &a, &b), 0, "{kind_a} vs {kind_b}");
        }
    }
}

#[test]
fn test_crossing_lines_never_collide() {
    let a = body_at(Line::new((-1., -1.), (1., 1.)), 0., 0.);
    let b = body_at(Line::new((-1., 1.), (1., -1.)), 0., 0.);
    let collider = DefaultColliderFactory
        .create_collider(ShapeKind::Line, ShapeKind::Line)
        .unwrap();
    let mut contacts = [Contact::default(); MAX_CONTACTS];
    assert_eq!(collider.collide(&mut contacts, &a, &b), 0);
}

#[test]
fn test_circle_overlap_matches_distance() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut contacts = [Contact::default(); 1];

    for _ in 0..500 {
        let (r1, r2) = (rng.gen_range(0.1..2.), rng.gen_range(0.1..2.));
        let a = body_at(Circle::new(r1), rng.gen_range(-3.0..3.), rng.gen_range(-3.0..3.));
        let b = body_at(Circle::new(r2), rng.gen_range(-3.0..3.), rng.gen_range(-3.0..3.));
        let distance = a.position().distance(&b.position());

        let count = CircleCircleCollider.collide(&mut contacts, &a, &b);
        if distance > r1 + r2 + 1e-3 {
            assert_eq!(count, 0);
        } else if distance < r1 + r2 - 1e-3 && distance > 1e-3 {
            assert_eq!(count, 1);
            assert!((contacts[0].separation() - (distance - r1 - r2)).abs() < 1e-3);
            assert!((contacts[0].normal().abs() - 1.).abs() < 1e-3);
        }
    }
}

#[test]
fn test_polygon_bounds_cover_any_rotation() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..100 {
        let sides = rng.gen_range(3..9);
        let radius: FloatNum = rng.gen_range(0.2..4.);
        let vertices: Vec<Vector> = (0..sides)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as FloatNum / sides as FloatNum;
                Vector::new(angle.cos() * radius, angle.sin() * radius)
            })
            .collect();
        let polygon = ConvexPolygon::try_new(vertices).unwrap();
        let bounds = *polygon.bounds();

        let position = Vector::new(rng.gen_range(-5.0..5.), rng.gen_range(-5.0..5.));
        let rotation = rng.gen_range(0.0..std::f32::consts::TAU);
        for vertex in polygon.vertices_at(position, rotation) {
            let offset = vertex - position;
            assert!(offset.x().abs() <= bounds.width() / 2. + 1e-4);
            assert!(offset.y().abs() <= bounds.height() / 2. + 1e-4);
        }
    }
}

#[test]
fn test_rotated_comb_on_plate_caps_contacts() {
    let mut comb = Vec::new();
    for prong in 0..6 {
        let left = 2. * prong as FloatNum;
        if prong > 0 {
            comb.push(Vector::new(left, 2.));
        }
        comb.extend([Vector::new(left, 0.5), Vector::new(left + 1., 0.5)]);
        if prong < 5 {
            comb.push(Vector::new(left + 1., 2.));
        }
    }
    comb.extend([Vector::new(11., 3.), Vector::new(0., 3.)]);
    let plate = Polygon::try_new(vec![
        Vector::new(-1., 0.),
        Vector::new(12., 0.),
        Vector::new(12., 1.),
        Vector::new(-1., 1.),
    ])
    .unwrap();

    let mut a = body_at(Polygon::try_new(comb).unwrap(), 0., 0.);
    let mut b = body_at(plate, 0., 0.);
    a.set_rotation(0.4);
    b.set_rotation(0.4);

    let collider = DefaultColliderFactory
        .create_collider(ShapeKind::Polygon, ShapeKind::Polygon)
        .unwrap();
    let mut contacts = [Contact::default(); MAX_CONTACTS];
    // every prong makes an area, more than the buffer holds
    assert_eq!(collider.collide(&mut contacts, &a, &b), MAX_CONTACTS);
    for contact in &contacts {
        assert!(contact.separation().is_finite());
        assert!(contact.separation() <= 0.);
        assert!(contact.separation().abs() <= 1.);
    }
}
