use std::fmt::Display;

use tracing::trace;
use weight_macro_tools::Fields;

use crate::{
    body::{Body, BodyId},
    errors::WeightResult,
    math::FloatNum,
};

use super::{BroadCollisionStrategy, CollisionContext};

/// An axis aligned cell of the partition and the bodies overlapping it.
#[derive(Clone, Debug, Default, PartialEq, Fields)]
#[r]
pub struct Space {
    x1: FloatNum,
    y1: FloatNum,
    x2: FloatNum,
    y2: FloatNum,
    #[shared(skip)]
    bodies: Vec<BodyId>,
}

impl Space {
    pub fn new(x: FloatNum, y: FloatNum, width: FloatNum, height: FloatNum) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
            bodies: Vec::new(),
        }
    }

    pub fn bodies(&self) -> &[BodyId] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// grows the space so it surely covers the body's bounds
    fn add_bounds_of(&mut self, body: &Body) {
        let bounds = body.shape().bounds();
        let position = body.position();
        self.x1 = self.x1.min(position.x() - bounds.width());
        self.x2 = self.x2.max(position.x() + bounds.width());
        self.y1 = self.y1.min(position.y() - bounds.height());
        self.y2 = self.y2.max(position.y() + bounds.height());
    }

    /// strict overlap with the bounds of `body`
    pub fn touches(&self, body: &Body) -> bool {
        let bounds = body.shape().bounds();
        let position = body.position();

        let half_width = (self.x2 - self.x1) / 2.;
        let half_height = (self.y2 - self.y1) / 2.;
        let dx = (self.x1 + half_width - position.x()).abs();
        let dy = (self.y1 + half_height - position.y()).abs();

        half_width + bounds.width() / 2. > dx && half_height + bounds.height() / 2. > dy
    }

    fn quarters(&self, bodies: &[&Body]) -> [Space; 4] {
        let width = (self.x2 - self.x1) / 2.;
        let height = (self.y2 - self.y1) / 2.;
        let mut spaces = [
            Space::new(self.x1, self.y1, width, height),
            Space::new(self.x1, self.y1 + height, width, height),
            Space::new(self.x1 + width, self.y1, width, height),
            Space::new(self.x1 + width, self.y1 + height, width, height),
        ];

        // bodies on a border land in several quarters
        for body in bodies.iter().filter(|body| self.bodies.contains(&body.id())) {
            for space in spaces.iter_mut() {
                if space.touches(body) {
                    space.bodies.push(body.id());
                }
            }
        }
        spaces
    }
}

impl Display for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Space {},{} {},{} {} bodies]",
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.len()
        )
    }
}

/// Quarters the world recursively until a cell holds few enough bodies or
/// the depth limit is hit, then resolves every leaf on its own.
#[derive(Clone, Debug, Fields)]
#[r]
pub struct QuadSpaceStrategy {
    max_in_space: usize,
    max_levels: usize,
    #[shared(skip)]
    spaces: Vec<Space>,
}

impl QuadSpaceStrategy {
    pub fn new(max_in_space: usize, max_levels: usize) -> Self {
        Self {
            max_in_space,
            max_levels,
            spaces: Vec::new(),
        }
    }

    /// leaf cells of the last partition
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    fn split(&mut self, space: Space, level: usize, bodies: &[&Body]) {
        if space.len() <= self.max_in_space || level > self.max_levels {
            self.spaces.push(space);
            return;
        }

        for quarter in space.quarters(bodies) {
            self.split(quarter, level + 1, bodies);
        }
    }
}

impl BroadCollisionStrategy for QuadSpaceStrategy {
    fn collide_bodies(
        &mut self,
        context: &mut dyn CollisionContext,
        dt: FloatNum,
    ) -> WeightResult<()> {
        self.spaces.clear();

        {
            let bodies: Vec<&Body> = context.bodies().iter().collect();
            let mut root = Space::new(0., 0., 0., 0.);
            for body in bodies.iter() {
                root.add_bounds_of(body);
                root.bodies.push(body.id());
            }
            self.split(root, 0, &bodies);
        }

        trace!(
            spaces = self.spaces.len(),
            sizes = ?self.spaces.iter().map(Space::len).collect::<Vec<_>>(),
            "partitioned bodies"
        );

        for space in self.spaces.iter() {
            context.resolve(space.bodies(), dt)?;
        }
        Ok(())
    }
}
