pub mod context;

use std::{any::Any, collections::BTreeMap};

use tracing::{debug, instrument};
use weight_macro_tools::Deref;

use crate::{
    algo::id::IdDispatcher,
    body::{Body, BodyId, RestingTolerance},
    errors::{WeightError, WeightResult},
    joint::{Joint, JointId},
    math::{vector::Vector, FloatNum},
    space::{event::CollisionEvent, CollisionSpace, SpaceState},
    strategy::BroadCollisionStrategy,
};

use self::context::{WorldContext, DEFAULT_RESTING_TOLERANCE};

/// The step the solver constants are tuned for. Other step sizes work but
/// the simulation gets less predictable.
pub const DEFAULT_STEP: FloatNum = 1. / 60.;

/// A collision space that also integrates motion and solves contacts and
/// joints with sequential impulses.
#[derive(Deref)]
pub struct World {
    #[deref]
    space: CollisionSpace,
    context: WorldContext,
    joints: BTreeMap<JointId, Box<dyn Joint>>,
    joint_user_data: BTreeMap<JointId, Box<dyn Any>>,
    joint_id_dispatcher: IdDispatcher,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldContext::default())
    }
}

impl World {
    pub fn new(context: WorldContext) -> Self {
        Self::with_space(context, CollisionSpace::default())
    }

    pub fn with_strategy(
        context: WorldContext,
        strategy: impl BroadCollisionStrategy + 'static,
    ) -> Self {
        Self::with_space(context, CollisionSpace::new(strategy))
    }

    fn with_space(context: WorldContext, space: CollisionSpace) -> Self {
        Self {
            space,
            context,
            joints: BTreeMap::new(),
            joint_user_data: BTreeMap::new(),
            joint_id_dispatcher: IdDispatcher::new(),
        }
    }

    #[inline]
    pub fn context(&self) -> &WorldContext {
        &self.context
    }

    /// gravity, iterations and damping; resting detection has its own switches
    pub fn context_mut(&mut self) -> &mut WorldContext {
        &mut self.context
    }

    pub fn set_gravity(&mut self, gravity: impl Into<Vector>) -> &mut Self {
        self.context.set_gravity(gravity);
        self
    }

    /// bodies added later pick up the world's resting tolerances
    pub fn add_body(&mut self, mut body: Body) -> WeightResult<BodyId> {
        if self.context.resting_body_detection() {
            body.configure_resting_detection(self.context.resting_tolerance());
        }
        self.space.add(body)
    }

    /// also drops the arbiters and joints the body takes part in
    pub fn remove_body(&mut self, id: BodyId) -> WeightResult<Body> {
        let body = self.space.remove(id).ok_or(WeightError::UnknownBody(id))?;

        let attached: Vec<JointId> = self
            .joints
            .iter()
            .filter(|(_, joint)| joint.body1() == id || joint.body2() == id)
            .map(|(&joint_id, _)| joint_id)
            .collect();
        for joint_id in attached {
            self.joints.remove(&joint_id);
            self.joint_user_data.remove(&joint_id);
            debug!(joint = joint_id, body = id, "joint dropped with its body");
        }
        Ok(body)
    }

    /// both bodies of the joint must already be in the world
    pub fn add_joint(&mut self, joint: impl Joint + 'static) -> WeightResult<JointId> {
        for body in [joint.body1(), joint.body2()] {
            if !self.bodies().contains(body) {
                return Err(WeightError::UnknownBody(body));
            }
        }

        let id = self.joint_id_dispatcher.gen_id()?;
        debug!(
            joint = id,
            kind = %joint.kind(),
            body1 = joint.body1(),
            body2 = joint.body2(),
            "joint added"
        );
        self.joints.insert(id, Box::new(joint));
        Ok(id)
    }

    pub fn remove_joint(&mut self, id: JointId) -> WeightResult<Box<dyn Joint>> {
        let joint = self.joints.remove(&id).ok_or(WeightError::UnknownJoint(id))?;
        self.joint_user_data.remove(&id);
        debug!(joint = id, "joint removed");
        Ok(joint)
    }

    pub fn joint(&self, id: JointId) -> Option<&dyn Joint> {
        self.joints.get(&id).map(|joint| joint.as_ref())
    }

    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut (dyn Joint + 'static)> {
        self.joints.get_mut(&id).map(|joint| joint.as_mut())
    }

    /// joints in the order they were added
    pub fn joints(&self) -> impl Iterator<Item = (JointId, &dyn Joint)> {
        self.joints.iter().map(|(&id, joint)| (id, joint.as_ref()))
    }

    pub fn joint_user_data<T: Any>(&self, id: JointId) -> Option<&T> {
        self.joint_user_data.get(&id)?.downcast_ref()
    }

    pub fn set_joint_user_data(&mut self, id: JointId, data: impl Any) -> WeightResult<()> {
        if !self.joints.contains_key(&id) {
            return Err(WeightError::UnknownJoint(id));
        }
        self.joint_user_data.insert(id, Box::new(data));
        Ok(())
    }

    /// Bodies come to rest, losing their mass, once they sit still on
    /// something static. Tolerances are squared distances and speeds.
    pub fn enable_resting_body_detection(
        &mut self,
        hit_tolerance: FloatNum,
        rotation_tolerance: FloatNum,
        position_tolerance: FloatNum,
    ) {
        self.enable_resting_body_detection_with(RestingTolerance::new(
            hit_tolerance,
            rotation_tolerance,
            position_tolerance,
        ));
    }

    pub fn enable_default_resting_body_detection(&mut self) {
        self.enable_resting_body_detection_with(DEFAULT_RESTING_TOLERANCE);
    }

    fn enable_resting_body_detection_with(&mut self, tolerance: RestingTolerance) {
        self.context
            .set_resting_body_detection(true)
            .set_resting_tolerance(tolerance);
        for body in self.space.state.bodies.iter_mut() {
            body.configure_resting_detection(tolerance);
        }
        debug!(?tolerance, "resting body detection enabled");
    }

    /// resting bodies wake up and stay awake
    pub fn disable_resting_body_detection(&mut self) {
        self.context.set_resting_body_detection(false);
        self.clear_resting_state();
        debug!("resting body detection disabled");
    }

    pub fn clear_resting_state(&mut self) {
        for body in self.space.state.bodies.iter_mut() {
            body.set_resting(false);
        }
    }

    /// one collision event per live contact of `body`
    pub fn contacts_of(&self, body: BodyId) -> Vec<CollisionEvent> {
        self.arbiters()
            .filter(|arbiter| arbiter.concerns(body))
            .flat_map(|arbiter| {
                arbiter.contacts().iter().map(move |contact| {
                    CollisionEvent::new(
                        self.total_time(),
                        arbiter.body1(),
                        arbiter.body2(),
                        contact.position(),
                        contact.normal(),
                        contact.separation(),
                    )
                })
            })
            .collect()
    }

    pub fn total_energy(&self) -> FloatNum {
        self.bodies().iter().map(Body::energy).sum()
    }

    /// drops bodies, arbiters and joints, ids start over
    pub fn clear(&mut self) {
        self.space.clear();
        self.joints.clear();
        self.joint_user_data.clear();
        self.joint_id_dispatcher.reset();
    }

    pub fn step_default(&mut self) -> WeightResult<()> {
        self.step(DEFAULT_STEP)
    }

    /// Advances the simulation by `dt` seconds. An error leaves the world
    /// part way through the step.
    #[instrument(level = "trace", skip(self))]
    pub fn step(&mut self, dt: FloatNum) -> WeightResult<()> {
        let inv_dt = if dt > 0. { dt.recip() } else { 0. };
        let detect_resting = self.context.resting_body_detection();

        if detect_resting {
            let bodies = &mut self.space.state.bodies;
            bodies.iter_mut().for_each(Body::start_frame);
            // joints keep their bodies awake
            for joint in self.joints.values() {
                for id in [joint.body1(), joint.body2()] {
                    if let Some(body) = bodies.get_mut(id) {
                        body.set_resting(false);
                    }
                }
            }
        }

        self.space.collide(dt)?;

        let SpaceState {
            bodies, arbiters, ..
        } = &mut self.space.state;
        let skip = |body: &Body| body.inv_mass() == 0. || (detect_resting && body.is_resting());

        let gravity = self.context.gravity();
        for body in bodies.iter_mut().filter(|body| !skip(&**body)) {
            body.integrate_forces(dt, gravity);
        }

        let damping = self.context.damping();
        for arbiter in arbiters.values_mut() {
            let (a, b) = bodies.pair_mut(arbiter.body1(), arbiter.body2())?;
            if !detect_resting || !arbiter.has_resting_pair(a, b) {
                arbiter.pre_step(a, b, inv_dt, dt, damping);
            }
        }
        for joint in self.joints.values_mut() {
            joint.pre_step(inv_dt, bodies)?;
        }

        for _ in 0..self.context.iterations() {
            for arbiter in arbiters.values_mut() {
                let (a, b) = bodies.pair_mut(arbiter.body1(), arbiter.body2())?;
                if !detect_resting || !arbiter.has_resting_pair(a, b) {
                    arbiter.apply_impulse(a, b);
                } else {
                    a.collided(b);
                    b.collided(a);
                }
            }
            for joint in self.joints.values_mut() {
                joint.apply_impulse(bodies)?;
            }
        }

        for body in bodies.iter_mut().filter(|body| !skip(&**body)) {
            body.integrate_position(dt);
        }

        if detect_resting {
            let ids: Vec<BodyId> = bodies.ids().collect();
            for id in ids {
                let reaches_static = bodies
                    .get(id)
                    .is_some_and(|body| body.needs_static_check())
                    && bodies.is_touching_static(id);
                if let Some(body) = bodies.get_mut(id) {
                    body.end_frame(reaches_static);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{context::WorldContextBuilder, *};
    use crate::{
        joint::{BasicJoint, SpringJoint},
        shape::{circle::Circle, rect::Rect},
    };

    fn falling_box(world: &mut World, y: FloatNum) -> BodyId {
        let mut body = Body::new(Rect::new(1., 1.), 1.);
        body.set_position((0., y));
        world.add_body(body).unwrap()
    }

    #[test]
    fn test_context_defaults() {
        let context = WorldContext::default();
        assert_eq!(context.gravity(), Vector::new(0., 10.));
        assert_eq!(context.iterations(), 10);
        assert_eq!(context.damping(), 1.);
        assert!(!context.resting_body_detection());

        let context = WorldContextBuilder::new()
            .gravity((0., 0.))
            .iterations(4)
            .build();
        assert!(context.gravity().is_zero());
        assert_eq!(context.iterations(), 4);
    }

    #[test]
    fn test_gravity_accelerates_free_bodies() {
        let mut world = World::default();
        let id = falling_box(&mut world, 0.);
        world.step(0.5).unwrap();
        let body = world.body(id).unwrap();
        assert_eq!(body.velocity(), Vector::new(0., 5.));
        assert_eq!(body.position(), Vector::new(0., 2.5));
        assert!((world.total_energy() - 25.).abs() < 1e-4);
    }

    #[test]
    fn test_static_bodies_never_move() {
        let mut world = World::default();
        let id = world.add_body(Body::new_static(Rect::new(4., 1.))).unwrap();
        world.step_default().unwrap();
        let body = world.body(id).unwrap();
        assert!(body.position().is_zero());
        assert!(body.velocity().is_zero());
    }

    #[test]
    fn test_joint_needs_known_bodies() {
        let mut world = World::default();
        let a = falling_box(&mut world, 0.);
        let b = falling_box(&mut world, 2.);
        let joint = BasicJoint::new(world.body(a).unwrap(), world.body(b).unwrap(), (0., 1.));

        world.remove_body(b).unwrap();
        assert_eq!(world.add_joint(joint), Err(WeightError::UnknownBody(b)));
    }

    #[test]
    fn test_removing_body_drops_its_joints() {
        let mut world = World::default();
        let a = falling_box(&mut world, 0.);
        let b = falling_box(&mut world, 2.);
        let c = falling_box(&mut world, 4.);
        let ab = world
            .add_joint(BasicJoint::new(world.body(a).unwrap(), world.body(b).unwrap(), (0., 1.)))
            .unwrap();
        let bc = world
            .add_joint(SpringJoint::new(
                world.body(b).unwrap(),
                world.body(c).unwrap(),
                (0., 2.),
                (0., 4.),
            ))
            .unwrap();
        world.set_joint_user_data(bc, "rope").unwrap();
        assert_eq!(world.joint_user_data::<&str>(bc), Some(&"rope"));

        world.remove_body(a).unwrap();
        assert!(world.joint(ab).is_none());
        assert!(world.joint(bc).is_some());
        assert_eq!(world.joints().count(), 1);

        assert!(world.remove_joint(bc).is_ok());
        assert!(world.joint_user_data::<&str>(bc).is_none());
        assert_eq!(
            world.remove_joint(bc).err(),
            Some(WeightError::UnknownJoint(bc))
        );
        assert_eq!(world.remove_body(a).err(), Some(WeightError::UnknownBody(a)));
    }

    #[test]
    fn test_enable_detection_configures_existing_bodies() {
        let mut world = World::default();
        let id = falling_box(&mut world, 0.);
        world.enable_resting_body_detection(0.5, 0.25, 0.125);
        assert!(world.context().resting_body_detection());
        assert_eq!(
            world.body(id).unwrap().resting_tolerance(),
            RestingTolerance::new(0.5, 0.25, 0.125)
        );

        let later = falling_box(&mut world, 5.);
        assert_eq!(
            world.body(later).unwrap().resting_tolerance(),
            RestingTolerance::new(0.5, 0.25, 0.125)
        );
    }

    #[test]
    fn test_contacts_of_lists_every_contact() {
        let mut world = World::default();
        world.set_gravity((0., 0.));
        let mut ground = Body::new_static(Rect::new(10., 1.));
        ground.set_position((0., 0.));
        let ground = world.add_body(ground).unwrap();
        let crate_box = falling_box(&mut world, -0.95);
        let mut ball = Body::new(Circle::new(0.5), 1.);
        ball.set_position((20., 20.));
        let ball = world.add_body(ball).unwrap();

        world.step_default().unwrap();
        let contacts = world.contacts_of(crate_box);
        assert!(!contacts.is_empty());
        assert!(contacts
            .iter()
            .all(|event| event.body_a() == ground && event.body_b() == crate_box));
        assert!(world.contacts_of(ball).is_empty());

        world.clear_arbiters(crate_box);
        assert!(world.contacts_of(crate_box).is_empty());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut world = World::default();
        let a = falling_box(&mut world, 0.);
        let b = falling_box(&mut world, 2.);
        world
            .add_joint(BasicJoint::new(world.body(a).unwrap(), world.body(b).unwrap(), (0., 1.)))
            .unwrap();
        world.clear();
        assert!(world.bodies().is_empty());
        assert_eq!(world.joints().count(), 0);
        assert_eq!(falling_box(&mut world, 0.), 1);
    }
}
