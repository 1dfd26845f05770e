pub mod arbiter;
pub mod event;
pub(crate) mod hooks;

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::{
    algo::id::IdDispatcher,
    body::{Body, BodyId, BodyStore},
    collide::{
        bounds_touch,
        factory::{ColliderFactory, DefaultColliderFactory},
    },
    errors::WeightResult,
    math::FloatNum,
    strategy::{BroadCollisionStrategy, BruteCollisionStrategy, CollisionContext},
};

use self::{
    arbiter::{pair_key, Arbiter},
    event::CollisionEvent,
    hooks::CollisionListeners,
};

pub use self::hooks::ListenerId;

type PairKey = (BodyId, BodyId);

/// Everything the broad phase may touch while it runs.
pub(crate) struct SpaceState {
    pub(crate) bodies: BodyStore,
    pub(crate) arbiters: BTreeMap<PairKey, Arbiter>,
    factory: Box<dyn ColliderFactory>,
    listeners: CollisionListeners,
    total_time: FloatNum,
    bitmask: u64,
}

impl Default for SpaceState {
    fn default() -> Self {
        Self {
            bodies: Default::default(),
            arbiters: Default::default(),
            factory: Box::new(DefaultColliderFactory),
            listeners: Default::default(),
            total_time: 0.,
            bitmask: u64::MAX,
        }
    }
}

impl SpaceState {
    fn remove_arbiter(&mut self, key: PairKey) {
        if self.arbiters.remove(&key).is_some() {
            trace!(body1 = key.0, body2 = key.1, "arbiter removed");
        }
    }

    // a partitioning strategy may never pair up bodies that drifted apart
    fn prune_separated(&mut self) {
        let bodies = &self.bodies;
        self.arbiters.retain(|&(a, b), _| {
            let touching = matches!(
                (bodies.get(a), bodies.get(b)),
                (Some(a), Some(b)) if bounds_touch(a, b)
            );
            if !touching {
                trace!(body1 = a, body2 = b, "arbiter removed");
            }
            touching
        });
    }

    fn resolve_pair(&mut self, id_a: BodyId, id_b: BodyId) -> WeightResult<()> {
        let key = pair_key(id_a, id_b);
        let a = self.bodies.try_get(id_a)?;
        let b = self.bodies.try_get(id_b)?;

        if self.bitmask & a.bitmask() & b.bitmask() == 0
            || a.is_excluded(id_b)
            || (a.inv_mass() == 0. && b.inv_mass() == 0.)
        {
            return Ok(());
        }

        if !bounds_touch(a, b) {
            self.remove_arbiter(key);
            return Ok(());
        }

        let mut fresh = Arbiter::new(a, b);
        if fresh.collide(&*self.factory, a, b)? == 0 {
            self.remove_arbiter(key);
            return Ok(());
        }

        {
            let (a, b) = self.bodies.pair_mut(id_a, id_b)?;
            a.collided(b);
            b.collided(a);
        }

        if let Some(arbiter) = self.arbiters.get_mut(&key) {
            arbiter.update(&fresh);
            return Ok(());
        }

        let contact = fresh.contacts()[0];
        self.listeners.emit(&CollisionEvent::new(
            self.total_time,
            id_a,
            id_b,
            contact.position(),
            contact.normal(),
            contact.separation(),
        ));

        fresh.init(self.bodies.try_get(id_a)?, self.bodies.try_get(id_b)?);
        trace!(%fresh, "arbiter created");
        self.arbiters.insert(key, fresh);
        Ok(())
    }
}

impl CollisionContext for SpaceState {
    fn bodies(&self) -> &BodyStore {
        &self.bodies
    }

    fn resolve(&mut self, bodies: &[BodyId], _dt: FloatNum) -> WeightResult<()> {
        for (i, &id_a) in bodies.iter().enumerate() {
            for &id_b in &bodies[i + 1..] {
                self.resolve_pair(id_a, id_b)?;
            }
        }
        Ok(())
    }
}

/// Bodies, the arbiters between them and the strategy that pairs them up.
/// Stepping physics is left to the world built on top of it.
pub struct CollisionSpace {
    strategy: Box<dyn BroadCollisionStrategy>,
    pub(crate) state: SpaceState,
    id_dispatcher: IdDispatcher,
}

impl Default for CollisionSpace {
    fn default() -> Self {
        Self::new(BruteCollisionStrategy)
    }
}

impl CollisionSpace {
    pub fn new(strategy: impl BroadCollisionStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
            state: Default::default(),
            id_dispatcher: IdDispatcher::new(),
        }
    }

    pub fn set_collision_strategy(
        &mut self,
        strategy: impl BroadCollisionStrategy + 'static,
    ) -> &mut Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn set_collider_factory(&mut self, factory: impl ColliderFactory + 'static) -> &mut Self {
        self.state.factory = Box::new(factory);
        self
    }

    #[inline]
    pub fn bodies(&self) -> &BodyStore {
        &self.state.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.state.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.state.bodies.get_mut(id)
    }

    pub fn arbiters(&self) -> impl Iterator<Item = &Arbiter> {
        self.state.arbiters.values()
    }

    pub fn arbiter(&self, a: BodyId, b: BodyId) -> Option<&Arbiter> {
        self.state.arbiters.get(&pair_key(a, b))
    }

    /// simulated time accumulated over every `collide` call
    #[inline]
    pub fn total_time(&self) -> FloatNum {
        self.state.total_time
    }

    #[inline]
    pub fn bitmask(&self) -> u64 {
        self.state.bitmask
    }

    pub fn set_bitmask(&mut self, bitmask: u64) -> &mut Self {
        self.state.bitmask = bitmask;
        self
    }

    pub fn add_bit(&mut self, bits: u64) -> &mut Self {
        self.state.bitmask |= bits;
        self
    }

    pub fn remove_bit(&mut self, bits: u64) -> &mut Self {
        self.state.bitmask -= bits & self.state.bitmask;
        self
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CollisionEvent) + 'static,
    {
        self.state.listeners.register(listener)
    }

    pub fn remove_listener(&mut self, listener_id: ListenerId) -> bool {
        self.state.listeners.unregister(listener_id)
    }

    pub fn has_listeners(&self) -> bool {
        !self.state.listeners.is_empty()
    }

    /// takes ownership of the body and hands back the id it is known by
    pub fn add(&mut self, mut body: Body) -> WeightResult<BodyId> {
        let id = self.id_dispatcher.gen_id()?;
        body.inject_id(id);
        self.state.bodies.push(body);
        debug!(body = id, "body added");
        Ok(id)
    }

    /// drops the body together with every arbiter it takes part in
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let body = self.state.bodies.remove(id)?;
        self.clear_arbiters(id);
        for other in self.state.bodies.iter_mut() {
            other.remove_excluded(id);
        }
        debug!(body = id, "body removed");
        Some(body)
    }

    /// forgets the contact history of `id`
    pub fn clear_arbiters(&mut self, id: BodyId) {
        let before = self.state.arbiters.len();
        self.state.arbiters.retain(|_, arbiter| !arbiter.concerns(id));
        trace!(
            body = id,
            removed = before - self.state.arbiters.len(),
            "arbiters cleared"
        );
    }

    /// the two bodies stop colliding with each other
    pub fn exclude(&mut self, a: BodyId, b: BodyId) -> WeightResult<()> {
        self.state.bodies.exclude(a, b)?;
        self.state.remove_arbiter(pair_key(a, b));
        Ok(())
    }

    pub fn include(&mut self, a: BodyId, b: BodyId) -> WeightResult<()> {
        self.state.bodies.include(a, b)
    }

    /// runs the broad phase and refreshes the arbiters
    pub fn collide(&mut self, dt: FloatNum) -> WeightResult<()> {
        self.state.total_time += dt;
        self.strategy.collide_bodies(&mut self.state, dt)?;
        self.state.prune_separated();
        Ok(())
    }

    /// drops every body and arbiter, ids start over
    pub fn clear(&mut self) {
        self.state.bodies.clear();
        self.state.arbiters.clear();
        self.id_dispatcher.reset();
    }
}
