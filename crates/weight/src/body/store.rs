use std::{
    collections::BTreeMap,
    ops::{Index, IndexMut},
};

use crate::errors::{WeightError, WeightResult};

use super::{Body, BodyId};

/// Bodies in insertion order with an id index.
#[derive(Default)]
pub struct BodyStore {
    bodies: Vec<Body>,
    index: BTreeMap<BodyId, usize>, // body id -> position in `bodies`
}

impl Index<usize> for BodyStore {
    type Output = Body;
    fn index(&self, index: usize) -> &Self::Output {
        &self.bodies[index]
    }
}

impl IndexMut<usize> for BodyStore {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.bodies[index]
    }
}

impl BodyStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bodies: Vec::with_capacity(capacity),
            index: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.iter().map(|body| body.id())
    }

    pub(crate) fn push(&mut self, body: Body) {
        self.index.insert(body.id(), self.bodies.len());
        self.bodies.push(body);
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn remove(&mut self, id: BodyId) -> Option<Body> {
        let position = self.index.remove(&id)?;
        let body = self.bodies.remove(position);
        for (i, body) in self.bodies.iter().enumerate().skip(position) {
            self.index.insert(body.id(), i);
        }
        Some(body)
    }

    pub(crate) fn clear(&mut self) {
        self.bodies.clear();
        self.index.clear();
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index.get(&id).map(|&i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index.get(&id).map(|&i| &mut self.bodies[i])
    }

    pub(crate) fn try_get(&self, id: BodyId) -> WeightResult<&Body> {
        self.get(id).ok_or(WeightError::UnknownBody(id))
    }

    /// two distinct bodies borrowed mutably at once
    pub(crate) fn pair_mut(
        &mut self,
        a: BodyId,
        b: BodyId,
    ) -> WeightResult<(&mut Body, &mut Body)> {
        let i = *self.index.get(&a).ok_or(WeightError::UnknownBody(a))?;
        let j = *self.index.get(&b).ok_or(WeightError::UnknownBody(b))?;
        if i == j {
            return Err(WeightError::UnknownBody(b));
        }

        if i < j {
            let (head, tail) = self.bodies.split_at_mut(j);
            Ok((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.bodies.split_at_mut(i);
            Ok((&mut tail[0], &mut head[j]))
        }
    }

    /// both sides of the exclusion are recorded
    pub(crate) fn exclude(&mut self, a: BodyId, b: BodyId) -> WeightResult<()> {
        if a == b {
            return Ok(());
        }
        let (body_a, body_b) = self.pair_mut(a, b)?;
        body_a.add_excluded(b);
        body_b.add_excluded(a);
        Ok(())
    }

    pub(crate) fn include(&mut self, a: BodyId, b: BodyId) -> WeightResult<()> {
        if a == b {
            return Ok(());
        }
        let (body_a, body_b) = self.pair_mut(a, b)?;
        body_a.remove_excluded(b);
        body_b.remove_excluded(a);
        Ok(())
    }

    /// walks the touching graph looking for a static body
    pub fn is_touching_static(&self, id: BodyId) -> bool {
        let mut path = Vec::new();
        self.touching_static_from(id, &mut path)
    }

    fn touching_static_from(&self, id: BodyId, path: &mut Vec<BodyId>) -> bool {
        path.push(id);
        let Some(body) = self.get(id) else {
            return false;
        };

        for &other_id in body.touching() {
            if path.contains(&other_id) {
                continue;
            }
            let Some(other) = self.get(other_id) else {
                continue;
            };
            if other.is_static() || self.touching_static_from(other_id, path) {
                return true;
            }
        }
        false
    }

    /// every body reachable through touching contacts, optionally not crossing static bodies
    pub fn connected(&self, id: BodyId, stop_at_static: bool) -> Vec<BodyId> {
        let mut connected = Vec::new();
        let mut path = Vec::new();
        self.collect_connected(id, &mut connected, &mut path, stop_at_static);
        connected
    }

    fn collect_connected(
        &self,
        id: BodyId,
        connected: &mut Vec<BodyId>,
        path: &mut Vec<BodyId>,
        stop_at_static: bool,
    ) {
        path.push(id);
        let Some(body) = self.get(id) else {
            return;
        };

        for &other_id in body.touching() {
            if path.contains(&other_id) {
                continue;
            }
            let Some(other) = self.get(other_id) else {
                continue;
            };
            if other.is_static() && stop_at_static {
                continue;
            }
            connected.push(other_id);
            self.collect_connected(other_id, connected, path, stop_at_static);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{body::RestingTolerance, shape::rect::Rect};

    fn store_with(count: u32) -> BodyStore {
        let mut store = BodyStore::default();
        for id in 1..=count {
            let mut body = Body::new(Rect::new(1., 1.), 1.);
            body.inject_id(id);
            store.push(body);
        }
        store
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut store = store_with(4);
        assert!(store.remove(2).is_some());
        assert!(store.remove(2).is_none());
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(3).map(|body| body.id()), Some(3));
        assert_eq!(store.get(4).map(|body| body.id()), Some(4));
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![1, 3, 4]);
    }

    #[test]
    fn test_pair_mut_in_both_orders() {
        let mut store = store_with(3);
        let (a, b) = store.pair_mut(3, 1).unwrap();
        assert_eq!((a.id(), b.id()), (3, 1));
        let (a, b) = store.pair_mut(1, 3).unwrap();
        assert_eq!((a.id(), b.id()), (1, 3));
        assert!(store.pair_mut(1, 1).is_err());
        assert!(matches!(
            store.pair_mut(1, 9),
            Err(WeightError::UnknownBody(9))
        ));
    }

    #[test]
    fn test_exclusion_is_symmetric() {
        let mut store = store_with(2);
        store.exclude(1, 2).unwrap();
        assert!(store.get(1).unwrap().is_excluded(2));
        assert!(store.get(2).unwrap().is_excluded(1));
        store.include(2, 1).unwrap();
        assert!(!store.get(1).unwrap().is_excluded(2));
        assert!(!store.get(2).unwrap().is_excluded(1));
    }

    #[test]
    fn test_touching_static_through_chain() {
        let mut store = store_with(2);
        let mut ground = Body::new_static(Rect::new(10., 1.));
        ground.inject_id(3);
        store.push(ground);

        for id in 1..=3 {
            store
                .get_mut(id)
                .unwrap()
                .configure_resting_detection(RestingTolerance::default());
        }

        // 1 rests on 2, 2 rests on the ground
        {
            let (one, two) = store.pair_mut(1, 2).unwrap();
            one.collided(two);
            two.collided(one);
        }
        {
            let (two, ground) = store.pair_mut(2, 3).unwrap();
            two.collided(ground);
        }

        assert!(store.is_touching_static(1));
        assert!(store.is_touching_static(2));
        assert_eq!(store.connected(1, true), vec![2]);
        assert_eq!(store.connected(1, false), vec![2, 3]);
    }
}
