use super::event::CollisionEvent;

pub type ListenerId = u32;

struct CollisionListener {
    id: ListenerId,
    callback: Box<dyn FnMut(&CollisionEvent)>,
}

impl CollisionListener {
    fn call(&mut self, event: &CollisionEvent) {
        (self.callback)(event)
    }
}

#[derive(Default)]
pub(crate) struct CollisionListeners {
    listener_id_count: ListenerId,
    listeners: Vec<CollisionListener>,
}

impl CollisionListeners {
    pub(crate) fn register<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&CollisionEvent) + 'static,
    {
        self.listener_id_count = self.listener_id_count.wrapping_add(1);
        let id = self.listener_id_count;
        self.listeners.push(CollisionListener {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// false when no listener had this id
    pub(crate) fn unregister(&mut self, listener_id: ListenerId) -> bool {
        let count = self.listeners.len();
        self.listeners.retain(|listener| listener.id != listener_id);
        count != self.listeners.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn emit(&mut self, event: &CollisionEvent) {
        for listener in self.listeners.iter_mut() {
            listener.call(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::math::vector::Vector;

    #[test]
    fn test_register_emit_unregister() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = CollisionListeners::default();

        let id = {
            let seen = seen.clone();
            listeners.register(move |event: &CollisionEvent| seen.borrow_mut().push(event.body_a()))
        };
        let event = CollisionEvent::new(0., 3, 4, Vector::ZERO, (0., 1.).into(), -0.1);
        listeners.emit(&event);
        assert_eq!(*seen.borrow(), vec![3]);

        assert!(listeners.unregister(id));
        assert!(!listeners.unregister(id));
        assert!(listeners.is_empty());
        listeners.emit(&event);
        assert_eq!(seen.borrow().len(), 1);
    }
}
