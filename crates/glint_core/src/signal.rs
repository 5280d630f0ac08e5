//! Synchronous signals.
//!
//! A [`Signal`] is an ordered list of callbacks. Emitting a signal calls every
//! connected callback on the current thread, in the order they were
//! connected, before `emit` returns. There is no queue and no deferred
//! delivery.

use std::fmt;

/// Identifies one connection on a [`Signal`], used to disconnect it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

pub struct Signal<T> {
    slots: Vec<(ConnectionId, Callback<T>)>,
    next_id: u64,
}

impl<T> Signal<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }

    /// Appends a callback; it runs after every previously connected one.
    pub fn connect<F>(&mut self, callback: F) -> ConnectionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns `false` if it was not connected.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(slot_id, _)| *slot_id != id);
        self.slots.len() != before
    }

    /// Calls every connected callback with `payload`.
    pub fn emit(&mut self, payload: &T) {
        for (_, callback) in &mut self.slots {
            callback(payload);
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut signal = Signal::<u32>::new();

        let a = Rc::clone(&log);
        signal.connect(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&log);
        signal.connect(move |v| b.borrow_mut().push(("b", *v)));

        signal.emit(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn disconnect_stops_delivery() {
        let hits = Rc::new(RefCell::new(0));
        let mut signal = Signal::<()>::new();
        let h = Rc::clone(&hits);
        let id = signal.connect(move |()| *h.borrow_mut() += 1);

        signal.emit(&());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(&());

        assert_eq!(*hits.borrow(), 1);
        assert!(signal.is_empty());
    }
}
