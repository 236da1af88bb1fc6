// Subscriber lists for controller notifications

/// Token returned by [`ObserverList::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of boxed callbacks receiving `E`
///
/// Callbacks are owned by the list and run in subscription order. They
/// cannot hold a borrow of whatever owns the list.
pub struct ObserverList<E: Copy> {
    next_id: u64,
    observers: Vec<(SubscriptionId, Box<dyn FnMut(E)>)>,
}

impl<E: Copy> ObserverList<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a subscriber, returns false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn notify(&mut self, event: E) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<E: Copy> Default for ObserverList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy> std::fmt::Debug for ObserverList<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("subscribers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut list = ObserverList::new();

        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            list.subscribe(move |value: i32| seen.borrow_mut().push((tag, value)));
        }

        list.notify(7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut list = ObserverList::new();

        let counter = Rc::clone(&count);
        let id = list.subscribe(move |_: ()| *counter.borrow_mut() += 1);
        list.notify(());

        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        assert!(list.is_empty());

        list.notify(());
        assert_eq!(*count.borrow(), 1);
    }
}
