//! Single-threaded observable value.

type Subscriber<T> = Box<dyn FnMut(&T)>;

pub struct Observable<T> {
    value: T,
    subscribers: Vec<Subscriber<T>>,
}

impl<T: PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Registers `f`; it is called right away with the current value and then
    /// on every change.
    pub fn subscribe(&mut self, mut f: impl FnMut(&T) + 'static) {
        f(&self.value);
        self.subscribers.push(Box::new(f));
    }

    /// Stores `value` and notifies subscribers if it differs from the current
    /// one. Returns whether it did.
    pub fn set(&mut self, value: T) -> bool {
        if value == self.value {
            return false;
        }
        self.value = value;
        self.notify();
        true
    }

    /// Re-publishes the current value unconditionally.
    pub fn notify(&mut self) {
        for s in self.subscribers.iter_mut() {
            s(&self.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribers_see_changes_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut obs = Observable::new(1);
        {
            let seen = Rc::clone(&seen);
            obs.subscribe(move |v| seen.borrow_mut().push(*v));
        }
        assert!(!obs.set(1));
        assert!(obs.set(2));
        obs.notify();
        assert_eq!(*seen.borrow(), vec![1, 2, 2]);
        assert_eq!(*obs.get(), 2);
    }
}
