// ── Reactive state cell ──
//
// A single watch-backed value with push-based change notification.

use tokio::sync::watch;

/// One piece of view state with subscribers notified on every write.
pub(crate) struct StateCell<T: Clone + Send + Sync + 'static> {
    value: watch::Sender<T>,
}

impl<T: Clone + Send + Sync + 'static> StateCell<T> {
    pub(crate) fn new(initial: T) -> Self {
        let (value, _) = watch::channel(initial);
        Self { value }
    }

    /// Current value (cheap clone).
    pub(crate) fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the value unconditionally and notify subscribers.
    /// `send_modify` updates even with zero receivers.
    pub(crate) fn set(&self, new: T) {
        self.value.send_modify(|v| *v = new);
    }

    /// Mutate the value in place and notify subscribers.
    pub(crate) fn update(&self, f: impl FnOnce(&mut T)) {
        self.value.send_modify(f);
    }

    /// Subscribe to changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<T> {
        self.value.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_value() {
        let cell = StateCell::new(1u32);
        cell.set(5);
        assert_eq!(cell.get(), 5);
    }

    #[test]
    fn update_mutates_in_place() {
        let cell = StateCell::new(vec![1u32]);
        cell.update(|v| v.push(2));
        assert_eq!(cell.get(), vec![1, 2]);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let cell = StateCell::new(0u32);
        let mut rx = cell.subscribe();
        cell.set(7);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 7);
    }
}
