//! Typed camera notifications with explicit unsubscription

use crate::projection::ProjectionCamera;

/// Notifications emitted by the orbit controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    /// A gesture began
    Start,
    /// The camera moved
    Change,
    /// A gesture ended
    End,
}

/// Token returned by [`ControlListeners::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

type Listener = Box<dyn FnMut(&ProjectionCamera)>;

/// Observer lists for the three control events
#[derive(Default)]
pub struct ControlListeners {
    next_id: u64,
    listeners: Vec<(ListenerHandle, ControlEvent, Listener)>,
}

impl ControlListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event`
    pub fn subscribe<F>(&mut self, event: ControlEvent, callback: F) -> ListenerHandle
    where
        F: FnMut(&ProjectionCamera) + 'static,
    {
        let handle = ListenerHandle(self.next_id);
        self.next_id += 1;
        self.listeners.push((handle, event, Box::new(callback)));
        handle
    }

    /// Remove a listener; returns `false` if it was already gone
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _, _)| *h != handle);
        self.listeners.len() != before
    }

    /// Call every listener registered for `event`, in subscription order
    pub fn emit(&mut self, event: ControlEvent, camera: &ProjectionCamera) {
        for (_, registered, callback) in self.listeners.iter_mut() {
            if *registered == event {
                callback(camera);
            }
        }
    }

    /// Number of listeners registered for `event`
    pub fn count(&self, event: ControlEvent) -> usize {
        self.listeners.iter().filter(|(_, e, _)| *e == event).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl std::fmt::Debug for ControlListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlListeners")
            .field("start", &self.count(ControlEvent::Start))
            .field("change", &self.count(ControlEvent::Change))
            .field("end", &self.count(ControlEvent::End))
            .finish()
    }
}
