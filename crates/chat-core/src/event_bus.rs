//! Event bus between the session engine and the presentation layer.
//!
//! The bus is single-threaded (WASM constraint) and uses interior mutability
//! via RefCell. Events go to the subscribed listeners synchronously; with no
//! listener attached they are buffered until the view drains them.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use chat_types::event::SessionEvent;

type Listener = Box<dyn Fn(&SessionEvent)>;

/// Shared event bus, clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<SessionEvent>>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Publish an event. Called by the session.
    pub fn emit(&self, event: SessionEvent) {
        let listeners = self.listeners.borrow();
        if listeners.is_empty() {
            self.queue.borrow_mut().push_back(event);
            return;
        }
        for listener in listeners.iter() {
            listener(&event);
        }
    }

    /// Register a listener called on every emit. Once one is attached,
    /// events are no longer queued for [`drain`](Self::drain).
    /// Listeners must not emit on the same bus.
    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Drain all pending events. Called by the view.
    pub fn drain(&self) -> Vec<SessionEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
