//! Teardown signal for an in-flight send.

use std::cell::RefCell;
use std::rc::Rc;
use futures::channel::oneshot;

/// Shareable handle that aborts the active send of one session.
/// The view keeps a clone and fires it when the conversation is closed.
#[derive(Clone, Default)]
pub struct CancelHandle {
    slot: Rc<RefCell<Option<oneshot::Sender<()>>>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh signal for the next send
    pub(crate) fn arm(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        *self.slot.borrow_mut() = Some(tx);
        rx
    }

    pub(crate) fn disarm(&self) {
        self.slot.borrow_mut().take();
    }

    /// Abort the active send. Returns false when nothing was in flight.
    pub fn cancel(&self) -> bool {
        match self.slot.borrow_mut().take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot.borrow().is_some()
    }
}
