//! Credential holder shared by the transport adapters and the session.

use std::cell::RefCell;
use std::rc::Rc;

/// Current bearer credential, clone-cheap via Rc.
#[derive(Clone, Default)]
pub struct AuthState {
    token: Rc<RefCell<Option<String>>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let state = Self::new();
        state.set_token(token);
        state
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.borrow_mut() = Some(token.into());
    }

    pub fn clear(&self) {
        self.token.borrow_mut().take();
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Value for the `Authorization` header, if signed in
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }
}
