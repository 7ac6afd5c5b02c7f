//! View model for the chat page. No rendering; the page reads the
//! serialized [`state::ChatView`] and draws it however it likes.

pub mod state;

#[cfg(test)]
mod tests;
