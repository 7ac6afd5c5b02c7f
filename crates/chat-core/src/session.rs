//! Conversation session: the send pipeline for one conversation.
//!
//! A send runs these steps:
//! 1. Validate input locally (empty text, attachment allow-list)
//! 2. Require a credential
//! 3. Enforce single-flight: a second send while one is in flight is rejected
//! 4. Append the user message and an empty assistant placeholder, synchronously
//! 5. Create the conversation on the server if it has no id yet
//! 6. Upload the attachment, if any
//! 7. Open the stream and fold every decoded token into the placeholder
//! 8. Settle the placeholder: complete, failed (partial text kept) or cancelled
//!
//! All state lives behind `Rc<RefCell<..>>` and no borrow is held across an
//! await, so the session can be cloned into `spawn_local` tasks and queried
//! while a send is suspended.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use futures::channel::oneshot;
use futures::future::{self, FutureExt};
use futures::{pin_mut, select, StreamExt};
use chat_types::{
    ChatError, Result,
    attachment::{Attachment, AttachmentFile},
    config::{ClientConfig, SendMode},
    conversation::Conversation,
    event::{NotificationLevel, SessionEvent},
    message::{Message, MessageState},
    payload::ChatPayload,
};
use crate::auth::AuthState;
use crate::cancel::CancelHandle;
use crate::decoder::decode_tokens;
use crate::event_bus::EventBus;
use crate::history::HistoryStore;
use crate::ports::*;

/// Adapters a session talks to
#[derive(Clone)]
pub struct SessionPorts {
    pub transport: Rc<dyn TransportPort>,
    pub uploader: Rc<dyn UploadPort>,
    pub conversations: Rc<dyn ConversationPort>,
    pub timer: Rc<dyn TimerPort>,
}

/// What the user submitted. Speech and drag/drop produce the same shape.
#[derive(Debug, Clone, Default)]
pub struct SendRequest {
    pub text: String,
    pub file: Option<AttachmentFile>,
}

impl SendRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: AttachmentFile) -> Self {
        self.file = Some(file);
        self
    }
}

#[derive(Clone)]
pub struct ConversationSession {
    conversation: Rc<RefCell<Conversation>>,
    ports: SessionPorts,
    config: Rc<ClientConfig>,
    auth: AuthState,
    history: HistoryStore,
    event_bus: EventBus,
    cancel: CancelHandle,
    /// Woken once the send in flight has settled
    idle_waiters: Rc<RefCell<Vec<oneshot::Sender<()>>>>,
    /// Bumped on every reset; a fetch that straddles one is stale
    epoch: Rc<Cell<u64>>,
}

impl ConversationSession {
    pub fn new(
        ports: SessionPorts,
        config: ClientConfig,
        auth: AuthState,
        history: HistoryStore,
        event_bus: EventBus,
    ) -> Self {
        Self {
            conversation: Rc::new(RefCell::new(Conversation::new())),
            ports,
            config: Rc::new(config),
            auth,
            history,
            event_bus,
            cancel: CancelHandle::new(),
            idle_waiters: Rc::new(RefCell::new(Vec::new())),
            epoch: Rc::new(Cell::new(0)),
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.conversation.borrow().messages().to_vec()
    }

    pub fn conversation_id(&self) -> Option<String> {
        self.conversation.borrow().id.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.conversation.borrow().active_index().is_some()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Handle the view fires when it closes this conversation
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Replace the history with a conversation fetched from the server
    pub async fn open(&self, id: &str) -> Result<()> {
        if self.is_busy() {
            return Err(ChatError::SessionBusy);
        }
        let epoch = self.epoch.get();
        let fetched = self.ports.conversations.fetch(id).await?;
        if self.epoch.get() != epoch {
            log::debug!("Discarding fetched conversation {}: session was reset", id);
            return Err(ChatError::Cancelled);
        }
        let messages = fetched.messages().to_vec();
        {
            // a send may have started while the fetch was suspended
            let mut conv = self.conversation.borrow_mut();
            if conv.active_index().is_some() {
                log::debug!("Discarding fetched conversation {}: a reply is in flight", id);
                return Err(ChatError::SessionBusy);
            }
            *conv = fetched;
        }
        log::info!("Opened conversation {} ({} messages)", id, messages.len());
        self.event_bus.emit(SessionEvent::HistoryLoaded { messages });
        Ok(())
    }

    /// Start over with an empty conversation; the server id is assigned on
    /// the next send.
    pub fn reset(&self) -> Result<()> {
        if self.is_busy() {
            return Err(ChatError::SessionBusy);
        }
        *self.conversation.borrow_mut() = Conversation::new();
        self.epoch.set(self.epoch.get() + 1);
        self.event_bus.emit(SessionEvent::HistoryLoaded { messages: Vec::new() });
        Ok(())
    }

    /// Abort the send in flight, wait until it has settled, then start over.
    /// Used on sign-out, where the conversation must not outlive the user.
    pub async fn close(&self) {
        while self.is_busy() {
            let (tx, rx) = oneshot::channel();
            self.idle_waiters.borrow_mut().push(tx);
            self.cancel.cancel();
            let _ = rx.await;
        }
        if let Err(e) = self.reset() {
            log::error!("Reset after close failed: {}", e);
        }
    }

    /// Send one user turn and stream the reply into a new assistant message.
    ///
    /// Input, auth and busy errors are returned before anything is appended.
    /// Later errors settle the assistant message (keeping partial text), emit
    /// one notification and are then returned. On success the index of the
    /// assistant message is returned.
    pub async fn send_message(&self, request: SendRequest) -> Result<usize> {
        let text = request.text.trim().to_string();
        if text.is_empty() && request.file.is_none() {
            return Err(ChatError::Validation("Message is empty".to_string()));
        }
        if let Some(file) = &request.file {
            if let Err(e) = self.config.upload.check(file) {
                self.notify(NotificationLevel::Warning, e.user_message());
                return Err(e);
            }
        }
        if !self.auth.is_authenticated() {
            self.event_bus.emit(SessionEvent::AuthRequired);
            return Err(ChatError::AuthRequired);
        }

        let (user_index, assistant_index) = self.append_turn(&text, request.file.as_ref())?;
        log::info!(
            "Send started (conversation {:?}, message {})",
            self.conversation_id(),
            assistant_index
        );

        let outbound = match &request.file {
            Some(file) if text.is_empty() => format!("Analyzing file: {}", file.name),
            _ => text,
        };

        let mut cancel = self.cancel.arm();
        let result = self
            .drive(user_index, assistant_index, outbound, request.file, &mut cancel)
            .await;
        self.cancel.disarm();

        let outcome = self.finish(assistant_index, result);
        for waiter in self.idle_waiters.borrow_mut().drain(..) {
            let _ = waiter.send(());
        }
        outcome
    }

    fn finish(&self, assistant_index: usize, result: Result<()>) -> Result<usize> {
        match result {
            Ok(()) => {
                self.settle(assistant_index, MessageState::Complete);
                log::info!("Send complete (message {})", assistant_index);
                Ok(assistant_index)
            }
            Err(e) => {
                let (state, level) = match e {
                    ChatError::Cancelled => (MessageState::Cancelled, NotificationLevel::Info),
                    _ => (MessageState::Failed, NotificationLevel::Error),
                };
                self.settle(assistant_index, state);
                log::warn!("Send {:?} (message {}): {}", state, assistant_index, e);
                self.notify(level, e.user_message());
                Err(e)
            }
        }
    }

    /// Append the user message and the placeholder in one borrow, so no
    /// other task can slip in between the busy check and the push.
    fn append_turn(&self, text: &str, file: Option<&AttachmentFile>) -> Result<(usize, usize)> {
        let (user, placeholder, user_index, assistant_index) = {
            let mut conv = self.conversation.borrow_mut();
            if conv.active_index().is_some() {
                log::debug!("Rejecting send: a reply is still in flight");
                return Err(ChatError::SessionBusy);
            }
            let content = match file {
                Some(f) if text.is_empty() => format!("Uploaded file: {}", f.name),
                _ => text.to_string(),
            };
            let user = Message::user(content, file.map(Attachment::local));
            let placeholder = Message::placeholder();
            let user_index = conv.push(user.clone())?;
            let assistant_index = conv.push(placeholder.clone())?;
            (user, placeholder, user_index, assistant_index)
        };

        self.event_bus.emit(SessionEvent::MessageAppended {
            index: user_index,
            message: user,
        });
        self.event_bus.emit(SessionEvent::MessageAppended {
            index: assistant_index,
            message: placeholder,
        });
        Ok((user_index, assistant_index))
    }

    async fn drive(
        &self,
        user_index: usize,
        index: usize,
        message: String,
        file: Option<AttachmentFile>,
        cancel: &mut oneshot::Receiver<()>,
    ) -> Result<()> {
        let conversation_id = self.ensure_conversation(cancel).await?;
        let mut payload = ChatPayload::new(message, Some(conversation_id));

        if let Some(file) = file {
            let uploaded = self
                .race(self.ports.uploader.upload(&file), cancel, None)
                .await?;
            log::debug!("Uploaded {} as {:?}", file.name, uploaded.kind);
            self.event_bus.emit(SessionEvent::AttachmentUploaded {
                index: user_index,
                url: uploaded.url.clone(),
            });
            payload = payload.with_attachment(&uploaded);
        }

        match self.config.session.mode {
            SendMode::Buffered => {
                let reply = self
                    .race(self.ports.transport.send(&payload), cancel, None)
                    .await?;
                self.conversation.borrow_mut().fill(index, &reply.response)?;
                self.event_bus.emit(SessionEvent::ReplyFilled {
                    index,
                    content: reply.response,
                });
            }
            SendMode::Streaming => {
                let channel = self
                    .race(self.ports.transport.open_stream(&payload), cancel, None)
                    .await?;
                self.conversation
                    .borrow_mut()
                    .transition(index, MessageState::Streaming)?;
                self.event_bus.emit(SessionEvent::StateChanged {
                    index,
                    state: MessageState::Streaming,
                });

                let idle = self.config.session.idle_timeout_ms;
                let mut tokens = decode_tokens(channel);
                while let Some(token) = self
                    .race(async { tokens.next().await.transpose() }, cancel, idle)
                    .await?
                {
                    self.apply_token(index, token)?;
                }
            }
        }
        Ok(())
    }

    async fn ensure_conversation(&self, cancel: &mut oneshot::Receiver<()>) -> Result<String> {
        if let Some(id) = self.conversation_id() {
            return Ok(id);
        }
        let summary = self
            .race(self.ports.conversations.create(), cancel, None)
            .await?;
        let id = summary.id.clone();
        self.conversation.borrow_mut().id = Some(id.clone());
        self.history.insert_front(summary);
        log::info!("Conversation {} created", id);
        self.event_bus.emit(SessionEvent::ConversationStarted {
            conversation_id: id.clone(),
        });
        Ok(id)
    }

    fn apply_token(&self, index: usize, token: String) -> Result<()> {
        let content = self
            .conversation
            .borrow_mut()
            .append_token(index, &token)?
            .to_string();
        self.event_bus.emit(SessionEvent::TokenApplied {
            index,
            token,
            content,
        });
        Ok(())
    }

    fn settle(&self, index: usize, state: MessageState) {
        let moved = self.conversation.borrow_mut().transition(index, state);
        match moved {
            Ok(()) => self.event_bus.emit(SessionEvent::StateChanged { index, state }),
            Err(e) => log::error!("Could not settle message {}: {}", index, e),
        }
    }

    fn notify(&self, level: NotificationLevel, message: String) {
        self.event_bus.emit(SessionEvent::Notification { level, message });
    }

    /// Await `fut` unless the send is cancelled first or, when `idle_ms` is
    /// set, the timer fires before it resolves.
    async fn race<T, F>(
        &self,
        fut: F,
        mut cancel: &mut oneshot::Receiver<()>,
        idle_ms: Option<u64>,
    ) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let fut = fut.fuse();
        pin_mut!(fut);
        let idle: Pin<Box<dyn Future<Output = ()>>> = match idle_ms {
            Some(ms) => self.ports.timer.sleep(ms),
            None => Box::pin(future::pending()),
        };
        let mut idle = idle.fuse();

        select! {
            result = fut => result,
            _ = idle => Err(ChatError::Timeout(idle_ms.unwrap_or_default())),
            _ = cancel => Err(ChatError::Cancelled),
        }
    }
}
