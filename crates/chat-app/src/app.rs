//! `ChatClient`: the object the page holds. Composes the adapters, the
//! session and the view model, and bridges every async call to a Promise.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Promise, Uint8Array};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

use chat_core::auth::AuthState;
use chat_core::event_bus::EventBus;
use chat_core::history::HistoryStore;
use chat_core::ports::StoragePort;
use chat_core::session::{ConversationSession, SendRequest, SessionPorts};
use chat_platform::auth::{AuthService, Registration};
use chat_platform::conversations::HttpConversationApi;
use chat_platform::storage::auto_detect_storage;
use chat_platform::timer::GlooTimer;
use chat_platform::transport::HttpChatTransport;
use chat_platform::upload::HttpAttachmentUploader;
use chat_types::attachment::AttachmentFile;
use chat_types::config::ClientConfig;
use chat_types::ChatError;
use chat_view::state::ChatView;

use crate::config::load_config;

struct Inner {
    config: ClientConfig,
    storage: Rc<dyn StoragePort>,
    auth: Rc<AuthService>,
    conversations: Rc<HttpConversationApi>,
    history: HistoryStore,
    session: ConversationSession,
    view: Rc<RefCell<ChatView>>,
}

#[wasm_bindgen]
pub struct ChatClient {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl ChatClient {
    /// Build a client. `config_json` overrides (and replaces) the stored
    /// configuration. A persisted credential is restored before resolving.
    pub async fn create(config_json: Option<String>) -> Result<ChatClient, JsValue> {
        let storage = auto_detect_storage();
        let config = load_config(storage.as_ref(), config_json.as_deref())
            .await
            .map_err(to_js)?;

        let auth_state = AuthState::new();
        let history = HistoryStore::new();
        let event_bus = EventBus::new();
        let view = Rc::new(RefCell::new(ChatView::new()));

        {
            let view = view.clone();
            event_bus.subscribe(move |event| view.borrow_mut().apply(event.clone()));
        }

        let conversations = Rc::new(HttpConversationApi::new(config.api.clone(), auth_state.clone()));
        let ports = SessionPorts {
            transport: Rc::new(HttpChatTransport::new(config.api.clone(), auth_state.clone())),
            uploader: Rc::new(HttpAttachmentUploader::new(config.upload.clone(), auth_state.clone())),
            conversations: conversations.clone(),
            timer: Rc::new(GlooTimer),
        };
        let session = ConversationSession::new(
            ports,
            config.clone(),
            auth_state.clone(),
            history.clone(),
            event_bus.clone(),
        );
        let auth = Rc::new(AuthService::new(
            config.api.clone(),
            auth_state,
            storage.clone(),
            history.clone(),
        ));

        let inner = Rc::new(Inner {
            config,
            storage,
            auth,
            conversations,
            history,
            session,
            view,
        });

        if let Ok(Some(user)) = inner.auth.restore().await {
            log::info!("Restored session for {}", user.email);
            if let Err(e) = inner.history.load(inner.conversations.as_ref()).await {
                log::warn!("History load failed: {}", e);
            }
        }

        log::info!(
            "Chat client ready (storage: {}, mode: {:?})",
            inner.storage.backend_name(),
            inner.config.session.mode
        );
        Ok(ChatClient { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn authenticated(&self) -> bool {
        self.inner.auth.is_authenticated()
    }

    pub fn login(&self, email: String, password: String) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.auth.login(&email, &password).await.map_err(to_js)?;
            inner.view.borrow_mut().dismiss_auth_prompt();
            if let Err(e) = inner.history.load(inner.conversations.as_ref()).await {
                log::warn!("History load failed: {}", e);
            }
            Ok(JsValue::TRUE)
        })
    }

    pub fn register(
        &self,
        email: String,
        username: Option<String>,
        password: String,
        name: String,
    ) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let registration = Registration::new(&email, username.as_deref(), &password, &name);
            let user = inner.auth.register(&registration).await.map_err(to_js)?;
            to_value(&user)
        })
    }

    /// Sign out: aborts any reply in flight, waits for it to settle and
    /// forgets the conversation.
    pub fn logout(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.session.close().await;
            inner.auth.logout().await.map_err(to_js)?;
            inner.view.borrow_mut().clear();
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn current_user(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let user = inner.auth.current_user().await.map_err(to_js)?;
            to_value(&user)
        })
    }

    /// Send a turn. `file` is an optional `File` from an input or a drop.
    /// Resolves to the index of the assistant message.
    pub fn send_message(&self, text: String, file: Option<web_sys::File>) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let mut request = SendRequest::text(text);
            if let Some(file) = file {
                request = request.with_file(read_file(&file).await?);
            }
            let index = inner.session.send_message(request).await.map_err(to_js)?;
            Ok(JsValue::from_f64(index as f64))
        })
    }

    /// Abort the reply in flight. Returns false when idle.
    pub fn cancel(&self) -> bool {
        self.inner.session.cancel_handle().cancel()
    }

    pub fn open_conversation(&self, id: String) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.session.open(&id).await.map_err(to_js)?;
            inner.view.borrow_mut().conversation_id = Some(id);
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn new_conversation(&self) -> Result<(), JsValue> {
        self.inner.session.reset().map_err(to_js)?;
        self.inner.view.borrow_mut().clear();
        Ok(())
    }

    pub fn refresh_history(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let count = inner
                .history
                .load(inner.conversations.as_ref())
                .await
                .map_err(to_js)?;
            Ok(JsValue::from_f64(count as f64))
        })
    }

    pub fn history(&self) -> Result<JsValue, JsValue> {
        to_value(&self.inner.history.list())
    }

    pub fn messages(&self) -> Result<JsValue, JsValue> {
        to_value(&self.inner.session.messages())
    }

    /// Snapshot of the view model
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_value(&*self.inner.view.borrow())
    }

    /// Queued notices; each is returned once
    pub fn take_notifications(&self) -> Result<JsValue, JsValue> {
        let notices = self.inner.view.borrow_mut().take_notifications();
        to_value(&notices)
    }

    pub fn dismiss_auth_prompt(&self) {
        self.inner.view.borrow_mut().dismiss_auth_prompt();
    }

    pub fn use_suggestion(&self, index: usize) -> Option<String> {
        let mut view = self.inner.view.borrow_mut();
        view.use_suggestion(index).then(|| view.input_text.clone())
    }

    #[wasm_bindgen(getter)]
    pub fn busy(&self) -> bool {
        self.inner.session.is_busy()
    }
}

async fn read_file(file: &web_sys::File) -> Result<AttachmentFile, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let data = Uint8Array::new(&buffer).to_vec();
    Ok(AttachmentFile::new(file.name(), file.type_(), data))
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    JsValue::from_serde(value).map_err(|e| to_js(ChatError::from(e)))
}

fn to_js(e: ChatError) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}
