//! Sign-in, registration and credential persistence.
//!
//! The bearer token lives in the shared [`AuthState`] for the adapters and
//! is mirrored to storage under [`TOKEN_KEY`] so a reload stays signed in.

use std::rc::Rc;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use web_sys::FormData;

use chat_core::auth::AuthState;
use chat_core::history::HistoryStore;
use chat_core::ports::StoragePort;
use chat_types::{ChatError, Result, config::ApiConfig};
use crate::http::{authorized, failure_message, js_error};

pub const TOKEN_KEY: &str = "chat:token";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: String,
}

impl Registration {
    pub fn new(email: &str, username: Option<&str>, password: &str, name: &str) -> Self {
        let username = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from)
            .unwrap_or_else(|| default_username(email));
        Self {
            email: email.to_string(),
            username,
            password: password.to_string(),
            name: name.to_string(),
        }
    }
}

/// Local part of the email address
pub fn default_username(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

pub struct AuthService {
    api: ApiConfig,
    auth: AuthState,
    storage: Rc<dyn StoragePort>,
    history: HistoryStore,
}

impl AuthService {
    pub fn new(
        api: ApiConfig,
        auth: AuthState,
        storage: Rc<dyn StoragePort>,
        history: HistoryStore,
    ) -> Self {
        Self { api, auth, storage, history }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Exchange credentials for a bearer token and persist it.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let form = FormData::new().map_err(|e| ChatError::JsInterop(js_error(e)))?;
        form.append_with_str("username", email)
            .map_err(|e| ChatError::JsInterop(js_error(e)))?;
        form.append_with_str("password", password)
            .map_err(|e| ChatError::JsInterop(js_error(e)))?;

        let response = Request::post(&self.api.url(&self.api.login_path))
            .body(form)
            .map_err(|e| ChatError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Validation(failure_message(response).await));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let token = body
            .access_token
            .ok_or_else(|| ChatError::Transport("Login response has no access token".to_string()))?;

        self.auth.set_token(token.clone());
        self.storage.set(TOKEN_KEY, &token).await?;
        log::info!("Signed in as {}", email);
        Ok(())
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, registration: &Registration) -> Result<UserProfile> {
        let response = Request::post(&self.api.url(&self.api.register_path))
            .json(registration)
            .map_err(|e| ChatError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Validation(failure_message(response).await));
        }
        response
            .json()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))
    }

    /// Drop the credential everywhere and forget the history listing.
    pub async fn logout(&self) -> Result<()> {
        self.auth.clear();
        self.history.clear();
        self.storage.delete(TOKEN_KEY).await?;
        log::info!("Signed out");
        Ok(())
    }

    pub async fn current_user(&self) -> Result<UserProfile> {
        if !self.auth.is_authenticated() {
            return Err(ChatError::AuthRequired);
        }
        let url = self.api.url(&self.api.current_user_path);
        let response = authorized(Request::get(&url), &self.auth)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        if response.status() == 401 {
            return Err(ChatError::AuthRequired);
        }
        if !response.ok() {
            return Err(ChatError::Transport(failure_message(response).await));
        }
        response
            .json()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))
    }

    /// Reload a persisted credential and check it is still accepted.
    /// Returns `None` when signed out; a rejected credential is discarded.
    pub async fn restore(&self) -> Result<Option<UserProfile>> {
        let Some(token) = self.storage.get(TOKEN_KEY).await? else {
            return Ok(None);
        };
        self.auth.set_token(token);
        match self.current_user().await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                log::warn!("Stored credential rejected: {}", e);
                self.auth.clear();
                self.storage.delete(TOKEN_KEY).await?;
                Ok(None)
            }
        }
    }
}
