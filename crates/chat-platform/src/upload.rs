//! Multipart attachment uploader.
//!
//! Posts the file as form field `file` to the configured object-store
//! endpoint. When an unsigned `upload_preset` is configured the request goes
//! straight to the store without the app credential; otherwise the backend
//! upload route is used with the bearer attached.

use async_trait::async_trait;
use gloo_net::http::Request;
use js_sys::{Array, Uint8Array};
use serde::Deserialize;
use web_sys::{Blob, BlobPropertyBag, FormData};

use chat_core::auth::AuthState;
use chat_core::ports::UploadPort;
use chat_types::{
    ChatError, Result,
    attachment::{AttachmentFile, UploadedAttachment},
    config::UploadConfig,
};
use crate::http::{authorized, failure_message, js_error};

pub struct HttpAttachmentUploader {
    config: UploadConfig,
    auth: AuthState,
}

impl HttpAttachmentUploader {
    pub fn new(config: UploadConfig, auth: AuthState) -> Self {
        Self { config, auth }
    }

    fn form(&self, file: &AttachmentFile) -> Result<FormData> {
        let form = FormData::new().map_err(|e| ChatError::JsInterop(js_error(e)))?;
        let blob = to_blob(&file.data, &file.mime_type)?;
        form.append_with_blob_and_filename("file", &blob, &file.name)
            .map_err(|e| ChatError::JsInterop(js_error(e)))?;
        if let Some(preset) = &self.config.upload_preset {
            form.append_with_str("upload_preset", preset)
                .map_err(|e| ChatError::JsInterop(js_error(e)))?;
        }
        Ok(form)
    }
}

#[async_trait(?Send)]
impl UploadPort for HttpAttachmentUploader {
    async fn upload(&self, file: &AttachmentFile) -> Result<UploadedAttachment> {
        let form = self.form(file)?;
        let mut builder = Request::post(&self.config.endpoint);
        if self.config.upload_preset.is_none() {
            builder = authorized(builder, &self.auth);
        }

        let response = builder
            .body(form)
            .map_err(|e| ChatError::Upload(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Upload(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Upload(failure_message(response).await));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Upload(e.to_string()))?;
        let url = body
            .into_url()
            .ok_or_else(|| ChatError::Upload("Upload response has no URL".to_string()))?;

        log::info!("Uploaded {} ({} bytes)", file.name, file.size());
        Ok(UploadedAttachment { url, kind: file.kind() })
    }
}

/// Accepted upload replies: the object store answers with `secure_url`,
/// the backend route with `url` or `fileId`.
#[derive(Debug, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub secure_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "fileId")]
    pub file_id: Option<String>,
}

impl UploadResponse {
    pub fn into_url(self) -> Option<String> {
        self.secure_url.or(self.url).or(self.file_id)
    }
}

fn to_blob(data: &[u8], mime_type: &str) -> Result<Blob> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(data));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| ChatError::JsInterop(js_error(e)))
}
