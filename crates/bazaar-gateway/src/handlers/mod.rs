// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers, grouped by resource.

pub mod messages;
pub mod products;
pub mod public;
pub mod users;

use std::collections::HashMap;

use axum_extra::extract::Multipart;
use bazaar_market::ImageUpload;
use serde::Serialize;

use crate::error::ApiError;

/// `{"status": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const fn new(status: &'static str) -> Self {
        Self { status }
    }
}

/// `{"liked": ...}` body of the like endpoints.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
}

/// Text fields and the optional `image` file of a multipart form.
#[derive(Debug, Default)]
pub(crate) struct FormData {
    fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl FormData {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

/// Drain a multipart body. An `image` part with no bytes counts as absent.
pub(crate) async fn read_form(mut multipart: Multipart) -> Result<FormData, ApiError> {
    let mut form = FormData::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let content_type = field.content_type().map(|ct| ct.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read image: {e}")))?;
            if !bytes.is_empty() {
                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read field {name}: {e}")))?;
            form.fields.insert(name, value);
        }
    }
    Ok(form)
}
