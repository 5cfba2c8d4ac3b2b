//! Multipart parsing restricted to a route's declared file fields.

use std::collections::HashMap;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::BytesMut;
use thiserror::Error;

use crate::config::UploadOptions;
use crate::upload::file::{UploadField, UploadedFile};

/// Rejections raised while reading a multipart body.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unexpected file field '{0}'")]
    UnexpectedField(String),

    #[error("too many files for field '{field}' (max {max})")]
    TooManyFiles { field: String, max: usize },

    #[error("file in field '{field}' exceeds {limit} bytes")]
    FileTooLarge { field: String, limit: usize },

    #[error("malformed multipart body: {0}")]
    Malformed(#[from] MultipartError),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::UnexpectedField(_) | UploadError::TooManyFiles { .. } => StatusCode::BAD_REQUEST,
            UploadError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Malformed(err) => err.status(),
        }
    }
}

/// Text parts and accepted files of a multipart body.
#[derive(Debug, Default)]
pub struct MultipartData {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, Vec<UploadedFile>>,
}

/// Drain `multipart`, accepting files only under `fields`.
///
/// Parts without a file name are collected as text fields and are not checked
/// against the declared set.
pub async fn accept_uploads(
    mut multipart: Multipart,
    fields: &[UploadField],
    options: &UploadOptions,
) -> Result<MultipartData, UploadError> {
    let mut data = MultipartData::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let text = field.text().await?;
            data.fields.insert(name, text);
            continue;
        };

        let declared = fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| UploadError::UnexpectedField(name.clone()))?;

        let received = data.files.get(&name).map_or(0, Vec::len);
        if received >= declared.max_count {
            return Err(UploadError::TooManyFiles {
                field: name,
                max: declared.max_count,
            });
        }

        let content_type = field.content_type().map(str::to_string);
        let mut buf = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            if buf.len() + chunk.len() > options.max_file_size_bytes {
                return Err(UploadError::FileTooLarge {
                    field: name,
                    limit: options.max_file_size_bytes,
                });
            }
            buf.extend_from_slice(&chunk);
        }

        tracing::debug!(field = %name, file = %file_name, size = buf.len(), "Accepted upload");
        data.files.entry(name.clone()).or_default().push(UploadedFile {
            field_name: name,
            file_name,
            content_type,
            data: buf.freeze(),
        });
    }

    Ok(data)
}
