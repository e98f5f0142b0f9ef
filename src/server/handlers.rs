//! HTTP request handlers for the upload service

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::{AppState, UploadError};
use crate::naming::transliterate;
use crate::progress::human_file_size;
use crate::rewrite::ArchiveRewriter;

/// Path of the conversion endpoint.
pub const CONVERT_ENDPOINT: &str = "/api/convert";

/// Media type of the returned archive.
pub const EPUB_MEDIA_TYPE: &str = "application/epub+zip";

/// Uploaded file as received.
struct Upload {
    file_name: String,
    data: axum::body::Bytes,
}

/// Convert an uploaded EPUB and return it as a download.
///
/// Validation happens in a fixed order before any archive processing:
/// field present, file name non-empty, size within the ceiling, `.epub`
/// suffix.
pub async fn convert_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, UploadError> {
    let mut multipart = multipart.map_err(|_| UploadError::MissingFile)?;
    let limit = state.upload.max_upload_bytes;

    let upload = read_upload(&mut multipart, &state.upload.field_name, limit)
        .await?
        .ok_or(UploadError::MissingFile)?;

    if upload.file_name.is_empty() {
        return Err(UploadError::EmptyFileName);
    }
    if upload.data.len() as u64 > limit {
        return Err(UploadError::TooLarge { limit });
    }
    if !has_suffix(&upload.file_name, &state.upload.expected_suffix) {
        return Err(UploadError::WrongType);
    }

    let context = Arc::clone(&state.context);
    let Upload { file_name, data } = upload;
    let (download_name, bytes) =
        tokio::task::spawn_blocking(move || -> crate::Result<(String, Vec<u8>)> {
            let (_result, bytes) = ArchiveRewriter::new(&context).rewrite_to_vec(&data)?;
            let download_name = transliterate(&context, &file_name)?;
            Ok((download_name, bytes))
        })
        .await
        .map_err(|_| UploadError::Worker)??;

    tracing::info!("Converted successfully. File: {}", download_name);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(EPUB_MEDIA_TYPE)),
            (header::CONTENT_DISPOSITION, content_disposition(&download_name)),
        ],
        bytes,
    )
        .into_response())
}

async fn read_upload(
    multipart: &mut Multipart,
    field_name: &str,
    limit: u64,
) -> Result<Option<Upload>, UploadError> {
    let to_upload_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge { limit }
        } else {
            UploadError::Malformed
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(to_upload_error)? {
        if field.name() != Some(field_name) {
            continue;
        }
        // A part without a filename parameter is a form value, not a file
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await.map_err(to_upload_error)?;
        return Ok(Some(Upload { file_name, data }));
    }

    Ok(None)
}

fn has_suffix(file_name: &str, suffix: &str) -> bool {
    file_name.len() > suffix.len()
        && file_name
            .get(file_name.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// Builds an attachment disposition, with an RFC 5987 name for non-ASCII.
fn content_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let value = if file_name.is_ascii() && fallback == file_name {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(file_name)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Body of the limits endpoint.
#[derive(Serialize)]
pub struct Limits {
    limit: u64,
    limit_human_readable: String,
    endpoint: &'static str,
}

/// Upload limits for the front end
pub async fn limits(State(state): State<Arc<AppState>>) -> Json<Limits> {
    let limit = state.upload.max_upload_bytes;
    Json(Limits {
        limit,
        limit_human_readable: human_file_size(limit),
        endpoint: CONVERT_ENDPOINT,
    })
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
