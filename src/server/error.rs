//! Upload failures and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::progress::human_file_size;
use crate::{Error, ErrorKind};

/// Why an upload request failed.
///
/// Validation failures carry a message for the client. Pipeline failures
/// only expose their [`ErrorKind`] label.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The multipart field is absent.
    #[error("No file is specified.")]
    MissingFile,
    /// The file name is empty.
    #[error("No file name.")]
    EmptyFileName,
    /// The file exceeds the ceiling.
    #[error("File is too large. Maximum file size is {}", human_file_size(*.limit))]
    TooLarge {
        /// The configured ceiling in bytes.
        limit: u64,
    },
    /// The file name does not end with the expected suffix.
    #[error("Not an epub document")]
    WrongType,
    /// The multipart body could not be parsed.
    #[error("Malformed upload")]
    Malformed,
    /// The rewrite failed.
    #[error("{}", .0.kind())]
    Rewrite(#[from] Error),
    /// The worker running the rewrite did not complete.
    #[error("conversion worker failed")]
    Worker,
}

impl UploadError {
    /// Returns the kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFile
            | Self::EmptyFileName
            | Self::TooLarge { .. }
            | Self::WrongType
            | Self::Malformed => ErrorKind::Validation,
            Self::Rewrite(e) => e.kind(),
            Self::Worker => ErrorKind::Internal,
        }
    }

    /// Returns the response status code.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::EmptyFileName | Self::Malformed => StatusCode::BAD_REQUEST,
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::WrongType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Rewrite(_) | Self::Worker => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message sent to the client.
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Validation => self.to_string(),
            kind => kind.label().to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: bool,
    error: String,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            match &self {
                Self::Rewrite(e) => tracing::error!("Conversion failed: {}", e),
                other => tracing::error!("Conversion failed: {}", other),
            }
        }

        let body = ErrorBody {
            status: false,
            error: self.client_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_statuses() {
        assert_eq!(UploadError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(UploadError::EmptyFileName.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            UploadError::TooLarge { limit: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            UploadError::WrongType.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(UploadError::WrongType.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_too_large_message() {
        let err = UploadError::TooLarge {
            limit: 20 * 1024 * 1024,
        };
        assert_eq!(
            err.client_message(),
            "File is too large. Maximum file size is 20.0 MiB"
        );
    }

    #[test]
    fn test_rewrite_failure_hides_detail() {
        let err = UploadError::from(Error::conversion("secret/path.html", "internal detail"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "ConversionError");

        let err = UploadError::from(Error::Zip(zip::result::ZipError::FileNotFound));
        assert_eq!(err.client_message(), "ArchiveError");
    }

    #[test]
    fn test_worker_failure_label() {
        assert_eq!(UploadError::Worker.client_message(), "InternalError");
        assert_eq!(
            UploadError::Worker.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
