//! HTTP error handling with builder pattern for dynamic error responses.

use std::borrow::Cow;
use std::fmt;

use arkiv_opendal::StorageError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// A specialized [`Result`] type for HTTP handlers.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Enumeration of the HTTP error kinds this API can produce.
///
/// Each variant corresponds to one HTTP status code; the storage error
/// taxonomy maps onto these via [`From<StorageError>`].
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400 Bad Request - malformed caller input.
    BadRequest,
    /// 404 Not Found - no object under the requested key.
    NotFound,
    /// 413 Payload Too Large - upload exceeds the configured limit.
    PayloadTooLarge,
    /// 500 Internal Server Error - unexpected failure.
    #[default]
    InternalServerError,
    /// 502 Bad Gateway - the object store is unreachable or refused us.
    BadGateway,
    /// 507 Insufficient Storage - the backend reported a quota limit.
    InsufficientStorage,
}

impl ErrorKind {
    /// Returns the HTTP status code for this kind.
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadGateway => StatusCode::BAD_GATEWAY,
            Self::InsufficientStorage => StatusCode::INSUFFICIENT_STORAGE,
        }
    }

    /// Returns the wire identifier for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::PayloadTooLarge => "payload_too_large",
            Self::InternalServerError => "internal_server_error",
            Self::BadGateway => "store_unavailable",
            Self::InsufficientStorage => "quota_exceeded",
        }
    }

    /// Returns the default user-facing message for this kind.
    const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "The request could not be processed due to invalid data",
            Self::NotFound => "The requested file was not found",
            Self::PayloadTooLarge => "The uploaded file exceeds the maximum allowed size",
            Self::InternalServerError => "An unexpected error occurred",
            Self::BadGateway => "The storage backend is currently unavailable",
            Self::InsufficientStorage => "The storage backend reported a capacity limit",
        }
    }

    /// Converts this kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error {
        Error::new(self)
    }

    /// Creates an [`Error`] with a custom user-facing message.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_message(message)
    }

    /// Creates an [`Error`] with internal context.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_context(context)
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}

/// The error type for HTTP handlers.
#[derive(Debug, Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error {
    kind: ErrorKind,
    message: Option<Cow<'static, str>>,
    context: Option<Cow<'static, str>>,
}

impl Error {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: None,
        }
    }

    /// Sets a custom user-facing message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches internal context, logged but never sent to the client.
    #[inline]
    pub fn with_context(mut self, context: impl Into<Cow<'static, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the user-facing message.
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind.as_str(), self.kind.status(), self.message())?;

        if let Some(ref context) = self.context {
            write!(f, " - {context}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let kind = match &err {
            StorageError::InvalidInput(_) => ErrorKind::BadRequest,
            StorageError::NotFound(_) => ErrorKind::NotFound,
            StorageError::Unavailable { .. } => ErrorKind::BadGateway,
            StorageError::QuotaExceeded { .. } => ErrorKind::InsufficientStorage,
            StorageError::Init(_) => ErrorKind::InternalServerError,
            StorageError::Backend { .. } => ErrorKind::BadGateway,
        };

        kind.with_context(err.to_string())
    }
}

/// JSON body sent to clients for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    code: u16,
    message: &'a str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.kind.status();

        if let Some(ref context) = self.context {
            tracing::error!(
                target: "arkiv_server::handler",
                error = self.kind.as_str(),
                status = status.as_u16(),
                context = %context,
                "request failed"
            );
        }

        let body = ErrorBody {
            error: self.kind.as_str(),
            code: status.as_u16(),
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}
