//! Error types for reel.
//!
//! Two enums live here:
//! - [`TransportError`] is what a transport reports when an exchange fails
//!   before a usable response exists.
//! - [`ApiError`] is the closed taxonomy every pipeline call resolves to.
//!   [`ApiError::from_transport`] and [`ApiError::from_status`] are the two
//!   mapping steps between them.

use std::time::Duration;

use derive_more::Display;

/// Opaque underlying cause carried by the wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// Transport Error
// ============================================================================

/// Raw failure classification produced by an [`HttpClient`](crate::HttpClient).
#[derive(Debug, Display)]
pub enum TransportError {
    /// The connection could not be established in time.
    #[display("connect timed out")]
    TimedOut,

    /// No response head arrived within the request timeout.
    #[display("no response within {_0:?}")]
    RequestTimedOut(Duration),

    /// The response was not complete within the response timeout.
    #[display("response not complete within {_0:?}")]
    ResponseTimedOut(Duration),

    /// An established connection was dropped mid-exchange.
    #[display("connection lost: {_0}")]
    ConnectionLost(BoxError),

    /// The remote host could not be reached at all.
    #[display("not connected: {_0}")]
    NotConnected(BoxError),

    /// Any other transport failure, possibly with an HTTP status attached.
    #[display("transport failure: {cause}")]
    Other {
        /// HTTP status, when the failure happened after the response head.
        status: Option<u16>,
        /// Underlying cause.
        cause: BoxError,
    },

    /// Already classified by an inner layer.
    #[display("{_0}")]
    Classified(ApiError),
}

impl TransportError {
    /// Create an unclassified transport failure without a status.
    #[must_use]
    pub fn other(cause: impl Into<BoxError>) -> Self {
        Self::Other {
            status: None,
            cause: cause.into(),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConnectionLost(cause) | Self::NotConnected(cause) | Self::Other { cause, .. } => {
                Some(cause.as_ref())
            }
            Self::Classified(err) => Some(err),
            Self::TimedOut | Self::RequestTimedOut(_) | Self::ResponseTimedOut(_) => None,
        }
    }
}

impl From<ApiError> for TransportError {
    fn from(err: ApiError) -> Self {
        Self::Classified(err)
    }
}

// ============================================================================
// API Error
// ============================================================================

/// Classified outcome of a failed pipeline call.
///
/// Every variant is terminal: retry bookkeeping lives in the caller's loop,
/// never on the error.
#[derive(Debug, Display)]
pub enum ApiError {
    /// 204, or an encrypted body that is not valid base64.
    #[display("no content available")]
    NoContent,

    /// 400.
    #[display("bad request")]
    BadRequest,

    /// 401.
    #[display("unauthorized")]
    Unauthorized,

    /// 403.
    #[display("forbidden")]
    Forbidden,

    /// 404.
    #[display("not found")]
    NotFound,

    /// 405.
    #[display("method not allowed")]
    MethodNotAllowed,

    /// 409.
    #[display("conflict")]
    Conflict,

    /// 500.
    #[display("internal server error")]
    InternalServerError,

    /// Anything the taxonomy has no dedicated variant for.
    #[display("unknown error: {cause}")]
    Unknown {
        /// HTTP status, if one was observed.
        status: Option<u16>,
        /// Underlying cause.
        cause: BoxError,
    },

    /// The response body could not be decoded into the expected type.
    #[display("decoding error: {_0}")]
    Decoding(BoxError),

    /// Connectivity problems, or a request that could not be built.
    #[display("network error: {_0}")]
    Network(BoxError),

    /// The encrypted response body could not be decrypted.
    #[display("encryption error: {_0}")]
    Encryption(BoxError),

    /// Transport-level timeout.
    #[display("request timeout, please check your connection and try again")]
    Timeout,

    /// No response within the request timeout.
    #[display("request timeout after {} seconds, please try again", _0.as_secs())]
    RequestTimeout(Duration),

    /// Response not complete within the response timeout.
    #[display("response timeout after {} seconds, please try again", _0.as_secs())]
    ResponseTimeout(Duration),
}

/// Result type alias using [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Map a non-success HTTP status to its variant.
    ///
    /// Codes without a dedicated variant become [`ApiError::Unknown`]
    /// carrying the code.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            204 => Self::NoContent,
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            409 => Self::Conflict,
            500 => Self::InternalServerError,
            other => Self::Unknown {
                status: Some(other),
                cause: format!("unexpected HTTP status {other}").into(),
            },
        }
    }

    /// Map a transport failure into the taxonomy.
    ///
    /// Errors that were already classified pass through unchanged.
    #[must_use]
    pub fn from_transport(err: TransportError) -> Self {
        match err {
            TransportError::TimedOut => Self::Timeout,
            TransportError::RequestTimedOut(after) => Self::RequestTimeout(after),
            TransportError::ResponseTimedOut(after) => Self::ResponseTimeout(after),
            TransportError::ConnectionLost(cause) | TransportError::NotConnected(cause) => {
                Self::Network(cause)
            }
            TransportError::Other {
                status: Some(status),
                ..
            } => Self::from_status(status),
            TransportError::Other {
                status: None,
                cause,
            } => Self::Network(cause),
            TransportError::Classified(err) => err,
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(cause: impl Into<BoxError>) -> Self {
        Self::Network(cause.into())
    }

    /// Create a decoding error.
    #[must_use]
    pub fn decoding(cause: impl Into<BoxError>) -> Self {
        Self::Decoding(cause.into())
    }

    /// Create an encryption error.
    #[must_use]
    pub fn encryption(cause: impl Into<BoxError>) -> Self {
        Self::Encryption(cause.into())
    }

    /// Create an unknown error.
    #[must_use]
    pub fn unknown(status: Option<u16>, cause: impl Into<BoxError>) -> Self {
        Self::Unknown {
            status,
            cause: cause.into(),
        }
    }

    /// Returns `true` for the timeout family, the only errors worth retrying.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RequestTimeout(_) | Self::ResponseTimeout(_)
        )
    }

    /// Elapsed threshold carried by the timeout variants.
    #[must_use]
    pub const fn threshold(&self) -> Option<Duration> {
        match self {
            Self::RequestTimeout(after) | Self::ResponseTimeout(after) => Some(*after),
            _ => None,
        }
    }

    /// HTTP status this error stands for, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NoContent => Some(204),
            Self::BadRequest => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::MethodNotAllowed => Some(405),
            Self::Conflict => Some(409),
            Self::InternalServerError => Some(500),
            Self::Unknown { status, .. } => *status,
            _ => None,
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unknown { cause, .. }
            | Self::Decoding(cause)
            | Self::Network(cause)
            | Self::Encryption(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        Self::from_transport(err)
    }
}
