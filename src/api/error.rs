#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// The request never produced a response.
    Network,
    /// The server answered with a non-2xx status.
    Rejected { status: u16 },
    /// A 2xx response whose body did not match the expected shape.
    Decode,
}

/// A failed API call.
///
/// `message` is always safe to show to the user. Auth endpoints carry the
/// server's `error` field when present; note endpoints use a fixed message per call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: message.into(),
        }
    }

    pub(crate) fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Rejected { status },
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ApiErrorKind::Rejected { status } => Some(status),
            _ => None,
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Failure below HTTP: DNS, connection, CORS, body read.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("transport error: {0}")]
pub(crate) struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self(e.to_string())
    }
}
