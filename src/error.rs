use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the Air Monitors client.
///
/// A request that succeeds but matches nothing is not an error: it comes back
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// Arguments that cannot be turned into a valid request path.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The HTTP exchange failed, or the server answered with a 4xx/5xx status.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 200 whose body is neither JSON nor the "no data" sentinel.
    #[error("Air Monitors returned an unreadable response: {body}")]
    Service {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The payload was valid JSON but did not match the requested type.
    #[error("failed to decode Air Monitors records: {0}")]
    Decode(#[source] serde_json::Error),

    /// Credentials or base URL could not be resolved.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// HTTP status of the failed exchange, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(e) => e.status(),
            Self::Service { .. } => Some(StatusCode::OK),
            _ => None,
        }
    }

    /// Raw response body carried by [`Error::Service`].
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Service { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_exposes_body_and_status() {
        let source = serde_json::from_str::<serde_json::Value>("{not valid json").unwrap_err();
        let err = Error::Service {
            body: "{not valid json".into(),
            source,
        };

        assert_eq!(err.body(), Some("{not valid json"));
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert!(err.to_string().contains("{not valid json"));
    }

    #[test]
    fn invalid_parameter_has_no_status() {
        let err = Error::invalid("sensor list is empty");
        assert!(err.status().is_none());
        assert!(err.body().is_none());
        assert_eq!(err.to_string(), "invalid parameter: sensor list is empty");
    }
}
