//! GetAdmin adapter error types.

use winctl_app::ports::AgentError;

/// Errors specific to the GetAdmin adapter.
#[derive(Debug, thiserror::Error)]
pub enum GetAdminError {
    /// The host does not form a valid URL.
    #[error("invalid agent host `{0}`")]
    InvalidHost(String, #[source] url::ParseError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// The request failed before any status was received.
    #[error("agent request failed")]
    Request(#[source] reqwest::Error),
}

impl GetAdminError {
    /// Convert into an [`AgentError`] for propagation across the port boundary.
    #[must_use]
    pub fn into_agent(self, host: &str) -> AgentError {
        match self {
            Self::Request(err) if err.is_timeout() => AgentError::TimedOut {
                host: host.to_string(),
            },
            Self::Request(err) => AgentError::Unreachable {
                host: host.to_string(),
                source: Box::new(err),
            },
            other => AgentError::InvalidRequest(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_invalid_host() {
        let parse_err = url::Url::parse("http://bad host/").unwrap_err();
        let err = GetAdminError::InvalidHost("bad host".to_string(), parse_err);
        assert_eq!(err.to_string(), "invalid agent host `bad host`");
    }

    #[test]
    fn should_convert_invalid_host_to_invalid_request() {
        let parse_err = url::Url::parse("http://bad host/").unwrap_err();
        let err = GetAdminError::InvalidHost("bad host".to_string(), parse_err);
        assert!(matches!(
            err.into_agent("bad host"),
            AgentError::InvalidRequest(_)
        ));
    }
}
