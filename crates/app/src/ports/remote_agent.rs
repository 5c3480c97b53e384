//! Remote agent port: the HTTP listener running on each controlled PC.

use std::future::Future;

use winctl_domain::command::AgentRequest;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to get any HTTP status back from an agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No connection could be made (host down, refused, DNS failure).
    #[error("agent on {host} is unreachable")]
    Unreachable {
        host: String,
        #[source]
        source: BoxError,
    },

    /// The agent did not answer within the configured timeout.
    #[error("agent on {host} did not answer in time")]
    TimedOut { host: String },

    /// The request could not be built (e.g. a malformed host).
    #[error("invalid agent request")]
    InvalidRequest(#[source] BoxError),
}

/// Sends a single command to a remote agent.
pub trait RemoteAgent {
    /// Send `request` and return the HTTP status code of the answer.
    fn send(&self, request: &AgentRequest) -> impl Future<Output = Result<u16, AgentError>> + Send;
}

impl<T: RemoteAgent + Send + Sync> RemoteAgent for std::sync::Arc<T> {
    fn send(&self, request: &AgentRequest) -> impl Future<Output = Result<u16, AgentError>> + Send {
        (**self).send(request)
    }
}
