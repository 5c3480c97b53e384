//! # winctl-adapter-getadmin
//!
//! Implements the `RemoteAgent` port for the GetAdmin remote-control agent.
//!
//! Each agent is an HTTP listener on a Windows PC. A command is a single
//! `GET http://<host>:<port>/?<action>=<command>` without body, headers or
//! TLS; the agent answers `200 OK` when it ran the command.
//!
//! ## Dependency rule
//!
//! Depends on `winctl-app` (port traits) and `winctl-domain` only, plus
//! `reqwest`, `url` and `percent-encoding` for HTTP.

pub mod config;
pub mod error;

use std::future::Future;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use winctl_app::ports::{AgentError, RemoteAgent};
use winctl_domain::command::AgentRequest;

pub use config::GetAdminConfig;
pub use error::GetAdminError;

/// Everything but the unreserved characters of RFC 3986.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// HTTP client for GetAdmin agents.
#[derive(Debug, Clone)]
pub struct GetAdminClient {
    http: reqwest::Client,
    config: GetAdminConfig,
}

impl GetAdminClient {
    /// Build a client whose requests time out after `config.timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`GetAdminError::ClientBuild`] if the HTTP client cannot be
    /// created.
    pub fn new(config: GetAdminConfig) -> Result<Self, GetAdminError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(GetAdminError::ClientBuild)?;
        Ok(Self { http, config })
    }

    /// Use an existing HTTP client; its own timeout applies.
    #[must_use]
    pub fn with_client(config: GetAdminConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    /// The URL `request` is sent to.
    ///
    /// The command is percent-encoded, a space becoming `%20` rather than
    /// the form-encoded `+`, which the agent would pass through verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`GetAdminError::InvalidHost`] when the host does not form a
    /// valid URL.
    pub fn request_url(&self, request: &AgentRequest) -> Result<Url, GetAdminError> {
        let host = if request.host.contains(':') && !request.host.starts_with('[') {
            format!("[{}]", request.host)
        } else {
            request.host.clone()
        };
        let mut url = Url::parse(&format!("http://{host}:{}/", self.config.port))
            .map_err(|err| GetAdminError::InvalidHost(request.host.clone(), err))?;
        let value = utf8_percent_encode(&request.command, QUERY_VALUE);
        url.set_query(Some(&format!("{}={value}", request.action.as_str())));
        Ok(url)
    }

    async fn execute(&self, request: &AgentRequest) -> Result<u16, GetAdminError> {
        let url = self.request_url(request)?;
        tracing::debug!(%url, "sending request to agent");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(GetAdminError::Request)?;
        Ok(response.status().as_u16())
    }
}

impl RemoteAgent for GetAdminClient {
    fn send(&self, request: &AgentRequest) -> impl Future<Output = Result<u16, AgentError>> + Send {
        async move {
            self.execute(request)
                .await
                .map_err(|err| err.into_agent(&request.host))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winctl_domain::command::ActionKind;

    fn request(host: &str, action: ActionKind, command: &str) -> AgentRequest {
        AgentRequest {
            host: host.to_string(),
            action,
            command: command.to_string(),
        }
    }

    fn client() -> GetAdminClient {
        GetAdminClient::with_client(GetAdminConfig::default(), reqwest::Client::new())
    }

    #[test]
    fn should_build_command_url_on_default_port() {
        let url = client()
            .request_url(&request("192.168.0.101", ActionKind::Cmd, "shutdown"))
            .unwrap();
        assert_eq!(url.as_str(), "http://192.168.0.101:8585/?cmd=shutdown");
    }

    #[test]
    fn should_build_key_url() {
        let url = client()
            .request_url(&request("192.168.0.101", ActionKind::Key, "VK_ESCAPE"))
            .unwrap();
        assert_eq!(url.as_str(), "http://192.168.0.101:8585/?key=VK_ESCAPE");
    }

    #[test]
    fn should_encode_command_value() {
        let url = client()
            .request_url(&request("pc-john.local", ActionKind::Key, "a&b=c"))
            .unwrap();
        assert_eq!(url.as_str(), "http://pc-john.local:8585/?key=a%26b%3Dc");
    }

    #[test]
    fn should_encode_space_as_percent_twenty() {
        let url = client()
            .request_url(&request("pc-john.local", ActionKind::Key, "Hello World+1"))
            .unwrap();
        assert_eq!(url.as_str(), "http://pc-john.local:8585/?key=Hello%20World%2B1");
    }

    #[test]
    fn should_encode_non_ascii_key_as_utf8() {
        let url = client()
            .request_url(&request("pc-john.local", ActionKind::Key, "ä"))
            .unwrap();
        assert_eq!(url.as_str(), "http://pc-john.local:8585/?key=%C3%A4");
    }

    #[test]
    fn should_bracket_ipv6_hosts() {
        let url = client()
            .request_url(&request("fe80::1", ActionKind::Cmd, "reboot"))
            .unwrap();
        assert_eq!(url.as_str(), "http://[fe80::1]:8585/?cmd=reboot");
    }

    #[test]
    fn should_reject_invalid_host() {
        let result = client().request_url(&request("bad host", ActionKind::Cmd, "reboot"));
        assert!(matches!(result, Err(GetAdminError::InvalidHost(host, _)) if host == "bad host"));
    }
}
