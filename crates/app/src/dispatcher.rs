//! Command dispatcher: sends one command to one agent and classifies the answer.
//!
//! An offline PC is routine, so no outcome is treated as an error: every
//! result ends up as an info-level log line and nothing is fed back.

use winctl_domain::command::{ActionKind, AgentRequest};

use crate::ports::{AgentError, RemoteAgent};

const HTTP_OK: u16 = 200;

/// How an agent reacted to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The agent answered `200 OK`.
    Success,
    /// The agent answered with another status code.
    UnexpectedStatus(u16),
    /// No answer: connection failed or timed out.
    Unreachable,
}

/// Classify the result of [`RemoteAgent::send`].
#[must_use]
pub fn classify(result: &Result<u16, AgentError>) -> DispatchOutcome {
    match result {
        Ok(HTTP_OK) => DispatchOutcome::Success,
        Ok(status) => DispatchOutcome::UnexpectedStatus(*status),
        Err(_) => DispatchOutcome::Unreachable,
    }
}

/// Sends commands through a [`RemoteAgent`].
pub struct CommandDispatcher<A> {
    agent: A,
}

impl<A: RemoteAgent> CommandDispatcher<A> {
    pub fn new(agent: A) -> Self {
        Self { agent }
    }

    /// Send `command` as `action` to the agent on `host`.
    ///
    /// `display_name` is only used in log lines.
    pub async fn dispatch(
        &self,
        display_name: &str,
        host: &str,
        action: ActionKind,
        command: &str,
    ) -> DispatchOutcome {
        let request = AgentRequest {
            host: host.to_string(),
            action,
            command: command.to_string(),
        };
        tracing::debug!(device = display_name, host, %action, command, "sending request to agent");
        tracing::info!(device = display_name, command, "sending command");

        let result = self.agent.send(&request).await;
        let outcome = classify(&result);
        match (&outcome, &result) {
            (DispatchOutcome::Success, _) => {
                tracing::info!(device = display_name, "agent responded OK");
            }
            (DispatchOutcome::UnexpectedStatus(status), _) => {
                tracing::info!(device = display_name, status, "agent responded with unexpected status");
            }
            (DispatchOutcome::Unreachable, Err(err @ AgentError::InvalidRequest(_))) => {
                tracing::warn!(device = display_name, host, error = %err, "could not build agent request");
            }
            (DispatchOutcome::Unreachable, _) => {
                tracing::info!(device = display_name, "no response from agent, device seems to be off");
            }
        }
        outcome
    }
}
