use dispatch_core::protocol::{Command, ErrorBody, TargetList};
use dispatch_core::Target;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_URL: &str = "http://localhost:9000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Decode(#[from] std::io::Error),
}

/// Blocking client for the commander side of the server.
pub struct CommanderClient {
    agent: ureq::Agent,
    endpoint: String,
}

impl CommanderClient {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self {
            agent,
            endpoint: format!("{}/api/set_next_action", base_url.trim_end_matches('/')),
        }
    }

    pub fn go_to_nearest(&self) -> Result<(), ClientError> {
        self.send(Command::GoToNearest).map(|_| ())
    }

    pub fn go_to_target(&self, target_id: i64) -> Result<(), ClientError> {
        self.send(Command::GoToTarget(target_id)).map(|_| ())
    }

    /// Targets from the driver's latest report, nearest first.
    pub fn get_all_targets(&self) -> Result<Vec<Target>, ClientError> {
        let response = self.send(Command::GetAllTargets)?;
        let list: TargetList = response.into_json()?;
        Ok(list.targets)
    }

    fn send(&self, command: Command) -> Result<ureq::Response, ClientError> {
        tracing::debug!(?command, endpoint = %self.endpoint, "sending command");
        match self.agent.post(&self.endpoint).send_json(command.to_body()) {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, response)) => {
                let message = response
                    .into_json::<ErrorBody>()
                    .map(|b| b.error)
                    .unwrap_or_else(|e| format!("unreadable error body: {e}"));
                Err(ClientError::Rejected { status, message })
            }
            Err(ureq::Error::Transport(t)) => Err(ClientError::Transport(t.to_string())),
        }
    }
}
