use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid JSON: {0}")]
    MalformedInput(String),

    #[error("Missing target")]
    MissingTarget,

    #[error("Unknown target: {0}")]
    UnknownTarget(i64),

    #[error("Unknown action: {0}")]
    UnknownActionKind(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl DispatchError {
    /// True for errors caused by the caller's input rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DispatchError::MalformedInput(_)
                | DispatchError::MissingTarget
                | DispatchError::UnknownTarget(_)
                | DispatchError::UnknownActionKind(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
