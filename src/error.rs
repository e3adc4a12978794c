use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream timed out after {0}")]
    Timeout(String),
    #[error("missing credential: {0}")]
    MissingCredential(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("upstream did not succeed after {attempts} attempts (last status {last_status})")]
    RetriesExhausted { attempts: u32, last_status: String },
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl From<zeromq::ZmqError> for GatewayError {
    fn from(err: zeromq::ZmqError) -> Self {
        GatewayError::Transport(err.to_string())
    }
}
