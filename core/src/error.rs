use thiserror::Error;

#[derive(Debug, Error)]
pub enum PushError {
    /// The token is no longer registered, or nobody is subscribed to the topic.
    #[error("target is not registered (no device or topic subscribers)")]
    Unregistered,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("FCM API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sender misconfigured: {0}")]
    Config(String),
}
