use thiserror::Error;

#[derive(Error, Debug)]
pub enum JenlogsError {
    #[error("Job or build not found: {job} #{build}")]
    NotFound { job: String, build: u32 },

    #[error("Server requires authentication, supply --user and --token (HTTP 401)")]
    AuthRequired,

    #[error("Server rejected the supplied credentials (HTTP 403)")]
    AuthRejected,

    #[error("Unexpected build description shape: {0}")]
    MalformedResponse(String),

    #[error("Failed to fetch log for node {node_id} ({node_name}): {reason}")]
    FetchFailed {
        node_id: String,
        node_name: String,
        reason: String,
    },

    #[error("Missing configuration: {0}")]
    ConfigMissing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JenlogsError>;
