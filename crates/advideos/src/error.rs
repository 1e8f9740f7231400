//! Video binding error types.

/// Errors produced by [`VideoService`](crate::VideoService) operations.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("graph error: {0}")]
    Graph(#[from] adgraph_client::GraphError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the upload content failed (including a short stream).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered with offsets or fields the upload cannot use.
    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("upload finish rejected by server")]
    FinishRejected,

    #[error("video {0} not found after upload")]
    MissingAfterUpload(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("output channel closed")]
    OutputClosed,

    #[error("cancelled")]
    Cancelled,
}
