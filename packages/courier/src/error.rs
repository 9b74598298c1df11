use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("History error: {0}")]
    History(#[from] courier_history::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] courier_http::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not read config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
