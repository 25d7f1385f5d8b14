use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("route waypoints are not in chronological order")]
    UnsortedWaypoints,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
