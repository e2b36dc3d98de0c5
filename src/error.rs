use thiserror::Error;

/// The four error kinds surfaced to clients (spec §7). Internal library code
/// keeps speaking `anyhow::Result`; this is the boundary type the query
/// façade converts into before building an `ErrorResponse`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UpstreamFailure(String),

    #[error("{0}")]
    ConfigMissing(String),
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::UpstreamFailure(format!("store failure: {err}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamFailure(format!("upstream request failed: {err}"))
    }
}

impl AppError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<AppError> for crate::models::ErrorResponse {
    fn from(err: AppError) -> Self {
        crate::models::ErrorResponse::new(err.message())
    }
}
