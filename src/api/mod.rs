//! Backend API Wrappers
//!
//! Frontend bindings to the REST backend, organized by resource.

mod task;

use gloo::net::http::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use task::*;

/// Any way a backend call can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<gloo::net::Error> for ApiError {
    fn from(err: gloo::net::Error) -> Self {
        match err {
            gloo::net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/// Reject non-2xx, then decode the JSON body
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    check_status(response.ok(), response.status())?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn check_status(ok: bool, status: u16) -> Result<(), ApiError> {
    if ok {
        Ok(())
    } else {
        Err(ApiError::Status(status))
    }
}
