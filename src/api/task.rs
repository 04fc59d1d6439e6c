//! Task Endpoints
//!
//! One function per backend route. Every call fails on a non-2xx status.

use gloo::net::http::Request;

use super::{read_json, ApiError};
use crate::config::ApiConfig;
use crate::models::{Task, TaskPayload};

pub async fn list_tasks(config: &ApiConfig) -> Result<Vec<Task>, ApiError> {
    let response = Request::get(&config.list_url()).send().await?;
    read_json(response).await
}

pub async fn create_task(config: &ApiConfig, payload: &TaskPayload) -> Result<Task, ApiError> {
    let response = Request::post(&config.create_url())
        .json(payload)?
        .send()
        .await?;
    read_json(response).await
}

pub async fn update_task(
    config: &ApiConfig,
    id: &str,
    payload: &TaskPayload,
) -> Result<Task, ApiError> {
    let response = Request::put(&config.edit_url(id))
        .json(payload)?
        .send()
        .await?;
    read_json(response).await
}

/// The body is read but its content ignored
pub async fn delete_task(config: &ApiConfig, id: &str) -> Result<(), ApiError> {
    let response = Request::delete(&config.delete_url(id)).send().await?;
    let _: serde_json::Value = read_json(response).await?;
    Ok(())
}
