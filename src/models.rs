//! Frontend Models
//!
//! Data structures matching the REST backend.

use serde::{Deserialize, Serialize};

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
}

/// Request body for create and update calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub title: String,
    pub is_completed: bool,
}

impl TaskPayload {
    /// Body for a brand new task
    pub fn new_task(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_completed: false,
        }
    }

    /// Same title, completion flag flipped
    pub fn toggled(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            is_completed: !task.is_completed,
        }
    }

    /// New title, completion flag kept
    pub fn renamed(task: &Task, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_completed: task.is_completed,
        }
    }
}

/// Trim user input; `None` when nothing is left
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
