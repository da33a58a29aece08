//!
//! # Task Use-Case Layer
//!
//! Sits between the delivery layer and the repository; owns no storage.
//! Business-rule validation (due-date format, status values, identifier
//! translation) happens here, before the repository is ever called. All
//! other outcomes delegate unchanged from the repository.

use crate::error::AppError;
use crate::models::{Task, TaskPayload, TaskStatus, DUE_DATE_FORMAT};
use crate::repository::TaskRepository;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct TaskUsecase {
    repo: Arc<dyn TaskRepository>,
}

impl TaskUsecase {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<Task>, AppError> {
        self.repo.get_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Task, AppError> {
        let id = parse_task_id(id)?;
        self.repo.get_by_id(id).await
    }

    /// Validates the payload and asks the repository to store it under a
    /// fresh identifier.
    pub async fn add(&self, payload: TaskPayload) -> Result<Task, AppError> {
        let task = build_task(Uuid::nil(), payload)?;
        self.repo.add(task).await
    }

    /// Validates the payload and replaces the full record under the wire
    /// identifier. The identifier is preserved across the update.
    pub async fn update(&self, id: &str, payload: TaskPayload) -> Result<Task, AppError> {
        let id = parse_task_id(id)?;
        let task = build_task(id, payload)?;
        self.repo.update(task).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = parse_task_id(id)?;
        self.repo.delete(id).await
    }
}

/// Translates the opaque wire identifier into the repository's key type.
/// A conversion failure is the client's fault, never a `NotFound`.
fn parse_task_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::InvalidInput("invalid task id".into()))
}

fn build_task(id: Uuid, payload: TaskPayload) -> Result<Task, AppError> {
    payload.validate()?;

    let due_date = NaiveDate::parse_from_str(&payload.due_date, DUE_DATE_FORMAT).map_err(|_| {
        AppError::InvalidInput("invalid due date format, expected DD-MM-YYYY".into())
    })?;
    let status = payload.status.parse::<TaskStatus>().map_err(|_| {
        AppError::InvalidInput(format!("invalid status '{}'", payload.status))
    })?;

    Ok(Task {
        id,
        title: payload.title,
        description: payload.description,
        due_date,
        status,
    })
}
