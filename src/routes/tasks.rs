use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskDto, TaskPayload},
    usecase::TaskUsecase,
};
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// Retrieves all tasks.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of tasks, or a message when there are none.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `500 Internal Server Error`: For persistence faults or a corrupt record.
pub async fn get_tasks(
    usecase: web::Data<TaskUsecase>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    log::debug!("listing tasks for {}", user.0.username);
    let tasks = usecase.get_all().await?;

    if tasks.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({
            "message": "There are no tasks yet"
        })));
    }

    let dtos: Vec<TaskDto> = tasks.iter().map(TaskDto::from).collect();
    Ok(HttpResponse::Ok().json(dtos))
}

/// Creates a new task.
///
/// The identifier on the payload is ignored; the repository assigns a fresh
/// one, returned in the response.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created task as JSON.
/// - `400 Bad Request`: If the title is empty, the due date does not parse as
///   `DD-MM-YYYY`, or the status is not one of the enumerated values.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `500 Internal Server Error`: For persistence faults.
pub async fn create_task(
    usecase: web::Data<TaskUsecase>,
    payload: web::Json<TaskPayload>,
) -> Result<impl Responder, AppError> {
    let task = usecase.add(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(TaskDto::from(&task)))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: Returns the task as JSON.
/// - `400 Bad Request`: If the identifier is malformed.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `404 Not Found`: If no task has the given ID.
pub async fn get_task(
    usecase: web::Data<TaskUsecase>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = usecase.get_by_id(&task_id).await?;
    Ok(HttpResponse::Ok().json(TaskDto::from(&task)))
}

/// Updates an existing task. Requires the admin role.
///
/// The full record is replaced; the identifier is preserved.
///
/// ## Responses:
/// - `200 OK`: Returns the updated task as JSON.
/// - `400 Bad Request`: Malformed identifier, due date, or status.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `403 Forbidden`: If the caller does not hold the admin role.
/// - `404 Not Found`: If no task has the given ID.
/// - `500 Internal Server Error`: For persistence faults.
pub async fn update_task(
    usecase: web::Data<TaskUsecase>,
    task_id: web::Path<String>,
    payload: web::Json<TaskPayload>,
) -> Result<impl Responder, AppError> {
    let task = usecase.update(&task_id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaskDto::from(&task)))
}

/// Deletes a task by its ID. Requires the admin role.
///
/// ## Responses:
/// - `200 OK`: On successful deletion.
/// - `400 Bad Request`: If the identifier is malformed.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `403 Forbidden`: If the caller does not hold the admin role.
/// - `404 Not Found`: If no task has the given ID.
pub async fn delete_task(
    usecase: web::Data<TaskUsecase>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    usecase.delete(&task_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully"
    })))
}
