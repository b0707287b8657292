// rest/routes/tasks.rs — Task CRUD + stats routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::store::{StoreError, StoreStats, Task, TaskPatch};
use crate::AppContext;

type RestError = (StatusCode, Json<Value>);

fn store_error(e: StoreError) -> RestError {
    let status = match e {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::InvalidTitle(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(json!({ "error": e.to_string() })))
}

fn persist_error(e: anyhow::Error) -> RestError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": format!("failed to persist tasks: {e:#}") })),
    )
}

/// Flush the current collection to the task file after a successful mutation.
async fn flush(ctx: &AppContext) -> Result<(), RestError> {
    let snapshot = ctx.store.read().await.list(None);
    ctx.task_file.save(&snapshot).await.map_err(persist_error)
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListQuery {
    pub done: Option<bool>,
}

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Task>> {
    Json(ctx.store.read().await.list(query.done))
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), RestError> {
    let task = ctx
        .store
        .write()
        .await
        .create(&body.title, body.description)
        .map_err(store_error)?;
    flush(&ctx).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, RestError> {
    let task = ctx.store.read().await.get(id).map_err(store_error)?;
    Ok(Json(task))
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<u64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, RestError> {
    let task = ctx
        .store
        .write()
        .await
        .update(id, patch)
        .map_err(store_error)?;
    flush(&ctx).await?;
    Ok(Json(task))
}

pub async fn toggle_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, RestError> {
    let task = ctx.store.write().await.toggle(id).map_err(store_error)?;
    flush(&ctx).await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, RestError> {
    ctx.store.write().await.delete(id).map_err(store_error)?;
    flush(&ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_stats(State(ctx): State<Arc<AppContext>>) -> Json<StoreStats> {
    Json(ctx.store.read().await.stats())
}
