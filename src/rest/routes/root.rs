use axum::Json;
use serde_json::{json, Value};

/// Welcome payload with an index of the available endpoints.
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "taskd — task list service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /api/v1/health": "service health and uptime",
            "GET /api/v1/tasks": "list tasks (optional ?done=true|false filter)",
            "POST /api/v1/tasks": "create a task",
            "GET /api/v1/tasks/{id}": "fetch one task",
            "PATCH /api/v1/tasks/{id}": "partially update a task",
            "PATCH /api/v1/tasks/{id}/toggle": "flip a task's completion state",
            "DELETE /api/v1/tasks/{id}": "delete a task",
            "GET /api/v1/stats": "task statistics",
        },
    }))
}
