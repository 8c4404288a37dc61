use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::publishing::Role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{id}/role", post(update_role))
        .route("/api/users/{id}/active", post(set_active))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

#[derive(Deserialize)]
pub struct ActiveRequest {
    pub active: bool,
}

/// GET /api/users — admin only.
async fn list_users(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    user.require_admin()?;

    let conn = state.db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, email, name, role, active, created_at FROM users \
         ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(UserSummary {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role: row.get(3)?,
            active: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;

    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }

    Ok(Json(json!({ "users": users })).into_response())
}

/// POST /api/users/{id}/role — admin only; the one place roles change.
async fn update_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<RoleRequest>,
) -> AppResult<Response> {
    user.require_admin()?;
    let role = req.role.parse::<Role>()?;

    if id == user.id && role != Role::Admin {
        return Err(AppError::BadRequest(
            "admins cannot demote their own account".into(),
        ));
    }

    let conn = state.db.get()?;
    let changed = conn.execute(
        "UPDATE users SET role = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![role, id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = %id, role = %role, "updated user role");
    Ok(Json(json!({ "success": true })).into_response())
}

/// POST /api/users/{id}/active — admin only; enable or disable an account.
async fn set_active(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ActiveRequest>,
) -> AppResult<Response> {
    user.require_admin()?;

    if id == user.id && !req.active {
        return Err(AppError::BadRequest(
            "admins cannot disable their own account".into(),
        ));
    }

    let conn = state.db.get()?;
    let changed = conn.execute(
        "UPDATE users SET active = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![req.active, id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "success": true })).into_response())
}
