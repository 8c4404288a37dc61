use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::params;
use serde::Deserialize;
use serde_json::json;

use crate::db::models::Favorite;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/favorites",
        get(list_favorites).post(add_favorite).delete(remove_favorite),
    )
}

/// The user comes from the session; the body only names the post.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub post_id: String,
}

/// POST /api/favorites — favorite a post. At most one per (post, user).
async fn add_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<FavoriteRequest>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post_exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM posts WHERE id = ?1",
        params![req.post_id],
        |row| row.get(0),
    )?;
    if !post_exists {
        return Err(AppError::NotFound);
    }

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO favorites (id, post_id, user_id) VALUES (?1, ?2, ?3)",
        params![id, req.post_id, user.id],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            AppError::BadRequest("already favorited".into())
        }
        other => other.into(),
    })?;
    conn.execute(
        "UPDATE posts SET likes_count = likes_count + 1 WHERE id = ?1",
        params![req.post_id],
    )?;

    let favorite = conn.query_row(
        "SELECT id, post_id, user_id, created_at FROM favorites WHERE id = ?1",
        params![id],
        |row| {
            Ok(Favorite {
                id: row.get(0)?,
                post_id: row.get(1)?,
                user_id: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )?;

    Ok((StatusCode::CREATED, Json(favorite)).into_response())
}

/// GET /api/favorites — the current user's favorites, newest first.
async fn list_favorites(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, post_id, user_id, created_at FROM favorites \
         WHERE user_id = ?1 ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![user.id], |row| {
        Ok(Favorite {
            id: row.get(0)?,
            post_id: row.get(1)?,
            user_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;

    let mut favorites = Vec::new();
    for row in rows {
        favorites.push(row?);
    }

    Ok(Json(json!({ "favorites": favorites })).into_response())
}

/// DELETE /api/favorites — remove the current user's favorite.
async fn remove_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<FavoriteRequest>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let removed = conn.execute(
        "DELETE FROM favorites WHERE post_id = ?1 AND user_id = ?2",
        params![req.post_id, user.id],
    )?;
    if removed == 0 {
        return Err(AppError::NotFound);
    }
    conn.execute(
        "UPDATE posts SET likes_count = likes_count - 1 \
         WHERE id = ?1 AND likes_count > 0",
        params![req.post_id],
    )?;

    Ok(Json(json!({ "success": true })).into_response())
}
