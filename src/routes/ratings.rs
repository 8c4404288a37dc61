use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use rusqlite::params;
use serde::Deserialize;

use crate::db::models::Rating;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/posts/{id}/rate", post(rate_post))
}

#[derive(Deserialize)]
pub struct RateRequest {
    pub rating: i64,
}

/// POST /api/posts/{id}/rate — rate a post 1..=5. Rating the same post
/// again replaces the previous value.
async fn rate_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
    Json(req): Json<RateRequest>,
) -> AppResult<Response> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::BadRequest("rating must be between 1 and 5".into()));
    }

    let conn = state.db.get()?;
    let post_exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM posts WHERE id = ?1",
        params![post_id],
        |row| row.get(0),
    )?;
    if !post_exists {
        return Err(AppError::NotFound);
    }

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO ratings (id, post_id, user_id, rating) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT (post_id, user_id) DO UPDATE SET \
           rating = excluded.rating, created_at = datetime('now')",
        params![id, post_id, user.id, req.rating],
    )?;

    let rating = conn.query_row(
        "SELECT id, post_id, user_id, rating, created_at FROM ratings \
         WHERE post_id = ?1 AND user_id = ?2",
        params![post_id, user.id],
        |row| {
            Ok(Rating {
                id: row.get(0)?,
                post_id: row.get(1)?,
                user_id: row.get(2)?,
                rating: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )?;

    Ok(Json(rating).into_response())
}
