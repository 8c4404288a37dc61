use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::params;
use serde::Deserialize;
use serde_json::json;

use crate::db::models::Comment;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

const MAX_COMMENT_CHARS: usize = 1000;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/posts/{id}/comments",
        get(list_comments).post(create_comment),
    )
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

fn row_to_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        user_id: row.get(2)?,
        user_name: row.get(3)?,
        content: row.get(4)?,
        likes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// POST /api/posts/{id}/comments — leave a comment on a post.
async fn create_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> AppResult<Response> {
    let content = req.content.trim().to_string();
    if content.is_empty() || content.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::BadRequest(format!(
            "comment must be between 1 and {} characters",
            MAX_COMMENT_CHARS
        )));
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
        "INSERT INTO comments (id, post_id, user_id, user_name, content) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, post_id, user.id, user.name, content],
    )?;
    conn.execute(
        "UPDATE posts SET comments_count = comments_count + 1 WHERE id = ?1",
        params![post_id],
    )?;

    let comment = conn.query_row(
        "SELECT id, post_id, user_id, user_name, content, likes, created_at, updated_at \
         FROM comments WHERE id = ?1",
        params![id],
        row_to_comment,
    )?;

    Ok((StatusCode::CREATED, Json(comment)).into_response())
}

/// GET /api/posts/{id}/comments — newest first.
async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, post_id, user_id, user_name, content, likes, created_at, updated_at \
         FROM comments WHERE post_id = ?1 ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![post_id], row_to_comment)?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row?);
    }

    Ok(Json(json!({ "comments": comments })).into_response())
}
