use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::params;
use serde::Deserialize;
use serde_json::json;

use crate::db::models::GalleryItem;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/gallery", get(list_gallery).post(add_item))
        .route("/api/gallery/{id}", axum::routing::delete(delete_item))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRequest {
    pub image_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub book_title: String,
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<GalleryItem> {
    Ok(GalleryItem {
        id: row.get(0)?,
        image_url: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        book_title: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// GET /api/gallery — all items, newest first.
async fn list_gallery(State(state): State<AppState>) -> AppResult<Response> {
    let conn = state.db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, image_url, title, description, book_title, created_at \
         FROM gallery_items ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], row_to_item)?;

    let mut gallery = Vec::new();
    for row in rows {
        gallery.push(row?);
    }

    Ok(Json(json!({ "gallery": gallery })).into_response())
}

/// POST /api/gallery — admin only.
async fn add_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<GalleryRequest>,
) -> AppResult<Response> {
    user.require_admin()?;

    if req.image_url.trim().is_empty() {
        return Err(AppError::BadRequest("image URL is required".into()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let conn = state.db.get()?;
    conn.execute(
        "INSERT INTO gallery_items (id, image_url, title, description, book_title) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, req.image_url.trim(), req.title, req.description, req.book_title],
    )?;

    let item = conn.query_row(
        "SELECT id, image_url, title, description, book_title, created_at \
         FROM gallery_items WHERE id = ?1",
        params![id],
        row_to_item,
    )?;

    Ok((StatusCode::CREATED, Json(item)).into_response())
}

/// DELETE /api/gallery/{id} — admin only.
async fn delete_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    user.require_admin()?;

    let conn = state.db.get()?;
    let deleted = conn.execute("DELETE FROM gallery_items WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "success": true })).into_response())
}
