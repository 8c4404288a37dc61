use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, MaybeUser};
use crate::publishing::{
    Author, ModerationAction, NewPost, PostQuery, PostRepository, PostSort, PostStatus, Role,
    SqlitePostRepository,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/posts/{id}/status", post(change_status))
}

const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(Deserialize)]
pub struct ListParams {
    pub genre: Option<String>,
    pub author: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

/// Post payload shared by create and update. Status and action values
/// arrive as strings so bad values get a 400, not a deserializer reject.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub title: String,
    pub author: Option<String>,
    pub content: String,
    pub rating: f64,
    pub genre: Vec<String>,
    pub cover_image: Option<String>,
    pub publication_year: Option<i32>,
    pub slug: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusChange {
    pub action: String,
}

impl PostPayload {
    fn into_new_post(self) -> Result<NewPost, AppError> {
        let status = match self.status.as_deref() {
            Some(s) => Some(s.parse::<PostStatus>()?),
            None => None,
        };
        Ok(NewPost {
            title: self.title,
            author_name: self.author,
            content: self.content,
            rating: self.rating,
            genres: self.genre,
            cover_image: self.cover_image,
            publication_year: self.publication_year,
            slug: self.slug,
            status,
        })
    }
}

fn author_of(user: &CurrentUser) -> Author {
    Author {
        id: user.id.clone(),
        name: user.name.clone(),
        role: user.role,
    }
}

/// GET /api/posts — published posts for everyone; staff may pass
/// `status` to see drafts and the review queue (editors only their own).
async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    maybe_user: MaybeUser,
) -> AppResult<Response> {
    let sort = match params.sort.as_deref() {
        Some("popular") => PostSort::Popular,
        _ => PostSort::Latest,
    };

    let mut query = PostQuery {
        status: Some(PostStatus::Published),
        genre: params.genre,
        author_id: params.author,
        sort,
        limit: params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    };

    if let Some(status) = params.status.as_deref() {
        let user = maybe_user.0.ok_or(AppError::Unauthorized)?;
        if !user.role.is_staff() {
            return Err(AppError::Forbidden(
                "you do not have permission to browse unpublished posts".into(),
            ));
        }

        query.status = match status {
            "all" => None,
            other => Some(other.parse::<PostStatus>()?),
        };
        // Editors only ever see their own pipeline.
        if user.role == Role::Editor {
            query.author_id = Some(user.id);
        }
    }

    let repo = SqlitePostRepository::new(state.db.clone());
    let posts = repo.list(&query).await?;
    Ok(Json(json!({ "posts": posts })).into_response())
}

/// POST /api/posts — create a review. The stored status comes from the
/// workflow gate, never the raw request.
async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<PostPayload>,
) -> AppResult<Response> {
    let repo = SqlitePostRepository::new(state.db.clone());
    let post = repo
        .create(&author_of(&user), payload.into_new_post()?)
        .await?;
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// GET /api/posts/{id} — by id or slug. Unpublished posts are only
/// visible to their author or an admin.
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    maybe_user: MaybeUser,
) -> AppResult<Response> {
    let repo = SqlitePostRepository::new(state.db.clone());
    let post = repo.find(&id).await?.ok_or(AppError::NotFound)?;

    if post.status != PostStatus::Published {
        let can_see = maybe_user
            .0
            .map(|u| u.role == Role::Admin || u.id == post.author_id)
            .unwrap_or(false);
        if !can_see {
            return Err(AppError::NotFound);
        }
    }

    Ok(Json(post).into_response())
}

/// PUT /api/posts/{id} — edit a review; the gate is re-applied to the
/// requested status on every save.
async fn update_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<PostPayload>,
) -> AppResult<Response> {
    let repo = SqlitePostRepository::new(state.db.clone());
    let post = repo
        .update(&author_of(&user), &id, payload.into_new_post()?)
        .await?;
    Ok(Json(post).into_response())
}

/// DELETE /api/posts/{id} — admin only.
async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    user.require_admin()?;

    let repo = SqlitePostRepository::new(state.db.clone());
    if !repo.delete(&id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(post_id = %id, "deleted post");
    Ok(Json(json!({ "success": true })).into_response())
}

/// POST /api/posts/{id}/status — submit / publish / unpublish.
async fn change_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(change): Json<StatusChange>,
) -> AppResult<Response> {
    let action = change.action.parse::<ModerationAction>()?;

    let repo = SqlitePostRepository::new(state.db.clone());

    // Editors may only walk their own posts through the queue.
    if user.role == Role::Editor {
        let post = repo.find(&id).await?.ok_or(AppError::NotFound)?;
        if post.author_id != user.id {
            return Err(AppError::Forbidden(
                "you do not have permission to moderate posts you do not own".into(),
            ));
        }
    }

    let post = repo.moderate(user.role, &id, action).await?;
    Ok(Json(post).into_response())
}
