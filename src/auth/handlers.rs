use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::session;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::publishing::Role;
use crate::state::AppState;

const MIN_PASSWORD_CHARS: usize = 8;

// -- Request/Response types --

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

// -- Cookie helpers --

fn session_cookie(cookie_name: &str, token: &str, max_age_hours: u64) -> String {
    let max_age_secs = max_age_hours * 3600;
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        cookie_name, token, max_age_secs
    )
}

fn clear_session_cookie(cookie_name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", cookie_name)
}

fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val.to_string())
            } else {
                None
            }
        })
}

// -- Handlers --

/// POST /auth/signup — create a reader account and start a session.
/// Every signup is a reader; staff roles are granted by an admin later.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<Response> {
    let email = req.email.trim().to_lowercase();
    if email.len() < 3 || !email.contains('@') {
        return Err(AppError::BadRequest("a valid email is required".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::BadRequest(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }

    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or("reader").to_string());

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hash failed: {}", e)))?;

    let id = uuid::Uuid::now_v7().to_string();
    let conn = state.db.get()?;
    conn.execute(
        "INSERT INTO users (id, email, name, password_hash) VALUES (?1, ?2, ?3, ?4)",
        params![id, email, name, password_hash],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            AppError::BadRequest("email is already registered".into())
        }
        other => other.into(),
    })?;
    drop(conn);

    let token = session::create_session(&state.db, &id, state.config.auth.session_hours)?;
    let cookie = session_cookie(
        &state.config.auth.cookie_name,
        &token,
        state.config.auth.session_hours,
    );

    tracing::info!(user_id = %id, "new account registered");

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(SessionUser {
            id,
            email,
            name,
            role: Role::Reader,
        }),
    )
        .into_response())
}

/// POST /auth/login — verify credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Response> {
    let email = req.email.trim().to_lowercase();

    let conn = state.db.get()?;
    let row = conn.query_row(
        "SELECT id, name, password_hash, role, active FROM users WHERE email = ?1",
        params![email],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Role>(3)?,
                row.get::<_, bool>(4)?,
            ))
        },
    );
    drop(conn);

    let (id, name, password_hash, role, active) = match row {
        Ok(row) => row,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(AppError::Unauthorized),
        Err(e) => return Err(e.into()),
    };

    if !bcrypt::verify(&req.password, &password_hash).unwrap_or(false) {
        return Err(AppError::Unauthorized);
    }
    if !active {
        return Err(AppError::Forbidden("account disabled".into()));
    }

    let token = session::create_session(&state.db, &id, state.config.auth.session_hours)?;
    let cookie = session_cookie(
        &state.config.auth.cookie_name,
        &token,
        state.config.auth.session_hours,
    );

    Ok((
        StatusCode::OK,
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(SessionUser {
            id,
            email,
            name,
            role,
        }),
    )
        .into_response())
}

/// POST /auth/logout — drop the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(token) = get_cookie_value(&headers, &state.config.auth.cookie_name) {
        session::delete_session(&state.db, &token)?;
    }

    Ok((
        StatusCode::OK,
        AppendHeaders([(
            header::SET_COOKIE,
            clear_session_cookie(&state.config.auth.cookie_name),
        )]),
        Json(json!({ "success": true })),
    )
        .into_response())
}

/// GET /auth/me — the authenticated user, or 401.
pub async fn me(user: CurrentUser) -> Json<SessionUser> {
    Json(SessionUser {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    })
}
