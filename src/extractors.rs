use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use rusqlite::params;

use crate::error::AppError;
use crate::publishing::Role;
use crate::state::AppState;

/// Represents the currently authenticated user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    /// Reject non-admin callers with the workflow's Forbidden error.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role != Role::Admin {
            return Err(AppError::Forbidden(
                "you do not have permission to perform this action".into(),
            ));
        }
        Ok(())
    }
}

/// Extractor that requires authentication.
/// Returns 401 without a valid session, 403 for a disabled account.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(parts, &state.config.auth.cookie_name)
            .ok_or(AppError::Unauthorized)?;

        let conn = state.db.get()?;
        let (id, email, name, role, active) = conn
            .query_row(
                "SELECT u.id, u.email, u.name, u.role, u.active FROM sessions s \
                 JOIN users u ON u.id = s.user_id \
                 WHERE s.token = ?1 AND s.expires_at > datetime('now')",
                params![token],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Role>(3)?,
                        row.get::<_, bool>(4)?,
                    ))
                },
            )
            .map_err(|_| AppError::Unauthorized)?;

        if !active {
            return Err(AppError::Forbidden("account disabled".into()));
        }

        Ok(CurrentUser {
            id,
            email,
            name,
            role,
        })
    }
}

/// Optional user extractor — returns None instead of 401 when not
/// authenticated. A disabled account still fails with 403.
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(AppError::Forbidden(msg)) => Err(AppError::Forbidden(msg)),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}

fn extract_session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == cookie_name {
                Some(val.to_string())
            } else {
                None
            }
        })
}
