//! Board preference routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use todos::LayoutBody;

use crate::routes::auth::AuthUser;
use crate::services::settings::{self, SettingsError};
use crate::state::AppState;

/// `GET /api/settings/layout`
pub async fn get_layout(State(state): State<AppState>, auth: AuthUser) -> Result<Json<LayoutBody>, StatusCode> {
    let layout = settings::get_layout(&state.pool, auth.account.id)
        .await
        .map_err(settings_error_to_status)?;
    Ok(Json(LayoutBody { layout }))
}

/// `PUT /api/settings/layout`
pub async fn put_layout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<LayoutBody>,
) -> Result<Json<LayoutBody>, StatusCode> {
    settings::set_layout(&state.pool, auth.account.id, body.layout)
        .await
        .map_err(settings_error_to_status)?;
    Ok(Json(body))
}

pub(crate) fn settings_error_to_status(err: SettingsError) -> StatusCode {
    match err {
        // Session outlived its user row.
        SettingsError::UserNotFound(_) => StatusCode::UNAUTHORIZED,
        SettingsError::InvalidLayout(raw) => {
            tracing::error!(layout = %raw, "stored layout is invalid");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SettingsError::Database(e) => {
            tracing::error!(error = %e, "settings query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
