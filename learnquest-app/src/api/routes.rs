use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use std::sync::Arc;

use learnquest_core::{CoreError, EarnEvent, Ledger, UserId};

use crate::api::dto::{EarnXpRequest, EarnXpResponse, ErrorBody, SnapshotResponse};

#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
}

/// Header carrying the authenticated user id, set by the identity collaborator
/// in front of this service.
pub const USER_HEADER: &str = "x-user-id";

type ApiError = (StatusCode, Json<ErrorBody>);

fn reject(status: StatusCode, msg: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
}

fn require_user(headers: &HeaderMap) -> Result<UserId, ApiError> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| uuid::Uuid::parse_str(s).ok())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Unauthorized"))
}

fn map_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Unauthorized => reject(StatusCode::UNAUTHORIZED, "Unauthorized"),
        CoreError::Invalid(msg) => reject(StatusCode::BAD_REQUEST, msg),
        CoreError::NotFound(what) => reject(StatusCode::NOT_FOUND, what),
        // Storage detail stays server-side; the caller only learns the kind.
        CoreError::Storage(_) => {
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

pub async fn earn_xp(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<EarnXpRequest>,
) -> Result<Json<EarnXpResponse>, ApiError> {
    let user_id = require_user(&headers)?;
    let event = EarnEvent {
        source: body.source,
        quiz_score: body.quiz_score,
        lesson_id: body.lesson_id,
    };
    let outcome = st
        .ledger
        .report_event(user_id, &event)
        .await
        .map_err(map_core_error)?;
    Ok(Json(EarnXpResponse {
        success: true,
        data: outcome.into(),
    }))
}

pub async fn get_gamification(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SnapshotResponse>, ApiError> {
    let user_id = require_user(&headers)?;
    let snapshot = st
        .ledger
        .snapshot(user_id)
        .await
        .map_err(map_core_error)?;
    Ok(Json(snapshot.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_malformed_identity_is_unauthorized() {
        let headers = HeaderMap::new();
        let (status, _) = require_user(&headers).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, "not-a-uuid".parse().unwrap());
        let (status, _) = require_user(&headers).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn valid_identity_header_is_accepted() {
        let id = uuid::Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, id.to_string().parse().unwrap());
        assert_eq!(require_user(&headers).unwrap(), id);
    }

    #[test]
    fn core_errors_map_to_distinct_statuses_without_storage_detail() {
        let (status, _) = map_core_error(CoreError::Unauthorized);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = map_core_error(CoreError::Invalid("bad score"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) = map_core_error(CoreError::Storage("sqlite connect"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.contains("sqlite"));
    }
}
