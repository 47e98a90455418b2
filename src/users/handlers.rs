use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{RegisterRequest, RegisteredUser, UserProfile, UserUpdate},
        services,
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/register", post(register))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/:id", get(get_user).patch(patch_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredUser>), ApiError> {
    let user = services::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(RegisteredUser::from(&user))))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state.store.get_user(id).await?;
    Ok(Json(UserProfile::from(&user)))
}

#[instrument(skip(state, payload))]
pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = services::update_user(&state, id, payload).await?;
    Ok(Json(UserProfile::from(&user)))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        extract::FromRequest,
        http::Request,
        response::IntoResponse,
    };
    use serde_json::json;

    use super::*;

    fn body(v: serde_json::Value) -> RegisterRequest {
        serde_json::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn register_returns_created_without_passwords() {
        let (state, store) = AppState::fake();
        let payload = body(json!({
            "email": "a@b.com",
            "password": "Str0ng!Pass",
            "password2": "Str0ng!Pass",
            "first_name": "A",
            "last_name": "B",
            "phone_number": "+1",
            "user_type": "rider",
        }));

        let (status, Json(out)) = register(State(state), Json(payload)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let json = serde_json::to_value(out).unwrap();
        assert_eq!(json["user_type"], "rider");
        assert!(json.get("password").is_none());
        assert!(json.get("password2").is_none());
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn register_mismatch_is_bad_request() {
        let (state, store) = AppState::fake();
        let payload = body(json!({
            "email": "a@b.com",
            "password": "Str0ng!Pass",
            "password2": "different",
            "first_name": "A",
            "last_name": "B",
            "phone_number": "+1",
            "user_type": "rider",
        }));

        let err = register(State(state), Json(payload)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn get_and_patch_user() {
        let (state, _) = AppState::fake();
        let payload = body(json!({
            "email": "a@b.com",
            "password": "Str0ng!Pass",
            "password2": "Str0ng!Pass",
            "first_name": "A",
            "last_name": "B",
        }));
        let user = services::register(&state, payload).await.unwrap();

        let Json(profile) = get_user(State(state.clone()), Path(user.id)).await.unwrap();
        assert_eq!(profile.id, user.id);

        let update: UserUpdate =
            serde_json::from_value(json!({ "last_name": "C", "id": Uuid::new_v4() })).unwrap();
        let Json(updated) = patch_user(State(state), Path(user.id), Json(update))
            .await
            .unwrap();
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.last_name, "C");
        assert_eq!(updated.date_joined, profile.date_joined);
    }

    #[tokio::test]
    async fn patch_with_unknown_user_type_is_field_error() {
        let (state, _) = AppState::fake();
        let payload = body(json!({
            "email": "a@b.com",
            "password": "Str0ng!Pass",
            "password2": "Str0ng!Pass",
            "first_name": "A",
            "last_name": "B",
            "user_type": "rider",
        }));
        let user = services::register(&state, payload).await.unwrap();

        let req = Request::builder()
            .method("PATCH")
            .uri(format!("/users/{}", user.id))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"user_type":"driver"}"#))
            .unwrap();
        let update = Json::<UserUpdate>::from_request(req, &())
            .await
            .expect("unknown choice still decodes");

        let res = patch_user(State(state.clone()), Path(user.id), update)
            .await
            .unwrap_err()
            .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "user_type": ["\"driver\" is not a valid choice."] }));

        let stored = state.store.get_user(user.id).await.unwrap();
        assert_eq!(stored.user_type, crate::users::repo_types::UserType::Rider);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (state, _) = AppState::fake();
        let err = get_user(State(state), Path(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
