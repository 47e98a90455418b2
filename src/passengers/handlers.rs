use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::ApiError,
    passengers::{
        dto::{PassengerProfile, PassengerUpdate},
        services,
    },
    state::AppState,
};

pub fn passenger_routes() -> Router<AppState> {
    Router::new().route("/passengers/:id", get(get_passenger).patch(patch_passenger))
}

#[instrument(skip(state))]
pub async fn get_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PassengerProfile>, ApiError> {
    Ok(Json(services::load_profile(&state, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn patch_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PassengerUpdate>,
) -> Result<Json<PassengerProfile>, ApiError> {
    Ok(Json(services::update_profile(&state, id, payload).await?))
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use super::*;
    use crate::users::{dto::RegisterRequest, services::register};

    fn passenger_signup() -> RegisterRequest {
        serde_json::from_value(json!({
            "email": "p@x.io",
            "password": "Str0ng!Pass",
            "password2": "Str0ng!Pass",
            "first_name": "Pat",
            "last_name": "Doe",
            "user_type": "passenger",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn patch_changes_only_read_write_fields() {
        let (state, store) = AppState::fake();
        let user = register(&state, passenger_signup()).await.unwrap();
        let mut seeded = store.passenger_for_user(user.id).unwrap();
        seeded.is_verified = true;
        store.put_passenger(seeded.clone());

        let Json(before) = get_passenger(State(state.clone()), Path(seeded.id)).await.unwrap();
        assert_eq!(before.user.id, user.id);
        assert!(before.is_verified);

        let update: PassengerUpdate = serde_json::from_value(json!({
            "is_verified": false,
            "passenger_id": "PSG-00000000",
            "home_address": "221B Baker St",
            "preferred_payment_method": "wallet",
        }))
        .unwrap();
        let Json(after) = patch_passenger(State(state), Path(seeded.id), Json(update))
            .await
            .unwrap();

        assert!(after.is_verified);
        assert_eq!(after.passenger_id, before.passenger_id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.home_address.as_deref(), Some("221B Baker St"));
        assert_eq!(after.preferred_payment_method, "wallet");
        assert_eq!(after.user, before.user);
    }

    #[tokio::test]
    async fn unknown_passenger_is_not_found() {
        let (state, _) = AppState::fake();
        let err = get_passenger(State(state), Path(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
