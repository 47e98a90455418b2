use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::ApiError,
    riders::{
        dto::{RiderProfile, RiderUpdate},
        services,
    },
    state::AppState,
};

pub fn rider_routes() -> Router<AppState> {
    Router::new().route("/riders/:id", get(get_rider).patch(patch_rider))
}

#[instrument(skip(state))]
pub async fn get_rider(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RiderProfile>, ApiError> {
    Ok(Json(services::load_profile(&state, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn patch_rider(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RiderUpdate>,
) -> Result<Json<RiderProfile>, ApiError> {
    Ok(Json(services::update_profile(&state, id, payload).await?))
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use super::*;
    use crate::riders::repo_types::VerificationStatus;
    use crate::users::services::register;

    #[tokio::test]
    async fn rider_update_cannot_touch_verification_or_rating() {
        let (state, store) = AppState::fake();
        let signup = serde_json::from_value(json!({
            "email": "a@b.com",
            "password": "Str0ng!Pass",
            "password2": "Str0ng!Pass",
            "first_name": "A",
            "last_name": "B",
            "phone_number": "+1",
            "user_type": "rider",
        }))
        .unwrap();
        let user = register(&state, signup).await.unwrap();

        let mut seeded = store.rider_for_user(user.id).unwrap();
        seeded.verification_status = VerificationStatus::Approved;
        seeded.average_rating = 4.5;
        store.put_rider(seeded.clone());

        let update: RiderUpdate = serde_json::from_value(json!({
            "verification_status": "rejected",
            "average_rating": 5.0,
            "is_available": true,
            "current_latitude": 40.4168,
            "current_longitude": -3.7038,
        }))
        .unwrap();
        let Json(after) = patch_rider(State(state.clone()), Path(seeded.id), Json(update))
            .await
            .unwrap();

        assert_eq!(after.verification_status, VerificationStatus::Approved);
        assert_eq!(after.average_rating, 4.5);
        assert!(after.is_available);
        assert_eq!(after.current_latitude, Some(40.4168));
        assert_eq!(after.user.email, "a@b.com");

        let Json(read) = get_rider(State(state), Path(seeded.id)).await.unwrap();
        assert_eq!(read, after);
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_bad_request() {
        let (state, store) = AppState::fake();
        let signup = serde_json::from_value(json!({
            "email": "r@x.io",
            "password": "Str0ng!Pass",
            "password2": "Str0ng!Pass",
            "first_name": "R",
            "last_name": "X",
            "user_type": "rider",
        }))
        .unwrap();
        let user = register(&state, signup).await.unwrap();
        let rider = store.rider_for_user(user.id).unwrap();

        let update: RiderUpdate =
            serde_json::from_value(json!({ "current_longitude": 200.0 })).unwrap();
        let err = patch_rider(State(state), Path(rider.id), Json(update))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.rider_for_user(user.id).unwrap(), rider);
    }
}
