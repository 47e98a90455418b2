use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::passengers::dto::{PassengerProfile, PassengerUpdate};
use crate::state::AppState;

pub async fn load_profile(st: &AppState, id: Uuid) -> Result<PassengerProfile, ApiError> {
    let passenger = st.store.get_passenger(id).await?;
    let owner = st.store.get_user(passenger.user_id).await?;
    Ok(PassengerProfile::project(&passenger, &owner))
}

pub async fn update_profile(
    st: &AppState,
    id: Uuid,
    mut update: PassengerUpdate,
) -> Result<PassengerProfile, ApiError> {
    let mut passenger = st.store.get_passenger(id).await?;
    update.validate()?;
    update.apply(&mut passenger);

    let saved = st.store.update_passenger(&passenger).await?;
    let owner = st.store.get_user(saved.user_id).await?;
    debug!(passenger_id = %saved.passenger_id, "passenger profile updated");
    Ok(PassengerProfile::project(&saved, &owner))
}
