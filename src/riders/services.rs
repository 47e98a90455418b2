use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::riders::dto::{RiderProfile, RiderUpdate};
use crate::state::AppState;

pub async fn load_profile(st: &AppState, id: Uuid) -> Result<RiderProfile, ApiError> {
    let rider = st.store.get_rider(id).await?;
    let owner = st.store.get_user(rider.user_id).await?;
    Ok(RiderProfile::project(&rider, &owner))
}

pub async fn update_profile(
    st: &AppState,
    id: Uuid,
    update: RiderUpdate,
) -> Result<RiderProfile, ApiError> {
    let mut rider = st.store.get_rider(id).await?;
    update.validate()?;
    update.apply(&mut rider);

    let saved = st.store.update_rider(&rider).await?;
    let owner = st.store.get_user(saved.user_id).await?;
    debug!(rider_id = %saved.id, is_available = saved.is_available, "rider profile updated");
    Ok(RiderProfile::project(&saved, &owner))
}
