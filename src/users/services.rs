use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ApiError, ValidationError, BLANK, REQUIRED};
use crate::patch::clean_optional;
use crate::state::AppState;
use crate::store::StoreError;
use crate::users::dto::{RegisterRequest, UserUpdate};
use crate::users::repo_types::{NewUser, User, UserType};

pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const EMAIL_TAKEN: &str = "user with this email already exists.";
pub const PASSWORD_MISMATCH: &str = "Password fields didn't match.";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Sign-up data that passed validation. The confirmation is already gone.
pub struct Registration {
    pub email: String,
    password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub user_type: UserType,
}

fn required_text(
    errors: &mut ValidationError,
    name: &str,
    value: Option<String>,
    trim: bool,
) -> Option<String> {
    match value {
        None => {
            errors.add(name, REQUIRED);
            None
        }
        Some(v) => {
            let v = if trim { v.trim().to_string() } else { v };
            if v.trim().is_empty() {
                errors.add(name, BLANK);
                None
            } else {
                Some(v)
            }
        }
    }
}

/// Field checks first, then the password confirmation once every field is
/// individually valid. Nothing is written.
pub async fn validate_registration(
    st: &AppState,
    req: RegisterRequest,
) -> Result<Registration, ApiError> {
    let mut errors = ValidationError::new();

    let email = required_text(&mut errors, "email", req.email, true).map(|e| normalize_email(&e));
    if let Some(email) = &email {
        if !is_valid_email(email) {
            errors.add("email", INVALID_EMAIL);
        } else if st.store.find_user_by_email(email).await?.is_some() {
            errors.add("email", EMAIL_TAKEN);
        }
    }

    let password = required_text(&mut errors, "password", req.password, false);
    if let Some(password) = &password {
        if let Err(violation) = st.policy.validate(password) {
            for reason in violation.reasons {
                errors.add("password", reason);
            }
        }
    }
    let password2 = required_text(&mut errors, "password2", req.password2, false);
    let first_name = required_text(&mut errors, "first_name", req.first_name, true);
    let last_name = required_text(&mut errors, "last_name", req.last_name, true);

    let user_type = match req.user_type.as_deref() {
        None => UserType::default(),
        Some(raw) => match raw.parse::<UserType>() {
            Ok(t) => t,
            Err(msg) => {
                errors.add("user_type", msg);
                UserType::default()
            }
        },
    };

    match (email, password, password2, first_name, last_name) {
        (Some(email), Some(password), Some(password2), Some(first_name), Some(last_name))
            if errors.is_empty() =>
        {
            if password != password2 {
                return Err(ValidationError::field("password", PASSWORD_MISMATCH).into());
            }
            Ok(Registration {
                email,
                password,
                first_name,
                last_name,
                phone_number: clean_optional(req.phone_number),
                user_type,
            })
        }
        _ => Err(errors.into()),
    }
}

/// Hashes the password and persists the user. The only place plaintext is
/// turned into a stored credential.
pub async fn create_user(st: &AppState, reg: Registration) -> Result<User, ApiError> {
    let password_hash = st.hasher.hash(&reg.password)?;
    let user = st
        .store
        .create_user(NewUser {
            email: reg.email,
            password_hash,
            first_name: reg.first_name,
            last_name: reg.last_name,
            phone_number: reg.phone_number,
            user_type: reg.user_type,
        })
        .await?;
    Ok(user)
}

pub async fn register(st: &AppState, req: RegisterRequest) -> Result<User, ApiError> {
    let reg = validate_registration(st, req).await?;
    let user = create_user(st, reg).await?;
    info!(user_id = %user.id, email = %user.email, user_type = %user.user_type, "user registered");
    Ok(user)
}

pub async fn update_user(st: &AppState, id: Uuid, mut update: UserUpdate) -> Result<User, ApiError> {
    let mut user = st.store.get_user(id).await?;
    update.validate()?;

    if let Some(email) = &update.email {
        if *email != user.email {
            if let Some(other) = st.store.find_user_by_email(email).await? {
                if other.id != id {
                    return Err(ValidationError::field("email", EMAIL_TAKEN).into());
                }
            }
        }
    }

    update.apply(&mut user);
    let saved = match st.store.update_user(&user).await {
        Err(StoreError::EmailTaken) => {
            return Err(ValidationError::field("email", EMAIL_TAKEN).into())
        }
        other => other?,
    };
    debug!(user_id = %saved.id, "user profile updated");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> RegisterRequest {
        RegisterRequest {
            email: Some("a@b.com".into()),
            password: Some("Str0ng!Pass".into()),
            password2: Some("Str0ng!Pass".into()),
            first_name: Some("A".into()),
            last_name: Some("B".into()),
            phone_number: Some("+1".into()),
            user_type: Some("rider".into()),
        }
    }

    fn validation(err: ApiError) -> ValidationError {
        match err {
            ApiError::Validation(v) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
    }

    #[tokio::test]
    async fn registers_rider() {
        let (state, store) = AppState::fake();
        let user = register(&state, scenario()).await.expect("registration succeeds");

        assert_eq!(user.user_type, UserType::Rider);
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.phone_number.as_deref(), Some("+1"));
        assert_eq!(store.user_count(), 1);
        assert!(store.rider_for_user(user.id).is_some());

        assert_ne!(user.password_hash, "Str0ng!Pass");
        assert!(state.hasher.verify("Str0ng!Pass", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn mismatched_confirmation_creates_nothing() {
        let (state, store) = AppState::fake();
        let mut req = scenario();
        req.password2 = Some("different".into());

        let err = validation(register(&state, req).await.unwrap_err());
        assert_eq!(err.messages("password"), [PASSWORD_MISMATCH]);
        assert_eq!(err.fields().collect::<Vec<_>>(), ["password"]);
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn policy_messages_surface_on_password() {
        let (state, store) = AppState::fake();
        let mut req = scenario();
        req.password = Some("12345678".into());
        req.password2 = Some("12345678".into());

        let err = validation(register(&state, req).await.unwrap_err());
        assert_eq!(
            err.messages("password"),
            ["This password is too common.", "This password is entirely numeric."]
        );
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn field_errors_take_precedence_over_mismatch() {
        let (state, _) = AppState::fake();
        let mut req = scenario();
        req.password = Some("short".into());
        req.password2 = Some("other".into());

        let err = validation(register(&state, req).await.unwrap_err());
        assert!(!err.messages("password").contains(&PASSWORD_MISMATCH.to_string()));
        assert!(err.messages("password")[0].contains("too short"));
    }

    #[tokio::test]
    async fn missing_and_blank_fields_are_reported_together() {
        let (state, _) = AppState::fake();
        let req = RegisterRequest {
            email: Some("a@b.com".into()),
            password: Some("Str0ng!Pass".into()),
            first_name: Some("   ".into()),
            user_type: Some("driver".into()),
            ..Default::default()
        };

        let err = validation(register(&state, req).await.unwrap_err());
        assert_eq!(err.messages("password2"), [REQUIRED]);
        assert_eq!(err.messages("last_name"), [REQUIRED]);
        assert_eq!(err.messages("first_name"), [BLANK]);
        assert_eq!(err.messages("user_type"), ["\"driver\" is not a valid choice."]);
        assert!(err.messages("email").is_empty());
    }

    #[tokio::test]
    async fn blank_user_type_is_not_a_valid_choice() {
        let (state, store) = AppState::fake();
        let mut req = scenario();
        req.user_type = Some(String::new());

        let err = validation(register(&state, req).await.unwrap_err());
        assert_eq!(err.messages("user_type"), ["\"\" is not a valid choice."]);
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn email_is_normalised_and_unique() {
        let (state, store) = AppState::fake();
        register(&state, scenario()).await.unwrap();

        let mut req = scenario();
        req.email = Some("  A@B.COM ".into());
        let err = validation(register(&state, req).await.unwrap_err());
        assert_eq!(err.messages("email"), [EMAIL_TAKEN]);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn user_type_defaults_to_passenger() {
        let (state, store) = AppState::fake();
        let mut req = scenario();
        req.user_type = None;
        req.phone_number = Some("   ".into());

        let user = register(&state, req).await.unwrap();
        assert_eq!(user.user_type, UserType::Passenger);
        assert_eq!(user.phone_number, None);
        assert!(store.passenger_for_user(user.id).is_some());
    }

    #[tokio::test]
    async fn update_rejects_email_of_another_user() {
        let (state, _) = AppState::fake();
        register(&state, scenario()).await.unwrap();
        let mut other = scenario();
        other.email = Some("c@d.com".into());
        let second = register(&state, other).await.unwrap();

        let update = UserUpdate {
            email: Some("A@b.com".into()),
            ..Default::default()
        };
        let err = validation(update_user(&state, second.id, update).await.unwrap_err());
        assert_eq!(err.messages("email"), [EMAIL_TAKEN]);
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let (state, _) = AppState::fake();
        let err = update_user(&state, Uuid::new_v4(), UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
