use tracing::{info, warn};
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::models::{Role, User};
use crate::AppState;

/// Sign-up form. `admin_code` is only checked for admin accounts.
#[derive(Debug, Clone, Validate)]
pub struct Registration {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    pub role: Role,
    pub admin_code: Option<String>,
}

impl Registration {
    fn trimmed(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.name = self.name.trim().to_string();
        self.password = self.password.trim().to_string();
        self
    }
}

pub fn register(state: &AppState, registration: Registration) -> ServiceResult<User> {
    let registration = registration.trimmed();
    registration.validate()?;

    if registration.role == Role::Admin
        && registration.admin_code.as_deref().map(str::trim)
            != Some(state.config.admin.registration_code.as_str())
    {
        warn!("Admin registration for {} refused: bad code", registration.username);
        return Err(ServiceError::AdminCodeRejected);
    }

    let mut users = state.storage.load_users()?;
    if users.contains_key(&registration.username) {
        return Err(ServiceError::UsernameTaken(registration.username));
    }

    let user = User::new(
        &registration.username,
        &registration.name,
        &registration.password,
        registration.role,
    );
    users.insert(user.username.clone(), user.clone());
    state.storage.save_users(&users)?;

    info!("Registered {} as {}", user.username, user.role);
    Ok(user)
}

pub fn login(state: &AppState, username: &str, password: &str) -> ServiceResult<User> {
    let users = state.storage.load_users()?;
    match users.get(username.trim()) {
        Some(user) if user.verify_password(password.trim()) => {
            info!("{} logged in", user.username);
            Ok(user.clone())
        }
        _ => {
            warn!("Failed login for {}", username.trim());
            Err(ServiceError::InvalidCredentials)
        }
    }
}

/// Seeds the configured admin account into an empty user store.
/// Returns `true` when an account was created.
pub fn ensure_default_admin(state: &AppState) -> ServiceResult<bool> {
    let mut users = state.storage.load_users()?;
    if !users.is_empty() {
        return Ok(false);
    }

    let admin = &state.config.admin;
    let user = User::new(&admin.username, &admin.name, &admin.password, Role::Admin);
    users.insert(user.username.clone(), user);
    state.storage.save_users(&users)?;

    info!("Created default admin account {}", admin.username);
    Ok(true)
}
