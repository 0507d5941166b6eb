mod admin;
mod password;
mod profile;
mod registration;
mod subscribe;

pub use admin::*;
pub use password::*;
pub use profile::*;
pub use registration::*;
pub use subscribe::*;

use secrecy::Secret;

#[derive(serde::Deserialize)]
pub struct UserRegistration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: Secret<String>,
}

/// Partial profile update; absent keys are left unchanged.
#[derive(serde::Deserialize, Default, Debug)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}
