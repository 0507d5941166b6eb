use secrecy::ExposeSecret;

use crate::routes::UserRegistration;

use super::{required_text, InvalidField, Password, UserEmail, UserName};

pub struct NewUser {
    pub username: UserName,
    pub email: UserEmail,
    pub first_name: String,
    pub last_name: String,
    pub password: Password,
}

impl TryFrom<UserRegistration> for NewUser {
    type Error = InvalidField;

    fn try_from(registration: UserRegistration) -> Result<Self, Self::Error> {
        let username = UserName::try_from(registration.username)
            .map_err(|e| InvalidField::new("username", e))?;
        let email = UserEmail::try_from(registration.email)
            .map_err(|e| InvalidField::new("email", e))?;
        let first_name =
            required_text("first_name", registration.first_name, 150)?;
        let last_name = required_text("last_name", registration.last_name, 150)?;
        let password = Password::try_from(
            registration.password.expose_secret().to_string(),
        )
        .map_err(|e| InvalidField::new("password", e))?;
        Ok(NewUser {
            username,
            email,
            first_name,
            last_name,
            password,
        })
    }
}
