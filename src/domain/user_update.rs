use crate::routes::UserPatch;

use super::{required_text, InvalidField, Role, UserEmail, UserName};

/// A validated partial profile update. Absent fields are left unchanged.
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub username: Option<UserName>,
    pub email: Option<UserEmail>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

impl UserUpdate {
    /// `role` is only honoured when `allow_role` is set; otherwise
    /// supplying it is an error.
    pub fn parse(patch: UserPatch, allow_role: bool) -> Result<Self, InvalidField> {
        let username = patch
            .username
            .map(UserName::try_from)
            .transpose()
            .map_err(|e| InvalidField::new("username", e))?;
        let email = patch
            .email
            .map(UserEmail::try_from)
            .transpose()
            .map_err(|e| InvalidField::new("email", e))?;
        let first_name = patch
            .first_name
            .map(|name| required_text("first_name", name, 150))
            .transpose()?;
        let last_name = patch
            .last_name
            .map(|name| required_text("last_name", name, 150))
            .transpose()?;
        let role = match patch.role {
            Some(_) if !allow_role => {
                return Err(InvalidField::new(
                    "role",
                    "You cannot change your own role.",
                ))
            }
            Some(role) => Some(
                Role::try_from(role.as_str())
                    .map_err(|e| InvalidField::new("role", e))?,
            ),
            None => None,
        };
        Ok(Self {
            username,
            email,
            first_name,
            last_name,
            role,
        })
    }
}
