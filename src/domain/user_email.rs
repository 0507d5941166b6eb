use validator::ValidateEmail;

#[derive(Debug, Clone)]
pub struct UserEmail(String);

impl TryFrom<String> for UserEmail {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.len() > 254 {
            return Err("Email is too long.".to_string());
        }
        if ValidateEmail::validate_email(&value) {
            Ok(Self(value))
        } else {
            Err(format!("{} is not a valid email.", value))
        }
    }
}
impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
impl std::fmt::Display for UserEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
