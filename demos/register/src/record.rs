//! The registration record and its password policy.

use formwork_macros::Record;

/// What a visitor submits to register.
#[derive(Debug, Default, Clone, Record)]
pub struct Registration {
    #[form(
        name = "username",
        rules = "required,min=3",
        message = "Username must be at least {} characters"
    )]
    pub username: String,

    #[form(
        name = "email",
        rules = "required,email",
        kind = "email",
        message = "Please provide a valid email address"
    )]
    pub email: String,

    #[form(
        name = "password",
        rules = "required",
        kind = "password",
        message = "Password is required"
    )]
    pub password: String,

    #[form(name = "-")]
    pub id: u64,
}

const SPECIAL_CHARS: &str = "!@#$%^&*";

/// Rejects passwords shorter than six characters or without a special
/// character.
pub fn password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(format!(
            "Password must contain at least one special character ({SPECIAL_CHARS})"
        ));
    }
    Ok(())
}
