use crate::models::user::{RegisterUserRequest, UpdateUserRequest, User};
use crate::password::MAX_PASSWORD_BYTES;
use crate::validation::{
    is_valid_email, optional_text, required_text, FieldErrors, BLANK, REQUIRED,
};

pub const MAX_NAME_CHARS: usize = 150;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const EMAIL_TAKEN: &str = "A user with this email already exists.";

/// A registration that passed field validation. The password is still plaintext.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Name changes requested by `PUT /users/:id`; `None` leaves a field as stored.
#[derive(Debug, Default, PartialEq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserChanges {
    pub fn apply(self, user: &mut User) {
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
    }
}

pub fn validate_registration(req: RegisterUserRequest) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = required_text(
        &mut errors,
        "first_name",
        req.first_name.as_deref(),
        MAX_NAME_CHARS,
    );
    let last_name = required_text(
        &mut errors,
        "last_name",
        req.last_name.as_deref(),
        MAX_NAME_CHARS,
    );
    let email = required_text(&mut errors, "email", req.email.as_deref(), MAX_EMAIL_CHARS);
    if let Some(email) = email.as_deref() {
        if !is_valid_email(email) {
            errors.add("email", "Enter a valid email address.");
        }
    }

    // Passwords are taken verbatim: surrounding whitespace is part of the secret.
    match req.password.as_deref() {
        None => errors.add("password", REQUIRED),
        Some("") => errors.add("password", BLANK),
        Some(pw) if pw.len() > MAX_PASSWORD_BYTES => errors.add(
            "password",
            format!("Ensure this field has no more than {MAX_PASSWORD_BYTES} bytes."),
        ),
        Some(_) => {}
    }

    match (first_name, last_name, email, req.password) {
        (Some(first_name), Some(last_name), Some(email), Some(password)) if errors.is_empty() => {
            Ok(Registration {
                first_name,
                last_name,
                email,
                password,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_user_update(req: UpdateUserRequest) -> Result<UserChanges, FieldErrors> {
    let mut errors = FieldErrors::new();
    let first_name = optional_text(
        &mut errors,
        "first_name",
        req.first_name.as_deref(),
        MAX_NAME_CHARS,
    );
    let last_name = optional_text(
        &mut errors,
        "last_name",
        req.last_name.as_deref(),
        MAX_NAME_CHARS,
    );
    errors.finish(|| UserChanges {
        first_name,
        last_name,
    })
}
