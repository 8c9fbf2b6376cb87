use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::user::models::SignInForm;
use crate::user::models::SignUpForm;
use crate::user::models::UpdateProfileForm;

pub const MAX_NAME_CHARS: usize = 255;
pub const MAX_EMAIL_CHARS: usize = 255;
pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 500;

const BLANK: &str = "This field cannot be blank";
const INVALID_EMAIL: &str = "Invalid email address";

/// Field name → first failing rule's message. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when no field failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Accumulates failed checks, keeping only the first message per field.
#[derive(Debug, Default)]
struct Checks {
    errors: BTreeMap<String, String>,
}

impl Checks {
    fn check(&mut self, passed: bool, field: &str, message: impl Into<String>) -> &mut Self {
        if !passed {
            self.errors
                .entry(field.to_string())
                .or_insert_with(|| message.into());
        }
        self
    }

    fn finish(self) -> ValidationErrors {
        ValidationErrors(self.errors)
    }

    fn name(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(not_blank(value), field, BLANK).check(
            max_chars(value, MAX_NAME_CHARS),
            field,
            too_long(MAX_NAME_CHARS),
        )
    }

    fn email(&mut self, value: &str) -> &mut Self {
        self.check(not_blank(value), "email", BLANK)
            .check(
                max_chars(value, MAX_EMAIL_CHARS),
                "email",
                too_long(MAX_EMAIL_CHARS),
            )
            .check(is_email(value), "email", INVALID_EMAIL)
    }

    fn password(&mut self, value: &str) -> &mut Self {
        self.check(not_blank(value), "password", BLANK)
            .check(
                min_chars(value, MIN_PASSWORD_CHARS),
                "password",
                format!(
                    "This field should be {} characters length minimum",
                    MIN_PASSWORD_CHARS
                ),
            )
            .check(
                max_chars(value, MAX_PASSWORD_CHARS),
                "password",
                too_long(MAX_PASSWORD_CHARS),
            )
    }
}

fn too_long(max: usize) -> String {
    format!("Maximum characters length exceeded - {}", max)
}

pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn max_chars(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

pub fn min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

pub fn is_email(value: &str) -> bool {
    email_address::EmailAddress::is_valid(value)
}

/// Validate a signup form.
pub fn validate_sign_up(form: &SignUpForm) -> ValidationErrors {
    let mut checks = Checks::default();
    checks
        .name("firstName", &form.first_name)
        .name("lastName", &form.last_name)
        .email(&form.email)
        .password(&form.password);
    checks.finish()
}

/// Validate a login form. Password length rules are not applied so accounts
/// never get a hint about the stored password's shape.
pub fn validate_sign_in(form: &SignInForm) -> ValidationErrors {
    let mut checks = Checks::default();
    checks
        .check(not_blank(&form.email), "email", BLANK)
        .check(is_email(&form.email), "email", INVALID_EMAIL)
        .check(not_blank(&form.password), "password", BLANK);
    checks.finish()
}

/// Validate only the fields present in a profile update.
pub fn validate_update(form: &UpdateProfileForm) -> ValidationErrors {
    let mut checks = Checks::default();
    if let Some(first_name) = &form.first_name {
        checks.name("firstName", first_name);
    }
    if let Some(last_name) = &form.last_name {
        checks.name("lastName", last_name);
    }
    if let Some(email) = &form.email {
        checks.email(email);
    }
    if let Some(password) = &form.password {
        checks.password(password);
    }
    checks.finish()
}
