//! Login Form Validation
//!
//! Email and password checks with the messages shown next to each field,
//! and the error summary built on submit.

use regex::Regex;

use crate::TodoError;

pub const EMAIL_REQUIRED: &str = "Please enter your email address.";
pub const EMAIL_INVALID: &str = "Enter a valid email like name@example.com.";
pub const PASSWORD_REQUIRED: &str = "Please enter your password.";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters.";
pub const SUMMARY_HEADING: &str = "There’s a problem";
pub const SIGNED_IN: &str = "Signed in successfully. Redirecting…";
pub const SIGNED_OUT: &str = "You are signed out (demo).";

const MIN_PASSWORD_LEN: usize = 8;

/// Form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }

    /// Element id of the input
    pub fn element_id(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    /// Element id of the message shown under the input
    pub fn error_id(&self) -> &'static str {
        match self {
            Self::Email => "email-error",
            Self::Password => "password-error",
        }
    }
}

/// Problems found on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSummary {
    pub heading: &'static str,
    /// `"<Field>: <message>"` per invalid field, in form order
    pub items: Vec<String>,
    /// First invalid field, which receives focus
    pub focus: Field,
}

/// Result of submitting the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn { message: &'static str },
    Invalid(ErrorSummary),
}

/// Login form validator
#[derive(Debug, Clone)]
pub struct LoginValidator {
    email: Regex,
}

impl LoginValidator {
    pub fn new() -> Result<Self, TodoError> {
        Ok(Self {
            email: Regex::new(r".+@.+\..+")?,
        })
    }

    /// Validate the trimmed email value
    pub fn validate_email(&self, value: &str) -> Result<(), &'static str> {
        let value = value.trim();
        if value.is_empty() {
            return Err(EMAIL_REQUIRED);
        }
        if !self.email.is_match(value) {
            return Err(EMAIL_INVALID);
        }
        Ok(())
    }

    /// Validate the password as typed (no trimming)
    pub fn validate_password(&self, value: &str) -> Result<(), &'static str> {
        if value.is_empty() {
            return Err(PASSWORD_REQUIRED);
        }
        if value.chars().count() < MIN_PASSWORD_LEN {
            return Err(PASSWORD_TOO_SHORT);
        }
        Ok(())
    }

    /// Validate the value of `field`
    pub fn validate(&self, field: Field, value: &str) -> Result<(), &'static str> {
        match field {
            Field::Email => self.validate_email(value),
            Field::Password => self.validate_password(value),
        }
    }

    pub fn submit(&self, email: &str, password: &str) -> LoginOutcome {
        let problems: Vec<(Field, &'static str)> = [
            (Field::Email, self.validate(Field::Email, email)),
            (Field::Password, self.validate(Field::Password, password)),
        ]
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|msg| (field, msg)))
        .collect();

        let Some(&(focus, _)) = problems.first() else {
            return LoginOutcome::SignedIn { message: SIGNED_IN };
        };
        LoginOutcome::Invalid(ErrorSummary {
            heading: SUMMARY_HEADING,
            items: problems
                .iter()
                .map(|(field, msg)| format!("{}: {}", field.label(), msg))
                .collect(),
            focus,
        })
    }
}
