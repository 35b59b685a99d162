//! Registration form rules checked before anything is sent to the backend
//!
//! The form is filled in two parts: contact details, then the password. Each
//! part is validated on its own so the visitor sees the first problem only.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// First problem found in a registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    MissingRequiredFields,
    InvalidEmail,
    MissingPasswords,
    PasswordMismatch,
    PasswordTooShort,
    TermsNotAccepted,
}

impl RegistrationError {
    pub fn message(&self) -> &'static str {
        match self {
            RegistrationError::MissingRequiredFields => "Please fill in all required fields",
            RegistrationError::InvalidEmail => "Please enter a valid email address",
            RegistrationError::MissingPasswords => "Please fill in all password fields",
            RegistrationError::PasswordMismatch => "Passwords do not match",
            RegistrationError::PasswordTooShort => "Password must be at least 8 characters long",
            RegistrationError::TermsNotAccepted => "Please accept the terms and conditions",
        }
    }
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for RegistrationError {}

/// Everything the registration form collects
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub referral_code: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
    pub subscribe_newsletter: bool,
}

impl RegistrationForm {
    /// Contact details: names and a plausible email
    pub fn validate_details(&self) -> Result<(), RegistrationError> {
        if self.first_name.is_empty() || self.last_name.is_empty() || self.email.is_empty() {
            return Err(RegistrationError::MissingRequiredFields);
        }
        if !is_valid_email(&self.email) {
            return Err(RegistrationError::InvalidEmail);
        }
        Ok(())
    }

    /// Password part, then terms
    pub fn validate_password(&self) -> Result<(), RegistrationError> {
        if self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(RegistrationError::MissingPasswords);
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(RegistrationError::PasswordTooShort);
        }
        if !self.accept_terms {
            return Err(RegistrationError::TermsNotAccepted);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RegistrationError> {
        self.validate_details()?;
        self.validate_password()
    }

    /// Referral code to send, `None` when left blank
    pub fn referral(&self) -> Option<String> {
        Some(self.referral_code.trim())
            .filter(|code| !code.is_empty())
            .map(str::to_string)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}
