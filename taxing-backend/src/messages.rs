//! User-facing messages for backend outcomes
//!
//! Each form maps statuses differently; these functions keep that mapping in
//! one place so the web pages and the CLI say the same thing.

use taxing_core::PortalError;

pub const LOGIN_SUCCESS: &str = "Login successful! Redirecting...";
pub const REGISTER_SUCCESS: &str = "Registration successful! Redirecting...";
pub const PROFILE_SAVED: &str = "Changes saved successfully!";
pub const ROLE_UPDATED: &str = "Role updated successfully!";
pub const FRANCHISE_CREATED: &str = "Franchise created successfully!";
pub const FRANCHISE_EMAIL_REQUIRED: &str = "Please enter an email address";
pub const CONTACT_SENT: &str = "Message sent successfully! We'll get back to you soon.";
pub const ENQUIRY_SENT: &str =
    "Your enquiry has been submitted successfully. We'll get back to you within 24 hours.";
pub const NEWSLETTER_SUBSCRIBED: &str = "Thanks for subscribing!";
pub const USERS_UNAVAILABLE: &str = "Error fetching users. Please try again.";
pub const SESSION_MISSING: &str = "Authentication failed. Please log in again.";

pub fn login_failure(error: &PortalError) -> String {
    match error.status() {
        Some(401) => error
            .detail()
            .unwrap_or("Invalid email or password")
            .to_string(),
        Some(404) => "User not found".to_string(),
        Some(422) => "Invalid input data".to_string(),
        _ => "Login failed. Please try again.".to_string(),
    }
}

pub fn register_failure(error: &PortalError) -> String {
    const FALLBACK: &str = "Registration failed. Please try again.";
    match error.status() {
        Some(409) => "Email already registered".to_string(),
        Some(422) => error.detail().unwrap_or(FALLBACK).to_string(),
        _ => FALLBACK.to_string(),
    }
}

pub fn profile_save_failure(error: &PortalError) -> String {
    match error {
        PortalError::Backend { .. } => "Failed to save changes. Please try again.".to_string(),
        _ => "Error saving changes. Please try again.".to_string(),
    }
}

pub fn role_update_failure(error: &PortalError) -> String {
    match error {
        PortalError::Backend { status: 403, .. } => {
            "Admin access required to modify roles".to_string()
        }
        PortalError::Backend { .. } => "Failed to update role. Please try again.".to_string(),
        _ => "Error updating role. Please try again.".to_string(),
    }
}

pub fn franchise_create_failure(error: &PortalError) -> String {
    match error {
        PortalError::Backend { .. } => error
            .detail()
            .unwrap_or("Failed to create franchise")
            .to_string(),
        _ => "Error creating franchise. Please try again.".to_string(),
    }
}

pub fn contact_failure(error: &PortalError) -> String {
    match error.status() {
        Some(401) => error
            .detail()
            .unwrap_or("Failed to send message")
            .to_string(),
        _ => "Failed to send message. Please try again.".to_string(),
    }
}

pub fn enquiry_failure(error: &PortalError) -> String {
    match error.status() {
        Some(422) => error
            .detail()
            .unwrap_or("Please check the enquiry details")
            .to_string(),
        _ => "Failed to submit enquiry. Please try again.".to_string(),
    }
}

pub fn newsletter_failure(_error: &PortalError) -> String {
    "Subscription failed. Please try again.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(status: u16, detail: Option<&str>) -> PortalError {
        PortalError::backend(status, detail.map(String::from), "test")
    }

    fn network() -> PortalError {
        PortalError::Network {
            message: "connection refused".to_string(),
            source: None,
            context: taxing_core::ErrorContext::new("test"),
        }
    }

    #[test]
    fn login_messages_follow_status() {
        assert_eq!(login_failure(&backend(401, Some("Invalid credentials"))), "Invalid credentials");
        assert_eq!(login_failure(&backend(401, None)), "Invalid email or password");
        assert_eq!(login_failure(&backend(404, Some("User not found"))), "User not found");
        assert_eq!(login_failure(&backend(422, None)), "Invalid input data");
        assert_eq!(login_failure(&backend(500, None)), "Login failed. Please try again.");
        assert_eq!(login_failure(&network()), "Login failed. Please try again.");
    }

    #[test]
    fn register_messages_follow_status() {
        assert_eq!(register_failure(&backend(409, Some("dup"))), "Email already registered");
        assert_eq!(
            register_failure(&backend(422, Some("field required, value is not a valid email address"))),
            "field required, value is not a valid email address"
        );
        assert_eq!(
            register_failure(&backend(400, Some("Invalid referral code"))),
            "Registration failed. Please try again."
        );
    }

    #[test]
    fn role_update_distinguishes_forbidden() {
        assert_eq!(
            role_update_failure(&backend(403, Some("Only super admin can change roles"))),
            "Admin access required to modify roles"
        );
        assert_eq!(
            role_update_failure(&backend(400, None)),
            "Failed to update role. Please try again."
        );
        assert_eq!(role_update_failure(&network()), "Error updating role. Please try again.");
    }

    #[test]
    fn franchise_failure_prefers_backend_detail() {
        assert_eq!(
            franchise_create_failure(&backend(404, Some("User not found"))),
            "User not found"
        );
        assert_eq!(franchise_create_failure(&backend(500, None)), "Failed to create franchise");
    }

    #[test]
    fn profile_save_messages() {
        assert_eq!(
            profile_save_failure(&backend(500, None)),
            "Failed to save changes. Please try again."
        );
        assert_eq!(profile_save_failure(&network()), "Error saving changes. Please try again.");
    }
}
