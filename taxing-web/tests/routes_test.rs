//! Router tests: guard decisions, session cookies and dashboard flows

mod common;

use axum::http::StatusCode;
use common::{session_cookie, StubBackend, TestApp, GOOD_PASSWORD, SUPER_ADMIN};
use serde_json::Value;

const PROTECTED: [&str; 3] = ["/dashboard", "/franchise-dashboard", "/super-dashboard"];

#[tokio::test]
async fn test_home_page_for_anonymous_visitor() {
    let app = TestApp::spawn();
    let response = app.get("/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("class=\"site\""));
    assert!(response.body.contains("id=\"menu-login\""));
    assert!(response.body.contains("id=\"menu-register\""));
    assert!(!response.body.contains("id=\"menu-logout\""));
}

#[tokio::test]
async fn test_header_only_on_home() {
    let app = TestApp::spawn();
    let response = app.get("/services", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("class=\"site\""));
}

#[tokio::test]
async fn test_protected_routes_redirect_without_token() {
    let app = TestApp::spawn();
    for path in PROTECTED {
        let response = app.get(path, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(response.location(), Some("/"), "{}", path);
    }

    // Email and role without a token are still anonymous
    let cookie = "userEmail=paras%40gmail.com; userRole=super_admin";
    let response = app.get("/super-dashboard", Some(cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_unreadable_cookie_fails_closed() {
    let app = TestApp::spawn();
    let response = app
        .get("/dashboard", Some("token=token-3; userRole=%FF"))
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_franchise_dashboard_requires_franchise_role() {
    let app = TestApp::spawn();

    let user = session_cookie("token-3", "client@x.io", "user");
    let response = app.get("/franchise-dashboard", Some(&user)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let franchise = session_cookie("token-2", "north@x.io", "franchise");
    let response = app.get("/franchise-dashboard", Some(&franchise)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("North Branch"));
    assert!(response.body.contains("client@x.io"));
    assert!(!response.body.contains("other@x.io"));

    // A franchise partner is not an administrator
    let response = app.get("/super-dashboard", Some(&franchise)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_super_admin_is_decided_by_email() {
    let app = TestApp::spawn();

    // Listed email with an ordinary stored role
    let listed = session_cookie("token-1", SUPER_ADMIN, "user");
    let response = app.get("/super-dashboard", Some(&listed)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("North Branch"));
    assert!(response.body.contains("id=\"menu-dashboard\""));

    // Stored role alone is not enough
    let claimed = session_cookie("token-4", "admin@x.io", "super_admin");
    let response = app.get("/super-dashboard", Some(&claimed)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_user_dashboard_hands_super_admin_off() {
    let app = TestApp::spawn();
    let listed = session_cookie("token-1", SUPER_ADMIN, "user");

    let response = app.get("/dashboard", Some(&listed)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/super-dashboard"));
}

#[tokio::test]
async fn test_super_dashboard_selects_franchise() {
    let app = TestApp::spawn();
    let listed = session_cookie("token-1", SUPER_ADMIN, "user");

    let response = app
        .get("/super-dashboard?franchise=TXN1", Some(&listed))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Users referred by North Branch (1)"));
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let app = TestApp::spawn();
    let response = app
        .post_form(
            "/login",
            &format!("email=north%40x.io&password={}&referral_code=", GOOD_PASSWORD),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Login successful! Redirecting..."));
    assert!(response
        .body
        .contains("content=\"2;url=/franchise-dashboard\""));
    assert!(response.body.contains("}, 1500);"));

    let token = response.cookie("token").unwrap();
    assert!(token.starts_with("token=token-2"));
    assert!(token.contains("HttpOnly"));
    assert_eq!(response.cookie_value("userEmail").as_deref(), Some("north@x.io"));
    assert_eq!(response.cookie_value("userRole").as_deref(), Some("franchise"));
}

#[tokio::test]
async fn test_login_failure_keeps_visitor_signed_out() {
    let app = TestApp::spawn();
    let response = app
        .post_form("/login", "email=north%40x.io&password=nope", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Incorrect email or password"));
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_twice() {
    let app = TestApp::spawn();
    let cookie = session_cookie("token-3", "client@x.io", "user");

    for _ in 0..2 {
        let response = app.get("/logout", Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/"));

        let cleared = response.set_cookies();
        for name in ["token=", "userEmail=", "userRole="] {
            assert!(
                cleared
                    .iter()
                    .any(|c| c.starts_with(name) && c.contains("Max-Age=0")),
                "{} not cleared",
                name
            );
        }
    }

    // With the cookies gone every protected route sends the visitor home
    for path in PROTECTED {
        let response = app.get(path, None).await;
        assert_eq!(response.location(), Some("/"));
    }
}

#[tokio::test]
async fn test_register_validates_before_calling_backend() {
    let app = TestApp::spawn();
    let form = "first_name=Asha&last_name=Rao&email=asha%40x.io&password=longenough&confirm_password=different1&accept_terms=on";
    let response = app.post_form("/register", form, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Passwords do not match"));
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn test_register_stores_backend_email_and_subscribes() {
    let app = TestApp::spawn();
    let form = "first_name=Asha&last_name=Rao&email=asha%40x.io&password=longenough&confirm_password=longenough&accept_terms=on&subscribe_newsletter=on";
    let response = app.post_form("/register", form, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Registration successful! Redirecting..."));
    assert_eq!(response.cookie_value("userEmail").as_deref(), Some("asha@x.io"));
    assert_eq!(response.cookie_value("userRole").as_deref(), Some("user"));
    assert_eq!(app.backend.calls(), ["register", "subscribe_newsletter"]);
}

#[tokio::test]
async fn test_register_ignores_newsletter_failure() {
    let app = TestApp::with_backend(StubBackend {
        fail_newsletter: true,
        ..StubBackend::new()
    });
    let form = "first_name=Asha&last_name=Rao&email=asha%40x.io&password=longenough&confirm_password=longenough&accept_terms=on&subscribe_newsletter=on";
    let response = app.post_form("/register", form, None).await;

    assert!(response.body.contains("Registration successful! Redirecting..."));
    assert!(response.cookie("token").is_some());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn();
    let form = "first_name=Asha&last_name=Rao&email=client%40x.io&password=longenough&confirm_password=longenough&accept_terms=on";
    let response = app.post_form("/register", form, None).await;

    assert!(response.body.contains("Email already registered"));
    assert!(response.cookie("token").is_none());
}

#[tokio::test]
async fn test_admin_updates_role() {
    let app = TestApp::spawn();
    let admin = session_cookie("token-4", "admin@x.io", "admin");

    let response = app.get("/dashboard", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("/dashboard/users/3/role"));

    let response = app
        .post_form("/dashboard/users/3/role", "role=franchise", Some(&admin))
        .await;
    assert!(response.body.contains("Role updated successfully!"));
}

#[tokio::test]
async fn test_role_update_forbidden_message() {
    let app = TestApp::spawn();
    let user = session_cookie("token-3", "client@x.io", "user");

    let response = app
        .post_form("/dashboard/users/5/role", "role=admin", Some(&user))
        .await;
    assert!(response
        .body
        .contains("Admin access required to modify roles"));
}

#[tokio::test]
async fn test_profile_update() {
    let app = TestApp::spawn();
    let user = session_cookie("token-3", "client@x.io", "user");

    let response = app
        .post_form("/dashboard/profile", "first_name=Kiran&last_name=Shah", Some(&user))
        .await;
    assert!(response.body.contains("Changes saved successfully!"));
    assert!(response.body.contains("Kiran Shah"));
}

#[tokio::test]
async fn test_franchise_creation_requires_email() {
    let app = TestApp::spawn();
    let listed = session_cookie("token-1", SUPER_ADMIN, "user");

    let response = app
        .post_form("/super-dashboard/franchises", "email=&selected_user_email=&franchise_name=", Some(&listed))
        .await;
    assert!(response.body.contains("Please enter an email address"));
    assert!(!app.backend.calls().contains(&"create_franchise".to_string()));

    let response = app
        .post_form(
            "/super-dashboard/franchises",
            "email=ignored%40x.io&selected_user_email=client%40x.io&franchise_name=",
            Some(&listed),
        )
        .await;
    assert!(response.body.contains("Franchise created successfully!"));
    assert!(response.body.contains("User3 Franchise"));
}

#[tokio::test]
async fn test_delete_franchise_reloads_dashboard() {
    let app = TestApp::spawn();
    let listed = session_cookie("token-1", SUPER_ADMIN, "user");

    let response = app
        .post_form("/super-dashboard/franchises/10/delete", "", Some(&listed))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/super-dashboard"));
    assert!(app.backend.franchises.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_export_is_a_csv_download() {
    let app = TestApp::spawn();
    let admin = session_cookie("token-4", "admin@x.io", "admin");

    let response = app.get("/export/users", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["content-type"], "text/csv");
    assert!(response.headers["content-disposition"]
        .to_str()
        .unwrap()
        .contains("users_export.csv"));
    assert!(response.body.starts_with("id,email"));
}

#[tokio::test]
async fn test_export_requires_sign_in() {
    let app = TestApp::spawn();

    let response = app.get("/export/users", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let response = app
        .get("/export/users", Some("token=token-3; userRole=%FF"))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(!response.body.starts_with("id,email"));
}

#[tokio::test]
async fn test_enquiry_submission() {
    let app = TestApp::spawn();

    let response = app
        .post_form("/enquiry", "firstName=Asha&email=asha%40x.io&message=", None)
        .await;
    assert!(response.body.contains("Please fill in all required fields"));

    let response = app
        .post_form(
            "/enquiry",
            "firstName=Asha&email=asha%40x.io&message=Need+GST+help&budget=",
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Our team will get back to you"));
    assert_eq!(app.backend.calls(), ["submit_enquiry"]);
}

#[tokio::test]
async fn test_newsletter_rejects_invalid_email() {
    let app = TestApp::spawn();
    let response = app.post_form("/newsletter", "email=not-an-email", None).await;

    assert!(response.body.contains("Please enter a valid email address"));
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = TestApp::spawn();
    let response = app.get("/no-such-page", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_session_and_authorize() {
    let app = TestApp::spawn();
    let listed = session_cookie("token-1", SUPER_ADMIN, "user");

    let response = app.get("/api/session", Some(&listed)).await;
    let session: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(session["logged_in"], true);
    assert_eq!(session["super_admin"], true);
    assert_eq!(session["email"], SUPER_ADMIN);
    assert!(session.get("token").is_none());

    let response = app
        .get("/api/authorize?required_role=super_admin", Some(&listed))
        .await;
    let decision: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(decision["authorized"], true);
    assert_eq!(decision["redirect_to"], Value::Null);

    let response = app.get("/api/authorize", None).await;
    let decision: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(decision["authorized"], false);
    assert_eq!(decision["redirect_to"], "/");
}

#[tokio::test]
async fn test_api_health_and_openapi() {
    let app = TestApp::spawn();

    let response = app.get("/api/health", None).await;
    let health: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["backend"], "ok");

    let response = app.get("/api/openapi.json", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("/api/authorize"));
}
