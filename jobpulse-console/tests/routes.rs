//! HTTP-level tests of the console router

mod common;

use axum::http::{header::REFERER, HeaderValue, StatusCode};
use axum_test::TestServer;
use common::{
    api_error, auth_response, empty_dashboard, job, sign_in, state, state_param, user, MockBackend,
};
use jobpulse_console::backend::{
    DeadLetterJob, IntegrationStatus, JobRun, JobStats, JobStatus, ScheduleType,
};
use jobpulse_console::oauth2::OAuthProvider;
use jobpulse_console::router;
use jobpulse_console::state::ConsoleState;
use url::Url;

fn server(state: &ConsoleState) -> TestServer {
    TestServer::new(router::build(state.clone())).unwrap()
}

fn location(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let state = state(MockBackend::new());
    let response = server(&state).get("/").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_dashboard_requires_sign_in() {
    let state = state(MockBackend::new());
    let response = server(&state).get("/dashboard").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_page_offers_configured_providers() {
    let state = state(MockBackend::new());
    let response = server(&state).get("/login").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains(r#"href="/auth/google""#));
    assert!(html.contains(r#"href="/auth/github""#));
}

#[tokio::test]
async fn test_password_login_signs_in() {
    let mut backend = MockBackend::new();
    backend
        .expect_login()
        .withf(|req| req.username == "ada" && req.password == "secret")
        .returning(|_| Ok(auth_response("jwt", "ada")));
    let state = state(backend);

    let response = server(&state)
        .post("/login")
        .form(&[("username", " ada "), ("password", "secret")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    assert!(state.sessions().is_authenticated());
}

#[tokio::test]
async fn test_rejected_login_rerenders_form() {
    let mut backend = MockBackend::new();
    backend
        .expect_login()
        .returning(|_| Err(api_error(401, "Bad credentials")));
    let state = state(backend);

    let response = server(&state)
        .post("/login")
        .form(&[("username", "ada"), ("password", "wrong")])
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Bad credentials"));
    assert!(html.contains(r#"value="ada""#));
    assert!(!state.sessions().is_authenticated());
}

#[tokio::test]
async fn test_empty_login_fields_are_rejected_locally() {
    let mut backend = MockBackend::new();
    backend.expect_login().never();
    let state = state(backend);

    let response = server(&state)
        .post("/login")
        .form(&[("username", ""), ("password", "")])
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Please fill in all fields."));
}

#[tokio::test]
async fn test_initiate_redirects_to_provider() {
    let state = state(MockBackend::new());
    let response = server(&state).get("/auth/google").await;

    response.assert_status(StatusCode::SEE_OTHER);
    let url = Url::parse(&location(&response)).unwrap();
    assert_eq!(url.host_str(), Some("accounts.google.com"));
    assert_eq!(state_param(&url).len(), 64);
}

#[tokio::test]
async fn test_unknown_provider_is_not_found() {
    let state = state(MockBackend::new());
    server(&state)
        .get("/auth/myspace")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_callback_success_redirects_to_dashboard() {
    let mut backend = MockBackend::new();
    backend
        .expect_exchange_oauth_code()
        .returning(|_, _| Ok(auth_response("jwt", "ada")));
    backend.expect_me().returning(|_| Ok(user("ada")));
    empty_dashboard(&mut backend);
    let state = state(backend);
    let server = server(&state);

    let redirect = state
        .oauth()
        .begin_authorization(OAuthProvider::GitHub, jobpulse_console::oauth2::FlowKind::Login)
        .unwrap();
    let response = server
        .get("/github/callback")
        .add_query_param("code", "gh-code")
        .add_query_param("state", state_param(&redirect.url))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let dashboard = server.get("/dashboard").await;
    dashboard.assert_status_ok();
    assert!(dashboard.text().contains("Signed in with GitHub!"));
}

#[tokio::test]
async fn test_callback_failure_renders_recovery_page() {
    let state = state(MockBackend::new());
    let response = server(&state)
        .get("/google/callback")
        .add_query_param("code", "4/xyz")
        .add_query_param("state", "forged")
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Invalid state parameter. Please try again."));
    assert!(html.contains(r#"href="/login""#));
}

#[tokio::test]
async fn test_link_callback_failure_points_back_to_profile() {
    let state = state(MockBackend::new());
    let response = server(&state)
        .get("/google/callback")
        .add_query_param("error", "access_denied")
        .add_query_param("state", "gmail_connect")
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Google authorization was cancelled or failed."));
    assert!(html.contains(r#"href="/profile""#));
}

#[tokio::test]
async fn test_profile_shows_gmail_status() {
    let mut backend = MockBackend::new();
    backend.expect_me().returning(|_| Ok(user("ada")));
    backend.expect_gmail_status().returning(|_| {
        Ok(IntegrationStatus {
            gmail_address: Some("ada@gmail.com".to_string()),
            connected: true,
        })
    });
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state).get("/profile").await;

    response.assert_status_ok();
    assert!(response.text().contains("ada@gmail.com"));
}

#[tokio::test]
async fn test_expired_session_is_cleared() {
    let mut backend = MockBackend::new();
    backend
        .expect_me()
        .returning(|_| Err(api_error(401, "Unauthorized")));
    let state = state(backend);
    sign_in(&state, "stale");

    let response = server(&state).get("/dashboard").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(!state.sessions().is_authenticated());
}

#[tokio::test]
async fn test_gmail_connect_redirects_with_sentinel() {
    let state = state(MockBackend::new());
    sign_in(&state, "jwt");

    let response = server(&state).post("/profile/gmail/connect").await;

    response.assert_status(StatusCode::SEE_OTHER);
    let url = Url::parse(&location(&response)).unwrap();
    assert_eq!(state_param(&url), "gmail_connect");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let state = state(MockBackend::new());
    sign_in(&state, "jwt");

    let response = server(&state).post("/logout").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(!state.sessions().is_authenticated());
}

#[tokio::test]
async fn test_theme_toggle_persists() {
    let state = state(MockBackend::new());
    let response = server(&state).post("/preferences/theme").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(state.preferences().theme().as_str(), "light");
}

#[tokio::test]
async fn test_job_pages_require_sign_in() {
    let state = state(MockBackend::new());
    let server = server(&state);

    for page in ["/jobs", "/jobs/create", "/jobs/7", "/dead-letter"] {
        let response = server.get(page).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }
    let response = server.post("/jobs/7/pause").await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_dashboard_shows_stats_and_recent_jobs() {
    let mut backend = MockBackend::new();
    backend.expect_me().returning(|_| Ok(user("ada")));
    backend.expect_job_stats().returning(|_| {
        Ok(JobStats {
            total_jobs: 14,
            dead_letter_jobs: 3,
            ..JobStats::default()
        })
    });
    backend.expect_list_jobs().returning(|_| {
        Ok((1..=12)
            .map(|id| job(id, &format!("job-{id:02}"), JobStatus::Pending))
            .collect())
    });
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state).get("/dashboard").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains(r#"<span class="stat-value">14</span>"#));
    assert!(html.contains("job-10"));
    assert!(!html.contains("job-11"));
}

#[tokio::test]
async fn test_dashboard_survives_stats_outage() {
    let mut backend = MockBackend::new();
    backend.expect_me().returning(|_| Ok(user("ada")));
    backend
        .expect_job_stats()
        .returning(|_| Err(api_error(503, "Service Unavailable")));
    backend.expect_list_jobs().returning(|_| Ok(Vec::new()));
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state).get("/dashboard").await;

    response.assert_status_ok();
    assert!(response
        .text()
        .contains("Job statistics are unavailable right now."));
}

#[tokio::test]
async fn test_job_list_filters_by_status() {
    let mut backend = MockBackend::new();
    backend.expect_list_jobs().returning(|_| {
        Ok(vec![
            job(1, "Cleanup logs", JobStatus::Paused),
            job(2, "Send digest", JobStatus::Pending),
        ])
    });
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state)
        .get("/jobs")
        .add_query_param("status", "PAUSED")
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Cleanup logs"));
    assert!(!html.contains("Send digest"));
    assert!(html.contains("Showing 1 of 2 jobs."));
}

#[tokio::test]
async fn test_job_list_outage_shows_toast() {
    let mut backend = MockBackend::new();
    backend
        .expect_list_jobs()
        .returning(|_| Err(api_error(500, "boom")));
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state).get("/jobs").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Failed to load jobs."));
    assert!(html.contains("No jobs yet."));
}

#[tokio::test]
async fn test_rejected_token_on_job_list_signs_out() {
    let mut backend = MockBackend::new();
    backend
        .expect_list_jobs()
        .returning(|_| Err(api_error(401, "Unauthorized")));
    let state = state(backend);
    sign_in(&state, "stale");

    let response = server(&state).get("/jobs").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(!state.sessions().is_authenticated());
}

#[tokio::test]
async fn test_job_detail_shows_history() {
    let mut backend = MockBackend::new();
    backend
        .expect_get_job()
        .withf(|_, id| *id == 7)
        .returning(|_, id| Ok(job(id, "Nightly cleanup", JobStatus::Success)));
    backend.expect_job_history().returning(|_, _| {
        Ok(vec![JobRun {
            id: 70,
            run_time: Some("2026-10-18T02:00:00".to_string()),
            status: "FAILED".to_string(),
            error_message: Some("disk full".to_string()),
            retry_attempt: 1,
        }])
    });
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state).get("/jobs/7").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Nightly cleanup"));
    assert!(html.contains("disk full"));
    assert!(html.contains("&quot;message&quot;: &quot;hello&quot;"));
}

#[tokio::test]
async fn test_unknown_job_goes_back_to_list() {
    let mut backend = MockBackend::new();
    backend
        .expect_get_job()
        .returning(|_, _| Err(api_error(404, "Job not found")));
    backend.expect_job_history().never();
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state).get("/jobs/404").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/jobs");
    let toasts = state.notifier().take_pending();
    assert_eq!(toasts[0].message, "Job not found.");
}

#[tokio::test]
async fn test_pause_returns_to_referring_page() {
    let mut backend = MockBackend::new();
    backend
        .expect_pause_job()
        .withf(|token, id| token == "jwt" && *id == 7)
        .returning(|_, id| Ok(job(id, "Nightly cleanup", JobStatus::Paused)));
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state)
        .post("/jobs/7/pause")
        .add_header(REFERER, HeaderValue::from_static("http://localhost:4200/jobs/7"))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/jobs/7");
    let toasts = state.notifier().take_pending();
    assert_eq!(toasts[0].message, "Job \"Nightly cleanup\" paused.");
}

#[tokio::test]
async fn test_failed_resume_still_redirects() {
    let mut backend = MockBackend::new();
    backend
        .expect_resume_job()
        .returning(|_, _| Err(api_error(409, "Job is not paused")));
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state).post("/jobs/7/resume").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/jobs");
    let toasts = state.notifier().take_pending();
    assert_eq!(toasts[0].message, "Failed to resume job.");
}

#[tokio::test]
async fn test_delete_lands_on_job_list() {
    let mut backend = MockBackend::new();
    backend.expect_delete_job().times(1).returning(|_, _| Ok(()));
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state)
        .post("/jobs/7/delete")
        .add_header(REFERER, HeaderValue::from_static("http://localhost:4200/jobs/7"))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/jobs");
}

#[tokio::test]
async fn test_dead_letter_page_and_replay() {
    let mut backend = MockBackend::new();
    backend.expect_dead_letter_jobs().returning(|_| {
        Ok(vec![DeadLetterJob {
            id: 5,
            job_name: "Send invoices".to_string(),
            job_type: "EMAIL".to_string(),
            last_error: Some("SMTP timeout".to_string()),
            failed_at: None,
            retry_count: 3,
            max_retries: 3,
        }])
    });
    backend
        .expect_replay_dead_letter()
        .withf(|_, id| *id == 5)
        .returning(|_, _| Ok(job(11, "Send invoices", JobStatus::Pending)));
    let state = state(backend);
    sign_in(&state, "jwt");
    let server = server(&state);

    let page = server.get("/dead-letter").await;
    page.assert_status_ok();
    let html = page.text();
    assert!(html.contains("SMTP timeout"));
    assert!(html.contains(r#"action="/dead-letter/5/replay""#));

    let response = server.post("/dead-letter/5/replay").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dead-letter");
    let toasts = state.notifier().take_pending();
    assert_eq!(toasts[0].message, "Job replayed successfully!");
}

#[tokio::test]
async fn test_invalid_job_form_is_shown_again() {
    let mut backend = MockBackend::new();
    backend.expect_create_job().never();
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state)
        .post("/jobs/create")
        .form(&[
            ("name", "Digest"),
            ("job_type", "EMAIL"),
            ("payload", "{not json"),
            ("max_retries", "3"),
            ("schedule_type", "ONE_TIME"),
            ("execute_at", "2026-11-01T09:30"),
        ])
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Payload must be valid JSON."));
    assert!(html.contains(r#"value="Digest""#));
}

#[tokio::test]
async fn test_created_job_lands_on_list() {
    let mut backend = MockBackend::new();
    backend
        .expect_create_job()
        .withf(|token, request| {
            token == "jwt"
                && request.name == "Hourly ping"
                && request.schedule.schedule_type == ScheduleType::Recurring
                && request.schedule.interval == Some(2)
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let state = state(backend);
    sign_in(&state, "jwt");

    let response = server(&state)
        .post("/jobs/create")
        .form(&[
            ("name", "Hourly ping"),
            ("job_type", "HTTP_CALL"),
            ("payload", r#"{"url":"https://example.com"}"#),
            ("max_retries", "2"),
            ("schedule_type", "RECURRING"),
            ("interval", "2"),
            ("frequency", "HOURS"),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/jobs");
    let toasts = state.notifier().take_pending();
    assert_eq!(toasts[0].message, "Job created successfully!");
}
