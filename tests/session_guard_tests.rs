use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use tower::util::ServiceExt;
use unsent_daak::{
    ApiClient, ApiError, AppConfig, AppState, create_router,
    session::{Credential, Session, SessionPhase, credential_cookie},
};
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn guarded_client(server: &MockServer, session: Session) -> ApiClient {
    ApiClient::new(&server.uri()).unwrap().with_session(session)
}

fn app(api_url: &str) -> axum::Router {
    let config = AppConfig {
        api_url: api_url.to_string(),
        ..AppConfig::default()
    };
    create_router(AppState::new(config).unwrap())
}

// --- Request Decoration ---

#[tokio::test]
async fn test_bearer_header_attached_when_credential_present() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/books"))
        .and(header_eq("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::load("/admin/books", Some(Credential::new("abc123")));
    let api = guarded_client(&mock_server, session);

    let books = api.admin_books().await.unwrap();
    assert!(books.is_empty());
}

#[tokio::test]
async fn test_no_authorization_header_without_credential() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books/featured"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let session = Session::load("/", None);
    let api = guarded_client(&mock_server, session);
    api.featured_books().await.unwrap();

    let plain = ApiClient::new(&mock_server.uri()).unwrap();
    plain.featured_books().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert!(!request.headers.contains_key("authorization"));
    }
}

// --- Response Interception ---

#[tokio::test]
async fn test_unauthorized_on_admin_page_clears_credential_and_navigates_to_login() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/books"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let session = Session::load("/admin/books", Some(Credential::new("abc123")));
    let api = guarded_client(&mock_server, session.clone());

    let result = api.admin_books().await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(session.credential().await, None);
    assert_eq!(session.phase().await, SessionPhase::Cleared);
    assert_eq!(session.navigation().await, Some("/admin/login"));
}

#[tokio::test]
async fn test_unauthorized_on_login_page_is_not_intercepted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let session = Session::load("/admin/login", Some(Credential::new("stale")));
    let api = guarded_client(&mock_server, session.clone());

    let result = api.login("me@example.com", "wrong").await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(session.credential().await, Some(Credential::new("stale")));
    assert_eq!(session.navigation().await, None);
}

#[tokio::test]
async fn test_unauthorized_on_public_page_is_not_intercepted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let session = Session::load("/blog", Some(Credential::new("abc123")));
    let api = guarded_client(&mock_server, session.clone());

    let result = api.books(None).await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(session.phase().await, SessionPhase::Active);
    assert_eq!(session.navigation().await, None);
}

#[tokio::test]
async fn test_server_error_propagates_unchanged() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard/stats"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "database offline" })),
        )
        .mount(&mock_server)
        .await;

    let session = Session::load("/admin/dashboard", Some(Credential::new("abc123")));
    let api = guarded_client(&mock_server, session.clone());

    let err = api.dashboard_stats().await.unwrap_err();

    match &err {
        ApiError::Rejected { status, message } => {
            assert_eq!(*status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message.as_deref(), Some("database offline"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message("fallback"), "database offline");
    assert_eq!(session.phase().await, SessionPhase::Active);
    assert_eq!(session.navigation().await, None);
}

#[tokio::test]
async fn test_not_found_does_not_touch_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let session = Session::load("/admin/posts/edit/99", Some(Credential::new("abc123")));
    let api = guarded_client(&mock_server, session.clone());

    assert!(matches!(api.admin_post(99).await, Err(ApiError::NotFound)));
    assert_eq!(session.phase().await, SessionPhase::Active);
    assert_eq!(session.navigation().await, None);
}

#[tokio::test]
async fn test_bad_upload_content_type_is_a_request_error_not_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": "/x.png" })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let session = Session::load("/admin/upload", Some(Credential::new("abc123")));
    let api = guarded_client(&mock_server, session.clone());

    let result = api
        .upload_image(
            "cover.png".to_string(),
            Some("not a mime type".to_string()),
            vec![1, 2, 3],
        )
        .await;

    assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    assert_eq!(session.phase().await, SessionPhase::Active);
}

#[test]
fn test_unparsable_base_url_is_a_configuration_error() {
    assert!(matches!(
        ApiClient::new("not a url"),
        Err(ApiError::Configuration(_))
    ));
}

// --- Cookie Write-Back ---

#[tokio::test]
async fn test_persist_leaves_untouched_session_alone() {
    let jar = CookieJar::new().add(Cookie::new("admin_token", "abc123"));
    let session = Session::from_cookies(&jar, "/admin/dashboard");

    let jar = session.persist(jar).await;
    assert_eq!(jar.get("admin_token").map(|c| c.value()), Some("abc123"));
}

#[tokio::test]
async fn test_persist_removes_cleared_credential() {
    let jar = CookieJar::new().add(Cookie::new("admin_token", "abc123"));
    let session = Session::from_cookies(&jar, "/admin/dashboard");
    session.clear().await;

    let jar = session.persist(jar).await;
    assert!(jar.get("admin_token").is_none());
}

#[tokio::test]
async fn test_persist_sets_activated_credential() {
    let jar = CookieJar::new();
    let session = Session::from_cookies(&jar, "/admin/login");
    assert_eq!(session.phase().await, SessionPhase::Cleared);

    session.activate(Credential::new("fresh")).await;
    let jar = session.persist(jar).await;

    assert_eq!(jar.get("admin_token").map(|c| c.value()), Some("fresh"));
}

#[test]
fn test_credential_cookie_attributes() {
    let cookie = credential_cookie(&Credential::new("tok"));

    assert_eq!(cookie.name(), "admin_token");
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_ne!(cookie.http_only(), Some(true));
    assert_eq!(cookie.max_age(), Some(time::Duration::days(1)));
}

#[test]
fn test_credential_debug_is_redacted() {
    let debug = format!("{:?}", Credential::new("super-secret"));
    assert!(!debug.contains("super-secret"));
}

// --- End to End ---

#[tokio::test]
async fn test_rejected_credential_redirects_and_removes_cookie() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/books"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri())
        .oneshot(
            Request::builder()
                .uri("/admin/books")
                .header(header::COOKIE, "admin_token=expired")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin/login"
    );

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(set_cookie.starts_with("admin_token="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_dashboard_with_partial_rejection_still_redirects_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard/stats"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri())
        .oneshot(
            Request::builder()
                .uri("/admin/dashboard")
                .header(header::COOKIE, "admin_token=expired")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin/login"
    );
}
