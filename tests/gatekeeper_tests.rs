use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use tower::util::ServiceExt;
use unsent_daak::{
    AppConfig, AppState, create_router,
    gatekeeper::{Gate, credential_present, gate},
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(api_url: &str) -> axum::Router {
    let config = AppConfig {
        api_url: api_url.to_string(),
        ..AppConfig::default()
    };
    create_router(AppState::new(config).unwrap())
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

// --- Decision Table ---

#[test]
fn test_admin_path_without_credential_redirects_to_login() {
    for path in [
        "/admin",
        "/admin/",
        "/admin/dashboard",
        "/admin/posts",
        "/admin/posts/edit/42",
        "/admin/books",
        "/admin/login/",
        "/administrator",
    ] {
        assert_eq!(
            gate(path, false),
            Gate::Redirect("/admin/login"),
            "path {path}"
        );
    }
}

#[test]
fn test_admin_path_with_credential_is_allowed() {
    for path in ["/admin", "/admin/dashboard", "/admin/posts", "/admin/books"] {
        assert_eq!(gate(path, true), Gate::Allow, "path {path}");
    }
}

#[test]
fn test_login_page_bounces_holders_to_dashboard() {
    assert_eq!(gate("/admin/login", true), Gate::Redirect("/admin/dashboard"));
    assert_eq!(gate("/admin/login", false), Gate::Allow);
}

#[test]
fn test_non_admin_paths_are_never_intercepted() {
    for path in ["/", "/blog", "/blog/admin", "/books", "/about", "/health", "/nope"] {
        assert_eq!(gate(path, false), Gate::Allow, "path {path}");
        assert_eq!(gate(path, true), Gate::Allow, "path {path}");
    }
}

#[test]
fn test_empty_cookie_counts_as_no_credential() {
    let jar = CookieJar::new().add(Cookie::new("admin_token", ""));
    assert!(!credential_present(&jar));

    let jar = CookieJar::new().add(Cookie::new("admin_token", "abc123"));
    assert!(credential_present(&jar));

    let jar = CookieJar::new().add(Cookie::new("other", "abc123"));
    assert!(!credential_present(&jar));
}

// --- Router Scenarios ---

#[tokio::test]
async fn test_no_cookie_on_admin_posts_redirects_to_login() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri())
        .oneshot(get("/admin/posts", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn test_cookie_on_admin_posts_is_allowed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri())
        .oneshot(get("/admin/posts", Some("admin_token=abc123")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cookie_on_login_redirects_to_dashboard() {
    let response = app("http://127.0.0.1:9")
        .oneshot(get("/admin/login", Some("admin_token=abc123")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/dashboard");
}

#[tokio::test]
async fn test_no_cookie_on_login_serves_login_page() {
    let response = app("http://127.0.0.1:9")
        .oneshot(get("/admin/login", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("action=\"/admin/login\""));
}

#[tokio::test]
async fn test_public_paths_pass_through_without_cookie() {
    let response = app("http://127.0.0.1:9")
        .oneshot(get("/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app("http://127.0.0.1:9")
        .oneshot(get("/about", Some("admin_token=abc123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_admin_path_without_cookie_redirects() {
    let response = app("http://127.0.0.1:9")
        .oneshot(get("/admin/does-not-exist", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn test_admin_post_without_cookie_is_redirected_before_handler() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/books"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/books")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("title=A&buy_link=https%3A%2F%2Fshop"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_expired_editor_submit_lands_on_clean_login_page() {
    let router = app("http://127.0.0.1:9");

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/posts")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("title=Hello&content=World&action=publish"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");

    // A 303 is followed with a bodiless GET.
    let login = router
        .oneshot(get(location(&response), None))
        .await
        .unwrap();

    assert_eq!(login.status(), StatusCode::OK);
    let html = body_text(login).await;
    assert!(html.contains("Sign In"));
    assert!(!html.contains("Email and password are required."));
}

#[tokio::test]
async fn test_stale_login_post_with_cookie_lands_on_dashboard_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok" })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/login")
                .header(header::COOKIE, "admin_token=abc123")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=writer%40example.com&password=letters"))
                .unwrap(),
        )
        .await
        .unwrap();

    // The dashboard route is GET-only; anything but 303 would end in a 405.
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/dashboard");
}
