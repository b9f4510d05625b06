//! HTTP client for the content API, with the admin session guard built in.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url, multipart};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::ApiError;
use crate::access::{self, LOGIN_PATH};
use crate::models::{
    Book, BookPayload, BookType, DashboardStats, LoginRequest, LoginResponse, PageResponse, Post,
    PostPayload, UploadResponse,
};
use crate::session::{Credential, Session};

/// Fixed request timeout. A timed-out call is an ordinary failure and is not retried.
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// ApiClient
///
/// Clone is cheap: `reqwest::Client` shares its connection pool internally.
/// The application state holds one session-less client; admin handlers derive
/// a per-request client bound to their [`Session`] with [`ApiClient::with_session`].
///
/// With a session attached, every call
/// 1. carries `Authorization: Bearer <credential>` when the session holds one, and
/// 2. on a 401 received while the session's page is admin-scoped (and not the
///    login page) clears the credential, then asks for a navigation to the
///    login page. The error is still returned to the caller.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: Option<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Configuration(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Configuration(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            session: None,
        })
    }

    /// A client sharing this one's connection pool, bound to `session`.
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            session: Some(session),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    // --- Guarded Transport ---

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let credential = match &self.session {
            Some(session) => session.credential().await,
            None => None,
        };

        match credential {
            Some(credential) => request.bearer_auth(credential.expose()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(request).await.send().await.map_err(|e| {
            warn!(error = %e, "Content API request failed");
            ApiError::Network(e)
        })?;

        self.check_response(response).await
    }

    async fn check_response(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.reject_credential().await;
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, "Content API returned an error status");
        Err(ApiError::from_status(status, &body))
    }

    async fn reject_credential(&self) {
        let Some(session) = &self.session else {
            return;
        };
        if !access::requires_credential(session.location()) {
            return;
        }

        // Evict first so the login page rendered after the redirect sees no credential.
        session.clear().await;
        session.navigate(LOGIN_PATH).await;
        warn!(
            location = session.location(),
            "Admin credential rejected, session cleared"
        );
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let response = self.send(self.client.get(url).query(query)).await?;
        Self::read_json(response).await
    }

    async fn send_json<B: Serialize>(
        &self,
        request: RequestBuilder,
        body: &B,
    ) -> Result<Response, ApiError> {
        self.send(request.json(body)).await
    }

    // --- Auth ---

    /// POST /api/auth/login
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential, ApiError> {
        let url = self.endpoint(&["api", "auth", "login"])?;
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.send_json(self.client.post(url), &body).await?;
        let login: LoginResponse = Self::read_json(response).await?;
        Ok(Credential::new(login.token))
    }

    // --- Admin: Dashboard & Posts ---

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_json(&["api", "admin", "dashboard", "stats"], &[])
            .await
    }

    pub async fn admin_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.get_json(&["api", "admin", "posts"], &[]).await
    }

    pub async fn admin_post(&self, id: i64) -> Result<Post, ApiError> {
        self.get_json(&["api", "admin", "posts", &id.to_string()], &[])
            .await
    }

    pub async fn create_post(&self, payload: &PostPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "admin", "posts"])?;
        self.send_json(self.client.post(url), payload).await?;
        Ok(())
    }

    pub async fn update_post(&self, id: i64, payload: &PostPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "admin", "posts", &id.to_string()])?;
        self.send_json(self.client.put(url), payload).await?;
        Ok(())
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "admin", "posts", &id.to_string()])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    // --- Admin: Books ---

    pub async fn admin_books(&self) -> Result<Vec<Book>, ApiError> {
        self.get_json(&["api", "admin", "books"], &[]).await
    }

    pub async fn create_book(&self, payload: &BookPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "admin", "books"])?;
        self.send_json(self.client.post(url), payload).await?;
        Ok(())
    }

    pub async fn update_book(&self, id: i64, payload: &BookPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "admin", "books", &id.to_string()])?;
        self.send_json(self.client.put(url), payload).await?;
        Ok(())
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "admin", "books", &id.to_string()])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    // --- Admin: Upload ---

    /// POST /api/admin/upload as multipart, the file under the `file` field.
    pub async fn upload_image(
        &self,
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let url = self.endpoint(&["api", "admin", "upload"])?;

        let mut part = multipart::Part::bytes(bytes).file_name(file_name);
        if let Some(content_type) = content_type {
            part = part.mime_str(&content_type).map_err(|_| {
                ApiError::InvalidRequest(format!("unparsable content type {content_type:?}"))
            })?;
        }
        let form = multipart::Form::new().part("file", part);

        let response = self.send(self.client.post(url).multipart(form)).await?;
        Self::read_json(response).await
    }

    // --- Public ---

    pub async fn posts(
        &self,
        page: u32,
        size: u32,
        category: Option<&str>,
    ) -> Result<PageResponse<Post>, ApiError> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }
        self.get_json(&["api", "posts"], &query).await
    }

    pub async fn search_posts(&self, q: &str, page: u32) -> Result<PageResponse<Post>, ApiError> {
        let query = [("q", q.to_string()), ("page", page.to_string())];
        self.get_json(&["api", "posts", "search"], &query).await
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<Post, ApiError> {
        self.get_json(&["api", "posts", slug], &[]).await
    }

    pub async fn related_posts(&self, slug: &str) -> Result<Vec<Post>, ApiError> {
        self.get_json(&["api", "posts", slug, "related"], &[]).await
    }

    pub async fn books(&self, book_type: Option<BookType>) -> Result<Vec<Book>, ApiError> {
        let query: Vec<(&str, String)> = book_type
            .map(|t| ("type", t.as_str().to_string()))
            .into_iter()
            .collect();
        self.get_json(&["api", "books"], &query).await
    }

    pub async fn featured_books(&self) -> Result<Vec<Book>, ApiError> {
        self.get_json(&["api", "books", "featured"], &[]).await
    }
}
