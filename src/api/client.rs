//! API client for the Refuge marketplace REST backend.
//!
//! Every authenticated call runs through the request [`Gateway`]; this layer
//! adds the resource endpoints, JSON decoding, and the upstream-status error
//! mapping. Login and logout are the only operations that talk to the
//! backend outside the gateway, since they run without a session.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::{Session, SessionData};
use crate::config::Config;
use crate::models::{
    AdoptionRequest, Animal, AnimalQuery, BlogPost, Cart, Event, FaqEntry, FosterRequest,
    NewAdoptionRequest, NewFosterRequest, Order, Product, ProfileUpdate, ShippingDetails,
    UserProfile,
};

use super::gateway::{Gateway, RequestOptions};
use super::ApiError;

/// Base URL for the production backend.
const DEFAULT_BASE_URL: &str = "https://api.refuge-adoption.org";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
}

/// Everything the landing screen shows, fetched concurrently.
#[derive(Debug, Clone)]
pub struct Landing {
    pub animals: Vec<Animal>,
    pub events: Vec<Event>,
    pub posts: Vec<BlogPost>,
}

/// Client for the Refuge REST API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
    gateway: Gateway,
}

impl ApiClient {
    /// Create a client for the configured backend (production by default).
    pub fn new(config: &Config, session: Arc<Session>) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url, session)
    }

    /// Create a client against an explicit base URL (tests, staging).
    pub fn with_base_url(base_url: String, session: Arc<Session>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let gateway = Gateway::new(http.clone(), base_url.clone(), session.clone());
        Ok(Self {
            http,
            base_url,
            session,
            gateway,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // ===== Auth =====

    /// Log in and install the session, then resolve the account profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let url = format!("{}/auth/login/", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;
        let tokens: LoginResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;

        self.session.install(SessionData {
            access_token: tokens.access,
            refresh_token: Some(tokens.refresh),
            user_id: None,
        })?;

        let profile = self.fetch_profile().await?;
        self.session.set_user_id(profile.id.to_string())?;
        info!(user_id = profile.id, "Logged in");
        Ok(profile)
    }

    /// End the session locally. The refresh token simply stops being used;
    /// the backend expires it on its own schedule.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    // ===== Gateway helpers =====

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let response = self.gateway.send(path, options).await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(path, RequestOptions::get()).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.request(path, RequestOptions::json(Method::POST, body)?)
            .await
    }

    async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.request(path, RequestOptions::json(Method::PATCH, body)?)
            .await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(path, RequestOptions::delete()).await
    }

    // ===== Animals =====

    pub async fn fetch_animals(&self, query: &AnimalQuery) -> Result<Vec<Animal>> {
        let path = format!("/animals/{}", query.to_query_string());
        self.get(&path).await
    }

    pub async fn fetch_animal(&self, id: i64) -> Result<Animal> {
        self.get(&format!("/animals/{}/", id)).await
    }

    // ===== Adoption & foster =====

    pub async fn submit_adoption_request(
        &self,
        request: &NewAdoptionRequest,
    ) -> Result<AdoptionRequest> {
        debug!(animal_id = request.animal_id, "Submitting adoption request");
        self.post("/adoptions/", request).await
    }

    pub async fn fetch_my_adoptions(&self) -> Result<Vec<AdoptionRequest>> {
        self.get("/adoptions/mine/").await
    }

    pub async fn submit_foster_request(
        &self,
        request: &NewFosterRequest,
    ) -> Result<FosterRequest> {
        debug!(animal_id = request.animal_id, "Submitting foster request");
        self.post("/fosters/", request).await
    }

    pub async fn fetch_my_fosters(&self) -> Result<Vec<FosterRequest>> {
        self.get("/fosters/mine/").await
    }

    // ===== Boutique =====

    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        self.get("/products/").await
    }

    pub async fn fetch_product(&self, id: i64) -> Result<Product> {
        self.get(&format!("/products/{}/", id)).await
    }

    pub async fn fetch_cart(&self) -> Result<Cart> {
        self.get("/cart/").await
    }

    /// Add a product to the cart; the server answers with the full cart.
    pub async fn add_cart_item(&self, product_id: i64, quantity: u32) -> Result<Cart> {
        self.post(
            "/cart/items/",
            &serde_json::json!({ "product_id": product_id, "quantity": quantity }),
        )
        .await
    }

    pub async fn update_cart_item(&self, item_id: i64, quantity: u32) -> Result<Cart> {
        self.patch(
            &format!("/cart/items/{}/", item_id),
            &serde_json::json!({ "quantity": quantity }),
        )
        .await
    }

    pub async fn remove_cart_item(&self, item_id: i64) -> Result<Cart> {
        self.delete(&format!("/cart/items/{}/", item_id)).await
    }

    /// Place the order for the current cart contents.
    pub async fn checkout(&self, shipping: &ShippingDetails) -> Result<Order> {
        self.post("/orders/", shipping).await
    }

    pub async fn fetch_orders(&self) -> Result<Vec<Order>> {
        self.get("/orders/").await
    }

    // ===== Profile =====

    pub async fn fetch_profile(&self) -> Result<UserProfile> {
        self.get("/users/me/").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        self.patch("/users/me/", update).await
    }

    /// Upload a profile picture. The body is hand-encoded multipart so the
    /// gateway can replay it after a token refresh; the gateway leaves the
    /// multipart content type untouched.
    pub async fn upload_avatar(
        &self,
        filename: &str,
        mime: &str,
        bytes: &[u8],
    ) -> Result<UserProfile> {
        let boundary = format!("refuge-{}", Utc::now().timestamp_micros());
        let body = multipart_body(&boundary, "avatar", filename, mime, bytes);
        let options = RequestOptions::raw(
            Method::POST,
            &format!("multipart/form-data; boundary={}", boundary),
            body,
        )?;
        self.request("/users/me/avatar/", options).await
    }

    // ===== Content =====

    pub async fn fetch_posts(&self) -> Result<Vec<BlogPost>> {
        self.get("/blog/").await
    }

    pub async fn fetch_post(&self, id: i64) -> Result<BlogPost> {
        self.get(&format!("/blog/{}/", id)).await
    }

    pub async fn fetch_faq(&self) -> Result<Vec<FaqEntry>> {
        self.get("/faq/").await
    }

    pub async fn fetch_events(&self) -> Result<Vec<Event>> {
        self.get("/events/").await
    }

    /// Fetch everything the landing screen needs in parallel.
    pub async fn fetch_landing(&self) -> Result<Landing> {
        let available = AnimalQuery {
            status: Some(crate::models::AnimalStatus::Available),
            ..Default::default()
        };
        let (animals, events, posts) = futures::future::try_join3(
            self.fetch_animals(&available),
            self.fetch_events(),
            self.fetch_posts(),
        )
        .await?;
        Ok(Landing {
            animals,
            events,
            posts,
        })
    }
}

/// Encode a single file field as `multipart/form-data`.
///
/// Kept deliberately minimal: one part, caller-supplied boundary. Owned
/// bytes are required so a refreshed request can resend the same body.
fn multipart_body(
    boundary: &str,
    field: &str,
    filename: &str,
    mime: &str,
    bytes: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use mockito::{Matcher, Server};

    fn empty_session() -> Arc<Session> {
        Arc::new(Session::new(Box::new(MemoryTokenStore::new())).unwrap())
    }

    fn logged_in_session() -> Arc<Session> {
        let session = empty_session();
        session
            .install(SessionData {
                access_token: "good".to_string(),
                refresh_token: Some("r1".to_string()),
                user_id: Some("42".to_string()),
            })
            .unwrap();
        session
    }

    fn client(server: &Server, session: Arc<Session>) -> ApiClient {
        ApiClient::with_base_url(server.url(), session).unwrap()
    }

    #[tokio::test]
    async fn login_installs_session_and_resolves_user_id() {
        let mut server = Server::new_async().await;
        let login = server
            .mock("POST", "/auth/login/")
            .match_body(Matcher::Json(serde_json::json!({
                "email": "ana@example.org",
                "password": "hunter2"
            })))
            .with_status(200)
            .with_body(r#"{"access": "a1", "refresh": "r1"}"#)
            .expect(1)
            .create_async()
            .await;
        let me = server
            .mock("GET", "/users/me/")
            .match_header("authorization", "Bearer a1")
            .with_status(200)
            .with_body(r#"{"id": 42, "email": "ana@example.org", "first_name": "Ana"}"#)
            .expect(1)
            .create_async()
            .await;

        let session = empty_session();
        let client = client(&server, session.clone());
        let profile = client.login("ana@example.org", "hunter2").await.unwrap();

        assert_eq!(profile.id, 42);
        assert_eq!(profile.display_name(), "Ana");
        assert_eq!(session.access_token().as_deref(), Some("a1"));
        assert_eq!(session.user_id().as_deref(), Some("42"));
        login.assert_async().await;
        me.assert_async().await;
    }

    #[tokio::test]
    async fn login_failure_leaves_session_empty() {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", "/auth/login/")
            .with_status(401)
            .with_body(r#"{"detail": "No active account found"}"#)
            .create_async()
            .await;

        let session = empty_session();
        let client = client(&server, session.clone());
        let err = client.login("ana@example.org", "wrong").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized)
        ));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn not_found_maps_to_typed_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/animals/999/")
            .with_status(404)
            .with_body(r#"{"detail": "Not found."}"#)
            .create_async()
            .await;

        let client = client(&server, logged_in_session());
        let err = client.fetch_animal(999).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn animal_filters_reach_the_wire() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/animals/")
            .match_query(Matcher::UrlEncoded("species".into(), "cat".into()))
            .with_status(200)
            .with_body(r#"[{"id": 17, "name": "Noisette", "species": "cat", "breed": null, "sex": null, "age_months": 27, "description": null, "photo_url": null, "status": "available"}]"#)
            .expect(1)
            .create_async()
            .await;

        let client = client(&server, logged_in_session());
        let query = AnimalQuery {
            species: Some("cat".to_string()),
            ..Default::default()
        };
        let animals = client.fetch_animals(&query).await.unwrap();

        assert_eq!(animals.len(), 1);
        assert_eq!(animals[0].name, "Noisette");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn landing_joins_three_fetches() {
        let mut server = Server::new_async().await;
        let _animals = server
            .mock("GET", "/animals/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let _events = server
            .mock("GET", "/events/")
            .with_status(200)
            .with_body(r#"[{"id": 5, "title": "Open day"}]"#)
            .create_async()
            .await;
        let _posts = server
            .mock("GET", "/blog/")
            .with_status(200)
            .with_body(r#"[{"id": 1, "title": "Settling in a shy cat"}]"#)
            .create_async()
            .await;

        let client = client(&server, logged_in_session());
        let landing = client.fetch_landing().await.unwrap();
        assert!(landing.animals.is_empty());
        assert_eq!(landing.events.len(), 1);
        assert_eq!(landing.posts.len(), 1);
    }

    #[test]
    fn multipart_body_is_well_formed() {
        let body = multipart_body("b0", "avatar", "me.png", "image/png", b"PNGDATA");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--b0\r\n"));
        assert!(text.contains("Content-Disposition: form-data; name=\"avatar\"; filename=\"me.png\""));
        assert!(text.contains("Content-Type: image/png\r\n\r\nPNGDATA"));
        assert!(text.ends_with("\r\n--b0--\r\n"));
    }

    #[test]
    fn logout_clears_the_session() {
        let session = logged_in_session();
        let client = ApiClient::with_base_url("http://127.0.0.1:9".to_string(), session.clone())
            .unwrap();
        client.logout().unwrap();
        assert!(!session.is_authenticated());
    }
}
