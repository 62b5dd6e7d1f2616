//! Session-authenticated request gateway.
//!
//! Every authenticated call to the backend goes through [`Gateway::send`],
//! which attaches the bearer token, transparently refreshes it exactly once
//! when the backend answers 401, and retries the original request. If the
//! refresh itself fails the stored credentials are purged and the caller
//! receives a typed [`ApiError::SessionExpired`]; routing to a login screen
//! is the caller's concern, never the gateway's.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::Session;

use super::ApiError;

/// Token refresh endpoint, relative to the API base URL.
const REFRESH_PATH: &str = "/auth/refresh/";

/// Default content type attached when the caller did not set one.
const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    refresh: String,
}

/// The outbound call a caller wants performed: method, headers, body.
///
/// The body is owned bytes so the request can be rebuilt and resent after a
/// token refresh. Callers never set `Authorization`; the gateway owns that
/// header and overwrites anything supplied.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// A request carrying a JSON body. No content type is set here; the
    /// gateway applies its `application/json` default.
    pub fn json<B: Serialize>(method: Method, body: &B) -> Result<Self> {
        let mut options = Self::new(method);
        options.body = Some(serde_json::to_vec(body).context("Failed to serialize request body")?);
        Ok(options)
    }

    /// A request with a caller-controlled content type (multipart uploads).
    pub fn raw(method: Method, content_type: &str, body: Vec<u8>) -> Result<Self> {
        let mut options = Self::new(method);
        options.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type).context("Invalid content type")?,
        );
        options.body = Some(body);
        Ok(options)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Gateway for requests made as the currently authenticated user.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct Gateway {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl Gateway {
    pub fn new(http: Client, base_url: impl Into<String>, session: Arc<Session>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Perform `options` against `target` as the authenticated user.
    ///
    /// Returns the HTTP response unmodified for the caller to interpret;
    /// any status other than 401 is normal output here, 4xx/5xx included.
    /// A 401 triggers one token refresh and one retry. The retried
    /// response is returned whatever its status - a second 401 is passed
    /// through, never re-refreshed.
    pub async fn send(&self, target: &str, options: RequestOptions) -> Result<reqwest::Response> {
        let access = self
            .session
            .access_token()
            .ok_or(ApiError::AuthenticationMissing)?;

        let url = self.resolve(target);
        let response = self
            .build(&url, &options, &access)?
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to {}", options.method, url))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(url = %url, "Access token rejected, refreshing session");
        let access = self.refresh().await?;

        let retried = self
            .build(&url, &options, &access)?
            .send()
            .await
            .with_context(|| format!("Failed to resend {} request to {}", options.method, url))?;
        Ok(retried)
    }

    fn resolve(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}{}", self.base_url, target)
        }
    }

    fn build(
        &self,
        url: &str,
        options: &RequestOptions,
        access_token: &str,
    ) -> Result<reqwest::RequestBuilder> {
        let mut headers = options.headers.clone();
        // Caller headers win over defaults, so the JSON content type is only
        // added when nothing was set (a multipart caller keeps its boundary).
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        }
        // Authorization is always the gateway's, caller values included.
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token))
                .context("Invalid access token")?,
        );

        let mut builder = self.http.request(options.method.clone(), url).headers(headers);
        if let Some(ref body) = options.body {
            builder = builder.body(body.clone());
        }
        Ok(builder)
    }

    /// Refresh sub-protocol. Runs on the plain HTTP client - it must not go
    /// through `send` itself, or an expired session would recurse forever.
    async fn refresh(&self) -> Result<String> {
        let Some(refresh_token) = self.session.refresh_token() else {
            self.session.clear()?;
            return Err(ApiError::SessionExpired.into());
        };

        let url = format!("{}{}", self.base_url, REFRESH_PATH);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "refresh": refresh_token }))
            .send()
            .await
            .context("Failed to send token refresh request")?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Token refresh rejected, ending session");
            self.session.clear()?;
            return Err(ApiError::SessionExpired.into());
        }

        let pair: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;
        self.session
            .replace_tokens(pair.access.clone(), pair.refresh)?;
        debug!("Session refreshed");
        Ok(pair.access)
    }
}
