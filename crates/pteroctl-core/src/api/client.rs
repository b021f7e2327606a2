//! API client for the panel's application API.
//!
//! Each operation is one exchange: validate the input, send a single
//! request, classify the response, return. Nothing is retried and no state
//! is kept between calls beyond the immutable configuration.

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ApiError, PanelError, Resource};
use crate::config::ClientConfig;
use crate::models::{CreatedUser, NewUser, User, UserId, UserList, UserUpdate};

// ============================================================================
// Constants
// ============================================================================

/// Path below the base URL where the application API lives
const API_PREFIX: [&str; 2] = ["api", "application"];

/// Versioned media type the panel expects in `Accept`
const ACCEPT_MEDIA_TYPE: &str = "application/vnd.pterodactyl.v1+json";

/// Default HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for a single panel.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct PanelClient {
    client: Client,
    config: ClientConfig,
    headers: header::HeaderMap,
}

impl std::fmt::Debug for PanelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PanelClient {
    /// Create a client for the panel at `base_url`, authenticating with an
    /// application API token.
    ///
    /// `base_url` is stored as given. A malformed URL is reported as
    /// `ApiError::Configuration` by the first call that builds a request.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ApiError> {
        Self::from_config(ClientConfig::new(base_url, token)?)
    }

    /// Like [`PanelClient::new`] with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        Self::build(ClientConfig::new(base_url, token)?, timeout)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        Self::build(config, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    fn build(config: ClientConfig, timeout: Duration) -> Result<Self, ApiError> {
        let headers = Self::default_headers(config.token())?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            config,
            headers,
        })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    fn default_headers(token: &str) -> Result<header::HeaderMap, ApiError> {
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ApiError::Configuration("API token contains characters not allowed in a header".into())
        })?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_MEDIA_TYPE));
        Ok(headers)
    }

    /// Fail with `Unsupported` for resources this client does not expose.
    pub fn ensure_supported(&self, resource: Resource) -> Result<(), ApiError> {
        if resource.is_implemented() {
            Ok(())
        } else {
            Err(ApiError::Unsupported(format!(
                "the {} resource is not available in this client",
                resource
            )))
        }
    }

    /// Nests and eggs. Always fails with `Unsupported` without sending a
    /// request.
    pub async fn nests(&self) -> Result<(), ApiError> {
        self.ensure_supported(Resource::Nests)
    }

    /// Build `{base}/api/application/{resource}/{segments...}`. Each segment
    /// is percent-encoded as a single path component.
    fn endpoint(&self, resource: Resource, segments: &[&str]) -> Result<Url, ApiError> {
        self.ensure_supported(resource)?;

        let base = self.config.base_url();
        let mut url = Url::parse(base)
            .map_err(|e| ApiError::Configuration(format!("invalid base URL {:?}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration(format!("base URL {:?} cannot carry a path", base)))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .push(resource.segment())
            .extend(segments);
        Ok(url)
    }

    /// Every request goes through here so auth and content negotiation stay
    /// identical across operations. Bodies are attached with `.json()`, which
    /// sets `Content-Type: application/json`.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url).headers(self.headers.clone())
    }

    async fn execute(&self, request: RequestBuilder) -> Result<PanelResponse, ApiError> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "Sending panel request");

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %url, error = %e, "Panel request failed to send");
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        let body = response.text().await?;
        debug!(%method, %url, status = status.as_u16(), "Panel responded");

        Ok(PanelResponse {
            method,
            url,
            status,
            body,
        })
    }

    // ===== Users =====

    /// List all users in server order.
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint(Resource::Users, &[])?;
        let response = self.execute(self.request(Method::GET, url)).await?;
        let list: UserList = response.classify(&[StatusCode::OK])?.json()?;
        Ok(list.data)
    }

    /// Fetch a user by panel id. A missing user is `Ok(None)`.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, ApiError> {
        let url = self.endpoint(Resource::Users, &[&id.to_string()])?;
        self.lookup_user(url).await
    }

    /// Fetch a user by the caller-assigned external id. A missing user is
    /// `Ok(None)`.
    pub async fn get_user_by_external_id(&self, external_id: &str) -> Result<Option<User>, ApiError> {
        if external_id.trim().is_empty() {
            return Err(ApiError::validation("external id is required"));
        }
        let url = self.endpoint(Resource::Users, &["external", external_id])?;
        self.lookup_user(url).await
    }

    async fn lookup_user(&self, url: Url) -> Result<Option<User>, ApiError> {
        let response = self.execute(self.request(Method::GET, url)).await?;
        if response.status == StatusCode::NOT_FOUND {
            debug!(url = %response.url, "User not found");
            return Ok(None);
        }
        response.classify(&[StatusCode::OK])?.json().map(Some)
    }

    /// Create a user and return the id the panel assigned to it.
    /// Required fields are checked before anything is sent.
    pub async fn create_user(&self, draft: &NewUser) -> Result<UserId, ApiError> {
        draft.validate()?;

        let url = self.endpoint(Resource::Users, &[])?;
        let response = self
            .execute(self.request(Method::POST, url).json(draft))
            .await?;

        match response.status {
            StatusCode::UNPROCESSABLE_ENTITY => {
                let message = match response.panel_errors() {
                    Some(errors) if !errors.is_empty() => format!(
                        "panel rejected the user: {}",
                        errors
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; ")
                    ),
                    _ => "panel rejected the user".to_string(),
                };
                let err = ApiError::Validation {
                    message,
                    body: Some(ApiError::truncate_body(&response.body)),
                };
                return Err(response.fail(err));
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                let err = ApiError::ServiceUnavailable(ApiError::truncate_body(&response.body));
                return Err(response.fail(err));
            }
            _ => {}
        }

        let response = response.classify(&[StatusCode::OK, StatusCode::CREATED])?;
        let status = response.status.as_u16();
        let created: CreatedUser = response.json()?;
        created.id().ok_or_else(|| ApiError::InvalidResponse {
            status,
            message: "create response carried no user id".into(),
        })
    }

    /// Apply a partial update. Fields left as `None` are not sent.
    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let url = self.endpoint(Resource::Users, &[&id.to_string()])?;
        let response = self
            .execute(self.request(Method::PATCH, url).json(update))
            .await?;

        if response.status == StatusCode::NOT_FOUND {
            let err = ApiError::NotFound {
                message: format!("user {}", id),
                body: ApiError::truncate_body(&response.body),
            };
            return Err(response.fail(err));
        }
        response.classify(&[StatusCode::OK])?.json()
    }

    /// Delete a user. Only `204 No Content` counts as success.
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let url = self.endpoint(Resource::Users, &[&id.to_string()])?;
        let response = self.execute(self.request(Method::DELETE, url)).await?;

        if response.status == StatusCode::NOT_FOUND {
            let err = ApiError::NotFound {
                message: format!("user {}", id),
                body: ApiError::truncate_body(&response.body),
            };
            return Err(response.fail(err));
        }
        response.classify(&[StatusCode::NO_CONTENT])?;
        Ok(())
    }
}

/// A fully-read panel response, kept together with the request line for
/// logging.
struct PanelResponse {
    method: Method,
    url: Url,
    status: StatusCode,
    body: String,
}

impl PanelResponse {
    /// Extract the panel's error envelope, if the body carries one.
    /// Accepts `{"errors": [...]}` and the singular `{"error": ...}`.
    fn panel_errors(&self) -> Option<Vec<PanelError>> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        let object = value.as_object()?;

        if let Some(errors) = object.get("errors").filter(|v| !v.is_null()) {
            let parsed = serde_json::from_value::<Vec<PanelError>>(errors.clone())
                .unwrap_or_else(|_| vec![Self::detail_only(errors)]);
            return Some(parsed);
        }
        object
            .get("error")
            .filter(|v| !v.is_null() && v.as_bool() != Some(false))
            .map(|error| vec![Self::detail_only(error)])
    }

    fn detail_only(value: &serde_json::Value) -> PanelError {
        let detail = match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        };
        PanelError {
            detail: Some(detail),
            ..Default::default()
        }
    }

    /// An error envelope wins over the status code, then the status must be
    /// one of `expected`.
    fn classify(self, expected: &[StatusCode]) -> Result<Self, ApiError> {
        if let Some(errors) = self.panel_errors() {
            let err = ApiError::Api {
                status: self.status.as_u16(),
                errors,
                body: ApiError::truncate_body(&self.body),
            };
            return Err(self.fail(err));
        }
        if !expected.contains(&self.status) {
            let err = ApiError::Http {
                status: self.status.as_u16(),
                body: ApiError::truncate_body(&self.body),
            };
            return Err(self.fail(err));
        }
        Ok(self)
    }

    fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| {
            self.fail(ApiError::InvalidResponse {
                status: self.status.as_u16(),
                message: format!("{}: {}", e, ApiError::truncate_body(&self.body)),
            })
        })
    }

    fn fail(&self, err: ApiError) -> ApiError {
        warn!(
            method = %self.method,
            url = %self.url,
            status = self.status.as_u16(),
            error = %err,
            "Panel request failed"
        );
        err
    }
}
