//! HTTP client for the target management API.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

use super::{CreateAction, PlatformError, PlatformResponse, TargetPlatform};
use crate::models::ApiType;

/// Per-request timeout applied to every management call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// [`TargetPlatform`] over the target organization's management REST API.
///
/// Authentication is a pre-acquired bearer token; obtaining it is out of scope.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    http: reqwest::Client,
    base_url: String,
    organization: String,
    token: Option<String>,
}

impl ManagementClient {
    /// Build a client for `organization` under `base_url` (e.g. `https://mgmt.example.com/v1`).
    pub fn new(
        base_url: impl Into<String>,
        organization: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
            PlatformError::Request {
                operation: "building HTTP client".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            organization: organization.into(),
            token,
        })
    }

    fn org_url(&self, path: &str) -> String {
        format!("{}/organizations/{}/{}", self.base_url, self.organization, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<PlatformResponse, PlatformError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_builder() {
                PlatformError::Request {
                    operation: operation.to_string(),
                    message: e.to_string(),
                }
            } else {
                PlatformError::Transient {
                    operation: operation.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| PlatformError::Transient {
            operation: operation.to_string(),
            message: format!("reading response body: {e}"),
        })?;
        classify(operation, status, &text)
    }
}

/// Map a status and body onto the platform response model.
fn classify(operation: &str, status: StatusCode, text: &str) -> Result<PlatformResponse, PlatformError> {
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
    };

    if status.is_success() {
        debug!("{} succeeded with HTTP {}", operation, status.as_u16());
        return Ok(PlatformResponse::Accepted(body));
    }

    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        warn!("{} failed with HTTP {}", operation, status.as_u16());
        return Err(PlatformError::Transient {
            operation: operation.to_string(),
            message: format!("HTTP {}: {}", status.as_u16(), text.trim()),
        });
    }

    let error = match body.get("error") {
        Some(error) => error.clone(),
        None => json!({ "message": text.trim() }),
    };
    debug!("{} rejected with HTTP {}", operation, status.as_u16());
    Ok(PlatformResponse::Rejected {
        status: status.as_u16(),
        error,
    })
}

#[async_trait]
impl TargetPlatform for ManagementClient {
    async fn create(
        &self,
        api_type: ApiType,
        name: &str,
        bundle: Vec<u8>,
        action: CreateAction,
    ) -> Result<PlatformResponse, PlatformError> {
        let operation = format!("{action} {api_type}/{name}");
        let form = Form::new().part("file", Part::bytes(bundle).file_name(format!("{name}.zip")));
        let request = self
            .http
            .post(self.org_url(api_type.as_str()))
            .query(&[("name", name), ("action", action.as_str())])
            .multipart(form);
        self.send(&operation, request).await
    }

    async fn get_env_object(
        &self,
        env: &str,
        kind: &str,
        id_suffix: &str,
    ) -> Result<PlatformResponse, PlatformError> {
        let operation = format!("get {env}/{kind}/{id_suffix}");
        let request = self.http.get(self.org_url(&format!("environments/{env}/{kind}/{id_suffix}")));
        self.send(&operation, request).await
    }
}
