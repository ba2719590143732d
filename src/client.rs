//! HTTP client for the incident-desk API.
//!
//! Configuration is via environment variables:
//! - `INCIDENT_DESK_URL` - Base URL (default: `http://localhost:17020/api/v1`)
//! - `INCIDENT_DESK_TOKEN` - Bearer token (optional; anonymous when unset)

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::*;

/// Default URL for local development.
const DEFAULT_URL: &str = "http://localhost:17020/api/v1";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: token missing or not recognised")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),
}

#[derive(Debug, Clone)]
pub struct IncidentClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl IncidentClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("INCIDENT_DESK_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        let token = std::env::var("INCIDENT_DESK_TOKEN").ok();
        Self::new(base_url, token)
    }

    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn error_for(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::BAD_REQUEST => ClientError::BadRequest(body),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(body),
            StatusCode::NOT_FOUND => ClientError::NotFound(body),
            _ => ClientError::Server(format!("{}: {}", status, body)),
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_for(response).await)
        }
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        let response = self.request(Method::GET, "/health").send().await?;
        let _: serde_json::Value = Self::handle_response(response).await?;
        Ok(())
    }

    /// All incidents in submission order.
    pub async fn list_incidents(&self) -> Result<Vec<Incident>, ClientError> {
        let response = self.request(Method::GET, "/incidents").send().await?;
        Self::handle_response(response).await
    }

    /// Submit form fields; returns the created incident.
    pub async fn submit_incident(&self, fields: &FormFields) -> Result<Incident, ClientError> {
        let response = self
            .request(Method::POST, "/incidents")
            .form(fields)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Resolve an incident. Requires an admin token.
    pub async fn resolve_incident(&self, id: u64) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, &format!("/incidents/{}/resolve", id))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_for(response).await)
        }
    }
}
