//! Caller identification and CORS for the HTTP surface.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth::CallerContext;
use crate::config::ServerConfig;

/// Bearer tokens that map to caller roles.
#[derive(Clone, Debug, Default)]
pub struct CallerTokens {
    pub admin: Option<String>,
    pub tenant: Option<String>,
}

impl CallerTokens {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            admin: config.admin_token.clone(),
            tenant: config.tenant_token.clone(),
        }
    }

    /// Map a presented token to a caller. `None` means the token is unknown.
    fn caller_for(&self, token: &str) -> Option<CallerContext> {
        if self.admin.as_deref() == Some(token) {
            Some(CallerContext::admin())
        } else if self.tenant.as_deref() == Some(token) {
            Some(CallerContext::tenant())
        } else {
            None
        }
    }
}

/// Resolve the caller from the `Authorization` header and attach it to the
/// request as a [`CallerContext`] extension.
///
/// No header means an anonymous caller. A header that is not a known bearer
/// token is rejected with 401.
pub async fn resolve_caller(
    State(tokens): State<CallerTokens>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|h| h.to_str().unwrap_or_default());

    let caller = match auth_header {
        None => CallerContext::anonymous(),
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) => tokens.caller_for(token.trim()).ok_or_else(|| {
                tracing::warn!("Unknown bearer token presented");
                StatusCode::UNAUTHORIZED
            })?,
            None => {
                tracing::warn!("Invalid Authorization header format");
                return Err(StatusCode::UNAUTHORIZED);
            }
        },
    };

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

/// CORS policy: permissive unless specific origins are configured.
pub fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
