//! Request authorization for folder routes.
//!
//! Every folder request must name an end user (`user-id`) and carry a token
//! for a calling service (`ServiceAuthorization`) that resolves to one of the
//! configured authorized services. The check runs as middleware, before any
//! handler logic.

use crate::{AppState, Config};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use casedocs_core::constants::{SERVICE_AUTHORIZATION_HEADER, USER_ID_HEADER};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Resolves a calling-service token to the service's name.
pub trait ServiceTokenVerifier: Send + Sync {
    /// Return the service name for `token`, or `None` when it is not valid.
    fn verify(&self, token: &str) -> Option<String>;
}

/// Verifier backed by a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Build from `SERVICE_TOKENS` configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.service_tokens.clone())
    }
}

impl ServiceTokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

/// Identity of an allowed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub service: String,
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    MissingUser,
    MissingServiceToken,
    InvalidServiceToken,
    ServiceNotAuthorized,
}

impl DenialReason {
    /// HTTP status returned for this denial.
    pub fn status(self) -> StatusCode {
        match self {
            Self::MissingServiceToken | Self::InvalidServiceToken => StatusCode::UNAUTHORIZED,
            Self::MissingUser | Self::ServiceNotAuthorized => StatusCode::FORBIDDEN,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::MissingUser => "Missing user identity",
            Self::MissingServiceToken => "Missing service authorization",
            Self::InvalidServiceToken => "Invalid service authorization",
            Self::ServiceNotAuthorized => "Calling service is not authorized",
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Allowed(Caller),
    Denied(DenialReason),
}

/// Checks the user and calling-service identities on a request.
pub struct AuthorizationGuard {
    verifier: Arc<dyn ServiceTokenVerifier>,
    authorized_services: HashSet<String>,
}

impl AuthorizationGuard {
    pub fn new<I>(verifier: Arc<dyn ServiceTokenVerifier>, authorized_services: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            verifier,
            authorized_services: authorized_services.into_iter().collect(),
        }
    }

    /// Guard using the static token table and service allow-list from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(StaticTokenVerifier::from_config(config)),
            config.authorized_services.iter().cloned(),
        )
    }

    /// Evaluate the identity headers of a request.
    ///
    /// The user is checked first, then the service token, then the allow-list.
    pub fn check(&self, headers: &HeaderMap) -> Authorization {
        let Some(user_id) = header_text(headers, USER_ID_HEADER) else {
            return Authorization::Denied(DenialReason::MissingUser);
        };
        let Some(raw_token) = header_text(headers, SERVICE_AUTHORIZATION_HEADER) else {
            return Authorization::Denied(DenialReason::MissingServiceToken);
        };
        let token = raw_token
            .strip_prefix("Bearer ")
            .map(str::trim)
            .unwrap_or(raw_token);
        let Some(service) = self.verifier.verify(token) else {
            return Authorization::Denied(DenialReason::InvalidServiceToken);
        };
        if !self.authorized_services.contains(&service) {
            return Authorization::Denied(DenialReason::ServiceNotAuthorized);
        }
        Authorization::Allowed(Caller {
            user_id: user_id.to_string(),
            service,
        })
    }
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Middleware that rejects requests failing [`AuthorizationGuard::check`].
///
/// Allowed requests continue with their [`Caller`] in request extensions.
pub async fn require_authorized(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.guard.check(request.headers()) {
        Authorization::Allowed(caller) => {
            tracing::debug!(
                user_id = caller.user_id.as_str(),
                service = caller.service.as_str(),
                "Request authorized"
            );
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Authorization::Denied(reason) => {
            tracing::warn!(
                method = %request.method(),
                path = request.uri().path(),
                reason = ?reason,
                "Request denied"
            );
            (reason.status(), Json(json!({ "error": reason.message() }))).into_response()
        }
    }
}
