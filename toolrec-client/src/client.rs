//! Request pipeline
//!
//! Every API call goes through [`ApiClient::dispatch`]:
//!
//! ```text
//! decorate (bearer token, JSON content type)
//!    → transport
//!    → classify (status, envelope)
//!    → side effects: clear session → schedule login redirect → error toast
//!    → resolve with `data` / reject with ApiError
//! ```
//!
//! The pipeline never retries. Errors are shown to the user before they are
//! returned, so callers only handle them for contextual behavior.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::envelope::{self, Classified, UNAUTHORIZED_CODE};
use crate::error::{ApiError, AuthOrigin, Result};
use crate::redirect::{LogNavigator, Navigator, Redirector};
use crate::session::{KeyValueStore, SessionStore};
use crate::toast::ToastManager;
use crate::transport::{
    HttpTransport, Method, OutboundRequest, RawResponse, Transport, TransportFailure,
};

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    /// Extra headers; they may replace the content type but never the bearer token
    pub headers: Vec<(String, String)>,
    /// Accept a 2xx body without an envelope and return it as-is
    pub envelope_optional: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn envelope_optional(mut self) -> Self {
        self.envelope_optional = true;
        self
    }
}

/// Catalog API client
///
/// Cheap to clone; clones share the transport, session, toast slot and
/// redirect scheduler.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    session: SessionStore,
    toasts: ToastManager,
    redirector: Redirector,
}

impl ApiClient {
    /// Assemble a client from its collaborators.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        session: SessionStore,
        toasts: ToastManager,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let redirector = Redirector::new(
            navigator,
            config.login_path.clone(),
            config.redirect_delay(),
        );
        Self {
            config: Arc::new(config),
            transport,
            session,
            toasts,
            redirector,
        }
    }

    /// Client over HTTP with a persisted session, logging toasts and redirects.
    pub fn connect(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        let session = SessionStore::load(store, config.session_keys.clone())?;
        let toasts = ToastManager::with_tracing(config.toast.clone());
        Ok(Self::new(
            config,
            Arc::new(transport),
            session,
            toasts,
            Arc::new(LogNavigator),
        ))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    pub fn redirector(&self) -> &Redirector {
        &self.redirector
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.dispatch(Method::Get, path, None, RequestOptions::default())
            .await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.dispatch(Method::Get, path, None, options).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.dispatch(Method::Post, path, Some(body), RequestOptions::default())
            .await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.dispatch(Method::Post, path, None, RequestOptions::default())
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.dispatch(Method::Put, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.dispatch(Method::Delete, path, None, RequestOptions::default())
            .await
    }

    /// Send one request through the pipeline.
    pub async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<T> {
        let envelope_optional = options.envelope_optional;
        let request = self.decorate(method, path, body, options).await;
        debug!(
            %method,
            path,
            authenticated = request.header(AUTHORIZATION).is_some(),
            "dispatching"
        );

        let data = match self.transport.send(request).await {
            Err(failure) => return Err(self.on_failure(method, path, failure)),
            Ok(response) if response.is_success() => {
                self.on_success_status(method, path, response, envelope_optional)
                    .await?
            }
            Ok(response) => return Err(self.on_error_status(method, path, response).await),
        };

        serde_json::from_value(data).map_err(|e| {
            warn!(%method, path, "Response data did not match the expected shape: {}", e);
            self.decode_error(200)
        })
    }

    async fn decorate(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> OutboundRequest {
        let token = self.session.token().await;

        let mut headers = vec![(CONTENT_TYPE.to_string(), "application/json".to_string())];
        for (name, value) in options.headers {
            if name.eq_ignore_ascii_case(AUTHORIZATION) && token.is_some() {
                continue;
            }
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }
        if let Some(token) = token {
            headers.push((AUTHORIZATION.to_string(), format!("Bearer {}", token)));
        }

        OutboundRequest {
            method,
            path: path.to_string(),
            query: options.query,
            body,
            headers,
        }
    }

    async fn on_success_status(
        &self,
        method: Method,
        path: &str,
        response: RawResponse,
        envelope_optional: bool,
    ) -> Result<Value> {
        match envelope::classify(&response.body) {
            Classified::Success(env) => Ok(env.data),
            Classified::BusinessError(env) => {
                let message = self.or_generic(env.message);
                warn!(%method, path, code = env.code, "Business error: {}", message);

                if env.code == UNAUTHORIZED_CODE {
                    self.invalidate_session().await;
                    self.toasts.error(message.clone());
                    return Err(ApiError::Unauthorized {
                        code: env.code,
                        message,
                        origin: AuthOrigin::Envelope,
                    });
                }

                self.toasts.error(message.clone());
                Err(ApiError::Business {
                    code: env.code,
                    message,
                    data: env.data,
                })
            }
            Classified::DecodeFailure(failure) if envelope_optional && failure.is_unwrapped() => {
                debug!(%method, path, "Passing through unwrapped body");
                Ok(failure.raw)
            }
            Classified::DecodeFailure(failure) => {
                warn!(%method, path, status = response.status, "Undecodable response: {}", failure.reason);
                Err(self.decode_error(response.status))
            }
        }
    }

    async fn on_error_status(&self, method: Method, path: &str, response: RawResponse) -> ApiError {
        let status = response.status;
        let embedded_code = envelope::extract_code(&response.body);
        let message = self.or_generic(envelope::extract_message(&response.body).unwrap_or_default());
        warn!(%method, path, status, code = ?embedded_code, "Request failed: {}", message);

        if status == 401 {
            let message = self.config.messages.unauthorized.clone();
            self.invalidate_session().await;
            self.toasts.error(message.clone());
            return ApiError::Unauthorized {
                code: UNAUTHORIZED_CODE,
                message,
                origin: AuthOrigin::Status,
            };
        }

        if embedded_code == Some(UNAUTHORIZED_CODE) {
            self.invalidate_session().await;
            self.toasts.error(message.clone());
            return ApiError::Unauthorized {
                code: UNAUTHORIZED_CODE,
                message,
                origin: AuthOrigin::Envelope,
            };
        }

        self.toasts.error(message.clone());
        ApiError::Transport {
            code: Some(embedded_code.unwrap_or(i64::from(status))),
            message,
        }
    }

    fn on_failure(&self, method: Method, path: &str, failure: TransportFailure) -> ApiError {
        let message = self.or_generic(failure.to_string());
        warn!(%method, path, "Transport failure: {}", message);
        self.toasts.error(message.clone());
        ApiError::Transport {
            code: None,
            message,
        }
    }

    fn decode_error(&self, status: u16) -> ApiError {
        let message = self.config.messages.request_failed.clone();
        self.toasts.error(message.clone());
        ApiError::Decode { status, message }
    }

    /// Clear the session, then schedule the login redirect.
    async fn invalidate_session(&self) {
        if let Err(e) = self.session.clear().await {
            warn!("Failed to clear persisted session: {}", e);
        }
        self.redirector.schedule();
    }

    fn or_generic(&self, message: String) -> String {
        if message.trim().is_empty() {
            self.config.messages.request_failed.clone()
        } else {
            message
        }
    }
}
