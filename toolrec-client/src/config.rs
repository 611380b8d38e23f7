//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the request pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every request path (e.g. "/api" behind a dev proxy, or an absolute origin)
    pub base_url: String,
    /// Request timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
    /// Where to send the user after an authorization failure
    pub login_path: String,
    /// Delay before the login redirect, so the error toast is seen first
    pub redirect_delay_ms: u64,
    /// Durable keys for the session
    pub session_keys: SessionKeys,
    /// Fixed user-facing strings
    pub messages: Messages,
    pub toast: ToastConfig,
    pub fallback: FallbackConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_ms: 30_000,
            login_path: "/login".to_string(),
            redirect_delay_ms: 1500,
            session_keys: SessionKeys::default(),
            messages: Messages::default(),
            toast: ToastConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Configuration for the admin panel (separate session keys)
    pub fn admin() -> Self {
        Self {
            session_keys: SessionKeys::admin(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

/// Storage keys holding the token and the serialized user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeys {
    pub token: String,
    pub user: String,
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            token: "token".to_string(),
            user: "user".to_string(),
        }
    }
}

impl SessionKeys {
    pub fn admin() -> Self {
        Self {
            token: "admin_token".to_string(),
            user: "admin_user".to_string(),
        }
    }
}

/// User-facing messages used when the server gives none
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Generic fallback when no better message can be extracted
    pub request_failed: String,
    /// Shown on transport status 401, replacing whatever the server said
    pub unauthorized: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            request_failed: "Request failed".to_string(),
            unauthorized: "Unauthorized, please log in first".to_string(),
        }
    }
}

/// Toast timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// How long a toast stays in `Showing` unless dismissed
    pub default_duration_ms: u64,
    /// Delay between mount and `Showing` (one render frame)
    pub frame_ms: u64,
    /// Exit animation length between `Dismissing` and `Destroyed`
    pub exit_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 3000,
            frame_ms: 16,
            exit_ms: 300,
        }
    }
}

/// Degraded-mode settings for wrapped read calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub enabled: bool,
    /// Simulated latency before the local result is returned
    pub latency_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            latency_ms: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.redirect_delay(), Duration::from_millis(1500));
        assert_eq!(config.session_keys.token, "token");
        assert_eq!(config.toast.default_duration_ms, 3000);
        assert_eq!(config.toast.exit_ms, 300);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"base_url": "https://tools.example.com/api", "toast": {"exit_ms": 150}}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://tools.example.com/api");
        assert_eq!(config.toast.exit_ms, 150);
        assert_eq!(config.toast.default_duration_ms, 3000);
        assert_eq!(config.login_path, "/login");
    }

    #[test]
    fn test_admin_keys() {
        let config = ClientConfig::admin();
        assert_eq!(config.session_keys.token, "admin_token");
        assert_eq!(config.session_keys.user, "admin_user");
    }
}
