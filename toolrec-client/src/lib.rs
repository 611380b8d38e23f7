//! Client for the Tool Recommend catalog service
//!
//! This crate owns the request pipeline shared by every catalog call:
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌───────────┐   ┌────────────┐
//! │ api::*     │──►│ ApiClient │──►│ Transport │──►│  service   │
//! │ Fallback   │   │ decorate  │   │ (reqwest) │   │  /api/...  │
//! │ Router     │   │ classify  │   └───────────┘   └────────────┘
//! └────────────┘   └─────┬─────┘
//!                        │ side effects
//!          ┌─────────────┼──────────────┐
//!          ▼             ▼              ▼
//!   ┌────────────┐ ┌────────────┐ ┌────────────┐
//!   │SessionStore│ │ Redirector │ │ToastManager│
//!   └────────────┘ └────────────┘ └────────────┘
//! ```
//!
//! # Key Components
//!
//! - [`ApiClient`]: Attaches the bearer token, unwraps `{code, message, data}`
//!   envelopes and turns every failure into one [`ApiError`] plus one toast
//! - [`SessionStore`]: Write-through token and user cache over a [`KeyValueStore`]
//! - [`ToastManager`]: Single-slot notification with a timed lifecycle
//! - [`Redirector`]: Delayed navigation to the login surface after an auth failure
//! - [`FallbackRouter`]: Answers listing reads from a bundled catalog when
//!   the service is unreachable
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use toolrec_client::{api, ApiClient, ClientConfig, FileStore, ToolQuery, FallbackRouter};
//!
//! let client = ApiClient::connect(ClientConfig::default(), Arc::new(FileStore::new("session.json")))?;
//! api::users::login(&client, &LoginRequest { account: "ada".into(), password: "...".into() }).await?;
//!
//! let router = FallbackRouter::bundled(client)?;
//! let page = router.query_tools(&ToolQuery::page(1, 12)).await?;
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod redirect;
pub mod session;
pub mod toast;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{ApiClient, RequestOptions};
pub use config::{ClientConfig, FallbackConfig, Messages, SessionKeys, ToastConfig};
pub use envelope::{Classified, Envelope};
pub use error::{ApiError, AuthOrigin, Result, StoreError};
pub use fallback::{FallbackRouter, StaticCatalog};
pub use redirect::{LogNavigator, Navigator, Redirector};
pub use session::{FileStore, KeyValueStore, MemoryStore, Session, SessionStore};
pub use toast::{ToastKind, ToastManager, ToastPhase, ToastRenderer, ToastSnapshot};
pub use transport::{HttpTransport, Method, Transport, TransportFailure};
pub use types::*;
