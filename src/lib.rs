//! # Energy Portal Client
//!
//! Client library and CLI for the energy trading information portal.
//!
//! ## Features
//!
//! - **Session storage**: bearer token and user profile persisted under fixed
//!   keys in a pluggable key/value store (in-memory or SQLite)
//! - **Authenticated requests**: every call carries the JSON content type and,
//!   when signed in, `Authorization: Bearer <token>`; failures collapse into a
//!   single error carrying the server's message
//! - **Typed contracts**: request and response structs for every portal
//!   endpoint, decoded with validation at the boundary
//! - **Behavior telemetry**: best-effort, non-blocking event logging through a
//!   bounded background queue
//! - **Workflows**: login, registration with local validation, logout,
//!   upgrade, dashboard feeds and recommendations
//!
//! ## Architecture
//!
//! ```text
//! Portal workflow → ApiClient (reqwest) → Portal REST API
//!        │               ↑
//!        │         SessionManager ← KeyValueStore (SQLite / memory)
//!        ↓
//!  BehaviorRecorder → bounded queue → worker → POST /user/behavior
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use energy_portal_client::{Config, Portal};
//! use energy_portal_client::storage::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = SqliteStore::new(&config.storage).await?;
//!     let portal = Portal::new(&config, Arc::new(store)).await?;
//!     let user = portal.login("alice", "secret").await?;
//!     println!("signed in as {} ({})", user.username, user.user_type);
//!     portal.shutdown().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Portal REST API client and endpoint contracts.
pub mod api;
/// Best-effort behavior telemetry.
pub mod behavior;
/// Command-line interface.
pub mod cli;
/// Configuration management.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Login, registration and dashboard workflows.
pub mod portal;
/// Session persistence.
pub mod storage;

pub use api::ApiClient;
pub use behavior::BehaviorRecorder;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use portal::Portal;
pub use storage::{Session, SessionManager};
