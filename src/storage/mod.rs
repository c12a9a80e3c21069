//! Session persistence.
//!
//! The portal keeps two string entries per client: the bearer token and a
//! JSON blob describing the signed-in user. [`KeyValueStore`] abstracts where
//! those entries live (in memory or a SQLite file), and [`SessionManager`]
//! owns the decoded [`Session`] and writes every change through to the store.

mod memory;
mod sqlite;


pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "energy_trading_token";

/// Storage key holding the serialized [`UserInfo`].
pub const USER_INFO_KEY: &str = "energy_trading_user";

/// Account tier reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Default tier.
    #[default]
    Free,
    /// Upgraded tier. The backend stores this as `premium`.
    #[serde(alias = "premium")]
    Paid,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Free => write!(f, "free"),
            UserType::Paid => write!(f, "paid"),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(UserType::Free),
            "paid" | "premium" => Ok(UserType::Paid),
            _ => Err(format!("Unknown user type: {}", s)),
        }
    }
}

/// Profile of the signed-in user as returned by `/auth/login`.
///
/// Fields the client does not know about are kept in `extra` so that a
/// stored profile survives a read-modify-write cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Backend identifier (integer or string depending on the database).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Home region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Products of interest
    #[serde(default)]
    pub trading_products: Vec<String>,
    /// Account tier
    #[serde(default)]
    pub user_type: UserType,
    /// Interest tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Account creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last profile update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Last sign-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    /// Whether the account is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Fields this client does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserInfo {
    /// Create a minimal free-tier profile.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
            region: None,
            trading_products: Vec::new(),
            user_type: UserType::Free,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
            last_login: None,
            is_active: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the account tier.
    pub fn with_user_type(mut self, user_type: UserType) -> Self {
        self.user_type = user_type;
        self
    }

    /// Whether this account is on the paid tier.
    pub fn is_paid(&self) -> bool {
        self.user_type == UserType::Paid
    }
}

/// The client's authenticated identity.
///
/// `user_info` without `token` is representable; the two are not
/// cross-validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Bearer token; empty counts as logged out
    pub token: Option<String>,
    /// Profile of the signed-in user
    pub user_info: Option<UserInfo>,
}

impl Session {
    /// True iff a non-empty token is present.
    pub fn is_logged_in(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Persistent string key/value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Insert or overwrite a value.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Remove every listed key in a single operation. Missing keys are ignored.
    async fn remove(&self, keys: &[&str]) -> StorageResult<()>;
}

/// Owner of the client [`Session`].
///
/// Reads are served from memory; every mutation is written to the backing
/// store first and only then applied to the in-memory session, so a failed
/// write leaves the session unchanged.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<Session>,
}

impl SessionManager {
    /// Load the persisted session from `store`.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> StorageResult<Self> {
        let token = store.get(TOKEN_KEY).await?;
        let user_info = match store.get(USER_INFO_KEY).await? {
            Some(raw) => decode_user_info(&raw),
            None => None,
        };

        debug!(
            logged_in = token.as_deref().is_some_and(|t| !t.is_empty()),
            has_user_info = user_info.is_some(),
            "Session loaded"
        );

        Ok(Self {
            store,
            state: RwLock::new(Session { token, user_info }),
        })
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.read().clone()
    }

    /// Current token.
    pub fn get_token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Store a new token.
    pub async fn set_token(&self, token: &str) -> StorageResult<()> {
        self.store.set(TOKEN_KEY, token).await?;
        self.write().token = Some(token.to_string());
        Ok(())
    }

    /// Forget the token.
    pub async fn clear_token(&self) -> StorageResult<()> {
        self.store.remove(&[TOKEN_KEY]).await?;
        self.write().token = None;
        Ok(())
    }

    /// Current profile.
    pub fn get_user_info(&self) -> Option<UserInfo> {
        self.read().user_info.clone()
    }

    /// Store a new profile.
    pub async fn set_user_info(&self, info: &UserInfo) -> StorageResult<()> {
        let raw = serde_json::to_string(info).map_err(|e| StorageError::Serialization {
            message: format!("Failed to serialize user info: {}", e),
        })?;
        self.store.set(USER_INFO_KEY, &raw).await?;
        self.write().user_info = Some(info.clone());
        Ok(())
    }

    /// Forget the profile.
    pub async fn clear_user_info(&self) -> StorageResult<()> {
        self.store.remove(&[USER_INFO_KEY]).await?;
        self.write().user_info = None;
        Ok(())
    }

    /// Remove both token and user info.
    pub async fn clear_all(&self) -> StorageResult<()> {
        self.store.remove(&[TOKEN_KEY, USER_INFO_KEY]).await?;
        *self.write() = Session::default();
        debug!("Session cleared");
        Ok(())
    }

    /// True iff the token is present and non-empty.
    pub fn is_logged_in(&self) -> bool {
        self.read().is_logged_in()
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Malformed blobs are reported and treated as absent.
fn decode_user_info(raw: &str) -> Option<UserInfo> {
    match serde_json::from_str::<UserInfo>(raw) {
        Ok(info) => Some(info),
        Err(e) => {
            warn!(
                key = USER_INFO_KEY,
                error = %e,
                "Stored user info is malformed; treating as absent"
            );
            None
        }
    }
}
