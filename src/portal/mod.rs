//! Portal workflows.
//!
//! Each workflow mirrors one user-facing page action (sign in, register,
//! upgrade, load a dashboard section) on top of the session, the API client
//! and the behavior recorder. Rendering is left to the caller.

mod auth;
mod dashboard;

pub use auth::{RegistrationForm, RegistrationOptions};
pub use dashboard::{DashboardOverview, PriceFilter};

use std::sync::Arc;

use crate::api::ApiClient;
use crate::behavior::BehaviorRecorder;
use crate::config::Config;
use crate::error::{AppResult, PortalError, PortalResult};
use crate::storage::{KeyValueStore, SessionManager};

/// Shared client state: session, API client and behavior recorder.
pub struct Portal {
    session: Arc<SessionManager>,
    client: ApiClient,
    behavior: BehaviorRecorder,
}

impl Portal {
    /// Load the session from `store` and start the behavior worker.
    pub async fn new(config: &Config, store: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let session = Arc::new(SessionManager::load(store).await?);
        let client = ApiClient::new(&config.portal, config.request.clone(), session.clone())?;
        let behavior = BehaviorRecorder::spawn(client.clone(), &config.behavior);

        Ok(Self::from_parts(client, behavior))
    }

    /// Assemble from an existing client and recorder.
    pub fn from_parts(client: ApiClient, behavior: BehaviorRecorder) -> Self {
        Self {
            session: client.session().clone(),
            client,
            behavior,
        }
    }

    /// Shared session.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Behavior recorder.
    pub fn behavior(&self) -> &BehaviorRecorder {
        &self.behavior
    }

    /// Record a behavior event (no-op when logged out).
    pub fn record(
        &self,
        behavior_type: impl Into<crate::behavior::BehaviorType>,
        details: serde_json::Value,
    ) {
        self.behavior.record(behavior_type, details);
    }

    /// Flush queued behavior events.
    pub async fn shutdown(&self) {
        self.behavior.shutdown().await;
    }

    fn require_login(&self) -> PortalResult<()> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(PortalError::NotLoggedIn)
        }
    }
}
