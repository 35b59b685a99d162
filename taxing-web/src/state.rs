//! Application state shared by all handlers

use crate::templates::Chrome;
use crate::WebResult;
use std::sync::Arc;
use taxing_auth::{menu_for, RoleResolver, Session};
use taxing_backend::{BackendClient, BackendConfig, PortalBackend};
use taxing_core::PortalConfig;
use tracing::info;

/// Immutable after start-up; per-visitor state lives in cookies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub backend: Arc<dyn PortalBackend>,
    pub resolver: Arc<RoleResolver>,
}

impl AppState {
    /// Build state with the HTTP backend client described by `config`
    pub fn new(config: PortalConfig) -> WebResult<Self> {
        let backend = BackendClient::new(BackendConfig::from(&config.backend))?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Build state around any backend implementation
    pub fn with_backend(config: PortalConfig, backend: Arc<dyn PortalBackend>) -> Self {
        let resolver = RoleResolver::from_settings(&config.auth);
        info!(
            super_admins = resolver.super_admins().len(),
            home = %config.auth.home_path,
            "Application state initialized"
        );

        Self {
            config: Arc::new(config),
            backend,
            resolver: Arc::new(resolver),
        }
    }

    /// Route denied visitors are sent to
    pub fn home(&self) -> &str {
        &self.config.auth.home_path
    }

    /// Post-login redirect delay in milliseconds
    pub fn redirect_delay_ms(&self) -> u64 {
        self.config.auth.redirect_delay_ms
    }

    /// Meta-refresh fallback for the redirect delay
    ///
    /// Browsers ignore the fractional part of a refresh value, so the delay is
    /// rounded up to whole seconds.
    pub fn redirect_delay_seconds(&self) -> u64 {
        self.redirect_delay_ms().div_ceil(1000)
    }

    /// Page chrome with the menu for this visitor
    pub fn chrome(&self, title: &str, session: &Session) -> Chrome {
        Chrome::new(title, menu_for(session, &self.resolver))
    }
}
