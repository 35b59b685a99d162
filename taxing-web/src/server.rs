//! Portal web server
//!
//! Binds the configured address and serves the router built by
//! [`crate::create_app`].

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use taxing_core::PortalConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main portal server
pub struct PortalServer {
    config: PortalConfig,
    state: AppState,
}

impl PortalServer {
    /// Create a server, validating the configuration first
    pub fn new(config: PortalConfig) -> WebResult<Self> {
        config.validate()?;
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting Taxing Solutions portal");
        info!("Server address: http://{}", address);
        info!("Backend: {}", self.config.backend.base_url);
        info!("Development mode: {}", self.config.server.dev_mode);

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app).await {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for PortalServer
pub struct PortalServerBuilder {
    config: PortalConfig,
}

impl PortalServerBuilder {
    /// Create a new server builder with default configuration
    pub fn new() -> Self {
        Self {
            config: PortalConfig::default(),
        }
    }

    /// Start from an already loaded configuration
    pub fn with_config(config: PortalConfig) -> Self {
        Self { config }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.server.dev_mode = dev_mode;
        self
    }

    /// Set the backend base URL
    pub fn backend_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.backend.base_url = url.into();
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<PortalServer> {
        PortalServer::new(self.config)
    }
}

impl Default for PortalServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
