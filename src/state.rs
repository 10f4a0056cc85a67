// src/state.rs
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::relay::ChatRelay;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub relay: ChatRelay,
}

impl AppState {
    pub fn new(config: RelayConfig) -> reqwest::Result<Self> {
        Ok(Self {
            relay: ChatRelay::new(config)?,
        })
    }

    pub fn config(&self) -> &RelayConfig {
        self.relay.config()
    }
}
