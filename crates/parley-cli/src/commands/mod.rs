pub mod ask;
pub mod chat;
pub mod config;
pub mod history;

use anyhow::{Context, Result};
use parley_application::{ChatService, RequestOrchestrator};
use parley_core::history::{HistoryKind, HistoryRepository};
use parley_core::session::SessionState;
use parley_infrastructure::{ConfigService, JsonlHistoryRepository, ParleyPaths};
use parley_interaction::ReqwestTransport;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Wiring shared by every command.
pub struct AppContext {
    paths: ParleyPaths,
    config: ConfigService,
}

impl AppContext {
    pub fn new(home: Option<&Path>) -> Result<Self> {
        let paths = ParleyPaths::new(home);
        let config = ConfigService::in_paths(&paths)?;
        Ok(Self { paths, config })
    }

    pub fn config(&self) -> &ConfigService {
        &self.config
    }

    pub fn logs_dir(&self) -> Result<PathBuf> {
        self.paths
            .logs_dir()
            .context("Failed to resolve log directory")
    }

    pub fn history(&self, kind: HistoryKind) -> Result<Arc<dyn HistoryRepository>> {
        Ok(Arc::new(JsonlHistoryRepository::in_paths(&self.paths, kind)?))
    }

    /// Builds a chat bound to the online history, continuing `session` if given.
    pub fn chat_service(&self, session: Option<SessionState>) -> Result<ChatService> {
        let config = self.config.get_config()?;
        let transport = Arc::new(ReqwestTransport::new()?);
        let orchestrator = RequestOrchestrator::from_config(transport, &config)
            .context("Configuration is incomplete; run `parley config init` and set service.model_version")?;
        let history = self.history(HistoryKind::Online)?;
        Ok(match session {
            Some(session) => ChatService::with_session(orchestrator, history, session),
            None => ChatService::new(orchestrator, history),
        })
    }
}

pub fn history_kind(offline: bool) -> HistoryKind {
    if offline {
        HistoryKind::Offline
    } else {
        HistoryKind::Online
    }
}
