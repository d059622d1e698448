//! Host for running the user map without a game server attached.

use std::sync::Arc;

use parking_lot::RwLock;
use roster_users::{Host, OfflinePlayer, Session, SessionHandle, UserError};

use crate::validation::parse_player_name;

/// Session of a player connected through this process.
#[derive(Debug, Clone)]
pub struct LocalSession {
    name: String,
}

impl LocalSession {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Session for LocalSession {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Host that keeps its own list of connected players.
#[derive(Debug, Default)]
pub struct StandaloneHost {
    online: RwLock<Vec<SessionHandle>>,
}

impl StandaloneHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a player as connected and return their session.
    pub fn connect(&self, name: &str) -> SessionHandle {
        let session: SessionHandle = Arc::new(LocalSession::new(name));
        let mut online = self.online.write();
        online.retain(|s| !s.name().eq_ignore_ascii_case(name));
        online.push(session.clone());
        session
    }

    pub fn disconnect(&self, name: &str) {
        self.online
            .write()
            .retain(|s| !s.name().eq_ignore_ascii_case(name));
    }
}

impl Host for StandaloneHost {
    fn online_sessions(&self) -> Vec<SessionHandle> {
        self.online.read().clone()
    }

    fn offline_player(&self, name: &str) -> Result<OfflinePlayer, UserError> {
        let name = parse_player_name(name).map_err(|err| UserError::Load(err.to_string()))?;
        Ok(OfflinePlayer::new(name.as_str()))
    }
}
