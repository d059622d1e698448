//! Resolution of a player name to a fresh user record.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, UserError};
use crate::files::UserFiles;
use crate::key::Key;
use crate::user::{OfflinePlayer, SessionHandle, User};

/// Services the embedding server provides to the user map.
pub trait Host: Send + Sync + 'static {
    /// Sessions of every currently connected player.
    fn online_sessions(&self) -> Vec<SessionHandle>;

    /// Build the identity handle of a player who is not connected.
    fn offline_player(&self, name: &str) -> Result<OfflinePlayer>;
}

/// Stateless loader. Never registers keys; that is the user map's job.
#[derive(Clone)]
pub struct Loader {
    host: Arc<dyn Host>,
    files: UserFiles,
}

impl Loader {
    pub fn new(host: Arc<dyn Host>, files: UserFiles) -> Self {
        Self { host, files }
    }

    /// Resolve `name` to a user.
    ///
    /// A connected session wins over the record file. Returns [`UserError::NotFound`]
    /// when neither exists.
    pub async fn resolve(&self, name: &str) -> Result<User> {
        let key = Key::new(name)?;

        let session = self
            .host
            .online_sessions()
            .into_iter()
            .find(|session| Key::new(session.name()).is_ok_and(|k| k == key));
        if let Some(session) = session {
            debug!(%key, "resolved user from live session");
            return Ok(User::online(key, session));
        }

        let data_file = self.files.path_for(name);
        if tokio::fs::try_exists(&data_file).await? {
            let player = self.host.offline_player(name)?;
            debug!(%key, file = %data_file.display(), "resolved user from record file");
            return Ok(User::offline(key, player, data_file));
        }

        Err(UserError::NotFound)
    }
}
