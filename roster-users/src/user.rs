use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::key::Key;

/// A connected player's session, owned by the embedding server.
pub trait Session: Send + Sync + fmt::Debug {
  /// Display name as the player typed it at login.
  fn name(&self) -> &str;
}

/// Shared handle to a live session.
pub type SessionHandle = Arc<dyn Session>;

/// Identity of a player who is not connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflinePlayer {
  /// Name the handle was requested with
  pub name: String,
}

impl OfflinePlayer {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

/// Where a user's identity currently comes from.
#[derive(Debug, Clone)]
pub enum Presence {
  /// Player is connected
  Online(SessionHandle),
  /// Player is offline; the record file was present when the user was loaded
  Offline {
    player: OfflinePlayer,
    data_file: PathBuf,
  },
}

/// In-memory record for one player.
///
/// Shared as `Arc<User>`. Refreshing the live session updates the record in place, so
/// every holder of the `Arc` observes the change.
#[derive(Debug)]
pub struct User {
  key: Key,
  presence: RwLock<Presence>,
}

impl User {
  pub(crate) fn online(key: Key, session: SessionHandle) -> Self {
    Self {
      key,
      presence: RwLock::new(Presence::Online(session)),
    }
  }

  pub(crate) fn offline(key: Key, player: OfflinePlayer, data_file: PathBuf) -> Self {
    Self {
      key,
      presence: RwLock::new(Presence::Offline { player, data_file }),
    }
  }

  pub fn key(&self) -> &Key {
    &self.key
  }

  /// Display name from the live session, or the name the offline handle was built with.
  pub fn name(&self) -> String {
    match &*self.presence.read() {
      Presence::Online(session) => session.name().to_string(),
      Presence::Offline { player, .. } => player.name.clone(),
    }
  }

  pub fn is_online(&self) -> bool {
    matches!(&*self.presence.read(), Presence::Online(_))
  }

  pub fn session(&self) -> Option<SessionHandle> {
    match &*self.presence.read() {
      Presence::Online(session) => Some(session.clone()),
      Presence::Offline { .. } => None,
    }
  }

  /// Record file this user was loaded from, if it was loaded offline.
  pub fn data_file(&self) -> Option<PathBuf> {
    match &*self.presence.read() {
      Presence::Offline { data_file, .. } => Some(data_file.clone()),
      Presence::Online(_) => None,
    }
  }

  pub fn presence(&self) -> Presence {
    self.presence.read().clone()
  }

  /// Attach a live session. Only the user map calls this.
  pub(crate) fn update(&self, session: SessionHandle) {
    *self.presence.write() = Presence::Online(session);
  }
}

/// Argument to `UserMap::get_or_attach`.
#[derive(Debug, Clone)]
pub enum PlayerRef {
  /// Already a user record, returned unchanged
  User(Arc<User>),
  /// Raw session that still needs its record
  Session(SessionHandle),
}

impl From<Arc<User>> for PlayerRef {
  fn from(user: Arc<User>) -> Self {
    PlayerRef::User(user)
  }
}

impl From<SessionHandle> for PlayerRef {
  fn from(session: SessionHandle) -> Self {
    PlayerRef::Session(session)
  }
}
