//! Player identity lookup for a persistent game server.
//!
//! [`UserMap`] resolves player names to shared [`User`] records, caching them in memory
//! and keeping a registry of every player known to exist on disk.

mod config;
mod error;
mod files;
mod key;
mod loader;
mod registry;
mod user;
mod user_map;

pub use config::{USERDATA_DIR, UserMapConfig};
pub use error::{Result, UserError};
pub use files::UserFiles;
pub use key::{Key, sanitize_file_name};
pub use loader::{Host, Loader};
pub use registry::KeyRegistry;
pub use user::{OfflinePlayer, PlayerRef, Presence, Session, SessionHandle, User};
pub use user_map::{UserMap, UserMapStats};
