//! Concurrent cache of user records backed by the key registry.
//!
//! Records live in a bounded `moka` cache, so idle or surplus records are dropped and
//! reloaded transparently on the next lookup. Concurrent misses for one key share a
//! single load.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::config::UserMapConfig;
use crate::error::{Result, UserError};
use crate::files::UserFiles;
use crate::key::Key;
use crate::loader::{Host, Loader};
use crate::registry::KeyRegistry;
use crate::user::{PlayerRef, User};

/// Point-in-time sizes, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMapStats {
    /// Keys in the registry
    pub known: usize,
    /// Records resident in memory (approximate)
    pub cached: u64,
}

/// Lookup of player records by name.
///
/// Cheap to clone; all clones share one cache and one registry.
#[derive(Clone)]
pub struct UserMap {
    inner: Arc<Inner>,
}

struct Inner {
    users: Cache<Key, Arc<User>>,
    keys: KeyRegistry,
    loader: Loader,
    files: UserFiles,
    runtime: Handle,
    scan_generation: AtomicU64,
    scan_lock: tokio::sync::Mutex<()>,
    scan_tasks: Mutex<Vec<AbortHandle>>,
}

impl UserMap {
    /// Create the user map and start the initial scan of the user data directory.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime. Use [`UserMap::open_on`] from other
    /// threads.
    pub fn open(config: &UserMapConfig, host: Arc<dyn Host>) -> Self {
        Self::open_on(config, host, Handle::current())
    }

    /// Like [`UserMap::open`], running background scans on `runtime`.
    pub fn open_on(config: &UserMapConfig, host: Arc<dyn Host>, runtime: Handle) -> Self {
        let files = UserFiles::from_config(config);

        let mut builder = Cache::<Key, Arc<User>>::builder()
            .name("users")
            .max_capacity(config.cache_capacity);
        if let Some(idle) = config.cache_idle_timeout {
            builder = builder.time_to_idle(idle);
        }

        let map = Self {
            inner: Arc::new(Inner {
                users: builder.build(),
                keys: KeyRegistry::new(),
                loader: Loader::new(host, files.clone()),
                files,
                runtime,
                scan_generation: AtomicU64::new(0),
                scan_lock: tokio::sync::Mutex::new(()),
                scan_tasks: Mutex::new(Vec::new()),
            }),
        };
        info!(
            dir = %map.inner.files.dir().display(),
            capacity = config.cache_capacity,
            "opened user map"
        );
        map.reload();
        map
    }

    /// Stop every running scan and drop every cached record.
    ///
    /// Scans still in flight on other handles are discarded instead of applied.
    pub async fn close(self) {
        self.inner.next_generation();
        // Waits for an apply in progress; later ones see a stale generation.
        let _guard = self.inner.scan_lock.lock().await;
        let tasks = std::mem::take(&mut *self.inner.scan_tasks.lock());
        for task in tasks {
            task.abort();
        }
        self.inner.users.invalidate_all();
        self.inner.users.run_pending_tasks().await;
        info!("closed user map");
    }

    /// Whether a player with this name is known. Never loads a record.
    pub async fn exists(&self, name: &str) -> bool {
        self.inner.keys.exists(name).await
    }

    /// Get the record for `name`, loading it on a miss.
    ///
    /// Returns `None` when the player does not exist or the load failed.
    pub async fn get(&self, name: &str) -> Option<Arc<User>> {
        let key = match Key::new(name) {
            Ok(key) => key,
            Err(err) => {
                debug!(name, %err, "invalid user name");
                return None;
            }
        };

        let inner = &self.inner;
        let loaded = inner
            .users
            .try_get_with(key.clone(), async {
                let user = inner.loader.resolve(key.as_str()).await?;
                inner.keys.add(key.clone()).await;
                Ok::<_, UserError>(Arc::new(user))
            })
            .await;

        match loaded {
            Ok(user) => Some(user),
            Err(err) if err.is_not_found() => {
                debug!(%key, "user not found");
                None
            }
            Err(err) => {
                warn!(%key, %err, "failed to load user");
                None
            }
        }
    }

    /// Get the record for a player, attaching a live session to it.
    ///
    /// A cached record is updated in place and returned, so existing holders see the
    /// session. On a miss the record is built from the session without consulting disk,
    /// unless a load of the same key is already running; then that load's record is
    /// kept and the session attached to it.
    pub async fn get_or_attach(&self, player: impl Into<PlayerRef>) -> Result<Arc<User>> {
        let session = match player.into() {
            PlayerRef::User(user) => return Ok(user),
            PlayerRef::Session(session) => session,
        };
        let key = Key::new(session.name())?;

        if let Some(user) = self.inner.users.get(&key).await {
            user.update(session);
            debug!(%key, "attached session to cached user");
            return Ok(user);
        }

        let fresh = Arc::new(User::online(key.clone(), session.clone()));
        let user = loop {
            // Same error type as `get`, so this joins a load already in flight.
            let attached = self
                .inner
                .users
                .try_get_with(key.clone(), {
                    let fresh = fresh.clone();
                    async move { Ok::<_, UserError>(fresh) }
                })
                .await;
            match attached {
                Ok(user) => break user,
                Err(err) => debug!(%key, %err, "joined load failed, attaching again"),
            }
        };
        if !Arc::ptr_eq(&user, &fresh) {
            user.update(session);
        }
        self.inner.keys.add(key.clone()).await;
        debug!(%key, "created user from session");
        Ok(user)
    }

    /// Forget a player: drop the key and its cached record.
    pub async fn remove(&self, name: &str) {
        let Ok(key) = Key::new(name) else {
            return;
        };
        self.inner.keys.remove(&key).await;
        self.inner.users.invalidate(&key).await;
        debug!(%key, "removed user");
    }

    pub async fn all_keys(&self) -> BTreeSet<Key> {
        self.inner.keys.all_keys().await
    }

    pub fn count(&self) -> usize {
        self.inner.keys.count()
    }

    pub fn stats(&self) -> UserMapStats {
        UserMapStats {
            known: self.inner.keys.count(),
            cached: self.inner.users.entry_count(),
        }
    }

    /// Path of the record file for `name`. Performs no I/O.
    pub fn record_file_path(&self, name: &str) -> PathBuf {
        self.inner.files.path_for(name)
    }

    /// Rescan the user data directory in the background.
    ///
    /// Returns immediately. If another scan is still running, whichever was requested
    /// last wins. A missing directory leaves everything as it was.
    pub fn reload(&self) {
        let generation = self.inner.next_generation();
        let inner = self.inner.clone();
        let task = self.inner.runtime.spawn(async move {
            if let Err(err) = inner.rescan(generation).await {
                warn!(%err, "user rescan failed, keeping previous keys");
            }
        });
        let mut tasks = self.inner.scan_tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(task.abort_handle());
    }

    /// Rescan the user data directory and wait for it.
    ///
    /// Returns the number of keys found. On error, or when the directory does not
    /// exist, the registry and cache are untouched.
    pub async fn reload_now(&self) -> Result<usize> {
        let generation = self.inner.next_generation();
        self.inner.rescan(generation).await
    }
}

impl Inner {
    fn next_generation(&self) -> u64 {
        self.scan_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn rescan(&self, generation: u64) -> Result<usize> {
        let Some(keys) = self.files.scan().await? else {
            return Ok(0);
        };
        let found = keys.len();

        let _guard = self.scan_lock.lock().await;
        if self.scan_generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "user rescan superseded by a newer one");
            return Ok(found);
        }

        self.users.invalidate_all();
        self.keys.rebuild(keys).await;
        info!(count = found, "loaded user keys");
        Ok(found)
    }
}
