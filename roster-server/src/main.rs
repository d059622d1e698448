use std::sync::Arc;

use anyhow::Context;
use roster_server::StandaloneHost;
use roster_server::config::Config;
use roster_users::UserMap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for structured logging
    #[cfg(debug_assertions)]
    let log_level = tracing::Level::DEBUG;
    #[cfg(not(debug_assertions))]
    let log_level = tracing::Level::INFO;

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();
    tracing::info!("Starting Roster user lookup...");
    // Load configuration from environment variables or use defaults
    let config = Config::from_env();
    tracing::info!(
        "Configuration: data_folder={}, extension={}, cache_capacity={}, cache_idle={}s",
        config.data_folder.display(),
        config.user_file_extension,
        config.user_cache_capacity,
        config.user_cache_idle.map_or(0, |idle| idle.as_secs()),
    );

    let host = Arc::new(StandaloneHost::new());
    let sessions: Vec<_> = config
        .online_players
        .iter()
        .map(|name| host.connect(name))
        .collect();

    let users = UserMap::open(&config.user_map(), host.clone());
    let found = users
        .reload_now()
        .await
        .context("failed to scan user data")?;
    tracing::info!("Known users: {}", found);

    for session in sessions {
        let user = users.get_or_attach(session).await?;
        tracing::info!(key = %user.key(), name = %user.name(), "player online");
    }

    for name in std::env::args().skip(1) {
        match users.get(&name).await {
            Some(user) => tracing::info!(
                key = %user.key(),
                name = %user.name(),
                online = user.is_online(),
                file = ?user.data_file(),
                "found user"
            ),
            None => tracing::info!(
                %name,
                file = %users.record_file_path(&name).display(),
                "user not found"
            ),
        }
    }

    let stats = users.stats();
    tracing::info!(known = stats.known, cached = stats.cached, "user map stats");
    users.close().await;
    Ok(())
}
