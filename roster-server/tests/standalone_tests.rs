use std::sync::Arc;

use roster_server::StandaloneHost;
use roster_server::config::Config;
use roster_users::UserMap;

/// Helper to create a data folder holding the given record files
fn setup_data_folder(records: &[&str]) -> (tempfile::TempDir, Config) {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.data_folder = tmp.path().to_path_buf();
    let userdata = config.user_map().userdata_dir();
    std::fs::create_dir_all(&userdata).unwrap();
    for record in records {
        std::fs::write(userdata.join(record), b"").unwrap();
    }
    (tmp, config)
}

#[tokio::test]
async fn test_offline_lookup_through_standalone_host() {
    // GIVEN: A data folder with two record files
    let (_tmp, config) = setup_data_folder(&["steve.yml", "bad_name.yml"]);
    let host = Arc::new(StandaloneHost::new());
    let users = UserMap::open(&config.user_map(), host);

    // WHEN: The startup scan is awaited
    let found = users.reload_now().await.unwrap();

    // THEN: Both keys are known and the valid one loads offline
    assert_eq!(found, 2);
    let steve = users.get("Steve").await.unwrap();
    assert!(!steve.is_online());
    assert_eq!(steve.name(), "steve");

    // AND: A name the host refuses to build a handle for is absent, not an error
    assert!(users.get("bad name").await.is_none());
    assert!(users.exists("bad_name").await);
}

#[tokio::test]
async fn test_connected_player_resolves_live() {
    // GIVEN: A record file and the same player connected
    let (_tmp, config) = setup_data_folder(&["alex.yml"]);
    let host = Arc::new(StandaloneHost::new());
    host.connect("Alex");
    let users = UserMap::open(&config.user_map(), host.clone());
    users.reload_now().await.unwrap();

    // WHEN: Looking the player up
    let alex = users.get("alex").await.unwrap();

    // THEN: The live session wins
    assert!(alex.is_online());
    assert_eq!(alex.name(), "Alex");

    // AND: After disconnecting and removing, the record file is used again
    host.disconnect("Alex");
    users.remove("alex").await;
    let offline = users.get("alex").await.unwrap();
    assert!(!offline.is_online());

    users.close().await;
}
