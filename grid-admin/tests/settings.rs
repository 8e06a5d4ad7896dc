use grid_admin::paths::prune_logs;
use grid_admin::settings::{GridPreferences, Preferences, SqlitePreferences};
use grid_engine::{SortDirection, SortState};

async fn open(dir: &tempfile::TempDir) -> Preferences {
    Preferences::new(SqlitePreferences::open(dir.path().join("prefs.db")).await.unwrap())
}

#[tokio::test]
async fn test_grid_preferences_round_trip_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = open(&dir).await;
    assert_eq!(prefs.grid("announcements").await.unwrap(), None);

    let saved = GridPreferences::new(20, &SortState::new("RDCNT", SortDirection::Desc));
    prefs.save_grid("announcements", &saved).await.unwrap();
    drop(prefs);

    let prefs = open(&dir).await;
    let loaded = prefs.grid("announcements").await.unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.sort(), SortState::new("RDCNT", SortDirection::Desc));
    assert_eq!(prefs.scopes().await.unwrap(), vec!["announcements".to_string()]);
}

#[tokio::test]
async fn test_remove_and_unsorted() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = open(&dir).await;

    let saved = GridPreferences::new(10, &SortState::unsorted());
    prefs.save_grid("codes", &saved).await.unwrap();
    assert_eq!(prefs.grid("codes").await.unwrap().map(|p| p.sort()), Some(SortState::unsorted()));

    prefs.remove("codes", "grid").await.unwrap();
    assert_eq!(prefs.grid("codes").await.unwrap(), None);
}

#[test]
fn test_prune_keeps_newest_logs() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.log", "b.log", "c.log", "latest.log", "notes.txt"] {
        std::fs::write(dir.path().join(name), name).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    prune_logs(dir.path(), 1);

    let mut left: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(left, vec!["c.log", "latest.log", "notes.txt"]);
}
