use std::collections::HashMap;
use std::fs;

use tennis_terminal::persist::{load_flags, load_state_from, save_flags, save_state_to};
use tennis_terminal::state::{AppState, Delta, apply_delta};

#[test]
fn flags_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("injury_flags.json");
    let mut flags = HashMap::new();
    flags.insert("Carlos Alcaraz".to_string(), true);
    flags.insert("Jannik Sinner".to_string(), false);

    save_flags(&path, &flags).expect("save should succeed");
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(load_flags(&path), flags);
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert!(load_flags(&dir.path().join("absent.json")).is_empty());
}

#[test]
fn corrupt_or_foreign_version_loads_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("injury_flags.json");

    fs::write(&path, "{ not json").expect("write");
    assert!(load_flags(&path).is_empty());

    fs::write(&path, r#"{"version": 99, "injury": {"Carlos Alcaraz": true}}"#).expect("write");
    assert!(load_flags(&path).is_empty());

    fs::write(&path, r#"{"version": 1, "injury": {"Carlos Alcaraz": true}}"#).expect("write");
    assert_eq!(load_flags(&path).get("Carlos Alcaraz"), Some(&true));
}

#[test]
fn clean_state_skips_the_write() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("injury_flags.json");
    let mut state = AppState::default();
    state
        .injury_flags
        .insert("Carlos Alcaraz".to_string(), true);

    save_state_to(&path, &mut state);
    assert!(!path.exists());
}

#[test]
fn dirty_state_is_written_and_marked_clean() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("injury_flags.json");
    let mut state = AppState::default();
    apply_delta(
        &mut state,
        Delta::InjuryAlert {
            player: "Carlos Alcaraz".to_string(),
        },
    );
    assert!(state.injury_flags_dirty);

    save_state_to(&path, &mut state);
    assert!(!state.injury_flags_dirty);
    assert_eq!(load_flags(&path).get("Carlos Alcaraz"), Some(&true));

    let mut reloaded = AppState::default();
    reloaded.injury_flags_dirty = true;
    load_state_from(&path, &mut reloaded);
    assert!(reloaded.has_injury_alert("Carlos Alcaraz"));
    assert!(!reloaded.injury_flags_dirty);
}

#[test]
fn failed_write_clears_dirty_and_logs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "file").expect("write");
    let path = blocker.join("injury_flags.json");
    let mut state = AppState::default();
    state.mark_injury_alert("Jannik Sinner");

    save_state_to(&path, &mut state);
    assert!(!state.injury_flags_dirty);
    assert!(state.logs.back().is_some_and(|l| l.contains("[WARN]")));
}
