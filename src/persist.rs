use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

const CACHE_DIR: &str = "tennis_terminal";
const FLAGS_FILE: &str = "injury_flags.json";
const FLAGS_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct FlagsFile {
    version: u32,
    #[serde(default)]
    injury: HashMap<String, bool>,
}

pub fn load_into_state(state: &mut AppState) {
    if let Some(path) = cache_path() {
        load_state_from(&path, state);
    }
}

pub fn save_from_state(state: &mut AppState) {
    if let Some(path) = cache_path() {
        save_state_to(&path, state);
    }
}

pub fn load_state_from(path: &Path, state: &mut AppState) {
    state.injury_flags = load_flags(path);
    state.injury_flags_dirty = false;
}

/// Writes only when flags changed since the last save.
pub fn save_state_to(path: &Path, state: &mut AppState) {
    if !state.injury_flags_dirty {
        return;
    }
    // A failed write is reported once; the next new flag retries it.
    state.injury_flags_dirty = false;
    if let Err(err) = save_flags(path, &state.injury_flags) {
        tracing::warn!("saving injury flags failed: {err:#}");
        state.push_log(format!("[WARN] Injury flags not saved: {err}"));
    }
}

/// Missing, unreadable or version-mismatched files all load as empty.
pub fn load_flags(path: &Path) -> HashMap<String, bool> {
    let Ok(raw) = fs::read_to_string(path) else {
        return HashMap::new();
    };
    let Ok(file) = serde_json::from_str::<FlagsFile>(&raw) else {
        return HashMap::new();
    };
    if file.version != FLAGS_VERSION {
        return HashMap::new();
    }
    file.injury
}

pub fn save_flags(path: &Path, flags: &HashMap<String, bool>) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = FlagsFile {
        version: FLAGS_VERSION,
        injury: flags.clone(),
    };
    let json = serde_json::to_string_pretty(&file).context("serialize injury flags")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write injury flags")?;
    fs::rename(&tmp, path).context("swap injury flags")?;
    Ok(())
}

pub fn cache_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join(FLAGS_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(FLAGS_FILE),
    )
}
