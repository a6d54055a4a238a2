//! Persisted user state: username, theme choice, recent items, window
//! preferences. Stored as JSON under the platform data dir; a corrupt or
//! missing file degrades to defaults rather than failing startup.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};

const APP_HOME_DIR: &str = "foxkit";
const STATE_FILE: &str = "userdata.json";
const RECENT_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct WindowPreferences {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub maximized: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserState {
    pub username: String,
    pub theme: String,
    pub recent: Vec<String>,
    pub window: WindowPreferences,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            username: "Guest".to_string(),
            theme: "dark".to_string(),
            recent: Vec::new(),
            window: WindowPreferences::default(),
        }
    }
}

impl UserState {
    /// Move (or insert) a name to the front of the recents list.
    pub fn push_recent(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        self.recent.retain(|n| n != name);
        self.recent.insert(0, name.to_string());
        self.recent.truncate(RECENT_LIMIT);
    }

    pub fn remove_recent(&mut self, name: &str) {
        self.recent.retain(|n| n != name);
    }
}

pub struct UserStateStore {
    path: PathBuf,
    state: UserState,
    dirty: bool,
}

impl UserStateStore {
    pub fn load() -> Result<Self> {
        Self::load_from(storage_path()?)
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        let state = match fs::read(&path) {
            Ok(data) => match serde_json::from_slice::<UserState>(&data) {
                Ok(parsed) => parsed,
                Err(error) => {
                    log::warn!("failed to parse user state at {path:?}: {error}");
                    UserState::default()
                }
            },
            Err(error) => {
                if error.kind() != io::ErrorKind::NotFound {
                    log::warn!("failed to read user state at {path:?}: {error}");
                }
                UserState::default()
            }
        };

        Ok(Self {
            path,
            state,
            dirty: false,
        })
    }

    pub fn state(&self) -> &UserState {
        &self.state
    }

    pub fn set_username(&mut self, username: &str) {
        if self.state.username != username {
            self.state.username = username.to_string();
            self.dirty = true;
        }
    }

    pub fn set_theme(&mut self, theme: &str) {
        if self.state.theme != theme {
            self.state.theme = theme.to_string();
            self.dirty = true;
        }
    }

    pub fn push_recent(&mut self, name: &str) {
        let before = self.state.recent.clone();
        self.state.push_recent(name);
        if self.state.recent != before {
            self.dirty = true;
        }
    }

    pub fn remove_recent(&mut self, name: &str) {
        let before = self.state.recent.len();
        self.state.remove_recent(name);
        if self.state.recent.len() != before {
            self.dirty = true;
        }
    }

    pub fn update_window(&mut self, prefs: WindowPreferences) {
        if self.state.window != prefs {
            self.state.window = prefs;
            self.dirty = true;
        }
    }

    /// Write the state back if anything changed since load/last save.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&self.state)?;
        fs::write(&self.path, data)?;
        self.dirty = false;
        Ok(())
    }
}

impl Drop for UserStateStore {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(error) = self.save() {
                log::warn!("failed to persist user state during drop: {error}");
            }
        }
    }
}

fn storage_path() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("no data directory available"))?;
    Ok(base.join(APP_HOME_DIR).join(STATE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStateStore::load_from(dir.path().join("userdata.json")).unwrap();
        assert_eq!(store.state().username, "Guest");
        assert_eq!(store.state().theme, "dark");
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userdata.json");
        fs::write(&path, b"{not json").unwrap();
        let store = UserStateStore::load_from(path).unwrap();
        assert_eq!(store.state().username, "Guest");
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("userdata.json");

        let mut store = UserStateStore::load_from(path.clone()).unwrap();
        store.set_username("fox");
        store.set_theme("light");
        store.push_recent("clip-a");
        store.push_recent("clip-b");
        store.save().unwrap();

        let reloaded = UserStateStore::load_from(path).unwrap();
        assert_eq!(reloaded.state().username, "fox");
        assert_eq!(reloaded.state().theme, "light");
        assert_eq!(reloaded.state().recent, vec!["clip-b", "clip-a"]);
    }

    #[test]
    fn recents_dedupe_and_cap() {
        let mut state = UserState::default();
        for i in 0..12 {
            state.push_recent(&format!("item-{i}"));
        }
        state.push_recent("item-5");
        assert_eq!(state.recent.len(), RECENT_LIMIT);
        assert_eq!(state.recent[0], "item-5");
        assert_eq!(
            state.recent.iter().filter(|n| n.as_str() == "item-5").count(),
            1
        );
    }

    #[test]
    fn clean_store_skips_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userdata.json");
        let mut store = UserStateStore::load_from(path.clone()).unwrap();
        store.save().unwrap();
        assert!(!path.exists());
    }
}
