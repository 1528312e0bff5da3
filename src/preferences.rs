use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::session::{DurationError, Durations};

pub const VIEW_KEY: &str = "viewTime";
pub const REBUILD_KEY: &str = "rebuildTime";
pub const THEME_KEY: &str = "theme";

/// Slider bounds and step for both durations, in seconds
pub const SLIDER_MIN_SECS: u32 = 5;
pub const SLIDER_MAX_SECS: u32 = 120;
pub const SLIDER_STEP_SECS: u32 = 5;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub view_secs: u32,
    pub rebuild_secs: u32,
}

pub const PRESETS: [Preset; 3] = [
    Preset {
        name: "Quick",
        view_secs: 15,
        rebuild_secs: 10,
    },
    Preset {
        name: "Standard",
        view_secs: 30,
        rebuild_secs: 20,
    },
    Preset {
        name: "Deep",
        view_secs: 60,
        rebuild_secs: 45,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub durations: Durations,
    pub theme: Theme,
}

impl Preferences {
    /// Read the three entries, replacing anything missing or unusable with its
    /// default.
    pub fn from_entries(entries: &Map<String, Value>) -> Self {
        let defaults = Durations::default();
        let view = entry_secs(entries, VIEW_KEY)
            .filter(|&v| Durations::new(v, 1).is_ok())
            .unwrap_or(i64::from(defaults.view_secs()));
        let rebuild = entry_secs(entries, REBUILD_KEY)
            .filter(|&v| Durations::new(1, v).is_ok())
            .unwrap_or(i64::from(defaults.rebuild_secs()));
        let durations = Durations::new(view, rebuild).unwrap_or(defaults);

        let theme = entries
            .get(THEME_KEY)
            .and_then(|v| serde_json::from_value::<Theme>(v.clone()).ok())
            .unwrap_or_default();

        Self { durations, theme }
    }

    pub fn to_entries(&self) -> Map<String, Value> {
        let mut entries = Map::new();
        entries.insert(VIEW_KEY.into(), self.durations.view_secs().into());
        entries.insert(REBUILD_KEY.into(), self.durations.rebuild_secs().into());
        entries.insert(THEME_KEY.into(), self.theme.to_string().into());
        entries
    }

    pub fn active_preset(&self) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| {
            p.view_secs == self.durations.view_secs()
                && p.rebuild_secs == self.durations.rebuild_secs()
        })
    }
}

// Numbers may have been written as strings; parse the leading integer the way
// a lenient form field would.
fn entry_secs(entries: &Map<String, Value>, key: &str) -> Option<i64> {
    match entries.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            let end = s
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '-')))
                .map_or(s.len(), |(i, _)| i);
            s[..end].parse().ok()
        }
        _ => None,
    }
}

/// Key-value persistence for the preference entries
pub trait PreferenceStore {
    fn load(&self) -> Map<String, Value>;
    fn save(&self, entries: &Map<String, Value>) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Store at the platform config location
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FilePreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Map<String, Value> {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(Value::Object(entries)) = serde_json::from_slice::<Value>(&bytes) {
                return entries;
            }
            debug!(path = %self.path.display(), "ignoring unreadable preferences");
        }
        Map::new()
    }

    fn save(&self, entries: &Map<String, Value>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(entries).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

/// In-memory store; clones share the same entries, like two page loads
/// sharing one browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    entries: Rc<RefCell<Map<String, Value>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: Value) {
        self.entries.borrow_mut().insert(key.to_string(), value);
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Map<String, Value> {
        self.entries.borrow().clone()
    }

    fn save(&self, entries: &Map<String, Value>) -> std::io::Result<()> {
        *self.entries.borrow_mut() = entries.clone();
        Ok(())
    }
}

/// Loads preferences once and writes them back on every change
pub struct PreferencesManager {
    store: Box<dyn PreferenceStore>,
    current: Preferences,
}

impl std::fmt::Debug for PreferencesManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesManager")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl PreferencesManager {
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let current = Preferences::from_entries(&store.load());
        debug!(?current, "preferences loaded");
        Self { store, current }
    }

    pub fn current(&self) -> Preferences {
        self.current
    }

    pub fn durations(&self) -> Durations {
        self.current.durations
    }

    pub fn theme(&self) -> Theme {
        self.current.theme
    }

    /// Validate and persist both durations
    pub fn update(&mut self, view_secs: i64, rebuild_secs: i64) -> Result<Durations, DurationError> {
        let durations = Durations::new(view_secs, rebuild_secs)?;
        self.current.durations = durations;
        self.persist();
        Ok(durations)
    }

    pub fn apply_preset(&mut self, preset: &Preset) -> Durations {
        self.current.durations = Durations::new(
            i64::from(preset.view_secs),
            i64::from(preset.rebuild_secs),
        )
        .unwrap_or_default();
        self.persist();
        self.current.durations
    }

    /// Move the view slider by `steps` notches, clamped to the slider range
    pub fn nudge_view(&mut self, steps: i32) -> Durations {
        let view = slide(self.current.durations.view_secs(), steps);
        self.update(i64::from(view), i64::from(self.current.durations.rebuild_secs()))
            .unwrap_or(self.current.durations)
    }

    pub fn nudge_rebuild(&mut self, steps: i32) -> Durations {
        let rebuild = slide(self.current.durations.rebuild_secs(), steps);
        self.update(i64::from(self.current.durations.view_secs()), i64::from(rebuild))
            .unwrap_or(self.current.durations)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.current.theme.toggled())
    }

    pub fn set_theme(&mut self, theme: Theme) -> Theme {
        self.current.theme = theme;
        self.persist();
        theme
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.current.to_entries()) {
            warn!(error = %err, "failed to save preferences");
        }
    }
}

fn slide(value: u32, steps: i32) -> u32 {
    let moved = i64::from(value) + i64::from(steps) * i64::from(SLIDER_STEP_SECS);
    moved.clamp(i64::from(SLIDER_MIN_SECS), i64::from(SLIDER_MAX_SECS)) as u32
}
