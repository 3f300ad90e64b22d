use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Interval durations and long-break cadence, all in whole seconds.
///
/// Replaced wholesale on a settings update; the timer never sees a
/// partially-mutated config. All four fields must be positive — `load`
/// enforces this and falls back to defaults otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub work_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
    /// Session index at which a long break is substituted for a short one.
    pub long_break_delay: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_secs: 1500,
            short_break_secs: 300,
            long_break_secs: 1200,
            long_break_delay: 4,
        }
    }
}

impl Config {
    pub fn is_valid(&self) -> bool {
        self.work_secs > 0
            && self.short_break_secs > 0
            && self.long_break_secs > 0
            && self.long_break_delay > 0
    }
}

/// User-facing settings: durations in minutes, delay in pairs of sessions
/// (one work interval plus its break). Converted on the way into storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingsUpdate {
    pub work_mins: u64,
    pub short_break_mins: u64,
    pub long_break_mins: u64,
    pub long_break_pairs: u32,
}

impl From<SettingsUpdate> for Config {
    fn from(s: SettingsUpdate) -> Self {
        Self {
            work_secs: s.work_mins * 60,
            short_break_secs: s.short_break_mins * 60,
            long_break_secs: s.long_break_mins * 60,
            long_break_delay: s.long_break_pairs * 2,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pomo") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pomo_config.json")
        };
        Self { path }
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

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                if cfg.is_valid() {
                    return cfg;
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
