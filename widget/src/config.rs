// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

use once_cell::sync::OnceCell;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SYSTEM_PATH: &str = "/etc/pop-system-updater/widget.ron";
pub const LOCAL_PATH: &str = ".config/pop-system-updater/widget.ron";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Locale used when a translation is missing for the requested locale.
    pub fallback_locale: String,

    /// Locale to display before the host first localizes the widget.
    ///
    /// When unset, the desktop session's preferred language is used.
    pub startup_locale: Option<String>,

    /// Directory of `<locale>.ron` translations replacing the bundled ones.
    pub translations: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_locale: String::from("en"),
            startup_locale: None,
            translations: None,
        }
    }
}

impl Config {
    pub fn startup_locale(&self) -> String {
        self.startup_locale
            .clone()
            .or_else(crate::locale::requested)
            .unwrap_or_else(|| self.fallback_locale.clone())
    }
}

/// The process configuration, loaded on first use.
pub fn config() -> &'static Config {
    static CONFIG: OnceCell<Config> = OnceCell::new();
    CONFIG.get_or_init(load_config)
}

/// Loads the session config, else the system config, else the defaults.
pub fn load_config() -> Config {
    let mut candidates = Vec::with_capacity(2);

    if let Some(home) = home_dir() {
        candidates.push(home.join(LOCAL_PATH));
    }

    candidates.push(PathBuf::from(SYSTEM_PATH));

    candidates
        .iter()
        .find_map(|path| load::<Config>(path))
        .unwrap_or_default()
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let file = std::fs::read_to_string(path).ok()?;

    info!("loading config: {:?}", path);

    match ron::from_str::<T>(&file) {
        Ok(config) => Some(config),
        Err(why) => {
            error!("failed to read config {:?}: {}", path, why);
            None
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
