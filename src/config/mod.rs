use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pipeline::Limits;

const DEFAULT_CONFIG: &str = include_str!("../../assets/default_config.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
    pub port: u16,
    /// Request validation bounds. Read once per request, never mutated by
    /// the pipeline.
    #[serde(default = "default_max_board_width")]
    pub max_board_width: usize,
    #[serde(default = "default_max_board_height")]
    pub max_board_height: usize,
}

fn default_max_board_width() -> usize { 500 }
fn default_max_board_height() -> usize { 500 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "localhost".to_string(),
            port: 8080,
            max_board_width: default_max_board_width(),
            max_board_height: default_max_board_height(),
        }
    }
}

/// Game parameter defaults, used whenever a CLI option or form field is
/// left blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    /// Per-frame delay in hundredths of a second.
    pub delay: u16,
    pub gen_total: u32,
    pub bk_color: String,
    pub fg_color: String,
    pub endless: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 200,
            board_height: 200,
            delay: 50,
            gen_total: 10,
            bk_color: "white".to_string(),
            fg_color: "black".to_string(),
            endless: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub game: GameConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("~/.config"));
        base.join("life_gif").join("config.toml")
    }

    pub fn load_or_default() -> Self {
        let path = Self::config_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        log::warn!("Failed to parse config at {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read config at {:?}: {}", path, e);
                }
            }
        } else {
            // Write default config
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = std::fs::write(&path, DEFAULT_CONFIG);
        }
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_board_width: self.server.max_board_width,
            max_board_height: self.server.max_board_height,
        }
    }
}
