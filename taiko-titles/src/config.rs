use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const TITLE_LIST_URL: &str = "https://wikiwiki.jp/taiko-fumen/%E4%BD%9C%E5%93%81/%E6%96%B0AC/%E6%AE%B5%E4%BD%8D%E3%83%BB%E7%A7%B0%E5%8F%B7%E3%81%AE%E4%B8%80%E8%A6%A7";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlesConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Directory holding `#<color>.png` frames and the bundled font
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,

    #[serde(default = "default_font_file")]
    pub font_file: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_source_url")]
    pub source_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Queries matching this many titles or more are refused
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,

    #[serde(default)]
    pub card: CardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_title_font_size")]
    pub title_font_size: f32,

    #[serde(default = "default_body_font_size")]
    pub body_font_size: f32,

    #[serde(default)]
    pub labels: CardLabels,

    /// Extra (pattern, replacement) pairs applied after the built-in ones
    #[serde(default)]
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardLabels {
    #[serde(default = "default_available_label")]
    pub available: String,
    #[serde(default = "default_yes_label")]
    pub yes: String,
    #[serde(default = "default_no_label")]
    pub no: String,
    #[serde(default = "default_condition_label")]
    pub condition: String,
    #[serde(default = "default_tips_label")]
    pub tips: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub pattern: String,
    pub replacement: String,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("taiko_titles.db")
}

fn default_resources_dir() -> PathBuf {
    PathBuf::from("resources")
}

fn default_font_file() -> PathBuf {
    PathBuf::from("resources/title_font.otf")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_source_url() -> String {
    TITLE_LIST_URL.to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()
}

fn default_max_matches() -> usize {
    5
}

fn default_width() -> u32 {
    800
}

fn default_title_font_size() -> f32 {
    32.0
}

fn default_body_font_size() -> f32 {
    24.0
}

fn default_available_label() -> String {
    "可取得".to_string()
}

fn default_yes_label() -> String {
    "是".to_string()
}

fn default_no_label() -> String {
    "否".to_string()
}

fn default_condition_label() -> String {
    "取得条件".to_string()
}

fn default_tips_label() -> String {
    "提示".to_string()
}

impl Default for TitlesConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            resources_dir: default_resources_dir(),
            font_file: default_font_file(),
            output_dir: default_output_dir(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
            source_url: default_source_url(),
            user_agent: default_user_agent(),
            max_matches: default_max_matches(),
            card: CardConfig::default(),
        }
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            title_font_size: default_title_font_size(),
            body_font_size: default_body_font_size(),
            labels: CardLabels::default(),
            replacements: Vec::new(),
        }
    }
}

impl Default for CardLabels {
    fn default() -> Self {
        Self {
            available: default_available_label(),
            yes: default_yes_label(),
            no: default_no_label(),
            condition: default_condition_label(),
            tips: default_tips_label(),
        }
    }
}

impl TitlesConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: TitlesConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Read the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
