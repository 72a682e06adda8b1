use serde::{Deserialize, Serialize};

fn default_schema_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub search_endpoint: String,
    pub lookup_endpoint: String,
    pub country: String,
    pub media: String,
    pub limit: Option<u32>,
    pub request_timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            search_endpoint: "https://itunes.apple.com/search".to_string(),
            lookup_endpoint: "https://itunes.apple.com/lookup".to_string(),
            country: "ID".to_string(),
            media: "music".to_string(),
            limit: None,
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: "ffplay".to_string(),
            args: vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            catalog: CatalogConfig::default(),
            player: PlayerConfig::default(),
            log_level: default_log_level(),
        }
    }
}
