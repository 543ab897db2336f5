use std::net::IpAddr;

use tokio::fs;

pub async fn read() -> anyhow::Result<Config> {
    let config_path = "pantry_api.toml";

    let canon = tokio::fs::canonicalize(".").await?;
    tracing::info!("try reading config file {config_path} at {canon:?}");

    let config = if fs::try_exists(config_path).await? {
        tracing::info!("found config");

        let config = fs::read_to_string(config_path).await?;
        let config = toml::from_str(&config)?;
        tracing::info!("read config");
        config
    } else {
        tracing::info!("config does not exist, using default config");
        Config::default()
    };

    tracing::info!("using config: {config:#?}");
    Ok(config)
}

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub db: Option<DbConfig>,
    pub generation: Option<GenerationConfig>,
}

impl Default for Config {
    fn default() -> Self {
        #[cfg(debug_assertions)] let db = {
            tracing::info!("using default config for db in debug");
            Some(DbConfig::default())
        };
        #[cfg(not(debug_assertions))] let db = {
            tracing::warn!("no db config provided, running without db");
            None
        };

        let server = ServerConfig::default();
        let generation = Some(GenerationConfig::default());

        Self { db, server, generation }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: format!("mongodb://localhost:27017"),
            database: format!("pantry"),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        #[cfg(not(debug_assertions))]
        tracing::warn!("using default server config in release");

        ServerConfig {
            address: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
        }
    }
}

/// Where the content generation service lives and which models to ask.
///
/// The api key itself never goes into the config file, only the name of the
/// environment variable holding it.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub api_key_env: String,
    pub base_url: String,
    pub text_model: String,
    pub plan_model: String,
    pub image_model: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key_env: format!("GEMINI_API_KEY"),
            base_url: format!("https://generativelanguage.googleapis.com/v1beta"),
            text_model: format!("gemini-2.5-flash"),
            plan_model: format!("gemini-2.5-pro"),
            image_model: format!("gemini-2.5-flash-image"),
        }
    }
}
