use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server_addr: String,
    pub seed_data: bool,
    /// Minimum trimmed length of a blog post body.
    pub min_content_length: usize,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:3000".to_string(),
            seed_data: true,
            min_content_length: 50,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Defaults, then the optional file `name`, then the environment.
    pub fn load_from(name: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let s = Config::builder()
            .set_default("server_addr", defaults.server_addr)?
            .set_default("seed_data", defaults.seed_data)?
            .set_default("min_content_length", defaults.min_content_length as u64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::default())
            .build()?;

        s.try_deserialize()
    }
}
