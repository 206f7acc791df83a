//! Service settings.
//!
//! Layered in increasing precedence:
//!
//! 1. built-in defaults ([`Settings::default`])
//! 2. a TOML file, `ledgerline.toml` unless `LEDGERLINE_CONFIG` names another
//! 3. environment variables, `LEDGERLINE__<SECTION>__<KEY>`
//!    (e.g. `LEDGERLINE__SERVER__BIND=127.0.0.1:8080`,
//!    `LEDGERLINE__CORS__ALLOWED_ORIGINS=https://a.example,https://b.example`)

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

const DEFAULT_FILE: &str = "ledgerline.toml";
const FILE_VAR: &str = "LEDGERLINE_CONFIG";
const ENV_PREFIX: &str = "LEDGERLINE";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub cors: CorsSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// `host:port` to listen on.
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "0.0.0.0:3000".to_owned() }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Exact origins allowed to read responses. `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self { allowed_origins: vec!["http://localhost:4200".to_owned()] }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Bearer token required on API routes. Unset means anonymous access.
    pub api_key: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { filter: "info".to_owned(), format: LogFormat::Pretty }
    }
}

impl Settings {
    /// Loads settings from the default file location and the environment.
    pub fn load() -> Result<Self, Error> {
        let path = std::env::var(FILE_VAR).unwrap_or_else(|_| DEFAULT_FILE.to_owned());
        Self::load_from_path(path)
    }

    /// Loads settings from `path` (skipped if missing) and the environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default())?);

        if path.exists() {
            debug!(path = %path.display(), "loading settings file");
            builder = builder.add_source(File::from(path));
        } else {
            debug!(path = %path.display(), "settings file not found, using defaults and environment");
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}
