use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, path::Path};
use thiserror::Error;
use tracing::{error, info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

const CONFIG_DIR: &str = "config";
const DEFAULT_RUN_ENV: &str = "development";

/// Runtime settings, layered from `config/*.toml` and `APP__*` variables.
///
/// Every field has a default, so an empty environment yields a working
/// development setup backed by a local SQLite file.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// `development`, `test`, `production`, ...
    pub environment: String,

    #[validate(custom = "validate_log_level")]
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs
    pub log_json: bool,
    /// Apply pending migrations on startup
    pub auto_migrate: bool,

    /// Comma-separated list of allowed CORS origins
    pub cors_allowed_origins: Option<String>,
    /// Allow any origin outside development
    pub cors_allow_any_origin: bool,

    #[validate(range(min = 1))]
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_connect_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    pub db_acquire_timeout_secs: u64,

    /// Insert attempts for generated identifiers before giving up with 409
    #[validate(range(min = 1, max = 20))]
    pub id_max_attempts: u32,

    #[validate(range(min = 1))]
    pub default_page_size: u64,
    #[validate(range(min = 1))]
    pub max_page_size: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://logistics.db?mode=rwc".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: DEFAULT_RUN_ENV.to_string(),
            log_level: "info".to_string(),
            log_json: false,
            auto_migrate: false,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            db_max_connections: 16,
            db_min_connections: 2,
            db_connect_timeout_secs: 30,
            db_idle_timeout_secs: 600,
            db_acquire_timeout_secs: 8,
            id_max_attempts: 5,
            default_page_size: 20,
            max_page_size: 200,
        }
    }
}

impl AppConfig {
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            ..Default::default()
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case(DEFAULT_RUN_ENV)
    }

    /// Configured CORS origins, trimmed, empties dropped.
    pub fn allowed_origins(&self) -> Vec<&str> {
        self.cors_allowed_origins
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Any-origin CORS is allowed in development or when explicitly enabled.
    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    /// Cross-field rules the derive cannot express.
    fn check_consistency(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut reject = |field: &'static str, message: &'static str| {
            let mut err = ValidationError::new(field);
            err.message = Some(message.into());
            errors.add(field, err);
        };

        if self.allowed_origins().is_empty() && !self.should_allow_permissive_cors() {
            reject(
                "cors_allowed_origins",
                "set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true outside development",
            );
        }
        if self.default_page_size > self.max_page_size {
            reject(
                "default_page_size",
                "default_page_size must not exceed max_page_size",
            );
        }
        if self.db_min_connections > self.db_max_connections {
            reject(
                "db_min_connections",
                "db_min_connections must not exceed db_max_connections",
            );
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level.parse::<tracing::Level>() {
        Ok(_) => Ok(()),
        Err(_) => {
            let mut err = ValidationError::new("log_level");
            err.message = Some("must be one of: trace, debug, info, warn, error".into());
            Err(err)
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("logistics_api={level},tower_http=debug")));
    let builder = fmt().with_env_filter(filter).with_target(true);

    // A subscriber may already be installed (tests, the migration binary).
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        warn!("tracing subscriber already initialised");
    }
}

/// Loads `config/default.toml`, then `config/{RUN_ENV}.toml`, then
/// `config/docker.toml` when `DOCKER` is set, then `APP__*` variables.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    load_config_from(Path::new(CONFIG_DIR))
}

pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_RUN_ENV.to_string());
    info!(run_env = %run_env, dir = %config_dir.display(), "loading configuration");

    let layer = |name: &str| File::from(config_dir.join(name)).required(false);
    let mut builder = Config::builder()
        .add_source(layer("default"))
        .add_source(layer(&run_env));
    if env::var_os("DOCKER").is_some() {
        builder = builder.add_source(layer("docker"));
    }

    let app_config: AppConfig = builder
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()?;

    if let Err(errors) = app_config
        .validate()
        .and_then(|()| app_config.check_consistency())
    {
        error!(%errors, "invalid configuration");
        return Err(AppConfigError::Validation(errors));
    }
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn production() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "production".into(),
        )
    }

    fn write_layer(dir: &TempDir, filename: &str, content: &str) {
        let mut file = std::fs::File::create(dir.path().join(filename)).unwrap();
        writeln!(file, "{}", content).unwrap();
    }

    #[test]
    fn production_needs_origins_or_explicit_opt_in() {
        let mut cfg = production();
        let errors = cfg.check_consistency().unwrap_err();
        assert!(errors.field_errors().contains_key("cors_allowed_origins"));

        cfg.cors_allow_any_origin = true;
        assert!(cfg.check_consistency().is_ok());

        cfg.cors_allow_any_origin = false;
        cfg.cors_allowed_origins = Some(" https://dispatch.example.com , ,".into());
        assert!(cfg.check_consistency().is_ok());
        assert_eq!(cfg.allowed_origins(), vec!["https://dispatch.example.com"]);
    }

    #[test]
    fn inconsistent_limits_are_rejected() {
        let mut cfg = production();
        cfg.environment = "development".into();
        cfg.default_page_size = 500;
        cfg.db_min_connections = 40;

        let errors = cfg.check_consistency().unwrap_err();
        assert!(errors.field_errors().contains_key("default_page_size"));
        assert!(errors.field_errors().contains_key("db_min_connections"));
    }

    #[test]
    fn default_layer_is_read_and_validated() {
        let dir = TempDir::new().unwrap();
        write_layer(
            &dir,
            "default.toml",
            r#"
                database_url = "sqlite://fleet.db?mode=rwc"
                port = 9090
                id_max_attempts = 3
            "#,
        );

        let config = load_config_from(dir.path()).unwrap();
        assert_eq!(config.database_url(), "sqlite://fleet.db?mode=rwc");
        assert_eq!(config.port, 9090);
        assert_eq!(config.id_max_attempts, 3);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let dir = TempDir::new().unwrap();
        write_layer(&dir, "default.toml", r#"log_level = "loud""#);

        match load_config_from(dir.path()) {
            Err(AppConfigError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("log_level"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        write_layer(&dir, "default.toml", r#"jwt_secret = "nope""#);

        assert!(matches!(
            load_config_from(dir.path()),
            Err(AppConfigError::Load(_))
        ));
    }
}
