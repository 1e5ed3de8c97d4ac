//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override `[supabase]` settings.
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content, |key| std::env::var(key).ok())
}

/// Load configuration from defaults and environment only.
pub fn load_default_config() -> Result<GateConfig, ConfigError> {
    parse_config("", |key| std::env::var(key).ok())
}

/// Parse TOML, apply environment overrides, validate.
///
/// `env` is injected so overrides can be tested without touching the
/// process environment.
pub fn parse_config<F>(content: &str, env: F) -> Result<GateConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: GateConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    if let Some(url) = env(ENV_SUPABASE_URL) {
        config.supabase.url = url;
    }
    if let Some(key) = env(ENV_SUPABASE_ANON_KEY) {
        config.supabase.anon_key = key;
    }
    if let Some(key) = env(ENV_SUPABASE_SERVICE_ROLE_KEY) {
        config.supabase.service_role_key = key;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = parse_config("", no_env).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.gate.enabled);
        assert_eq!(config.supabase.auth_cookie, "supabase-auth-token");
    }

    #[test]
    fn test_partial_file() {
        let config = parse_config(
            r#"
            [gate]
            extra_public_paths = ["/status", "/changelog/**/*"]

            [observability]
            log_format = "json"
            metrics_enabled = false
            "#,
            no_env,
        )
        .unwrap();

        assert_eq!(config.gate.extra_public_paths.len(), 2);
        assert!(!config.observability.metrics_enabled);
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = parse_config(
            r#"
            [supabase]
            url = "https://file.example.com"
            service_role_key = "from-file"
            "#,
            |key| match key {
                ENV_SUPABASE_URL => Some("https://env.example.com".to_string()),
                _ => None,
            },
        )
        .unwrap();

        assert_eq!(config.supabase.url, "https://env.example.com");
        assert_eq!(config.supabase.service_role_key, "from-file");
    }

    #[test]
    fn test_parse_and_validation_errors() {
        assert!(matches!(
            parse_config("[gate\n", no_env),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse_config("[timeouts]\nrequest_secs = 0\n", no_env),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_example_config_is_valid() {
        let config = parse_config(include_str!("../../app-gate.example.toml"), no_env).unwrap();
        assert_eq!(config.upstream.address.as_deref(), Some("127.0.0.1:3000"));
        assert_eq!(config.gate.extra_public_paths, vec!["/status"]);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nbind_address = \"127.0.0.1:9000\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");

        let missing = load_config(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
