use config::{Config, ConfigError, Environment, File};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: Option<AuthConfig>,
    pub cors: Option<CorsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                path: get_default_db_path(),
            },
            auth: None,
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            logging: None,
        }
    }
}

/// Where the JWT secret in a loaded config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtSecretSource {
    Configured,
    /// Generated and written back to the config file
    Generated,
    /// Generated but the config file could not be updated
    GeneratedUnsaved(String),
}

/// Result of [`ApiConfig::load`]. Carries what happened during loading so it
/// can be reported once logging is up.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: ApiConfig,
    pub path: PathBuf,
    pub jwt_secret_source: JwtSecretSource,
}

impl LoadedConfig {
    pub fn log_summary(&self) {
        tracing::info!("Loaded config from {}", self.path.display());
        match &self.jwt_secret_source {
            JwtSecretSource::Configured => {}
            JwtSecretSource::Generated => {
                tracing::info!("Generated new JWT secret for authentication");
            }
            JwtSecretSource::GeneratedUnsaved(error) => {
                tracing::info!("Generated new JWT secret for authentication");
                tracing::warn!("Failed to save JWT secret to config file: {error}");
                tracing::warn!("The JWT secret will be regenerated on next restart");
            }
        }
    }
}

impl ApiConfig {
    /// Loads the config file, writing a default one first if it does not exist.
    /// A missing JWT secret is generated and saved back to the file.
    pub fn load(path: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
        let config_path = path.unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, default_config_file(&get_default_db_path())).map_err(
                |e| ConfigError::Message(format!("Failed to write default config: {e}")),
            )?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .add_source(
                Environment::with_prefix("INTAKE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;
        config.database.path = expand_tilde(&config.database.path);

        let mut jwt_secret_source = JwtSecretSource::Configured;
        if config.jwt_secret().is_none() {
            let new_secret = generate_jwt_secret();
            config.auth.get_or_insert_with(AuthConfig::default).jwt_secret =
                Some(new_secret.clone());

            jwt_secret_source =
                match update_config_file_with_jwt_secret(&config_path, &new_secret) {
                    Ok(()) => JwtSecretSource::Generated,
                    Err(e) => JwtSecretSource::GeneratedUnsaved(e.to_string()),
                };
        }

        Ok(LoadedConfig {
            config,
            path: config_path,
            jwt_secret_source,
        })
    }

    pub fn jwt_secret(&self) -> Option<&str> {
        self.auth
            .as_ref()
            .and_then(|a| a.jwt_secret.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn token_ttl_hours(&self) -> i64 {
        self.auth
            .as_ref()
            .and_then(|a| a.token_ttl_hours)
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS)
    }

    pub fn allowed_origins(&self) -> &[String] {
        self.cors
            .as_ref()
            .map(|c| c.allowed_origins.as_slice())
            .unwrap_or(&[])
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging
            .as_ref()
            .and_then(|l| l.file.as_deref())
            .map(expand_tilde)
    }
}

fn default_config_file(db_path: &Path) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = 8080

[database]
path = "{}"

[auth]
# Generated on first start when left unset
# jwt_secret = "change-me"
token_ttl_hours = {}

[cors]
allowed_origins = ["http://localhost:3000"]

[logging]
# file = "~/.local/share/intake/api.log"
"#,
        db_path.display(),
        DEFAULT_TOKEN_TTL_HOURS
    )
}

fn expand_tilde(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = home::home_dir() {
            let path_str = path.to_string_lossy();
            let expanded = path_str.replacen("~", &home.to_string_lossy(), 1);
            return PathBuf::from(expanded);
        }
    }
    path.to_path_buf()
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("intake/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

fn get_default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("intake/intake.db")
    } else {
        PathBuf::from("intake.db")
    }
}

/// 48 random bytes, base64 encoded
fn generate_jwt_secret() -> String {
    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..48).map(|_| rng.random()).collect();
    base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &random_bytes)
}

/// Writes `jwt_secret` into the `[auth]` section, replacing a commented or
/// existing entry, or appending a new section when there is none.
fn update_config_file_with_jwt_secret(
    config_path: &Path,
    jwt_secret: &str,
) -> Result<(), std::io::Error> {
    let content = std::fs::read_to_string(config_path)?;
    let mut lines: Vec<String> = content.lines().map(|s| s.to_string()).collect();
    let secret_line = format!("jwt_secret = \"{}\"", jwt_secret);

    let mut in_auth_section = false;
    let mut seen_auth_section = false;
    let mut secret_updated = false;

    for i in 0..lines.len() {
        let line = lines[i].trim();

        if line == "[auth]" {
            in_auth_section = true;
            seen_auth_section = true;
            continue;
        }

        if in_auth_section && line.starts_with('[') && line.ends_with(']') {
            lines.insert(i, secret_line.clone());
            secret_updated = true;
            break;
        }

        if in_auth_section && (line.starts_with("jwt_secret") || line.starts_with("# jwt_secret"))
        {
            lines[i] = secret_line.clone();
            secret_updated = true;
            break;
        }
    }

    if !secret_updated {
        if !seen_auth_section {
            lines.push(String::new());
            lines.push("[auth]".to_string());
        }
        lines.push(secret_line);
    }

    let updated_content = lines.join("\n") + "\n";
    std::fs::write(config_path, updated_content)?;

    Ok(())
}
