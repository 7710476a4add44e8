use chrono::Duration;
use sqlx::postgres::PgConnectOptions;
use std::{env, fmt, str::FromStr};

/// Error raised while assembling [`Config`] from the environment.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has invalid value {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Connection parameters for the Postgres store.
///
/// `url` takes precedence over the individual parts when present.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server_port: u16,
    pub server_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").filter(|v| !v.is_empty());
        // The individual parts are only mandatory when no URL is given.
        let part = |key: &'static str| -> Result<String, ConfigError> {
            match lookup(key) {
                Some(value) => Ok(value),
                None if url.is_some() => Ok(String::new()),
                None => Err(ConfigError::Missing(key)),
            }
        };

        let database = DatabaseConfig {
            host: lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(&lookup, "POSTGRES_PORT", 5432)?,
            user: part("POSTGRES_USER")?,
            password: part("POSTGRES_PASSWORD")?,
            name: part("POSTGRES_DB")?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            url,
        };

        let auth = AuthConfig {
            jwt_secret: lookup("JWT_SECRET")
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            access_token_ttl: ttl_or(
                &lookup,
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                30,
                Duration::try_minutes,
            )?,
            refresh_token_ttl: ttl_or(
                &lookup,
                "REFRESH_TOKEN_EXPIRE_DAYS",
                7,
                Duration::try_days,
            )?,
        };

        Ok(Self {
            database,
            auth,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Parses a positive token lifetime in the unit `to_duration` converts from.
fn ttl_or<F>(
    lookup: &F,
    key: &'static str,
    default: i64,
    to_duration: fn(i64) -> Option<Duration>,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let amount: i64 = parse_or(lookup, key, default)?;
    match to_duration(amount) {
        Some(ttl) if amount > 0 => Ok(ttl),
        _ => Err(ConfigError::Invalid {
            key,
            value: amount.to_string(),
        }),
    }
}
