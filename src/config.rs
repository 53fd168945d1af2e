use std::env;
use std::time::Duration;
use anyhow::{Context, Result};

use crate::models::StatusSet;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    pub request_timeout: Duration,
    pub statuses: StatusSet,
}

/// Connection parameters for the todo database.
/// TLS is never negotiated: the service always connects with `sslmode=disable`.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
    pub bootstrap_schema: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let request_timeout_secs = lookup("REQUEST_TIMEOUT")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT must be a valid number of seconds")?;

        let statuses = lookup("TODO_STATUSES")
            .map(|list| StatusSet::parse(&list))
            .unwrap_or_default();

        let database = DatabaseConfig::from_lookup(&lookup)?;

        let config = Config {
            port,
            database,
            request_timeout: Duration::from_secs(request_timeout_secs),
            statuses,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        if self.request_timeout.as_secs() == 0 {
            anyhow::bail!("REQUEST_TIMEOUT must be greater than 0");
        }

        if self.statuses.is_empty() {
            anyhow::bail!("TODO_STATUSES must name at least one status");
        }

        // Pool waits must give up before the request deadline does
        if self.database.connection_timeout >= self.request_timeout {
            anyhow::bail!("DB_CONNECTION_TIMEOUT must be shorter than REQUEST_TIMEOUT");
        }

        self.database.validate()
    }
}

impl DatabaseConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());

        let port = lookup("DB_PORT")
            .unwrap_or_else(|| "5432".to_string())
            .parse::<u16>()
            .context("DB_PORT must be a valid port number")?;

        let database = lookup("DB_NAME").context("DB_NAME environment variable is required")?;
        let username = lookup("DB_USER").context("DB_USER environment variable is required")?;
        let password =
            lookup("DB_PASSWORD").context("DB_PASSWORD environment variable is required")?;

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let connection_timeout_secs = lookup("DB_CONNECTION_TIMEOUT")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u64>()
            .context("DB_CONNECTION_TIMEOUT must be a valid number of seconds")?;

        let bootstrap_schema = lookup("DB_BOOTSTRAP_SCHEMA")
            .map(|value| parse_flag(&value))
            .transpose()
            .context("DB_BOOTSTRAP_SCHEMA must be true or false")?
            .unwrap_or(true);

        Ok(DatabaseConfig {
            host,
            port,
            database,
            username,
            password,
            max_connections,
            connection_timeout: Duration::from_secs(connection_timeout_secs),
            bootstrap_schema,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("Database host cannot be empty");
        }

        if self.port == 0 {
            anyhow::bail!("Database port must be greater than 0");
        }

        if self.database.trim().is_empty() {
            anyhow::bail!("Database name cannot be empty");
        }

        if self.username.trim().is_empty() {
            anyhow::bail!("Database username cannot be empty");
        }

        if self.max_connections == 0 {
            anyhow::bail!("Max connections must be greater than 0");
        }

        if self.connection_timeout.as_secs() == 0 {
            anyhow::bail!("Connection timeout must be greater than 0");
        }

        Ok(())
    }

    /// libpq-style key/value string, password masked. Used for logging only.
    pub fn describe(&self) -> String {
        format!(
            "host={} port={} user={} password=*** dbname={} sslmode=disable",
            self.host, self.port, self.username, self.database
        )
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised boolean '{}'", other),
    }
}
