use std::{env, fmt, fs, io};

use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

const DEFAULT_CONFIG_PATH: &str = "megadisp-config.toml";

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub user: Option<String>,
    pub password: Option<String>,
    /// Connection string, e.g. `postgres://db-host:5432/megadisp`.
    pub connect: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: None,
            password: None,
            connect: None,
            max_connections: 5,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("connect", &self.connect)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    /// Connection options with the configured credentials applied on top of
    /// whatever the connection string carries.
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        let connect = self
            .connect
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .context("database connection string missing; set DB_CONNECT or database.connect")?;

        let mut opts: PgConnectOptions = connect
            .parse()
            .context("invalid database connection string")?;
        if let Some(user) = &self.user {
            opts = opts.username(user);
        }
        if let Some(password) = &self.password {
            opts = opts.password(password);
        }
        Ok(opts)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub http: HttpConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load from the TOML file named by `MEGADISP_CONFIG`, then apply the
    /// `DB_USER` / `DB_PASSWORD` / `DB_CONNECT` overrides.
    ///
    /// The default file may be absent; an explicitly named one may not.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = env::var("MEGADISP_CONFIG").ok();
        let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let mut cfg = match fs::read_to_string(path) {
            Ok(contents) => {
                Self::from_toml(&contents).with_context(|| format!("invalid config file {path}"))?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
                tracing::info!(path, "no config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e).with_context(|| format!("failed to read config file {path}")),
        };

        cfg.apply_env(|key| env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(user) = lookup("DB_USER") {
            self.database.user = Some(user);
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = Some(password);
        }
        if let Some(connect) = lookup("DB_CONNECT") {
            self.database.connect = Some(connect);
        }
    }
}
