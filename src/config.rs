//! Runtime configuration: an optional TOML file, overridden by flags and
//! `FRESHFARM_*` environment variables.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono::Duration;
use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::accounts::AccountPolicy;
use crate::logging::LogFormat;

const DEFAULT_BIND: &str = "127.0.0.1:5000";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";
const DEFAULT_RESET_TTL_MINUTES: i64 = 10;
const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path:?} could not be read: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path:?} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid bind address {0:?}")]
    Bind(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "freshfarm", about = "FreshFarm storefront backend", version)]
pub struct CliArgs {
    #[arg(long, env = "FRESHFARM_CONFIG", value_name = "FILE", help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "FRESHFARM_BIND", value_name = "ADDR", help = "HTTP bind address")]
    pub bind: Option<String>,

    #[arg(long, env = "FRESHFARM_LOG_FORMAT", value_enum, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    #[arg(
        long,
        env = "FRESHFARM_PUBLIC_URL",
        value_name = "URL",
        help = "Storefront URL used in verification and reset links"
    )]
    pub public_url: Option<String>,

    #[arg(long, env = "FRESHFARM_BCRYPT_COST", value_name = "N")]
    pub bcrypt_cost: Option<u32>,

    #[arg(
        long,
        env = "FRESHFARM_SESSION_SECRET",
        value_name = "SECRET",
        hide_env_values = true,
        help = "Key that signs login tokens; random per process when unset"
    )]
    pub session_secret: Option<String>,

    #[arg(long, env = "FRESHFARM_ADMIN_EMAIL", value_name = "EMAIL", requires = "admin_password")]
    pub admin_email: Option<String>,

    #[arg(long, env = "FRESHFARM_ADMIN_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind: Option<String>,
    log_format: Option<LogFormat>,
    public_url: Option<String>,
    bcrypt_cost: Option<u32>,
    reset_token_ttl_minutes: Option<i64>,
    session_secret: Option<String>,
    session_ttl_days: Option<i64>,
    admin: Option<AdminAccount>,
}

/// An admin account to create (or promote) at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminAccount {
    #[serde(default = "default_admin_name")]
    pub name: String,
    pub email: String,
    pub password: String,
}

fn default_admin_name() -> String {
    "Admin".to_string()
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub log_format: LogFormat,
    pub public_url: String,
    pub bcrypt_cost: u32,
    pub reset_token_ttl: Duration,
    /// `None` means tokens are signed with a key made up at startup.
    pub session_secret: Option<String>,
    pub session_ttl: Duration,
    pub admin: Option<AdminAccount>,
}

impl AppConfig {
    /// Merge flags over the config file over the defaults.
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let file = match args.config.as_deref() {
            Some(path) => load_config_file(path)?,
            None => FileConfig::default(),
        };

        let bind_text = args
            .bind
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_text
            .parse()
            .map_err(|_| ConfigError::Bind(bind_text.clone()))?;

        let bcrypt_cost = args
            .bcrypt_cost
            .or(file.bcrypt_cost)
            .unwrap_or(bcrypt::DEFAULT_COST);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "bcrypt cost must be between 4 and 31, got {bcrypt_cost}"
            )));
        }

        let ttl_minutes = file
            .reset_token_ttl_minutes
            .unwrap_or(DEFAULT_RESET_TTL_MINUTES);
        if ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "reset_token_ttl_minutes must be positive".into(),
            ));
        }

        let session_ttl_days = file.session_ttl_days.unwrap_or(DEFAULT_SESSION_TTL_DAYS);
        if session_ttl_days <= 0 {
            return Err(ConfigError::Invalid(
                "session_ttl_days must be positive".into(),
            ));
        }
        let session_secret = args
            .session_secret
            .or(file.session_secret)
            .filter(|s| !s.is_empty());
        if session_secret.as_ref().is_some_and(|s| s.len() < 16) {
            return Err(ConfigError::Invalid(
                "session secret must be at least 16 characters".into(),
            ));
        }

        let admin = match (args.admin_email, args.admin_password) {
            (Some(email), Some(password)) => Some(AdminAccount {
                name: file
                    .admin
                    .as_ref()
                    .map(|a| a.name.clone())
                    .unwrap_or_else(default_admin_name),
                email,
                password,
            }),
            _ => file.admin,
        };

        Ok(AppConfig {
            bind,
            log_format: args.log_format.or(file.log_format).unwrap_or_default(),
            public_url: args
                .public_url
                .or(file.public_url)
                .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string()),
            bcrypt_cost,
            reset_token_ttl: Duration::minutes(ttl_minutes),
            session_secret,
            session_ttl: Duration::days(session_ttl_days),
            admin,
        })
    }

    pub fn policy(&self) -> AccountPolicy {
        let mut policy = AccountPolicy {
            bcrypt_cost: self.bcrypt_cost,
            reset_token_ttl: self.reset_token_ttl,
            public_url: self.public_url.clone(),
            session_ttl: self.session_ttl,
            ..Default::default()
        };
        if let Some(secret) = &self.session_secret {
            policy.session_secret = secret.clone();
        }
        policy
    }
}

fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
