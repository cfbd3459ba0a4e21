use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::model::leave_balance::LeavePolicy;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub database_max_connections: u32,

    // Session cookie signing
    pub session_secret: String,
    pub session_ttl: usize,

    /// Yearly leave allotments used by the employee dashboard
    pub leave_policy: LeavePolicy,

    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub log_dir: String,
}

/// First admin account, created at startup when the roster has no admin yet.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let bootstrap_admin = match (
            env::var("BOOTSTRAP_ADMIN_USERNAME").ok(),
            env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            _ => None,
        };

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://hr_portal.db".to_string()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            session_secret: env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            session_ttl: parse_var("SESSION_TTL", 28_800)?, // default 8 hours
            leave_policy: LeavePolicy {
                casual: parse_var("LEAVE_CASUAL_DAYS", LeavePolicy::default().casual)?,
                sick: parse_var("LEAVE_SICK_DAYS", LeavePolicy::default().sick)?,
                annual: parse_var("LEAVE_ANNUAL_DAYS", LeavePolicy::default().annual)?,
            },
            bootstrap_admin,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }

    /// Config for an in-process app with an in-memory store.
    pub fn in_memory(session_secret: &str) -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            session_secret: session_secret.to_string(),
            session_ttl: 3_600,
            leave_policy: LeavePolicy::default(),
            bootstrap_admin: None,
            log_dir: "logs".to_string(),
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
