use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://enrollment.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
}

impl Config {
    /// Reads `HOST`, `PORT` and `DATABASE_URL`, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = match lookup("HOST") {
            Some(value) => value.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                name: "HOST",
                value,
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        Ok(Self {
            host,
            port,
            database_url,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
