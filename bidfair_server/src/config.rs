use std::env;

use bf_common::Secret;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

const DEFAULT_BF_HOST: &str = "127.0.0.1";
const DEFAULT_BF_PORT: u16 = 8360;
/// How long issued access tokens stay valid.
pub const ACCESS_TOKEN_DAYS: i64 = 7;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BF_HOST.to_string(),
            port: DEFAULT_BF_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BF_HOST").ok().unwrap_or_else(|| DEFAULT_BF_HOST.into());
        let port = env::var("BF_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for BF_PORT. {e} Using the default, {DEFAULT_BF_PORT}, instead.");
                    DEFAULT_BF_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BF_PORT);
        let database_url = env::var("BF_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ BF_DATABASE_URL is not set. Please set it to the URL for the Bidfair database.");
            String::default()
        });
        let auth = AuthConfig::from_env_or_default();
        Self { host, port, database_url, auth }
    }
}

/// JWT signing configuration. Tokens are signed and verified with a shared HS256 secret.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn from_env_or_default() -> Self {
        match env::var("BF_JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => Self { jwt_secret: Secret::new(secret) },
            _ => {
                warn!(
                    "🪛️ BF_JWT_SECRET is not set. A random signing secret has been generated; every access token \
                     will be invalidated when the server restarts."
                );
                Self::default()
            },
        }
    }
}
