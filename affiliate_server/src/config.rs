use std::env;

use affiliate_common::{
    helpers::{parse_boolean_flag, parse_number_or_default},
    Secret,
};
use chrono::Duration;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use razorpay_tools::RazorpayConfig;

use crate::errors::ServerError;

const DEFAULT_ALS_HOST: &str = "127.0.0.1";
const DEFAULT_ALS_PORT: u16 = 8000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/affiliate.db";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 30;
const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// The address of the front-end. Referral links point here.
    pub frontend_url: String,
    pub razorpay: RazorpayConfig,
    /// If true, pending migrations are applied to the database on startup.
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ALS_HOST.to_string(),
            port: DEFAULT_ALS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            razorpay: RazorpayConfig::default(),
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("ALS_HOST").ok().unwrap_or_else(|| DEFAULT_ALS_HOST.into());
        let port = env::var("ALS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for ALS_PORT. {e} Using the default, {DEFAULT_ALS_PORT}, instead."
                    );
                    DEFAULT_ALS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_ALS_PORT);
        let database_url = env::var("ALS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ ALS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let frontend_url = env::var("ALS_FRONTEND_URL").ok().unwrap_or_else(|| {
            info!("🪛️ ALS_FRONTEND_URL is not set. Referral links will point to {DEFAULT_FRONTEND_URL}.");
            DEFAULT_FRONTEND_URL.to_string()
        });
        let razorpay = RazorpayConfig::new_from_env_or_default();
        let run_migrations = parse_boolean_flag(env::var("ALS_RUN_MIGRATIONS").ok(), true);
        Self { host, port, database_url, auth, frontend_url, razorpay, run_migrations }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HMAC key used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    /// How long an access token remains valid after it is issued.
    pub access_token_expiry: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. Every access token \
             will be invalidated when the server restarts. DO NOT operate on production like this. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect::<String>();
        Self {
            jwt_secret: Secret::new(secret),
            access_token_expiry: Duration::minutes(DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES),
        }
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: &str, access_token_expiry: Duration) -> Self {
        Self { jwt_secret: Secret::new(jwt_secret.to_string()), access_token_expiry }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("ALS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [ALS_JWT_SECRET]")))?;
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ServerError::ConfigurationError(format!(
                "ALS_JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} characters long"
            )));
        }
        let (minutes, err) = parse_number_or_default(
            env::var("ALS_ACCESS_TOKEN_EXPIRY").ok(),
            DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES,
        );
        if let Some(e) = err {
            warn!("🪛️ Invalid configuration value for ALS_ACCESS_TOKEN_EXPIRY. {e}");
        }
        if minutes <= 0 {
            return Err(ServerError::ConfigurationError("ALS_ACCESS_TOKEN_EXPIRY must be positive".to_string()));
        }
        Ok(Self { jwt_secret: Secret::new(secret), access_token_expiry: Duration::minutes(minutes) })
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that the route handlers need. Secrets are excluded so that they are not passed
/// around the system.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub frontend_url: String,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { frontend_url: config.frontend_url.clone() }
    }
}
