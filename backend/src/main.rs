//! Backend entry-point: reads environment configuration and starts the server.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use backend::outbound::persistence::{run_pending_migrations, DbPool, PoolConfig};
use backend::server::{self, MileageConfig, ServerConfig};

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn mileage_config() -> std::io::Result<Option<MileageConfig>> {
    let Ok(raw_url) = env::var("MILEAGE_API_URL") else {
        return Ok(None);
    };
    let endpoint = Url::parse(&raw_url)
        .map_err(|e| std::io::Error::other(format!("invalid MILEAGE_API_URL: {e}")))?;
    let api_key = env::var("MILEAGE_API_KEY")
        .map_err(|_| std::io::Error::other("MILEAGE_API_URL set without MILEAGE_API_KEY"))?;
    let timeout = env::var("MILEAGE_TIMEOUT_SECONDS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map_or(Duration::from_secs(10), Duration::from_secs);

    Ok(Some(MileageConfig {
        endpoint,
        api_key,
        timeout,
    }))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        run_pending_migrations(&database_url).map_err(std::io::Error::other)?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    } else {
        warn!("DATABASE_URL not set; running with in-memory fixtures");
    }

    if let Some(mileage) = mileage_config()? {
        config = config.with_mileage(mileage);
    }

    server::run(config)?.await
}
