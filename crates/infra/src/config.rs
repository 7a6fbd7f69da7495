//! Configuration loading and representation.
//!
//! | variable                   | meaning                                   | default |
//! |----------------------------|-------------------------------------------|---------|
//! | `USE_PERSISTENT_STORES`    | `true` selects the Postgres repositories  | `false` |
//! | `DATABASE_URL`             | Postgres connection string                | required when persistent |
//! | `DATABASE_MAX_CONNECTIONS` | pool size                                 | `5`     |

use anyhow::{Context, bail};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which repository backend to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraConfig {
    pub storage: StorageBackend,
}

impl InfraConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (returns `None` for unset keys).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let persistent = match lookup("USE_PERSISTENT_STORES") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .with_context(|| format!("USE_PERSISTENT_STORES must be true or false, got {raw:?}"))?,
            None => false,
        };

        if !persistent {
            return Ok(Self {
                storage: StorageBackend::InMemory,
            });
        }

        let database_url = match lookup("DATABASE_URL") {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => bail!("DATABASE_URL is required when USE_PERSISTENT_STORES=true"),
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            bail!("DATABASE_MAX_CONNECTIONS must be greater than zero");
        }

        Ok(Self {
            storage: StorageBackend::Postgres {
                database_url,
                max_connections,
            },
        })
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.storage, StorageBackend::Postgres { .. })
    }
}

/// Open a Postgres pool for the configured backend.
///
/// Fails if the configuration selects the in-memory backend.
pub async fn connect_pool(config: &InfraConfig) -> anyhow::Result<PgPool> {
    let StorageBackend::Postgres {
        database_url,
        max_connections,
    } = &config.storage
    else {
        bail!("connect_pool called with in-memory storage configured");
    };

    let pool = PgPoolOptions::new()
        .max_connections(*max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")?;

    tracing::info!(max_connections, "connected to Postgres");
    Ok(pool)
}
