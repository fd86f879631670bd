//! Fixed-size libsql connection pool.
//!
//! All connections are opened up front. A semaphore bounds concurrent
//! leases; a lease hands its connection back to the idle list on drop.

use std::ops::Deref;
use std::sync::{Arc, Mutex};

use libsql::{Builder, Connection, Database};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::connection::{ConnectionConfig, redact_url};
use crate::{Error, Result};

pub(crate) struct ConnectionPool {
    // owns the handle every pooled connection shares
    _database: Database,
    idle: Mutex<Vec<Connection>>,
    permits: Arc<Semaphore>,
    size: usize,
}

impl ConnectionPool {
    /// Open the database and every pooled connection, bounded by the
    /// configured timeout.
    pub(crate) async fn open(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let timeout = config.timeout();
        let database = tokio::time::timeout(timeout, open_database(config))
            .await
            .map_err(|_| Error::Connection {
                details: format!(
                    "opening {} took longer than {}ms",
                    redact_url(&config.database_url),
                    config.timeout_ms
                ),
            })??;

        let size = config.pool_size();
        let mut idle = Vec::with_capacity(size);
        for _ in 0..size {
            let connection = database
                .connect()
                .map_err(|source| libsql_error("open pooled connection", source))?;
            if !config.is_remote() {
                connection
                    .busy_timeout(timeout)
                    .map_err(|source| libsql_error("configure busy timeout", source))?;
            }
            idle.push(connection);
        }
        debug!(size, "connection pool ready");

        Ok(Self {
            _database: database,
            idle: Mutex::new(idle),
            permits: Arc::new(Semaphore::new(size)),
            size,
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// Wait for a free connection.
    pub(crate) async fn lease(pool: &Arc<Self>) -> Result<Lease> {
        let permit = Arc::clone(&pool.permits)
            .acquire_owned()
            .await
            .map_err(|_| Error::Connection {
                details: "connection pool shut down".to_string(),
            })?;
        let connection = pool
            .idle
            .lock()
            .ok()
            .and_then(|mut idle| idle.pop())
            .ok_or_else(|| Error::Connection {
                details: "no idle connection available".to_string(),
            })?;
        Ok(Lease {
            pool: Arc::clone(pool),
            connection,
            _permit: permit,
        })
    }
}

/// A connection checked out of a [`ConnectionPool`].
pub(crate) struct Lease {
    pool: Arc<ConnectionPool>,
    connection: Connection,
    _permit: OwnedSemaphorePermit,
}

impl Deref for Lease {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.connection
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if let Ok(mut idle) = self.pool.idle.lock() {
            idle.push(self.connection.clone());
        }
    }
}

async fn open_database(config: &ConnectionConfig) -> Result<Database> {
    let url = config.database_url.trim();
    if url.is_empty() {
        return Err(Error::Config {
            details: "database url is empty".to_string(),
        });
    }

    let built = if config.is_remote() {
        let Some(token) = config
            .auth_token
            .clone()
            .filter(|token| !token.trim().is_empty())
        else {
            return Err(Error::Config {
                details: format!("remote database {} needs an auth token", redact_url(url)),
            });
        };
        Builder::new_remote(url.to_string(), token).build().await
    } else {
        Builder::new_local(url.strip_prefix("file:").unwrap_or(url))
            .build()
            .await
    };
    built.map_err(|source| libsql_error("open database", source))
}

fn libsql_error(context: &str, source: libsql::Error) -> Error {
    Error::Libsql {
        context: context.to_string(),
        source,
    }
}
