//! Store handle: connection lifecycle and the [`RegistryStore`] implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use libsql::{Connection, Value, params_from_iter};
use swift_model::{BranchDocument, RegistryDocument};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::memory::MemoryStore;
use crate::pool::{ConnectionPool, Lease};
use crate::schema;
use crate::store::{CountFilter, PushOutcome, RegistryStore};
use crate::{Error, Result};

const REMOTE_SCHEMES: [&str; 3] = ["libsql://", "https://", "http://"];

/// Where the store lives and how connections to it behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Local path, `:memory:`, or a `libsql://` / `http(s)://` URL
    pub database_url: String,
    /// Required for remote URLs only
    pub auth_token: Option<String>,
    /// Pool size for file and remote databases; in-memory always uses one
    pub max_connections: usize,
    /// Open timeout and busy timeout
    pub timeout_ms: u64,
    /// Extra connect attempts after the first failure
    pub retry_attempts: usize,
}

impl ConnectionConfig {
    pub fn in_memory() -> Self {
        Self {
            database_url: ":memory:".to_string(),
            auth_token: None,
            max_connections: 1,
            timeout_ms: 5_000,
            retry_attempts: 0,
        }
    }

    pub fn local(path: impl Into<String>) -> Self {
        Self {
            database_url: path.into(),
            max_connections: 8,
            ..Self::in_memory()
        }
    }

    pub fn remote(url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(auth_token.into()),
            retry_attempts: 2,
            ..Self::local(url)
        }
    }

    /// Pick in-memory, remote or local defaults from the shape of `url`.
    pub fn from_url(url: impl Into<String>, auth_token: Option<String>) -> Self {
        let mut config = Self::local(url);
        if config.is_in_memory() {
            config.max_connections = 1;
        } else if config.is_remote() {
            config.retry_attempts = 2;
        }
        config.auth_token = auth_token;
        config
    }

    pub fn is_remote(&self) -> bool {
        REMOTE_SCHEMES
            .iter()
            .any(|scheme| self.database_url.starts_with(scheme))
    }

    pub fn is_in_memory(&self) -> bool {
        let url = self.database_url.trim();
        url == ":memory:" || url.starts_with("file::memory:") || url.contains("mode=memory")
    }

    /// Every connection to a private in-memory database would see its own
    /// empty database, so those pools hold a single connection.
    pub fn pool_size(&self) -> usize {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(Error::Config {
                details: "max_connections must be at least 1".to_string(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(Error::Config {
                details: "timeout_ms must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Handle to the registry store. Clones share the same backend and
/// connection state.
#[derive(Clone)]
pub struct DbConnection {
    config: ConnectionConfig,
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Libsql(Arc<LibsqlBackend>),
    Memory(Arc<MemoryBackend>),
}

#[derive(Default)]
struct LibsqlBackend {
    pool: RwLock<Option<Arc<ConnectionPool>>>,
    open: AtomicBool,
}

#[derive(Default)]
struct MemoryBackend {
    store: MemoryStore,
    open: AtomicBool,
}

impl DbConnection {
    /// libsql store on a private in-memory database.
    pub fn new() -> Self {
        Self::with_config(ConnectionConfig::default())
    }

    /// libsql store described by `config`.
    pub fn with_config(config: ConnectionConfig) -> Self {
        Self {
            config,
            backend: Backend::Libsql(Arc::default()),
        }
    }

    /// Store backed by the in-process document map.
    pub fn memory() -> Self {
        Self {
            config: ConnectionConfig::in_memory(),
            backend: Backend::Memory(Arc::default()),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn open_flag(&self) -> &AtomicBool {
        match &self.backend {
            Backend::Libsql(backend) => &backend.open,
            Backend::Memory(backend) => &backend.open,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.open_flag().load(Ordering::SeqCst)
    }

    /// Open the backend. Calling it on an open store does nothing.
    pub async fn connect(&self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }
        match &self.backend {
            Backend::Libsql(backend) => {
                let pool = self.open_pool().await?;
                info!(
                    url = redact_url(&self.config.database_url),
                    connections = pool.size(),
                    "registry store connected"
                );
                *backend.pool.write().await = Some(Arc::new(pool));
            }
            Backend::Memory(_) => debug!("in-process registry store opened"),
        }
        self.open_flag().store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn open_pool(&self) -> Result<ConnectionPool> {
        let mut attempt = 0;
        loop {
            match ConnectionPool::open(&self.config).await {
                Ok(pool) => return Ok(pool),
                Err(err @ Error::Config { .. }) => return Err(err),
                Err(err) if attempt >= self.config.retry_attempts => return Err(err),
                Err(err) => {
                    let backoff = Duration::from_millis(100_u64 << attempt.min(6));
                    warn!(
                        attempt = attempt + 1,
                        error = %err,
                        ?backoff,
                        "opening registry store failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Connect, then create the documents table and its country index.
    pub async fn initialize(&self) -> Result<()> {
        self.connect().await?;
        if let Handle::Libsql(lease) = self.handle().await? {
            for statement in schema::ddl() {
                run(&lease, statement, Vec::new()).await?;
            }
            info!(table = schema::TABLE, "registry schema ready");
        }
        Ok(())
    }

    /// Release every pooled connection. The handle can be reconnected.
    pub async fn close(&self) {
        if let Backend::Libsql(backend) = &self.backend {
            backend.pool.write().await.take();
        }
        self.open_flag().store(false, Ordering::SeqCst);
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(Error::Connection {
                details: "Database is not connected".to_string(),
            })
        }
    }

    /// Backend access for one store operation.
    async fn handle(&self) -> Result<Handle<'_>> {
        self.ensure_connected()?;
        match &self.backend {
            Backend::Libsql(backend) => {
                let pool = backend.pool.read().await.clone().ok_or_else(|| Error::Connection {
                    details: "Database is not connected".to_string(),
                })?;
                Ok(Handle::Libsql(ConnectionPool::lease(&pool).await?))
            }
            Backend::Memory(backend) => Ok(Handle::Memory(&backend.store)),
        }
    }
}

impl Default for DbConnection {
    fn default() -> Self {
        Self::new()
    }
}

enum Handle<'a> {
    Libsql(Lease),
    Memory(&'a MemoryStore),
}

#[async_trait]
impl RegistryStore for DbConnection {
    async fn find_by_code(&self, code: &str) -> Result<Option<RegistryDocument>> {
        match self.handle().await? {
            Handle::Memory(store) => Ok(store.find_by_code(code)),
            Handle::Libsql(lease) => {
                let mut documents =
                    fetch_documents(&lease, schema::SELECT_BY_CODE, vec![text(code)]).await?;
                Ok(documents.pop())
            }
        }
    }

    async fn find_by_country(&self, iso2: &str) -> Result<Vec<RegistryDocument>> {
        match self.handle().await? {
            Handle::Memory(store) => Ok(store.find_by_country(iso2)),
            Handle::Libsql(lease) => {
                fetch_documents(&lease, schema::SELECT_BY_COUNTRY, vec![text(iso2)]).await
            }
        }
    }

    async fn insert(&self, document: &RegistryDocument) -> Result<()> {
        let lease = match self.handle().await? {
            Handle::Memory(store) => return store.insert(document),
            Handle::Libsql(lease) => lease,
        };
        let inserted = run(
            &lease,
            schema::INSERT_IF_ABSENT,
            schema::insert_params(document)?,
        )
        .await?;
        if inserted == 0 {
            return Err(Error::DuplicateKey {
                code: document.code.clone(),
            });
        }
        debug!(code = %document.code, "document inserted");
        Ok(())
    }

    async fn push_branch_if_absent(
        &self,
        hq_code: &str,
        branch: &BranchDocument,
    ) -> Result<PushOutcome> {
        let lease = match self.handle().await? {
            Handle::Memory(store) => return Ok(store.push_branch_if_absent(hq_code, branch)),
            Handle::Libsql(lease) => lease,
        };
        let updated = run(
            &lease,
            schema::PUSH_BRANCH_IF_ABSENT,
            schema::push_params(hq_code, branch)?,
        )
        .await?;
        if updated > 0 {
            debug!(hq = hq_code, code = %branch.code, "branch appended");
            return Ok(PushOutcome::Pushed);
        }

        // nothing changed: either the parent is gone or the branch is there
        let parents = fetch_count(&lease, schema::COUNT_BY_CODE, vec![text(hq_code)]).await?;
        Ok(if parents == 0 {
            PushOutcome::ParentMissing
        } else {
            PushOutcome::Duplicate
        })
    }

    async fn pull_branch(&self, hq_code: &str, branch_code: &str) -> Result<bool> {
        match self.handle().await? {
            Handle::Memory(store) => Ok(store.pull_branch(hq_code, branch_code)),
            Handle::Libsql(lease) => {
                let updated = run(
                    &lease,
                    schema::PULL_BRANCH,
                    vec![text(hq_code), text(branch_code)],
                )
                .await?;
                Ok(updated > 0)
            }
        }
    }

    async fn delete_by_code_or_prefix(&self, code: &str, prefix: &str) -> Result<u64> {
        match self.handle().await? {
            Handle::Memory(store) => Ok(store.delete_by_code_or_prefix(code, prefix)),
            Handle::Libsql(lease) => {
                run(
                    &lease,
                    schema::DELETE_BY_CODE_OR_PREFIX,
                    vec![text(code), text(prefix)],
                )
                .await
            }
        }
    }

    async fn count(&self, filter: CountFilter<'_>) -> Result<u64> {
        let lease = match self.handle().await? {
            Handle::Memory(store) => return Ok(store.count(filter)),
            Handle::Libsql(lease) => lease,
        };
        let (sql, params) = match filter {
            CountFilter::All => (schema::COUNT_ALL, Vec::new()),
            CountFilter::Code(code) => (schema::COUNT_BY_CODE, vec![text(code)]),
            CountFilter::Country(iso2) => (schema::COUNT_BY_COUNTRY, vec![text(iso2)]),
        };
        fetch_count(&lease, sql, params).await
    }
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn sql_error(sql: &str) -> impl Fn(libsql::Error) -> Error + '_ {
    move |source| Error::Sql {
        statement: sql.to_string(),
        source,
    }
}

/// Execute a statement, returning the number of rows it changed.
async fn run(connection: &Connection, sql: &str, params: Vec<Value>) -> Result<u64> {
    connection
        .execute(sql, params_from_iter(params))
        .await
        .map_err(sql_error(sql))
}

async fn fetch_documents(
    connection: &Connection,
    sql: &str,
    params: Vec<Value>,
) -> Result<Vec<RegistryDocument>> {
    let mut rows = connection
        .query(sql, params_from_iter(params))
        .await
        .map_err(sql_error(sql))?;
    let mut documents = Vec::new();
    while let Some(row) = rows.next().await.map_err(sql_error(sql))? {
        documents.push(schema::decode_row(&row)?);
    }
    Ok(documents)
}

async fn fetch_count(connection: &Connection, sql: &str, params: Vec<Value>) -> Result<u64> {
    let mut rows = connection
        .query(sql, params_from_iter(params))
        .await
        .map_err(sql_error(sql))?;
    let Some(row) = rows.next().await.map_err(sql_error(sql))? else {
        return Ok(0);
    };
    let count: i64 = row.get(0).map_err(sql_error(sql))?;
    Ok(u64::try_from(count).unwrap_or_default())
}

/// Drop query parameters, which may carry credentials, before logging.
pub(crate) fn redact_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
