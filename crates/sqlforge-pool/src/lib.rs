//! # sqlforge-pool
//!
//! Hands out statement builders per database driver.
//!
//! A [`Registry`] caches one [`Connection`] per driver name. Every
//! [`Registry::checkout`] returns a [`Db`] that shares the cached connection
//! but owns a fresh [`QueryBuilder`], so two callers never assemble
//! statements on the same builder.
//!
//! ```rust
//! use sqlforge_core::Op;
//! use sqlforge_pool::Registry;
//!
//! let registry = Registry::new();
//! let mut db = registry.checkout("postgres").unwrap();
//! assert_eq!(db.target(), "postgres");
//!
//! let (sql, args) = db.table("users").where_("id", Op::Eq, 1).query().unwrap();
//! assert_eq!(sql, r#"SELECT * FROM "users" WHERE "id" = ?"#);
//! assert_eq!(args.len(), 1);
//! ```

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use sqlforge_core::QueryBuilder;
use sqlforge_core::schema::{self, Table};
use thiserror::Error;
use tracing::debug;

/// Errors from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The driver name was empty.
    #[error("driver name must not be empty")]
    EmptyDriver,
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, PoolError>;

/// A named database driver.
#[derive(Debug, PartialEq, Eq)]
pub struct Connection {
    driver: String,
}

impl Connection {
    /// Creates a connection descriptor for `driver`.
    #[must_use]
    pub fn new(driver: &str) -> Self {
        Self {
            driver: String::from(driver),
        }
    }

    /// Returns the driver name.
    #[must_use]
    pub fn driver(&self) -> &str {
        &self.driver
    }
}

/// Caches one [`Connection`] per driver name.
#[derive(Debug, Default)]
pub struct Registry {
    connections: Mutex<HashMap<String, Arc<Connection>>>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns the cached connection for `driver`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyDriver`] for an empty driver name.
    pub fn connection(&self, driver: &str) -> Result<Arc<Connection>> {
        if driver.is_empty() {
            return Err(PoolError::EmptyDriver);
        }
        let mut connections = self
            .connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let conn = connections.entry(String::from(driver)).or_insert_with(|| {
            debug!(driver = driver, "Registering connection");
            Arc::new(Connection::new(driver))
        });
        Ok(Arc::clone(conn))
    }

    /// Checks out a handle with a clean builder on the `driver` connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyDriver`] for an empty driver name.
    pub fn checkout(&self, driver: &str) -> Result<Db> {
        Ok(Db::new(self.connection(driver)?))
    }

    /// Returns the number of cached connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no connection has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A connection plus an exclusively owned statement builder.
///
/// Dereferences to [`QueryBuilder`], so every builder call is available on
/// the handle directly.
#[derive(Debug)]
pub struct Db {
    conn: Arc<Connection>,
    builder: QueryBuilder,
}

impl Db {
    /// Creates a handle on `conn` with a clean builder.
    #[must_use]
    pub fn new(conn: Arc<Connection>) -> Self {
        Self {
            conn,
            builder: QueryBuilder::new(),
        }
    }

    /// Returns the driver name.
    #[must_use]
    pub fn target(&self) -> &str {
        self.conn.driver()
    }

    /// Returns the shared connection.
    #[must_use]
    pub fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    /// Renders `CREATE TABLE` from a schema callback.
    ///
    /// # Errors
    ///
    /// See [`sqlforge_core::schema::create_table`].
    pub fn create_table<F>(&self, name: &str, define: F) -> sqlforge_core::Result<String>
    where
        F: FnOnce(&mut Table) -> sqlforge_core::Result<()>,
    {
        debug!(driver = self.target(), table = name, "Creating table");
        schema::create_table(name, define)
    }

    /// Renders `ALTER TABLE` from a schema callback.
    ///
    /// # Errors
    ///
    /// See [`sqlforge_core::schema::modify_table`].
    pub fn modify_table<F>(&self, name: &str, define: F) -> sqlforge_core::Result<String>
    where
        F: FnOnce(&mut Table) -> sqlforge_core::Result<()>,
    {
        debug!(driver = self.target(), table = name, "Modifying table");
        schema::modify_table(name, define)
    }
}

impl Deref for Db {
    type Target = QueryBuilder;

    fn deref(&self) -> &QueryBuilder {
        &self.builder
    }
}

impl DerefMut for Db {
    fn deref_mut(&mut self) -> &mut QueryBuilder {
        &mut self.builder
    }
}
