//! Database layer
//!
//! The credential store lives here: a pool abstraction over SQLite (default)
//! and MySQL, embedded migrations, and repositories for users and sessions.
//!
//! ```ignore
//! use sessiongate::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config.database).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, PoolRef,
    SqliteDatabase,
};
