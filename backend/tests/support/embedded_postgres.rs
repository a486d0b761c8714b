//! Embedded PostgreSQL databases for the Diesel repository suites.
//!
//! One cluster is shared per test binary. Every test gets its own temporary
//! database with the backend migrations applied through
//! [`run_migrations`], so the schema under test is the one the server runs.

use std::time::Duration;

use atelier::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use tokio::runtime::Runtime;

const CLUSTER_RETRIES: u32 = 3;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated database plus the runtime that drives its pool.
///
/// Repository calls are `block_on`'d from synchronous tests; the cluster
/// bootstrap must not run inside a Tokio runtime.
pub struct TestDatabase {
    pub runtime: Runtime,
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    /// Run `future` to completion on this database's runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn cluster_database() -> Result<TemporaryDatabase, String> {
    let mut attempt = 1;
    loop {
        let created = shared_cluster_handle()
            .map_err(|err| format!("{err:?}"))
            .and_then(|cluster| {
                cluster
                    .temporary_database(format!("test_{}", uuid::Uuid::new_v4()))
                    .map_err(|err| format!("{err:?}"))
            });
        match created {
            Ok(database) => return Ok(database),
            Err(reason) if attempt >= CLUSTER_RETRIES => return Err(reason),
            Err(reason) => {
                eprintln!("pg-embed: attempt {attempt}/{CLUSTER_RETRIES} failed: {reason}");
                std::thread::sleep(CLUSTER_RETRY_DELAY * attempt);
                attempt += 1;
            }
        }
    }
}

/// Provision a fresh, migrated database and a small pool over it.
pub fn provision() -> Result<TestDatabase, String> {
    let database = cluster_database()?;
    let url = database.url().to_string();
    let runtime = Runtime::new().map_err(|err| err.to_string())?;

    runtime
        .block_on(run_migrations(&url))
        .map_err(|err| err.to_string())?;
    let config = PoolConfig::new(&url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestDatabase {
        runtime,
        pool,
        _database: database,
    })
}
