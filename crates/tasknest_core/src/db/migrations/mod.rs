//! Task store schema migrations.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - Pending migrations are applied in one transaction; a failing script
//!   reports its own version and leaves `user_version` untouched.
//! - After migrating, every table in `STORE_TABLES` exists.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, Transaction};

/// Tables the repositories read and write.
pub const STORE_TABLES: &[&str] = &["categories", "tasks"];

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "init",
    sql: include_str!("0001_init.sql"),
}];

/// Latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` to `latest_version()` and checks the store tables.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer binary.
/// - `Migration` naming the first script that failed.
/// - `MissingTable` when a current-version file lacks a store table.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    if current < latest {
        let tx = conn.transaction()?;
        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            run_migration(&tx, migration)?;
        }
        tx.commit()?;
        info!("event=db_migrate module=db status=ok from={current} to={latest}");
    }

    verify_store_tables(conn, latest)
}

fn run_migration(tx: &Transaction<'_>, migration: &Migration) -> DbResult<()> {
    let outcome = tx.execute_batch(migration.sql).and_then(|()| {
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
    });

    outcome.map_err(|source| {
        error!(
            "event=db_migrate module=db status=error version={} name={} error={source}",
            migration.version, migration.name
        );
        DbError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        }
    })
}

fn verify_store_tables(conn: &Connection, schema_version: u32) -> DbResult<()> {
    for &table in STORE_TABLES {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(DbError::MissingTable {
                table,
                schema_version,
            });
        }
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
