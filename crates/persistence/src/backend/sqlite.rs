// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! Opening a connection applies the pragmas every write unit relies on
//! (foreign keys, busy timeout, WAL for files), then runs the embedded
//! migrations. Diesel has no PRAGMA DSL, so those statements are raw SQL.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on another writer's lock before failing.
pub const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Where the database lives. File databases switch to WAL so several
/// connections can read while one writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File,
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

fn apply_pragma(
    conn: &mut SqliteConnection,
    name: &str,
    value: &str,
) -> Result<(), PersistenceError> {
    debug!(pragma = name, value, "Applying SQLite pragma");
    diesel::sql_query(format!("PRAGMA {name} = {value}"))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("PRAGMA {name}: {e}")))?;
    Ok(())
}

/// Returns the rowid assigned by the most recent insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless `PRAGMA foreign_keys` reports enforcement on.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` when enforcement is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let pragma: ForeignKeysPragma =
        diesel::sql_query("PRAGMA foreign_keys").get_result::<ForeignKeysPragma>(conn)?;

    if pragma.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}

fn establish(database_url: &str, kind: StoreKind) -> Result<SqliteConnection, PersistenceError> {
    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    apply_pragma(&mut conn, "busy_timeout", &BUSY_TIMEOUT_MS.to_string())?;
    apply_pragma(&mut conn, "foreign_keys", "ON")?;
    if kind == StoreKind::File {
        apply_pragma(&mut conn, "journal_mode", "WAL")?;
    }
    Ok(conn)
}

/// Opens `database_url`, applies the connection pragmas and brings the schema
/// up to date.
///
/// The busy timeout is set before migrating so that two processes opening the
/// same file at once queue on the lock.
///
/// # Errors
///
/// Returns an error if the connection, a pragma, or a migration fails, or if
/// foreign keys did not switch on.
pub fn initialize_database(
    database_url: &str,
    kind: StoreKind,
) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?kind, "Opening SQLite database");

    let mut conn: SqliteConnection = establish(database_url, kind)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    verify_foreign_key_enforcement(&mut conn)?;

    Ok(conn)
}

/// Opens one more connection to a database that [`initialize_database`]
/// has already brought up to date. Pragmas are applied; migrations are not
/// run.
///
/// # Errors
///
/// Returns an error if the connection or a pragma fails, or if foreign keys
/// did not switch on.
pub fn open_connection(
    database_url: &str,
    kind: StoreKind,
) -> Result<SqliteConnection, PersistenceError> {
    debug!(database_url, ?kind, "Opening SQLite connection");

    let mut conn: SqliteConnection = establish(database_url, kind)?;
    verify_foreign_key_enforcement(&mut conn)?;

    Ok(conn)
}
