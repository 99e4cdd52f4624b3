//! Schema migrations for the content tables.
//!
//! Steps are plain SQL files compiled into the binary. A run applies every
//! step above the stored `user_version` inside one transaction; a failing
//! step leaves the database at its previous version.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "todos",
        sql: include_str!("0001_todos.sql"),
    },
    Migration {
        version: 2,
        name: "categories_blogs",
        sql: include_str!("0002_categories_blogs.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` naming the first step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }
    if from_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending(from_version) {
        run_step(&tx, migration)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, latest
    );
    Ok(())
}

/// Reads the schema version stored in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn pending(from_version: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > from_version)
}

fn run_step(conn: &Connection, migration: &Migration) -> DbResult<()> {
    let result = conn.execute_batch(migration.sql).and_then(|()| {
        conn.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
    });

    match result {
        Ok(()) => {
            info!(
                "event=db_migrate_step module=db status=ok version={} name={}",
                migration.version, migration.name
            );
            Ok(())
        }
        Err(source) => {
            error!(
                "event=db_migrate_step module=db status=error version={} name={} error={}",
                migration.version, migration.name, source
            );
            Err(DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{latest_version, pending, MIGRATIONS};

    #[test]
    fn versions_increase_by_one_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1, "{}", migration.name);
        }
        assert_eq!(latest_version(), 2);
    }

    #[test]
    fn pending_skips_applied_steps() {
        let names: Vec<_> = pending(1).map(|migration| migration.name).collect();
        assert_eq!(names, vec!["categories_blogs"]);
        assert_eq!(pending(latest_version()).count(), 0);
    }
}
