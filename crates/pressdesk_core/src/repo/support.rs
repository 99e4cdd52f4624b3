//! SQL helpers shared by the SQLite repositories.

use crate::db::migrations::latest_version;
use crate::model::Timestamp;
use crate::repo::error::{RepoError, RepoResult, StoreFailure};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

/// Escape character paired with [`like_contains_pattern`].
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Verifies that `conn` is migrated and carries every column the caller reads.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    required: &[(&'static str, &[&'static str])],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::StoreUnavailable(
            StoreFailure::UninitializedConnection {
                expected_version,
                actual_version,
            },
        ));
    }

    for &(table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::StoreUnavailable(
                StoreFailure::MissingRequiredTable(table),
            ));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::StoreUnavailable(
                    StoreFailure::MissingRequiredColumn { table, column },
                ));
            }
        }
    }

    Ok(())
}

pub(crate) fn timestamp_to_db(value: Timestamp) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn timestamp_from_db(millis: i64, column: &str) -> RepoResult<Timestamp> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        RepoError::invalid_data(format!("timestamp `{millis}` out of range in {column}"))
    })
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::invalid_data(format!(
            "invalid boolean `{other}` in {column}"
        ))),
    }
}

/// Builds a `LIKE` pattern matching `term` as a literal substring.
///
/// Use with `ESCAPE '\'`.
pub(crate) fn like_contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Returns whether `err` is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{int_to_bool, like_contains_pattern, timestamp_from_db, timestamp_to_db};
    use crate::model::now_millis;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_contains_pattern("test"), "%test%");
        assert_eq!(like_contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn timestamps_survive_storage_roundtrip() {
        let now = now_millis();
        let restored = timestamp_from_db(timestamp_to_db(now), "t.created_at").unwrap();
        assert_eq!(restored, now);
    }

    #[test]
    fn int_to_bool_rejects_out_of_range_values() {
        assert!(int_to_bool(2, "todos.completed").is_err());
        assert!(int_to_bool(1, "todos.completed").unwrap());
    }
}
