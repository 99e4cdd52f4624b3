//! Scalar SQL functions installed on every pressdesk connection.
//!
//! SQLite's built-in `lower()` and `LIKE` fold ASCII letters only; blog
//! author and text matching go through `unicode_lower` instead.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// `unicode_lower(text)`: full Unicode lowercase mapping. `NULL` stays `NULL`.
pub const UNICODE_LOWER: &str = "unicode_lower";

pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )
}

/// Returns whether `conn` can evaluate `unicode_lower`.
pub fn functions_registered(conn: &Connection) -> bool {
    conn.query_row("SELECT unicode_lower('A');", [], |row| {
        row.get::<_, String>(0)
    })
    .is_ok()
}

#[cfg(test)]
mod tests {
    use super::{functions_registered, register_functions};
    use rusqlite::Connection;

    #[test]
    fn unicode_lower_folds_non_ascii_letters() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!functions_registered(&conn));

        register_functions(&conn).unwrap();
        assert!(functions_registered(&conn));

        let lowered: String = conn
            .query_row("SELECT unicode_lower('ÉLODIE Über');", [], |row| row.get(0))
            .unwrap();
        assert_eq!(lowered, "élodie über");

        let null: Option<String> = conn
            .query_row("SELECT unicode_lower(NULL);", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }
}
