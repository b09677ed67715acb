use rusqlite::{params, Connection, OptionalExtension};

pub fn get_item(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM storage WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set_item(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove_item(conn: &Connection, key: &str) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM storage WHERE key = ?1", params![key])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_missing_key_is_none() {
        let conn = setup();
        assert_eq!(get_item(&conn, "nope").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let conn = setup();
        set_item(&conn, "k", "one").unwrap();
        set_item(&conn, "k", "two").unwrap();
        assert_eq!(get_item(&conn, "k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_remove() {
        let conn = setup();
        set_item(&conn, "k", "v").unwrap();
        remove_item(&conn, "k").unwrap();
        remove_item(&conn, "k").unwrap();
        assert_eq!(get_item(&conn, "k").unwrap(), None);
    }
}
