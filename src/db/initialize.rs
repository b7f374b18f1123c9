//! Schema bootstrap for every opened connection.

use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Bring the schema up to date. Tables and indexes only come from migrations.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    let applied = run_pending_migrations(conn)?;
    if applied > 0 {
        log::debug!("{} migration(s) applied on open", applied);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn blocked_schema_is_a_migration_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE VIEW documents AS SELECT 1 AS x;").unwrap();

        match init_db(&conn) {
            Err(AppError::Migration(msg)) => assert!(msg.contains("0001_create_documents")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
