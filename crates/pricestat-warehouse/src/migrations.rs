use ::duckdb::{params, Connection};

struct Migration {
    version: &'static str,
    sql: &'static str,
}

pub const MODIFIER_TABLE: &str = "instrument_price_modifier";

const MIGRATIONS: &[Migration] = &[Migration {
    version: "0001_instrument_price_modifier",
    sql: r#"
CREATE TABLE IF NOT EXISTS instrument_price_modifier (
    name TEXT PRIMARY KEY,
    multiplier DOUBLE NOT NULL,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
}];

/// Bring the schema up to date. Already applied versions are skipped.
pub fn apply_migrations(connection: &Connection) -> Result<usize, ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        let applied_count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
            params![migration.version],
            |row| row.get(0),
        )?;

        if applied_count == 0 {
            connection.execute_batch(migration.sql)?;
            connection.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                params![migration.version],
            )?;
            applied += 1;
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_applied_once() {
        let connection = Connection::open_in_memory().expect("open");
        assert_eq!(apply_migrations(&connection).expect("first run"), MIGRATIONS.len());
        assert_eq!(apply_migrations(&connection).expect("second run"), 0);

        let tables: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
                params![MODIFIER_TABLE],
                |row| row.get(0),
            )
            .expect("query");
        assert_eq!(tables, 1);
    }
}
