// Ad-hoc query executor
// Runs SQL that already passed the read-only parser and renders every
// column as text, whatever its storage class

use super::parser::AdHocQuery;
use crate::error::{Error, Result};
use crate::report::{ResultTable, NULL};
use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::debug;

pub struct AdHocExecutor;

impl AdHocExecutor {
    /// Execute the query on the caller's connection and collect all rows
    pub fn run(conn: &Connection, query: &AdHocQuery) -> Result<ResultTable> {
        let mut stmt = conn.prepare(query.sql())?;
        // SQLite's own verdict, in case the parser let a write through
        if !stmt.readonly() {
            return Err(Error::NotReadOnly(query.sql().to_string()));
        }
        let column_names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let column_count = column_names.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for i in 0..column_count {
                cells.push(Self::render(row.get::<_, Value>(i)?));
            }
            rows.push(cells);
        }

        debug!(sql = query.sql(), rows = rows.len(), "ran ad-hoc query");
        Ok(ResultTable::new(column_names, rows))
    }

    fn render(value: Value) -> String {
        match value {
            Value::Null => NULL.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(f) => f.to_string(),
            Value::Text(s) => s,
            Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser::ReadOnlyParser;
    use crate::schema::open_in_memory_fixture;

    #[test]
    fn test_run_select_over_fixture() {
        let conn = open_in_memory_fixture().unwrap();
        let query = ReadOnlyParser::parse(
            r#"SELECT ord.id, usr.name FROM "order" ord LEFT JOIN "user" usr ON usr.id = ord.user_id WHERE ord.id >= 7 ORDER BY ord.id"#,
        )
        .unwrap();

        let table = AdHocExecutor::run(&conn, &query).unwrap();

        assert_eq!(table.column_names, vec!["id", "name"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["7".to_string(), "NULL".to_string()],
                vec!["8".to_string(), "NULL".to_string()],
            ]
        );
    }

    #[test]
    fn test_unknown_table_is_execution_error() {
        let conn = open_in_memory_fixture().unwrap();
        let query = ReadOnlyParser::parse("SELECT * FROM missing").unwrap();

        let err = AdHocExecutor::run(&conn, &query).unwrap_err();
        assert!(matches!(err, Error::QueryExecution(_)));
    }

    #[test]
    fn test_store_rejects_writes_that_skip_the_parser() {
        let conn = open_in_memory_fixture().unwrap();
        let query = AdHocQuery {
            sql: r#"DELETE FROM "order""#.to_string(),
        };

        let err = AdHocExecutor::run(&conn, &query).unwrap_err();
        assert!(matches!(err, Error::NotReadOnly(_)));

        let remaining: i64 = conn
            .query_row(r#"SELECT COUNT(*) FROM "order""#, [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 8);
    }
}
