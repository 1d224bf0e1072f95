// SQL Parser for the read-only shell
// Ad-hoc SQL typed into the shell is checked here before it reaches the store
// We use the sqlparser crate to handle the complex SQL grammar

use crate::error::{Error, Result};
use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

/// A statement that has been checked to be a single read-only query
#[derive(Debug, Clone, PartialEq)]
pub struct AdHocQuery {
    pub(crate) sql: String,
}

impl AdHocQuery {
    /// The SQL text as typed (trailing semicolon removed)
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// The read-only query parser
pub struct ReadOnlyParser;

impl ReadOnlyParser {
    /// Parse a SQL string, accepting only one SELECT-like statement
    ///
    /// Anything that could modify the database (INSERT, UPDATE, DDL, PRAGMA...)
    /// is rejected, as is input containing more than one statement.
    pub fn parse(sql: &str) -> Result<AdHocQuery> {
        let dialect = SQLiteDialect {};
        let ast = Parser::parse_sql(&dialect, sql)?;

        if ast.len() != 1 {
            return Err(Error::NotReadOnly(format!(
                "expected one statement, found {}",
                ast.len()
            )));
        }

        match &ast[0] {
            Statement::Query(_) => Ok(AdHocQuery {
                sql: sql.trim().trim_end_matches(';').trim_end().to_string(),
            }),
            other => Err(Error::NotReadOnly(Self::statement_kind(other))),
        }
    }

    /// First keyword of a statement, for error messages
    fn statement_kind(statement: &Statement) -> String {
        statement
            .to_string()
            .split_whitespace()
            .next()
            .unwrap_or("statement")
            .to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_select_with_join() {
        let query = ReadOnlyParser::parse(
            r#"SELECT ord.id, usr.name FROM "order" ord LEFT JOIN "user" usr ON usr.id = ord.user_id;"#,
        )
        .unwrap();

        assert!(query.sql().starts_with("SELECT"));
        assert!(!query.sql().ends_with(';'));
    }

    #[test]
    fn test_accepts_cte() {
        assert!(ReadOnlyParser::parse("WITH t AS (SELECT 1 AS x) SELECT x FROM t").is_ok());
    }

    #[test]
    fn test_rejects_writes() {
        let err = ReadOnlyParser::parse(r#"DELETE FROM "order" WHERE id = 1"#).unwrap_err();
        assert!(matches!(err, Error::NotReadOnly(ref kind) if kind == "DELETE"));

        let err = ReadOnlyParser::parse("CREATE TABLE t (id INTEGER)").unwrap_err();
        assert!(matches!(err, Error::NotReadOnly(_)));
    }

    #[test]
    fn test_rejects_multiple_statements() {
        let err = ReadOnlyParser::parse("SELECT 1; DROP TABLE goods").unwrap_err();
        assert!(matches!(err, Error::NotReadOnly(_)));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = ReadOnlyParser::parse("SELEKT * FORM goods").unwrap_err();
        assert!(matches!(err, Error::SqlParse(_)));
    }
}
