// Result records
// Each query maps its rows into one of these plain structs
// They are built fresh for every call and carry no identity beyond it

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A row of the `user` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub tel: String,
    pub address: String,
}

/// A good together with its gross merchandise value across all orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoodsGmv {
    pub goods_id: i64,
    pub goods_name: String,
    pub gmv: Decimal,
}

/// An order joined with the names of its buyer and its goods
///
/// The names are `None` when the order references a user or a good that
/// does not exist. `total_price` comes from the order row alone
/// (`goods_num * goods_price`), so it is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub id: i64,
    pub user_name: Option<String>,
    pub goods_name: Option<String>,
    pub total_price: Decimal,
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User{{id={}, name='{}', tel='{}', address='{}'}}",
            self.id, self.name, self.tel, self.address
        )
    }
}

impl fmt::Display for GoodsGmv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GoodsGmv{{goods_id={}, goods_name='{}', gmv={}}}",
            self.goods_id, self.goods_name, self.gmv
        )
    }
}

impl fmt::Display for OrderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order{{id={}, user_name={}, goods_name={}, total_price={}}}",
            self.id,
            display_optional(&self.user_name),
            display_optional(&self.goods_name),
            self.total_price
        )
    }
}

fn display_optional(value: &Option<String>) -> String {
    match value {
        Some(s) => format!("'{}'", s),
        None => "NULL".to_string(),
    }
}

/// Adapter between SQLite storage classes and `Decimal`
///
/// SQLite has no decimal type: a `DECIMAL(10, 2)` column has NUMERIC
/// affinity, so whole prices come back as integers and fractional ones as
/// reals. Text is accepted too, for databases that store prices as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlDecimal(pub Decimal);

impl FromSql for SqlDecimal {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(SqlDecimal(Decimal::from(i))),
            ValueRef::Real(f) => Decimal::try_from(f)
                .map(SqlDecimal)
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                Decimal::from_str(text.trim())
                    .map(SqlDecimal)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            ValueRef::Null | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for SqlDecimal {
    // Bound as text; NUMERIC affinity converts it back to an integer or real
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(Value::Text(self.0.to_string())))
    }
}

impl From<SqlDecimal> for Decimal {
    fn from(value: SqlDecimal) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_decimal_from_each_storage_class() {
        let conn = Connection::open_in_memory().unwrap();

        let (int, real, text): (SqlDecimal, SqlDecimal, SqlDecimal) = conn
            .query_row("SELECT 2080, 12.5, ' 3.25 '", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .unwrap();

        assert_eq!(int.0, Decimal::from(2080));
        assert_eq!(real.0, Decimal::new(125, 1));
        assert_eq!(text.0, Decimal::new(325, 2));
    }

    #[test]
    fn test_decimal_rejects_null() {
        let conn = Connection::open_in_memory().unwrap();

        let result = conn.query_row("SELECT NULL", [], |row| row.get::<_, SqlDecimal>(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_decimal_binds_through_numeric_affinity() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE prices (price DECIMAL(10, 2))")
            .unwrap();

        conn.execute("INSERT INTO prices VALUES (?1)", [SqlDecimal(Decimal::from(20))])
            .unwrap();

        let stored_type: String = conn
            .query_row("SELECT typeof(price) FROM prices", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored_type, "integer");
    }

    #[test]
    fn test_order_display_shows_null_names() {
        let order = OrderView {
            id: 8,
            user_name: None,
            goods_name: None,
            total_price: Decimal::from(60),
        };

        assert_eq!(
            order.to_string(),
            "Order{id=8, user_name=NULL, goods_name=NULL, total_price=60}"
        );
    }
}
