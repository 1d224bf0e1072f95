// Schema module - creates the three shop tables and seeds reference data
//
// The query operations never touch DDL; this exists so a fresh database
// (or an in-memory one) can be brought into the shape the queries expect.
//
// Table names are quoted everywhere: ORDER is a reserved word and USER is
// reserved in most dialects.

use crate::error::Result;
use crate::records::SqlDecimal;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tracing::info;

/// DDL for the three tables
///
/// There are no foreign key constraints on purpose: orders may reference
/// users or goods that do not exist, and the join queries surface that.
const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS "user" (
    id      INTEGER PRIMARY KEY,
    name    VARCHAR(100),
    tel     VARCHAR(20),
    address VARCHAR(100)
);
CREATE TABLE IF NOT EXISTS "goods" (
    id    INTEGER PRIMARY KEY,
    name  VARCHAR(100),
    price DECIMAL(10, 2)
);
CREATE TABLE IF NOT EXISTS "order" (
    id          INTEGER PRIMARY KEY,
    user_id     INTEGER,
    goods_id    INTEGER,
    goods_num   INTEGER,
    goods_price DECIMAL(10, 2)
);
"#;

/// (id, name, tel, address)
pub const FIXTURE_USERS: [(i64, &str, &str, &str); 4] = [
    (1, "zhangsan", "tel1", "beijing"),
    (2, "lisi", "tel2", "shanghai"),
    (3, "wangwu", "tel3", "shanghai"),
    (4, "zhangsan", "tel4", "shenzhen"),
];

/// (id, name, price)
pub const FIXTURE_GOODS: [(i64, &str, i64); 5] = [
    (1, "goods1", 10),
    (2, "goods2", 20),
    (3, "goods3", 30),
    (4, "goods4", 40),
    (5, "goods5", 50),
];

/// (id, user_id, goods_id, goods_num, goods_price)
///
/// Order 7 points at user 5 and order 8 at user 5 and goods 6, none of
/// which exist.
pub const FIXTURE_ORDERS: [(i64, i64, i64, i64, i64); 8] = [
    (1, 1, 1, 5, 10),
    (2, 2, 1, 1, 10),
    (3, 2, 1, 2, 10),
    (4, 4, 2, 4, 20),
    (5, 4, 2, 100, 20),
    (6, 4, 3, 1, 20),
    (7, 5, 4, 1, 20),
    (8, 5, 6, 1, 60),
];

/// Create the `user`, `goods` and `order` tables if they are missing
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    info!("shop schema ready");
    Ok(())
}

/// Insert the reference users, goods and orders in a single transaction
///
/// Fails with a constraint error if any of the fixture ids already exist.
pub fn seed_fixture(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut insert_user =
            tx.prepare(r#"INSERT INTO "user" (id, name, tel, address) VALUES (?1, ?2, ?3, ?4)"#)?;
        for (id, name, tel, address) in FIXTURE_USERS {
            insert_user.execute(params![id, name, tel, address])?;
        }

        let mut insert_goods =
            tx.prepare(r#"INSERT INTO "goods" (id, name, price) VALUES (?1, ?2, ?3)"#)?;
        for (id, name, price) in FIXTURE_GOODS {
            insert_goods.execute(params![id, name, SqlDecimal(Decimal::from(price))])?;
        }

        let mut insert_order = tx.prepare(
            r#"INSERT INTO "order" (id, user_id, goods_id, goods_num, goods_price)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
        )?;
        for (id, user_id, goods_id, goods_num, goods_price) in FIXTURE_ORDERS {
            insert_order.execute(params![
                id,
                user_id,
                goods_id,
                goods_num,
                SqlDecimal(Decimal::from(goods_price))
            ])?;
        }
    }
    tx.commit()?;

    info!(
        users = FIXTURE_USERS.len(),
        goods = FIXTURE_GOODS.len(),
        orders = FIXTURE_ORDERS.len(),
        "seeded fixture data"
    );
    Ok(())
}

/// Open an in-memory database holding the schema and the reference fixture
pub fn open_in_memory_fixture() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    seed_fixture(&conn)?;
    Ok(conn)
}

/// Names of the user tables in the database, sorted
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}
