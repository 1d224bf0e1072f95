// Shop queries
// The five analytical queries over the user / goods / order tables
//
// Every operation follows the same steps: prepare one statement, bind the
// parameters, map each row into a record, return the collected list.
// The connection is borrowed for the call only; statements are dropped
// (and their cursors released) on every return path.

use crate::error::Result;
use crate::records::{GoodsGmv, OrderView, SqlDecimal, UserRecord};
use rusqlite::{params, Connection, Row};
use tracing::debug;

const COUNT_BUYERS_SQL: &str =
    r#"SELECT COUNT(DISTINCT user_id) FROM "order" WHERE goods_id = ?1"#;

const USERS_PAGE_SQL: &str = r#"
SELECT id, name, tel, address
FROM "user"
ORDER BY id DESC
LIMIT ?1 OFFSET ?2"#;

// Ties on GMV fall back to the goods id so the order is deterministic
const GOODS_GMV_SQL: &str = r#"
SELECT god.id, god.name, SUM(ord.goods_num * ord.goods_price) AS gmv
FROM "goods" god
INNER JOIN "order" ord ON ord.goods_id = god.id
GROUP BY god.id, god.name
ORDER BY gmv DESC, god.id ASC"#;

const INNER_JOIN_ORDERS_SQL: &str = r#"
SELECT ord.id, usr.name, god.name, ord.goods_num * ord.goods_price AS total_price
FROM "order" ord
INNER JOIN "user" usr ON usr.id = ord.user_id
INNER JOIN "goods" god ON god.id = ord.goods_id
ORDER BY ord.id"#;

const LEFT_JOIN_ORDERS_SQL: &str = r#"
SELECT ord.id, usr.name, god.name, ord.goods_num * ord.goods_price AS total_price
FROM "order" ord
LEFT JOIN "user" usr ON usr.id = ord.user_id
LEFT JOIN "goods" god ON god.id = ord.goods_id
ORDER BY ord.id"#;

/// The shop query service
///
/// Stateless: every method takes the caller's connection and never keeps it.
pub struct ShopQueries;

impl ShopQueries {
    /// How many distinct users have ordered the given goods
    ///
    /// Returns 0 when no order references `goods_id`.
    pub fn count_users_who_have_bought_goods(conn: &Connection, goods_id: i64) -> Result<i64> {
        let mut stmt = conn.prepare(COUNT_BUYERS_SQL)?;
        // COUNT always yields exactly one row, even with no matches
        let count: i64 = stmt.query_row(params![goods_id], |row| row.get(0))?;
        debug!(goods_id, count, "counted buyers");
        Ok(count)
    }

    /// One page of users, newest id first
    ///
    /// `page_num` starts at 1. Page `p` of size `s` skips `(p - 1) * s` rows.
    /// Out-of-range values are handed to the store as they are.
    pub fn get_users_by_page_ordered_by_id_desc(
        conn: &Connection,
        page_num: i64,
        page_size: i64,
    ) -> Result<Vec<UserRecord>> {
        let offset = page_num.saturating_sub(1).saturating_mul(page_size);

        let mut stmt = conn.prepare(USERS_PAGE_SQL)?;
        let users = stmt
            .query_map(params![page_size, offset], |row| {
                Ok(UserRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    tel: row.get(2)?,
                    address: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(page_num, page_size, offset, rows = users.len(), "fetched user page");
        Ok(users)
    }

    /// Every ordered good with its GMV, highest first
    ///
    /// Goods that were never ordered do not appear.
    pub fn get_goods_and_gmv(conn: &Connection) -> Result<Vec<GoodsGmv>> {
        let mut stmt = conn.prepare(GOODS_GMV_SQL)?;
        let goods = stmt
            .query_map([], |row| {
                Ok(GoodsGmv {
                    goods_id: row.get(0)?,
                    goods_name: row.get(1)?,
                    gmv: row.get::<_, SqlDecimal>(2)?.into(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(rows = goods.len(), "computed goods gmv");
        Ok(goods)
    }

    /// Orders whose user and goods both exist
    pub fn get_inner_join_orders(conn: &Connection) -> Result<Vec<OrderView>> {
        let orders = Self::fetch_orders(conn, INNER_JOIN_ORDERS_SQL)?;
        debug!(rows = orders.len(), "fetched inner join orders");
        Ok(orders)
    }

    /// All orders, with `None` names where the user or goods is missing
    pub fn get_left_join_orders(conn: &Connection) -> Result<Vec<OrderView>> {
        let orders = Self::fetch_orders(conn, LEFT_JOIN_ORDERS_SQL)?;
        debug!(rows = orders.len(), "fetched left join orders");
        Ok(orders)
    }

    fn fetch_orders(conn: &Connection, sql: &str) -> Result<Vec<OrderView>> {
        let mut stmt = conn.prepare(sql)?;
        let orders = stmt
            .query_map([], Self::order_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(orders)
    }

    fn order_from_row(row: &Row<'_>) -> rusqlite::Result<OrderView> {
        Ok(OrderView {
            id: row.get(0)?,
            user_name: row.get(1)?,
            goods_name: row.get(2)?,
            total_price: row.get::<_, SqlDecimal>(3)?.into(),
        })
    }
}
