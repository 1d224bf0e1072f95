// Example: Basic library usage
// Run with: cargo run --example basic_usage

use shopsql::schema::open_in_memory_fixture;
use shopsql::{ResultTable, ShopQueries};

fn main() -> anyhow::Result<()> {
    println!("=== shopsql Basic Usage Example ===\n");

    // The connection belongs to us; the queries only borrow it
    let conn = open_in_memory_fixture()?;

    // 1. Distinct buyers of a goods
    println!("1. Users who bought goods 1...");
    let buyers = ShopQueries::count_users_who_have_bought_goods(&conn, 1)?;
    println!("{}\n", buyers);

    // 2. Paging, newest id first
    println!("2. Users, page 2 with 3 per page...");
    let users = ShopQueries::get_users_by_page_ordered_by_id_desc(&conn, 2, 3)?;
    println!("{}\n", ResultTable::from_records(&users).format());

    // 3. GMV per goods
    println!("3. Goods by gross merchandise value...");
    let goods = ShopQueries::get_goods_and_gmv(&conn)?;
    println!("{}\n", ResultTable::from_records(&goods).format());

    // 4. Orders with both a known user and a known goods
    println!("4. Inner join orders...");
    let orders = ShopQueries::get_inner_join_orders(&conn)?;
    println!("{}\n", ResultTable::from_records(&orders).format());

    // 5. Every order, missing names as NULL
    println!("5. Left join orders...");
    let orders = ShopQueries::get_left_join_orders(&conn)?;
    println!("{}\n", ResultTable::from_records(&orders).format());

    println!("=== Example Complete ===");
    Ok(())
}
