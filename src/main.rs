// Main entry point for the shopsql CLI
// Runs the shop queries against a SQLite database and prints the results

use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use rusqlite::Connection;
use serde::Serialize;
use shopsql::schema::{create_schema, list_tables, open_in_memory_fixture, seed_fixture};
use shopsql::{AdHocExecutor, ReadOnlyParser, ResultTable, ShopQueries, Tabular};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// shopsql - analytical queries over users, goods and orders
#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database file (default: in-memory database with sample data)
    #[arg(short, long, env = "SHOPSQL_DATABASE", global = true)]
    database: Option<PathBuf>,

    /// Create the tables and load the sample data before running
    #[arg(long, global = true)]
    init: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Count distinct users who ordered a goods
    Buyers {
        #[arg(short, long)]
        goods_id: i64,
    },
    /// List one page of users, highest id first
    Users {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
        /// Users per page
        #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
        size: i64,
    },
    /// Goods with their gross merchandise value, highest first
    Gmv,
    /// Orders whose user and goods both exist
    InnerOrders,
    /// All orders, with missing user or goods names shown as NULL
    LeftOrders,
    /// Run every query once with sample arguments
    Demo,
    /// Execute a single read-only SQL statement
    Exec { sql: String },
    /// Interactive read-only SQL shell
    Shell,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let conn = open_database(&args)?;

    match args.command {
        Command::Buyers { goods_id } => {
            let buyers = ShopQueries::count_users_who_have_bought_goods(&conn, goods_id)?;
            match args.format {
                OutputFormat::Table => println!("{}", buyers),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "goods_id": goods_id, "buyers": buyers })
                ),
            }
        }
        Command::Users { page, size } => {
            let users = ShopQueries::get_users_by_page_ordered_by_id_desc(&conn, page, size)?;
            print_records(&users, args.format)?;
        }
        Command::Gmv => {
            print_records(&ShopQueries::get_goods_and_gmv(&conn)?, args.format)?;
        }
        Command::InnerOrders => {
            print_records(&ShopQueries::get_inner_join_orders(&conn)?, args.format)?;
        }
        Command::LeftOrders => {
            print_records(&ShopQueries::get_left_join_orders(&conn)?, args.format)?;
        }
        Command::Demo => run_demo(&conn)?,
        Command::Exec { sql } => execute_query(&conn, &sql)?,
        Command::Shell => run_shell(&conn)?,
    }

    Ok(())
}

/// Log to stderr, filtered by RUST_LOG (warnings only by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_database(args: &Args) -> Result<Connection> {
    let Some(path) = &args.database else {
        if args.init {
            bail!("--init needs a database file (--database or SHOPSQL_DATABASE)");
        }
        info!("no database given, using in-memory sample data");
        return open_in_memory_fixture().context("failed to build in-memory sample database");
    };

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database '{}'", path.display()))?;

    if args.init {
        create_schema(&conn).context("failed to create tables")?;
        seed_fixture(&conn).context("failed to load sample data (already loaded?)")?;
    }

    Ok(conn)
}

fn print_records<T: Tabular + Serialize>(records: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", ResultTable::from_records(records).format()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
    }
    Ok(())
}

/// Print every query result once, one record per line
fn run_demo(conn: &Connection) -> Result<()> {
    println!(
        "buyers of goods 2: {}",
        ShopQueries::count_users_who_have_bought_goods(conn, 2)?
    );

    println!("users, page 2 of size 3:");
    for user in ShopQueries::get_users_by_page_ordered_by_id_desc(conn, 2, 3)? {
        println!("  {}", user);
    }

    println!("goods by gmv:");
    for goods in ShopQueries::get_goods_and_gmv(conn)? {
        println!("  {}", goods);
    }

    println!("inner join orders:");
    for order in ShopQueries::get_inner_join_orders(conn)? {
        println!("  {}", order);
    }

    println!("left join orders:");
    for order in ShopQueries::get_left_join_orders(conn)? {
        println!("  {}", order);
    }

    Ok(())
}

/// Parse, check and run one ad-hoc statement
fn execute_query(conn: &Connection, sql: &str) -> Result<()> {
    let query = ReadOnlyParser::parse(sql)?;
    let result = AdHocExecutor::run(conn, &query)?;
    println!("{}", result.format());
    Ok(())
}

/// Read-Eval-Print Loop over the read-only query path
fn run_shell(conn: &Connection) -> Result<()> {
    println!("shopsql read-only shell");
    println!("Type a SELECT statement, '.help' for help or '.exit' to quit");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("shopsql> ");
        stdout.flush()?;

        let mut input = String::new();
        // 0 bytes read means EOF (Ctrl-D)
        if stdin.read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('.') {
            match input {
                ".exit" | ".quit" => {
                    println!("Goodbye!");
                    break;
                }
                ".help" => print_help(),
                ".tables" => match list_tables(conn) {
                    Ok(tables) => println!("{}", tables.join("  ")),
                    Err(e) => eprintln!("Error: {}", e),
                },
                _ => {
                    println!("Unknown command: {}", input);
                    println!("Type '.help' for help");
                }
            }
            continue;
        }

        if let Err(e) = execute_query(conn, input) {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn print_help() {
    println!("Special Commands:");
    println!("  .help              Show this help message");
    println!("  .tables            List tables");
    println!("  .exit, .quit       Exit the shell");
    println!();
    println!("Tables:");
    println!("  \"user\"   (id, name, tel, address)");
    println!("  \"goods\"  (id, name, price)");
    println!("  \"order\"  (id, user_id, goods_id, goods_num, goods_price)");
    println!();
    println!("Notes:");
    println!("  - Only a single SELECT (or WITH ... SELECT) is accepted");
    println!("  - \"order\" and \"user\" are reserved words and must be quoted");
    println!();
}
