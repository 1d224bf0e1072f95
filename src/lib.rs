// shopsql - analytical queries over a users / goods / orders schema
// This is the library root that exposes the public API

pub mod error;
pub mod query;
pub mod records;
pub mod report;
pub mod schema;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use query::{AdHocExecutor, ReadOnlyParser, ShopQueries};
pub use records::{GoodsGmv, OrderView, UserRecord};
pub use report::{ResultTable, Tabular};
