// Query module - the shop queries plus the read-only ad-hoc path
pub mod executor;
pub mod parser;
pub mod service;

pub use executor::AdHocExecutor;
pub use parser::{AdHocQuery, ReadOnlyParser};
pub use service::ShopQueries;
