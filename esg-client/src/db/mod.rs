pub mod category_table;
pub mod esg_queries;

pub use category_table::{CategoryTable, Ownership};
