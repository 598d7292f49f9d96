pub mod catalog;
pub mod migrations;
pub mod sqlite;

pub use catalog::Catalog;
pub use sqlite::{ImportSummary, SqliteIntakeStore};
