pub mod mongodb;
pub mod relational;

pub use self::mongodb::setup_mongodb;
pub use self::relational::{setup_database, RelationalBackend, TableSchema};
