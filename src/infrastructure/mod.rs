pub mod database;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_and_migrate, init_database, DatabaseConfig};
