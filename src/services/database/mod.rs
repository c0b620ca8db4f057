// Database service module
// SQLite connection, schema creation and column migrations

mod connection;
pub mod migrations;
mod schema;

pub use connection::Database;
