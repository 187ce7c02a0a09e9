// File and store I/O

pub mod config;
pub mod csv;
pub mod error;
pub mod loader;
pub mod script;
pub mod sqlite;
pub mod store;

pub use config::LoadConfig;
pub use error::StoreError;
pub use loader::{load, LoadReport};
pub use script::build_matches;
pub use sqlite::SqliteStore;
pub use store::Store;
