pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod voice;

pub use db::Database;
pub use error::StorageError;
pub use store::Store;
