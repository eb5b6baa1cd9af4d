pub mod admin;
pub mod config;
pub mod database;
pub mod error;

pub use config::StoreConfig;
pub use database::PlayerRecordStore;
pub use error::StoreError;
